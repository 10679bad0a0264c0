//! LZ4 block decoding.
//!
//! A block is a run of sequences. Each sequence is a token byte (literal
//! length in the high nibble, match length − 4 in the low nibble), optional
//! literal-length extension bytes, the literals, a 16-bit little-endian match
//! offset, and optional match-length extension bytes. The last sequence of a
//! block carries literals only.
//!
//! Decoding appends to a `Vec<u8>` that may already hold up to 64 KiB of
//! history from earlier blocks; match offsets may reach back into it. Every
//! bound is checked on safe slices, so malformed input returns
//! [`DecompressError::MalformedInput`] and never panics.

const MINMATCH: usize = 4;
const ML_MASK: u8 = 0x0F;
const RUN_MASK: usize = 0x0F;

/// Errors returned by [`decompress_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressError {
    /// The block is malformed, truncated, references data before the
    /// history window, or expands beyond the allowed size.
    MalformedInput,
}

/// Reads the extension bytes of a length field (255, 255, ..., n < 255).
#[inline]
fn read_variable_length(src: &[u8], ip: &mut usize) -> Result<usize, DecompressError> {
    let mut length = 0usize;
    loop {
        let b = *src.get(*ip).ok_or(DecompressError::MalformedInput)?;
        *ip += 1;
        length = length
            .checked_add(b as usize)
            .ok_or(DecompressError::MalformedInput)?;
        if b != 255 {
            return Ok(length);
        }
    }
}

/// Decodes one compressed block from `src`, appending at most `max_out`
/// bytes to `out`.
///
/// Bytes already in `out` act as the history prefix for match references.
/// Returns the number of bytes appended.
pub fn decompress_block(
    src: &[u8],
    out: &mut Vec<u8>,
    max_out: usize,
) -> Result<usize, DecompressError> {
    let start = out.len();
    let limit = start + max_out;
    let mut ip = 0usize;

    if src.is_empty() {
        return Err(DecompressError::MalformedInput);
    }

    loop {
        let token = *src.get(ip).ok_or(DecompressError::MalformedInput)?;
        ip += 1;

        // ── Literals ─────────────────────────────────────────────────────────
        let mut lit_length = (token >> 4) as usize;
        if lit_length == RUN_MASK {
            lit_length += read_variable_length(src, &mut ip)?;
        }
        let lit_end = ip
            .checked_add(lit_length)
            .filter(|&end| end <= src.len())
            .ok_or(DecompressError::MalformedInput)?;
        if out.len() + lit_length > limit {
            return Err(DecompressError::MalformedInput);
        }
        out.extend_from_slice(&src[ip..lit_end]);
        ip = lit_end;

        if ip == src.len() {
            break;
        }

        // ── Match ────────────────────────────────────────────────────────────
        if ip + 2 > src.len() {
            return Err(DecompressError::MalformedInput);
        }
        let offset = u16::from_le_bytes([src[ip], src[ip + 1]]) as usize;
        ip += 2;
        if offset == 0 || offset > out.len() {
            return Err(DecompressError::MalformedInput);
        }

        let mut match_length = (token & ML_MASK) as usize;
        if match_length == ML_MASK as usize {
            match_length += read_variable_length(src, &mut ip)?;
        }
        match_length += MINMATCH;
        if out.len() + match_length > limit {
            return Err(DecompressError::MalformedInput);
        }

        // An offset shorter than the match repeats the last `offset` bytes;
        // copying in offset-sized chunks keeps every source range initialised.
        let mut remaining = match_length;
        while remaining > 0 {
            let chunk = remaining.min(offset);
            let from = out.len() - offset;
            out.extend_from_within(from..from + chunk);
            remaining -= chunk;
        }
    }

    Ok(out.len() - start)
}
