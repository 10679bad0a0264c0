//! Resettable LZ4 stream decoder.
//!
//! [`FrameDecoder`] is the production [`StreamDecoder`]: it drains a bound
//! source made of any sequence of standard, legacy, and skippable frames and
//! writes the decoded bytes to a sink, one block at a time.
//!
//! The decoder owns two scratch buffers (compressed block, decoded block plus
//! history window) that survive [`StreamDecoder::reset`], so a single value
//! can be pointed at file after file without reallocating. Only the frame
//! state is discarded on reset.

use std::io::{self, Read, Write};

use crate::frame::block::decompress_block;
use crate::frame::header::read_frame_descriptor;
use crate::frame::types::{
    is_skippable_magic_number, DecodeError, FrameDescriptor, BLOCK_UNCOMPRESSED_FLAG,
    HISTORY_SIZE, LEGACY_BLOCKSIZE, LEGACY_COMPRESS_BOUND, LEGACY_MAGICNUMBER, LZ4F_MAGICNUMBER,
    MAGICNUMBER_SIZE,
};
use crate::io::session::{BlockObserver, StreamDecoder};
use crate::xxhash::{xxh32_oneshot, Xxh32State};

/// Skippable payloads are discarded through a fixed stack buffer.
const SKIP_BUF_SIZE: usize = 16 * 1024;

// ─────────────────────────────────────────────────────────────────────────────
// FrameDecoder
// ─────────────────────────────────────────────────────────────────────────────

/// A reusable LZ4 stream decoder bound to at most one source at a time.
pub struct FrameDecoder<R> {
    source: Option<R>,
    observer: Option<Box<dyn BlockObserver>>,
    /// Compressed payload of the block being decoded.
    block_buf: Vec<u8>,
    /// History window followed by the block being decoded.
    out_buf: Vec<u8>,
}

impl<R: Read> FrameDecoder<R> {
    /// Creates an unbound decoder. Bind a source with [`StreamDecoder::reset`].
    pub fn new() -> Self {
        FrameDecoder {
            source: None,
            observer: None,
            block_buf: Vec::new(),
            out_buf: Vec::new(),
        }
    }

    /// Creates a decoder already bound to `source`.
    pub fn with_source(source: R) -> Self {
        let mut d = Self::new();
        d.source = Some(source);
        d
    }

    /// Capacity currently held by the scratch buffers.
    pub fn scratch_capacity(&self) -> usize {
        self.block_buf.capacity() + self.out_buf.capacity()
    }
}

impl<R: Read> Default for FrameDecoder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Read> StreamDecoder<R> for FrameDecoder<R> {
    fn reset(&mut self, source: R) -> Option<R> {
        self.block_buf.clear();
        self.out_buf.clear();
        self.source.replace(source)
    }

    fn take_source(&mut self) -> Option<R> {
        self.source.take()
    }

    fn set_observer(&mut self, observer: Option<Box<dyn BlockObserver>>) {
        self.observer = observer;
    }

    fn decode_all(&mut self, sink: &mut dyn Write) -> Result<u64, DecodeError> {
        let FrameDecoder {
            source,
            observer,
            block_buf,
            out_buf,
        } = self;
        let src = source.as_mut().ok_or(DecodeError::NoSource)?;
        let mut ctx = BlockContext {
            sink,
            observer: observer.as_deref_mut(),
            block_buf,
            out_buf,
            produced: 0,
        };

        // A legacy stream ends where a value too large to be a block size
        // appears; that value is the next frame's magic number.
        let mut pending_magic: Option<u32> = None;
        loop {
            let magic = match pending_magic.take() {
                Some(m) => m,
                None => match read_magic(src)? {
                    Some(m) => m,
                    None => break,
                },
            };

            if is_skippable_magic_number(magic) {
                crate::displaylevel!(4, "Skipping detected skippable area \n");
                skip_frame(src)?;
                continue;
            }
            match magic {
                LZ4F_MAGICNUMBER => {
                    let fd = read_frame_descriptor(src)?;
                    decode_frame(src, &fd, &mut ctx)?;
                }
                LEGACY_MAGICNUMBER => {
                    crate::displaylevel!(4, "Detected : Legacy format \n");
                    pending_magic = decode_legacy(src, &mut ctx)?;
                }
                other => return Err(DecodeError::UnknownMagic(other)),
            }
        }

        Ok(ctx.produced)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-call decoding state
// ─────────────────────────────────────────────────────────────────────────────

struct BlockContext<'a> {
    sink: &'a mut dyn Write,
    observer: Option<&'a mut (dyn BlockObserver + 'static)>,
    block_buf: &'a mut Vec<u8>,
    out_buf: &'a mut Vec<u8>,
    produced: u64,
}

impl BlockContext<'_> {
    /// Emits `out_buf[start..]` to the sink and notifies the observer.
    fn emit(&mut self, start: usize) -> Result<usize, DecodeError> {
        let decoded = &self.out_buf[start..];
        self.sink.write_all(decoded)?;
        let n = decoded.len();
        self.produced += n as u64;
        if let Some(obs) = self.observer.as_mut() {
            obs.on_bytes(n);
        }
        Ok(n)
    }

    /// Grows the scratch buffers to hold a `block`-byte payload and a
    /// `window`-byte decoded area, so later blocks and sources never
    /// reallocate.
    fn reserve_scratch(&mut self, block: usize, window: usize) {
        self.block_buf
            .reserve(block.saturating_sub(self.block_buf.len()));
        self.out_buf.reserve(window.saturating_sub(self.out_buf.len()));
    }

    fn read_block<R: Read + ?Sized>(&mut self, src: &mut R, size: usize) -> Result<(), DecodeError> {
        self.block_buf.resize(size, 0);
        src.read_exact(&mut self.block_buf[..])
            .map_err(|e| DecodeError::from_read(e, "block payload"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Reads a little-endian `u32`.
fn read_le32<R: Read + ?Sized>(src: &mut R, what: &'static str) -> Result<u32, DecodeError> {
    let mut b = [0u8; 4];
    src.read_exact(&mut b)
        .map_err(|e| DecodeError::from_read(e, what))?;
    Ok(u32::from_le_bytes(b))
}

/// Reads a 4-byte value, returning `None` on a clean end of stream before
/// its first byte.
fn read_le32_or_eof<R: Read + ?Sized>(
    src: &mut R,
    what: &'static str,
) -> Result<Option<u32>, DecodeError> {
    let mut b = [0u8; MAGICNUMBER_SIZE];
    loop {
        match src.read(&mut b[..1]) {
            Ok(0) => return Ok(None),
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(DecodeError::Io(e)),
        }
    }
    src.read_exact(&mut b[1..])
        .map_err(|e| DecodeError::from_read(e, what))?;
    Ok(Some(u32::from_le_bytes(b)))
}

fn read_magic<R: Read + ?Sized>(src: &mut R) -> Result<Option<u32>, DecodeError> {
    read_le32_or_eof(src, "magic number")
}

fn skip_frame<R: Read + ?Sized>(src: &mut R) -> Result<(), DecodeError> {
    let mut remaining = read_le32(src, "skippable frame size")? as usize;
    let mut buf = [0u8; SKIP_BUF_SIZE];
    while remaining > 0 {
        let n = remaining.min(SKIP_BUF_SIZE);
        src.read_exact(&mut buf[..n])
            .map_err(|e| DecodeError::from_read(e, "skippable frame payload"))?;
        remaining -= n;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Standard frame
// ─────────────────────────────────────────────────────────────────────────────

fn decode_frame<R: Read + ?Sized>(
    src: &mut R,
    fd: &FrameDescriptor,
    ctx: &mut BlockContext<'_>,
) -> Result<u64, DecodeError> {
    let mut content_hash = fd.content_checksum.then(|| Xxh32State::new(0));
    let mut frame_bytes: u64 = 0;
    ctx.out_buf.clear();
    ctx.reserve_scratch(fd.block_max_size, HISTORY_SIZE + fd.block_max_size);

    loop {
        let header = read_le32(src, "block header")?;
        if header == 0 {
            break; // end mark
        }
        let stored = header & BLOCK_UNCOMPRESSED_FLAG != 0;
        let size = (header & !BLOCK_UNCOMPRESSED_FLAG) as usize;
        if size > fd.block_max_size {
            return Err(DecodeError::BlockTooLarge {
                size,
                max: fd.block_max_size,
            });
        }
        ctx.read_block(src, size)?;
        if fd.block_checksum {
            let expected = read_le32(src, "block checksum")?;
            if xxh32_oneshot(&ctx.block_buf[..], 0) != expected {
                return Err(DecodeError::BlockChecksum);
            }
        }

        if fd.block_independent {
            ctx.out_buf.clear();
        } else if ctx.out_buf.len() > HISTORY_SIZE {
            let excess = ctx.out_buf.len() - HISTORY_SIZE;
            ctx.out_buf.drain(..excess);
        }
        let start = ctx.out_buf.len();
        if stored {
            ctx.out_buf.extend_from_slice(&ctx.block_buf[..]);
        } else {
            let offset = ctx.produced;
            decompress_block(&ctx.block_buf[..], &mut *ctx.out_buf, fd.block_max_size)
                .map_err(|_| DecodeError::MalformedBlock(offset))?;
        }
        if let Some(h) = content_hash.as_mut() {
            h.update(&ctx.out_buf[start..]);
        }
        frame_bytes += ctx.emit(start)? as u64;
    }

    if let Some(h) = content_hash {
        let expected = read_le32(src, "content checksum")?;
        if h.digest() != expected {
            return Err(DecodeError::ContentChecksum);
        }
    }
    if let Some(expected) = fd.content_size {
        if expected != frame_bytes {
            return Err(DecodeError::ContentSize {
                expected,
                found: frame_bytes,
            });
        }
    }
    Ok(frame_bytes)
}

// ─────────────────────────────────────────────────────────────────────────────
// Legacy frame
// ─────────────────────────────────────────────────────────────────────────────

/// Decodes legacy blocks until end of stream or the next frame's magic
/// number, which is returned.
fn decode_legacy<R: Read + ?Sized>(
    src: &mut R,
    ctx: &mut BlockContext<'_>,
) -> Result<Option<u32>, DecodeError> {
    ctx.reserve_scratch(LEGACY_COMPRESS_BOUND, LEGACY_BLOCKSIZE);
    loop {
        let size = match read_le32_or_eof(src, "legacy block header")? {
            None => return Ok(None),
            Some(v) if v as usize > LEGACY_COMPRESS_BOUND => return Ok(Some(v)),
            Some(v) => v as usize,
        };
        ctx.read_block(src, size)?;
        ctx.out_buf.clear();
        let offset = ctx.produced;
        decompress_block(&ctx.block_buf[..], &mut *ctx.out_buf, LEGACY_BLOCKSIZE)
            .map_err(|_| DecodeError::MalformedBlock(offset))?;
        ctx.emit(0)?;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
