//! LZ4 stream format constants, frame descriptor, and decoder error type.
//!
//! Covers the three kinds of frame that may appear back to back in an LZ4
//! stream:
//! - standard frames (`LZ4F_MAGICNUMBER`)
//! - legacy frames (`LEGACY_MAGICNUMBER`)
//! - skippable frames (`LZ4F_SKIPPABLE0 ..= LZ4F_SKIPPABLE0 | 0xF`)

use std::io;

use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Magic numbers
// ─────────────────────────────────────────────────────────────────────────────

/// Magic number opening a standard LZ4 frame.
pub const LZ4F_MAGICNUMBER: u32 = 0x184D_2204;

/// Magic number opening a legacy-format stream.
pub const LEGACY_MAGICNUMBER: u32 = 0x184C_2102;

/// First skippable-frame magic number; the low nibble is user-defined.
pub const LZ4F_SKIPPABLE0: u32 = 0x184D_2A50;

/// Mask folding every skippable magic number onto [`LZ4F_SKIPPABLE0`].
pub const LZ4F_SKIPPABLEMASK: u32 = 0xFFFF_FFF0;

/// Size of a magic number on the wire.
pub const MAGICNUMBER_SIZE: usize = 4;

// ─────────────────────────────────────────────────────────────────────────────
// Frame layout
// ─────────────────────────────────────────────────────────────────────────────

/// High bit of a block header: the block payload is stored uncompressed.
pub const BLOCK_UNCOMPRESSED_FLAG: u32 = 0x8000_0000;

/// Largest frame descriptor: FLG + BD + content size + dict id + HC.
pub const MAX_FH_SIZE: usize = 2 + 8 + 4 + 1;

/// Linked blocks may reference up to 64 KiB of previously decoded output.
pub const HISTORY_SIZE: usize = 64 * 1024;

/// Uncompressed block size used by the legacy format (8 MiB).
pub const LEGACY_BLOCKSIZE: usize = 8 << 20;

/// Worst-case compressed size of a `LEGACY_BLOCKSIZE` block.
///
/// A legacy block header larger than this is not a size at all; it is the
/// magic number of the next frame in the stream.
pub const LEGACY_COMPRESS_BOUND: usize = LEGACY_BLOCKSIZE + LEGACY_BLOCKSIZE / 255 + 16;

/// Returns `true` for any magic number in the skippable range.
#[inline]
pub fn is_skippable_magic_number(magic: u32) -> bool {
    magic & LZ4F_SKIPPABLEMASK == LZ4F_SKIPPABLE0
}

/// Maximum block size for a BD block-size id (4..=7).
pub fn block_size_from_id(id: u8) -> Option<usize> {
    match id {
        4 => Some(64 * 1024),
        5 => Some(256 * 1024),
        6 => Some(1024 * 1024),
        7 => Some(4 * 1024 * 1024),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters decoded from a standard frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// Blocks are independent (no history shared between blocks).
    pub block_independent: bool,
    /// Each data block is followed by an XXH32 of its payload.
    pub block_checksum: bool,
    /// The end mark is followed by an XXH32 of all decoded bytes.
    pub content_checksum: bool,
    /// Declared decoded size of the frame, when present.
    pub content_size: Option<u64>,
    /// Maximum decoded size of one block.
    pub block_max_size: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Everything that can go wrong while draining an LZ4 stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("no source bound to the decoder")]
    NoSource,
    #[error("unrecognized header: magic number {0:#010x}")]
    UnknownMagic(u32),
    #[error("unsupported frame version {0}")]
    UnsupportedVersion(u8),
    #[error("reserved flag bit set in frame descriptor")]
    ReservedFlag,
    #[error("invalid block size id {0}")]
    InvalidBlockSizeId(u8),
    #[error("frame header checksum mismatch (expected {expected:#04x}, found {found:#04x})")]
    HeaderChecksum { expected: u8, found: u8 },
    #[error("dictionary id {0:#010x} requested; dictionaries are not supported")]
    DictionaryUnsupported(u32),
    #[error("block of {size} bytes exceeds maximum block size {max}")]
    BlockTooLarge { size: usize, max: usize },
    #[error("block checksum mismatch")]
    BlockChecksum,
    #[error("content checksum mismatch")]
    ContentChecksum,
    #[error("frame declared {expected} decoded bytes but produced {found}")]
    ContentSize { expected: u64, found: u64 },
    #[error("corrupted block at decoded offset {0}")]
    MalformedBlock(u64),
    #[error("truncated stream: {0}")]
    Truncated(&'static str),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// Maps a short read from `read_exact` onto [`DecodeError::Truncated`].
    pub(crate) fn from_read(e: io::Error, what: &'static str) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::Truncated(what)
        } else {
            DecodeError::Io(e)
        }
    }
}
