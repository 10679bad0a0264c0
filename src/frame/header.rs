//! Frame descriptor parsing and header checksum.
//!
//! The descriptor follows the magic number of a standard frame:
//!
//! ```text
//! FLG | BD | [content size: 8] | [dict id: 4] | HC
//! ```
//!
//! `HC` is the second byte of the XXH32 of every descriptor byte before it.

use std::io::Read;

use crate::frame::types::{block_size_from_id, DecodeError, FrameDescriptor, MAX_FH_SIZE};
use crate::xxhash::xxh32_oneshot;

// FLG bit layout.
const FLG_VERSION_SHIFT: u8 = 6;
const FLG_BLOCK_INDEPENDENT: u8 = 1 << 5;
const FLG_BLOCK_CHECKSUM: u8 = 1 << 4;
const FLG_CONTENT_SIZE: u8 = 1 << 3;
const FLG_CONTENT_CHECKSUM: u8 = 1 << 2;
const FLG_RESERVED: u8 = 1 << 1;
const FLG_DICT_ID: u8 = 1;

// BD bit layout.
const BD_BLOCK_SIZE_SHIFT: u8 = 4;
const BD_RESERVED: u8 = 0x8F;

const SUPPORTED_VERSION: u8 = 1;

/// Header checksum byte over the descriptor bytes preceding `HC`.
#[inline]
pub fn header_checksum(descriptor: &[u8]) -> u8 {
    (xxh32_oneshot(descriptor, 0) >> 8) as u8
}

/// Reads and validates a frame descriptor from `src`.
///
/// The magic number must already have been consumed.
pub fn read_frame_descriptor<R: Read + ?Sized>(src: &mut R) -> Result<FrameDescriptor, DecodeError> {
    let mut buf = [0u8; MAX_FH_SIZE];
    src.read_exact(&mut buf[..2])
        .map_err(|e| DecodeError::from_read(e, "frame descriptor"))?;
    let flg = buf[0];
    let bd = buf[1];

    let version = flg >> FLG_VERSION_SHIFT;
    if version != SUPPORTED_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    if flg & FLG_RESERVED != 0 || bd & BD_RESERVED != 0 {
        return Err(DecodeError::ReservedFlag);
    }
    let bsid = (bd >> BD_BLOCK_SIZE_SHIFT) & 0x7;
    let block_max_size = block_size_from_id(bsid).ok_or(DecodeError::InvalidBlockSizeId(bsid))?;

    let mut len = 2;
    let has_content_size = flg & FLG_CONTENT_SIZE != 0;
    let has_dict_id = flg & FLG_DICT_ID != 0;
    let optional = usize::from(has_content_size) * 8 + usize::from(has_dict_id) * 4;
    // optional fields + HC
    src.read_exact(&mut buf[len..len + optional + 1])
        .map_err(|e| DecodeError::from_read(e, "frame descriptor"))?;

    let content_size = if has_content_size {
        let mut b = [0u8; 8];
        b.copy_from_slice(&buf[len..len + 8]);
        len += 8;
        Some(u64::from_le_bytes(b))
    } else {
        None
    };
    let dict_id = if has_dict_id {
        let mut b = [0u8; 4];
        b.copy_from_slice(&buf[len..len + 4]);
        len += 4;
        Some(u32::from_le_bytes(b))
    } else {
        None
    };

    let expected = header_checksum(&buf[..len]);
    let found = buf[len];
    if expected != found {
        return Err(DecodeError::HeaderChecksum { expected, found });
    }
    if let Some(id) = dict_id {
        return Err(DecodeError::DictionaryUnsupported(id));
    }

    Ok(FrameDescriptor {
        block_independent: flg & FLG_BLOCK_INDEPENDENT != 0,
        block_checksum: flg & FLG_BLOCK_CHECKSUM != 0,
        content_checksum: flg & FLG_CONTENT_CHECKSUM != 0,
        content_size,
        block_max_size,
    })
}
