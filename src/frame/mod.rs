//! LZ4 stream decoding — the collaborator behind the decoder session.
//!
//! - [`types`]   — magic numbers, frame layout constants, [`DecodeError`]
//! - [`header`]  — frame descriptor parsing and header checksum
//! - [`block`]   — bounds-checked LZ4 block decoding
//! - [`decoder`] — [`FrameDecoder`], a resettable [`StreamDecoder`]
//!
//! [`StreamDecoder`]: crate::io::session::StreamDecoder

pub mod block;
pub mod decoder;
pub mod header;
pub mod types;

pub use decoder::FrameDecoder;
pub use types::{DecodeError, FrameDescriptor};
