//! Failure kinds reported by the batch dispatcher.
//!
//! Every variant is fatal to the batch. Messages name a file only when it is
//! not the input itself; the caller prefixes the input name.
//!
//! Decoder failures are carried as the original [`DecodeError`] value;
//! [`BatchError::decode_error`] hands it back untouched.

use std::io;

use thiserror::Error;

use crate::frame::types::DecodeError;

#[derive(Debug, Error)]
pub enum BatchError {
    /// The source file is missing or unreadable.
    #[error("cannot open: {source}")]
    Open { path: String, source: io::Error },

    /// Size or permission lookup on the source failed.
    #[error("cannot stat: {source}")]
    Stat { path: String, source: io::Error },

    /// The destination name cannot be derived from the source name.
    #[error("file extension doesn't match expected {suffix}; will not process file")]
    Suffix { path: String, suffix: String },

    /// The destination cannot be created.
    #[error("cannot create {path}: {source}")]
    Create { path: String, source: io::Error },

    /// Loading the source into memory for benchmarking failed.
    #[error("read error: {source}")]
    Read { path: String, source: io::Error },

    /// Malformed or truncated compressed data, or a failed destination write.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Closing (and thereby flushing) a descriptor failed.
    #[error("cannot close {path}: {source}")]
    Close { path: String, source: io::Error },

    /// A benchmark report or summary line could not be written.
    #[error("cannot write report: {source}")]
    Report { source: io::Error },
}

impl BatchError {
    pub(crate) fn report(source: io::Error) -> Self {
        BatchError::Report { source }
    }

    /// The decoder's error, when this failure came from decoding.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            BatchError::Decode(e) => Some(e),
            _ => None,
        }
    }

    /// Short name of the failure kind, used in verbose diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            BatchError::Open { .. } => "OpenError",
            BatchError::Stat { .. } => "StatError",
            BatchError::Suffix { .. } => "SuffixError",
            BatchError::Create { .. } => "CreateError",
            BatchError::Read { .. } => "ReadError",
            BatchError::Decode(_) => "DecodeError",
            BatchError::Close { .. } => "CloseError",
            BatchError::Report { .. } => "ReportError",
        }
    }
}
