//! Decoder session contract.
//!
//! A [`StreamDecoder`] is a long-lived, stateful value that is re-pointed at a
//! new compressed source for every file of a batch instead of being rebuilt,
//! so its internal scratch buffers are allocated once per process. Because
//! `reset` swaps shared state in place, a session must only ever be driven
//! from one call site at a time; nothing in this crate shares one across
//! threads.
//!
//! Progress is observed through [`BlockObserver`]: the session calls
//! [`BlockObserver::on_bytes`] synchronously after every decoded block. The
//! observer is an independent value, not a wrapper around the output sink.

use std::cell::Cell;
use std::io::{Read, Write};
use std::rc::Rc;

use crate::frame::types::DecodeError;

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// Receives the number of bytes produced by each decoded block.
pub trait BlockObserver {
    fn on_bytes(&mut self, n: usize);
}

impl<F: FnMut(usize)> BlockObserver for F {
    #[inline]
    fn on_bytes(&mut self, n: usize) {
        self(n)
    }
}

/// Shared running total of decoded bytes.
///
/// Clones share the same counter: register one clone with the session and
/// read the total from another once decoding finishes.
#[derive(Debug, Clone, Default)]
pub struct ByteCounter(Rc<Cell<u64>>);

impl ByteCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes reported so far.
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    /// A boxed clone suitable for [`StreamDecoder::set_observer`].
    pub fn observer(&self) -> Box<dyn BlockObserver> {
        Box::new(self.clone())
    }
}

impl BlockObserver for ByteCounter {
    #[inline]
    fn on_bytes(&mut self, n: usize) {
        self.0.set(self.0.get() + n as u64);
    }
}

// ---------------------------------------------------------------------------
// StreamDecoder
// ---------------------------------------------------------------------------

/// A resettable decoder that drains a bound source into an arbitrary sink.
pub trait StreamDecoder<R: Read> {
    /// Binds the session to `source`, discarding leftover decode state.
    ///
    /// Returns the previously bound source, if any, so the caller can close
    /// it. Scratch buffers are kept.
    fn reset(&mut self, source: R) -> Option<R>;

    /// Unbinds and returns the current source.
    fn take_source(&mut self) -> Option<R>;

    /// Attaches or replaces the byte-count observer; `None` clears it.
    fn set_observer(&mut self, observer: Option<Box<dyn BlockObserver>>);

    /// Drains the bound source to completion, writing decoded bytes to
    /// `sink`. Returns the number of decoded bytes.
    ///
    /// Malformed or truncated input, and sink write failures, are returned as
    /// [`DecodeError`] without further wrapping.
    fn decode_all(&mut self, sink: &mut dyn Write) -> Result<u64, DecodeError>;
}
