//! Platform helpers.

pub mod heap;

pub use heap::quiesce_heap;
