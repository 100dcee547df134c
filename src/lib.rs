//! An indexed binary min-heap.
//!
//! [`IndexedMinHeap`] is a priority queue that, besides the usual push/peek/pop,
//! lets callers lower the key of an element that is already queued in O(log n).
//! Elements are addressed by the [`Handle`] returned from [`IndexedMinHeap::push`].

pub mod error;
pub mod handle;
pub mod indexed_heap;

pub use error::{HeapError, HeapResult};
pub use handle::Handle;
pub use indexed_heap::{IndexedMinHeap, NaturalOrder};
