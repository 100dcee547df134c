use thiserror::Error;

/// Errors returned by [`IndexedMinHeap`](crate::IndexedMinHeap) operations.
///
/// Every failing call is rejected before the queue is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The queue holds no elements.
    #[error("priority queue is empty")]
    EmptyQueue,

    /// The value or handle does not refer to an element in the queue.
    #[error("key not found in priority queue")]
    KeyNotFound,

    /// A heap position outside the live range.
    #[error("position {position} is out of bounds for a queue of length {len}")]
    InvalidPosition { position: usize, len: usize },

    /// A decrease operation was given a key greater than the current one.
    #[error("new key is greater than the current key")]
    KeyIncreased,
}

pub type HeapResult<T> = Result<T, HeapError>;
