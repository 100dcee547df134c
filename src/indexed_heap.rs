use std::{cmp::Ordering, fmt, mem};

use itertools::Itertools;
use log::{debug, trace, warn};

use crate::{
    error::{HeapError, HeapResult},
    handle::{Handle, HandleIndex},
};

/// Natural ordering comparator, i.e. `Ord::cmp`.
pub type NaturalOrder<T> = fn(&T, &T) -> Ordering;

#[derive(Debug, Clone)]
struct Entry<T> {
    handle: Handle,
    value: T,
}

/// A binary min-heap that allows in-place key decreases of its elements.
///
/// Every element gets a [`Handle`] when it enters the queue. The handle keeps
/// referring to the element while it moves through the heap, so equal values
/// never get mixed up.
#[derive(Clone)]
pub struct IndexedMinHeap<T, C = NaturalOrder<T>> {
    /// The array representation of the heap.
    heap: Vec<Entry<T>>,
    /// Mapping from handle to the element's index in the heap.
    index: HandleIndex,
    /// Decides the heap order. Never used for lookups.
    compare: C,
}

impl<T: Ord> IndexedMinHeap<T> {
    /// Creates a new empty queue ordered by `Ord`.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty queue ordered by `Ord` with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, <T as Ord>::cmp)
    }

    /// Creates a queue ordered by `Ord` from the given values.
    ///
    /// Handles are assigned in input order, see [`iter`](Self::iter).
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        Self::from_values_with_comparator(values, <T as Ord>::cmp)
    }
}

impl<T, C> IndexedMinHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    pub fn with_comparator(compare: C) -> Self {
        Self::with_capacity_and_comparator(0, compare)
    }

    pub fn with_capacity_and_comparator(capacity: usize, compare: C) -> Self {
        IndexedMinHeap {
            heap: Vec::with_capacity(capacity),
            index: HandleIndex::with_capacity(capacity),
            compare,
        }
    }

    /// Creates a queue from the given values and establishes heap order in O(n).
    pub fn from_values_with_comparator(values: impl IntoIterator<Item = T>, compare: C) -> Self {
        let values = values.into_iter();
        let mut index = HandleIndex::with_capacity(values.size_hint().0);
        let heap = values
            .enumerate()
            .map(|(pos, value)| Entry {
                handle: index.acquire(pos),
                value,
            })
            .collect();

        let mut queue = IndexedMinHeap {
            heap,
            index,
            compare,
        };
        queue.build_min_heap();
        queue
    }

    /// Number of elements in the queue.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of elements the queue can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.heap.reserve(additional);
    }

    /// Returns the minimum element without removing it.
    pub fn peek(&self) -> HeapResult<&T> {
        self.heap
            .first()
            .map(|entry| &entry.value)
            .ok_or(HeapError::EmptyQueue)
    }

    /// Alias for [`peek`](Self::peek).
    #[inline]
    pub fn front(&self) -> HeapResult<&T> {
        self.peek()
    }

    pub fn peek_with_handle(&self) -> HeapResult<(Handle, &T)> {
        self.heap
            .first()
            .map(|entry| (entry.handle, &entry.value))
            .ok_or(HeapError::EmptyQueue)
    }

    /// Removes and returns the minimum element.
    pub fn pop_min(&mut self) -> HeapResult<T> {
        self.pop_min_with_handle().map(|(_, value)| value)
    }

    /// Removes the minimum element and returns it together with its (now stale) handle.
    pub fn pop_min_with_handle(&mut self) -> HeapResult<(Handle, T)> {
        let last = self.heap.pop().ok_or(HeapError::EmptyQueue)?;

        let min = if self.heap.is_empty() {
            last
        } else {
            // Move the last element to the root and sift down
            let min = mem::replace(&mut self.heap[0], last);
            self.index.set_position(self.heap[0].handle, 0);
            self.sift_down(0, self.heap.len());
            min
        };

        self.index.release(min.handle);
        Ok((min.handle, min.value))
    }

    /// Inserts a new element and returns its handle.
    pub fn push(&mut self, item: T) -> Handle {
        if self.heap.len() == self.heap.capacity() {
            debug!(
                "Heap buffer full at capacity {}, growing.",
                self.heap.capacity()
            );
        }

        let pos = self.heap.len();
        let handle = self.index.acquire(pos);
        self.heap.push(Entry { handle, value: item });
        self.sift_up(pos);
        handle
    }

    /// Replaces the value at heap position `position` with the smaller or equal `new_key`.
    ///
    /// The element keeps its handle.
    pub fn decrease_key_by_position(&mut self, position: usize, new_key: T) -> HeapResult<()> {
        let current = self
            .heap
            .get(position)
            .ok_or(HeapError::InvalidPosition {
                position,
                len: self.heap.len(),
            })?;

        if (self.compare)(&new_key, &current.value) == Ordering::Greater {
            warn!("Rejected decrease at position {position}: new key is greater.");
            return Err(HeapError::KeyIncreased);
        }

        self.heap[position].value = new_key;
        self.sift_up(position);
        Ok(())
    }

    /// Replaces the value of the element behind `handle` with the smaller or equal `new_key`.
    pub fn decrease_key(&mut self, handle: Handle, new_key: T) -> HeapResult<()> {
        let position = self.index.position(handle).ok_or(HeapError::KeyNotFound)?;
        self.decrease_key_by_position(position, new_key)
    }

    /// Decreases the key of an element equal to `old_key`.
    ///
    /// Finding the element is a linear scan. If several elements equal `old_key`,
    /// only one of them is updated. Prefer [`decrease_key`](Self::decrease_key).
    pub fn decrease_key_by_value(&mut self, old_key: &T, new_key: T) -> HeapResult<()>
    where
        T: PartialEq,
    {
        let position = self
            .heap
            .iter()
            .position(|entry| entry.value == *old_key)
            .ok_or(HeapError::KeyNotFound)?;
        self.decrease_key_by_position(position, new_key)
    }

    /// Replaces the value behind `handle` with an arbitrary new key and restores heap order.
    /// Returns the previous value.
    pub fn update_key(&mut self, handle: Handle, new_key: T) -> HeapResult<T> {
        let position = self.index.position(handle).ok_or(HeapError::KeyNotFound)?;
        let ordering = (self.compare)(&new_key, &self.heap[position].value);
        let old = mem::replace(&mut self.heap[position].value, new_key);

        match ordering {
            Ordering::Less => self.sift_up(position),
            Ordering::Greater => self.sift_down(position, self.heap.len()),
            Ordering::Equal => {}
        }
        Ok(old)
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.index
            .position(handle)
            .map(|position| &self.heap[position].value)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.index.contains(handle)
    }

    /// Current heap position of the element behind `handle`.
    pub fn position_of(&self, handle: Handle) -> Option<usize> {
        self.index.position(handle)
    }

    /// Iterates over all elements in heap (not sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.heap.iter().map(|entry| (entry.handle, &entry.value))
    }

    /// Removes all elements. All handles become stale.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.index.release_all();
    }

    /// Establishes heap order over the whole buffer.
    pub fn build_min_heap(&mut self) {
        let len = self.heap.len();
        if len < 2 {
            return;
        }

        trace!("Building heap of {len} elements.");
        for idx in (0..=Self::parent_of(len - 1)).rev() {
            self.sift_down(idx, len);
        }
    }

    /// Sorts the elements in place (heapsort) and moves them out in ascending order.
    ///
    /// This empties the queue: afterwards `len() == 0` and all handles are stale.
    /// The capacity is kept. See [`to_sorted_vec`](Self::to_sorted_vec) for a
    /// non-destructive version.
    pub fn drain_sorted(&mut self) -> Vec<T> {
        // Move the current minimum behind the shrinking heap => descending buffer
        for end in (1..self.heap.len()).rev() {
            self.swap(0, end);
            self.sift_down(0, end);
        }

        self.index.release_all();
        self.heap.drain(..).rev().map(|entry| entry.value).collect()
    }

    /// Returns a sorted copy of the elements, leaving the queue untouched.
    pub fn to_sorted_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.heap
            .iter()
            .map(|entry| entry.value.clone())
            .sorted_by(|a, b| (self.compare)(a, b))
            .collect()
    }

    /// Sifts the element at `idx` up the heap to restore the heap property.
    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent_idx = Self::parent_of(idx);
            if !self.is_less(idx, parent_idx) {
                break; // Parent is smaller or equal => heap property satisfied
            }

            self.swap(idx, parent_idx);
            idx = parent_idx;
        }
    }

    /// Sifts the element at `idx` down the first `len` positions of the heap.
    fn sift_down(&mut self, mut idx: usize, len: usize) {
        loop {
            let left = Self::left_child_of(idx);
            let right = left + 1;

            // Ties keep the parent, then the left child
            let mut smallest = idx;
            if left < len && self.is_less(left, smallest) {
                smallest = left;
            }
            if right < len && self.is_less(right, smallest) {
                smallest = right;
            }

            if smallest == idx {
                break;
            }

            self.swap(idx, smallest);
            idx = smallest;
        }
    }

    #[inline(always)]
    fn is_less(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.heap[a].value, &self.heap[b].value) == Ordering::Less
    }

    /// Swaps two heap entries and updates the mapping accordingly.
    #[inline(always)]
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.index.set_position(self.heap[a].handle, a);
        self.index.set_position(self.heap[b].handle, b);
    }

    #[inline(always)]
    fn parent_of(idx: usize) -> usize {
        (idx - 1) >> 1
    }

    #[inline(always)]
    fn left_child_of(idx: usize) -> usize {
        (idx << 1) + 1
    }
}

impl<T: Ord> Default for IndexedMinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for IndexedMinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl<T, C> Extend<T> for IndexedMinHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for IndexedMinHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedMinHeap")
            .field("len", &self.heap.len())
            .field("heap", &self.heap)
            .finish()
    }
}
