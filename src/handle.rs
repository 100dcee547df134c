/// An opaque reference to an element inside an [`IndexedMinHeap`](crate::IndexedMinHeap).
///
/// Handles are issued when an element enters the queue and stay valid until it leaves
/// (popped, drained or cleared). Slots are recycled, but each reuse bumps the slot's
/// generation, so a stale handle never resolves to a newer element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle {
    slot: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    /// Position of the element in the heap, or `UNSET` if the slot is free.
    pos: usize,
    generation: u32,
}

/// Mapping from handle to heap position.
#[derive(Debug, Clone, Default)]
pub(crate) struct HandleIndex {
    slots: Vec<Slot>,
    /// Free slots, reused LIFO.
    free: Vec<u32>,
}

impl HandleIndex {
    const UNSET: usize = usize::MAX;

    pub fn with_capacity(capacity: usize) -> Self {
        HandleIndex {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Allocates a handle for an element placed at `pos`.
    pub fn acquire(&mut self, pos: usize) -> Handle {
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            debug_assert_eq!(entry.pos, Self::UNSET);
            entry.pos = pos;
            return Handle {
                slot,
                generation: entry.generation,
            };
        }

        let slot = self.slots.len() as u32;
        self.slots.push(Slot { pos, generation: 0 });
        Handle {
            slot,
            generation: 0,
        }
    }

    /// Frees the slot of `handle`. Any copy of `handle` is stale afterwards.
    pub fn release(&mut self, handle: Handle) {
        debug_assert!(self.contains(handle));
        let entry = &mut self.slots[handle.slot as usize];
        entry.pos = Self::UNSET;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(handle.slot);
    }

    /// Frees every slot at once.
    pub fn release_all(&mut self) {
        self.free.clear();
        for (slot, entry) in self.slots.iter_mut().enumerate().rev() {
            if entry.pos != Self::UNSET {
                entry.pos = Self::UNSET;
                entry.generation = entry.generation.wrapping_add(1);
            }
            self.free.push(slot as u32);
        }
    }

    /// Returns the heap position of `handle`, if it is live.
    #[inline]
    pub fn position(&self, handle: Handle) -> Option<usize> {
        self.slots
            .get(handle.slot as usize)
            .filter(|entry| entry.generation == handle.generation && entry.pos != Self::UNSET)
            .map(|entry| entry.pos)
    }

    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.position(handle).is_some()
    }

    /// Records that the element of a live `handle` now sits at `pos`.
    #[inline(always)]
    pub fn set_position(&mut self, handle: Handle, pos: usize) {
        debug_assert!(self.contains(handle));
        self.slots[handle.slot as usize].pos = pos;
    }
}
