//! Generational handle table for allocators crossing the C boundary.
//!
//! A handle packs a slot index (upper 32 bits) and the slot's generation
//! (lower 32 bits). Removing a value bumps the generation, so a destroyed
//! handle fails lookup instead of reaching a reused slot.

fn pack(slot: u32, generation: u32) -> u64 {
    (u64::from(slot) << 32) | u64::from(generation)
}

fn unpack(handle: u64) -> (usize, u32) {
    ((handle >> 32) as usize, handle as u32)
}

struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Maps `u64` handles to owned values, recycling vacated slots.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<u32>,
}

impl<T> HandleTable<T> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Store `value` and return its handle.
    pub(crate) fn insert(&mut self, value: T) -> u64 {
        match self.vacant.pop() {
            Some(slot) => {
                let entry = &mut self.entries[slot as usize];
                entry.value = Some(value);
                pack(slot, entry.generation)
            }
            None => {
                let slot = self.entries.len() as u32;
                self.entries.push(Entry {
                    generation: 0,
                    value: Some(value),
                });
                pack(slot, 0)
            }
        }
    }

    fn entry_mut(&mut self, handle: u64) -> Option<(u32, &mut Entry<T>)> {
        let (slot, generation) = unpack(handle);
        let entry = self.entries.get_mut(slot)?;
        (entry.generation == generation).then_some((slot as u32, entry))
    }

    /// The value behind `handle`, if it is live.
    pub(crate) fn get(&self, handle: u64) -> Option<&T> {
        let (slot, generation) = unpack(handle);
        let entry = self.entries.get(slot)?;
        if entry.generation != generation {
            return None;
        }
        entry.value.as_ref()
    }

    /// Take the value behind `handle`, invalidating the handle.
    ///
    /// A slot whose generation wraps to zero is never reused, so a handle
    /// from its first epoch cannot come back to life.
    pub(crate) fn remove(&mut self, handle: u64) -> Option<T> {
        let (slot, entry) = self.entry_mut(handle)?;
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        if entry.generation != 0 {
            self.vacant.push(slot);
        }
        Some(value)
    }

    /// Number of live handles.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value.is_some()).count()
    }
}
