//! Generation-checked slot storage.
//!
//! Every slot carries a generation that is bumped whenever its value leaves.
//! A [`SlotId`] records the generation it was issued under, so a handle kept
//! past `remove` (or `clear`) never resolves to a later occupant of the same
//! slot: lookups through it simply miss.
//!
//! ```text
//!   slots:  [ g0: A ] [ g1: — ] [ g0: C ]      vacant: [1]
//!
//!   insert(D) → SlotId { index: 1, generation: 1 }
//!   SlotId { index: 1, generation: 0 }  (issued before B left) → miss
//! ```

/// Handle to a value in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: usize,
    generation: u32,
}

impl SlotId {
    /// Position of the slot in the arena. Shared by every generation.
    pub fn index(self) -> usize {
        self.index
    }

    /// Generation the handle was issued under.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Storage addressed by [`SlotId`], reusing vacated slots.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    vacant: Vec<usize>,
    live: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an arena with room for `capacity` values before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            vacant: Vec::new(),
            live: 0,
        }
    }

    /// Stores `value`, preferring a vacated slot, and returns its handle.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.live += 1;
        match self.vacant.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.value = Some(value);
                SlotId {
                    index,
                    generation: slot.generation,
                }
            },
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                SlotId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            },
        }
    }

    /// Takes the value out of `id`'s slot. Stale handles return `None`.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slot_mut(id)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(id.index);
        self.live -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slot_mut(id).and_then(|slot| slot.value.as_mut())
    }

    /// `true` while `id` still names a live value.
    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drops every value and retires every outstanding handle.
    ///
    /// Slots are kept, with bumped generations, so handles issued before the
    /// clear cannot match values inserted after it.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.vacant.clear();
        self.vacant.extend((0..self.slots.len()).rev());
        self.live = 0;
    }

    fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
