//! Generational entity ids
//!
//! An id names a slot plus the generation the slot was in when the id was
//! handed out. Freeing a slot bumps its generation, so an id kept past its
//! entity's lifetime stops resolving instead of aliasing whatever reuses
//! the slot.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Id of something of kind `T`
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    const UNASSIGNED: u32 = u32::MAX;

    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// An id that never resolves
    #[inline]
    pub const fn null() -> Self {
        Self::new(Self::UNASSIGNED, 0)
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.index == Self::UNASSIGNED
    }

    #[inline]
    pub const fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

// Derives would require `T: Clone` and friends on the marker
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.index, self.generation) == (other.index, other.generation)
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.index, self.generation).hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Handle(null)")
        } else {
            write!(f, "Handle({}@{})", self.index, self.generation)
        }
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.generation)
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

/// Marker for ids that name game entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {}

/// Stable identifier of a player, item, platform or enemy
pub type EntityId = Handle<EntityTag>;

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    live: bool,
}

/// Hands out ids and tracks which are still live
pub struct HandleAllocator<T> {
    slots: Vec<Slot>,
    free: Vec<u32>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HandleAllocator<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn allocate(&mut self) -> Handle<T> {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.live = true;
                Handle::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    live: true,
                });
                Handle::new(index, 0)
            }
        }
    }

    /// Retire an id; false when it was already stale
    pub fn free(&mut self, handle: Handle<T>) -> bool {
        if !self.is_valid(handle) {
            return false;
        }
        let slot = &mut self.slots[handle.index as usize];
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        true
    }

    pub fn is_valid(&self, handle: Handle<T>) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.live && slot.generation == handle.generation)
    }

    /// Number of live ids
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn current(&self, index: usize) -> Handle<T> {
        Handle::new(index as u32, self.slots[index].generation)
    }
}

impl<T> Default for HandleAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Values of type `V` addressed by `Handle<Tag>`
///
/// `Tag` defaults to `V`. Give it explicitly when crates that never see `V`
/// must still name the ids, as the physics world does with [`EntityId`].
pub struct HandleMap<V, Tag = V> {
    ids: HandleAllocator<Tag>,
    values: Vec<Option<V>>,
}

impl<V, Tag> HandleMap<V, Tag> {
    pub fn new() -> Self {
        Self {
            ids: HandleAllocator::new(),
            values: Vec::new(),
        }
    }

    pub fn insert(&mut self, value: V) -> Handle<Tag> {
        let handle = self.ids.allocate();
        let index = handle.index() as usize;
        if index == self.values.len() {
            self.values.push(Some(value));
        } else {
            self.values[index] = Some(value);
        }
        handle
    }

    pub fn remove(&mut self, handle: Handle<Tag>) -> Option<V> {
        if self.ids.free(handle) {
            self.values[handle.index() as usize].take()
        } else {
            None
        }
    }

    pub fn get(&self, handle: Handle<Tag>) -> Option<&V> {
        if self.ids.is_valid(handle) {
            self.values[handle.index() as usize].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: Handle<Tag>) -> Option<&mut V> {
        if self.ids.is_valid(handle) {
            self.values[handle.index() as usize].as_mut()
        } else {
            None
        }
    }

    pub fn contains(&self, handle: Handle<Tag>) -> bool {
        self.ids.is_valid(handle)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Live ids with their values, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Handle<Tag>, &V)> {
        let ids = &self.ids;
        self.values
            .iter()
            .enumerate()
            .filter_map(move |(i, value)| value.as_ref().map(|v| (ids.current(i), v)))
    }
}

impl<V, Tag> Default for HandleMap<V, Tag> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freed_slot_is_reused_with_new_generation() {
        let mut ids: HandleAllocator<EntityTag> = HandleAllocator::new();
        let player = ids.allocate();
        let coin = ids.allocate();
        assert_ne!(player, coin);
        assert_eq!(ids.len(), 2);

        assert!(ids.free(coin));
        assert!(!ids.free(coin));
        assert!(!ids.is_valid(coin));

        let enemy = ids.allocate();
        assert_eq!(enemy.index(), coin.index());
        assert_ne!(enemy.generation(), coin.generation());
        assert!(!ids.is_valid(coin));
        assert!(ids.is_valid(player));
    }

    #[test]
    fn test_stale_entity_does_not_resolve() {
        let mut entities: HandleMap<&str, EntityTag> = HandleMap::new();
        let coin: EntityId = entities.insert("coin");
        let platform = entities.insert("platform");

        assert_eq!(entities.get(coin), Some(&"coin"));
        assert_eq!(entities.remove(coin), Some("coin"));
        assert_eq!(entities.remove(coin), None);

        let enemy = entities.insert("enemy");
        assert_eq!(enemy.index(), coin.index());
        assert_eq!(entities.get(coin), None);
        assert_eq!(entities.get(enemy), Some(&"enemy"));
        assert!(entities.contains(platform));

        let live: Vec<_> = entities.iter().map(|(id, name)| (id, *name)).collect();
        assert_eq!(live, vec![(enemy, "enemy"), (platform, "platform")]);
    }

    #[test]
    fn test_null_and_foreign_ids() {
        let entities: HandleMap<u8, EntityTag> = HandleMap::new();
        let null: EntityId = Handle::default();
        assert!(null.is_null());
        assert!(!entities.contains(null));
        assert!(!entities.contains(EntityId::new(7, 0)));
    }
}
