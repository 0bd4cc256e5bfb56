//! Generational storage that keeps insertion order for iteration.

use lane_defence_core::{EnemyId, ProjectileId, TowerId};

/// Identifier types that can address an [`Arena`] slot.
pub(crate) trait ArenaKey: Copy + PartialEq {
    fn from_parts(slot: u32, generation: u32) -> Self;
    fn slot(&self) -> u32;
    fn generation(&self) -> u32;
}

macro_rules! impl_arena_key {
    ($($key:ty),*) => {
        $(
            impl ArenaKey for $key {
                fn from_parts(slot: u32, generation: u32) -> Self {
                    <$key>::new(slot, generation)
                }

                fn slot(&self) -> u32 {
                    <$key>::slot(self)
                }

                fn generation(&self) -> u32 {
                    <$key>::generation(self)
                }
            }
        )*
    };
}

impl_arena_key!(TowerId, EnemyId, ProjectileId);

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage whose handles go stale once their entry is removed.
///
/// Lookups compare the handle's generation with the slot's, so a handle
/// to a removed entity never aliases a newer occupant of the same slot.
/// `order` records live handles in insertion order.
#[derive(Clone, Debug)]
pub(crate) struct Arena<K, T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    order: Vec<K>,
}

impl<K: ArenaKey, T> Arena<K, T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, value: T) -> K {
        let key = match self.free.pop() {
            Some(slot) => {
                let entry = &mut self.slots[slot as usize];
                entry.value = Some(value);
                K::from_parts(slot, entry.generation)
            }
            None => {
                let slot = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                K::from_parts(slot, 0)
            }
        };
        self.order.push(key);
        key
    }

    pub(crate) fn get(&self, key: K) -> Option<&T> {
        self.slots
            .get(key.slot() as usize)
            .filter(|entry| entry.generation == key.generation())
            .and_then(|entry| entry.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots
            .get_mut(key.slot() as usize)
            .filter(|entry| entry.generation == key.generation())
            .and_then(|entry| entry.value.as_mut())
    }

    pub(crate) fn contains(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Removes the entry, returning it only the first time a live handle is passed.
    pub(crate) fn remove(&mut self, key: K) -> Option<T> {
        let entry = self
            .slots
            .get_mut(key.slot() as usize)
            .filter(|entry| entry.generation == key.generation())?;
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(key.slot());
        if let Some(position) = self.order.iter().position(|live| *live == key) {
            let _ = self.order.remove(position);
        }
        Some(value)
    }

    /// Copy of the live handles in insertion order.
    pub(crate) fn keys(&self) -> Vec<K> {
        self.order.clone()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.order
            .iter()
            .filter_map(move |key| self.get(*key).map(|value| (*key, value)))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}
