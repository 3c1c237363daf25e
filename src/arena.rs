//! Entity storage keyed by declared type.
//!
//! Every logical entity (module, contract, factory) is stored exactly once;
//! graph edges hold an [`Id`] into the arena instead of a copy.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Index;

use indexmap::IndexMap;

use crate::types::ObjectType;

/// Stable handle to an entity in an [`Arena`].
pub struct Id<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    pub fn index(self) -> usize {
        self.index
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index)
    }
}

/// Insertion-ordered arena with an identity index.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    entries: IndexMap<ObjectType, T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `item` under `ty`, replacing an entity with the same identity
    /// in place. The id of an existing identity never changes.
    pub fn insert(&mut self, ty: ObjectType, item: T) -> Id<T> {
        let (index, _) = self.entries.insert_full(ty, item);
        Id::new(index)
    }

    pub fn find(&self, ty: &ObjectType) -> Option<Id<T>> {
        self.entries.get_index_of(ty).map(Id::new)
    }

    pub fn get(&self, id: Id<T>) -> Option<&T> {
        self.entries.get_index(id.index).map(|(_, item)| item)
    }

    pub fn get_mut(&mut self, id: Id<T>) -> Option<&mut T> {
        self.entries.get_index_mut(id.index).map(|(_, item)| item)
    }

    pub fn get_by_type(&self, ty: &ObjectType) -> Option<&T> {
        self.entries.get(ty)
    }

    pub fn type_of(&self, id: Id<T>) -> Option<&ObjectType> {
        self.entries.get_index(id.index).map(|(ty, _)| ty)
    }

    pub fn ids(&self) -> impl Iterator<Item = Id<T>> + '_ {
        (0..self.entries.len()).map(Id::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        self.entries
            .values()
            .enumerate()
            .map(|(index, item)| (Id::new(index), item))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Index<Id<T>> for Arena<T> {
    type Output = T;

    fn index(&self, id: Id<T>) -> &T {
        &self.entries[id.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_insertion_order_and_resolve_by_type() {
        let mut arena = Arena::new();
        let first = arena.insert(ObjectType::new("a/M"), 1);
        let second = arena.insert(ObjectType::new("a/N"), 2);

        assert_eq!(arena.ids().collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(arena.find(&ObjectType::new("a/N")), Some(second));
        assert_eq!(arena[first], 1);
        assert_eq!(arena.type_of(second), Some(&ObjectType::new("a/N")));
    }
}
