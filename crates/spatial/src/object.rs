//! Indexed objects and the table that owns them.
//!
//! The quadtree never owns the objects it indexes. It stores [`ObjectId`]
//! handles that point into an [`ObjectTable`] (or any other caller-side
//! storage keyed by the same ids).

use crate::rect::Rectangle;
use std::fmt;

/// Anything that exposes a current bounding rectangle.
pub trait Bounded {
    /// Get the current bounds.
    fn bound(&self) -> Rectangle;
}

impl Bounded for Rectangle {
    #[inline]
    fn bound(&self) -> Rectangle {
        *self
    }
}

impl<T: Bounded + ?Sized> Bounded for &T {
    #[inline]
    fn bound(&self) -> Rectangle {
        (**self).bound()
    }
}

impl<T: Bounded + ?Sized> Bounded for Box<T> {
    #[inline]
    fn bound(&self) -> Rectangle {
        (**self).bound()
    }
}

/// Stable handle of an indexed object. Identity inside the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw id value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Id as a slot index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for ObjectId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena of objects addressed by [`ObjectId`].
///
/// Removed slots go on a free list and their ids are handed out again, so an
/// id must not be used after its object was removed.
#[derive(Debug, Clone)]
pub struct ObjectTable<T> {
    slots: Vec<Option<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> ObjectTable<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Store an object and return its handle.
    pub fn insert(&mut self, object: T) -> ObjectId {
        self.len += 1;
        if let Some(raw) = self.free.pop() {
            self.slots[raw as usize] = Some(object);
            return ObjectId(raw);
        }
        let raw = u32::try_from(self.slots.len()).expect("object table exceeded u32::MAX slots");
        self.slots.push(Some(object));
        ObjectId(raw)
    }

    /// Remove an object, freeing its id for reuse.
    pub fn remove(&mut self, id: ObjectId) -> Option<T> {
        let object = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(object)
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the largest id handed out so far.
    #[inline]
    pub fn capacity_hint(&self) -> usize {
        self.slots.len()
    }

    /// Iterate over live objects in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|o| (ObjectId(i as u32), o)))
    }

    /// Iterate mutably over live objects in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|o| (ObjectId(i as u32), o)))
    }

    /// Ids of live objects in id order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    /// Remove every object. Ids start again from zero.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}

impl<T> Default for ObjectTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
