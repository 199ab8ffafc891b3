//! Insertion-ordered, first-wins collection.

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::types::Keyed;

/// A list that keeps only the first item inserted for each key, in
/// insertion order.
#[derive(Debug, Clone)]
pub struct UniqueList<T> {
    items: IndexMap<String, T>,
}

impl<T: Keyed> UniqueList<T> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// Appends an item unless its key is already present.
    ///
    /// Returns true if the item was inserted.
    pub fn push(&mut self, item: T) -> bool {
        match self.items.entry(item.key().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(item);
                true
            }
        }
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the list, returning its items in insertion order.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_values().collect()
    }
}

impl<T: Keyed> Default for UniqueList<T> {
    fn default() -> Self {
        Self::new()
    }
}
