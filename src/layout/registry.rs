use std::collections::HashMap;

use crate::foundation::core::Geometry;

/// Run-scoped store of resolved element geometries.
///
/// Insertion-ordered and write-once per id: once an element's geometry is recorded it never
/// changes, so every later lookup of that id sees the same `(left, top)`.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: Vec<(String, Geometry)>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `geometry` for `id`.
    ///
    /// Returns `false` (and leaves the registry untouched) if `id` was already recorded.
    pub fn insert(&mut self, id: &str, geometry: Geometry) -> bool {
        if self.index.contains_key(id) {
            return false;
        }
        self.index.insert(id.to_owned(), self.entries.len());
        self.entries.push((id.to_owned(), geometry));
        true
    }

    pub fn get(&self, id: &str) -> Option<&Geometry> {
        self.index.get(id).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Geometry)> {
        self.entries.iter().map(|(id, g)| (id.as_str(), g))
    }
}
