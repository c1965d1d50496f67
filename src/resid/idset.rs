//! A set of resource ids.

use super::resid::ResId;
use std::collections::HashSet;

/// IdSet holds the CurrentIds a patch or transformation is aimed at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSet {
    ids: HashSet<ResId>,
}

impl IdSet {
    pub fn new() -> Self {
        IdSet::default()
    }

    pub fn insert(&mut self, id: ResId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: &ResId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResId> {
        self.ids.iter()
    }
}

impl FromIterator<ResId> for IdSet {
    fn from_iter<T: IntoIterator<Item = ResId>>(iter: T) -> Self {
        IdSet {
            ids: iter.into_iter().collect(),
        }
    }
}
