//! Local to remote identifier table.

use std::collections::HashMap;

/// Maps identifiers from the interchange files to the ones the platform
/// assigned during this run.
///
/// Lookups never fail: an unmapped id resolves to itself, so a response for a
/// survey that could not be created is still submitted (and most likely
/// rejected) rather than aborting the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMap {
    entries: HashMap<String, String>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `local -> remote`, replacing an earlier mapping.
    pub fn insert(&mut self, local: impl Into<String>, remote: impl Into<String>) {
        self.entries.insert(local.into(), remote.into());
    }

    /// The remote id, if one was recorded.
    pub fn get(&self, local: &str) -> Option<&str> {
        self.entries.get(local).map(String::as_str)
    }

    /// The remote id, or `local` itself when unmapped.
    pub fn resolve<'a>(&'a self, local: &'a str) -> &'a str {
        self.get(local).unwrap_or(local)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>, R: Into<String>> FromIterator<(L, R)> for IdMap {
    fn from_iter<I: IntoIterator<Item = (L, R)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (local, remote) in iter {
            map.insert(local, remote);
        }
        map
    }
}
