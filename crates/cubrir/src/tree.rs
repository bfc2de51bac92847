//! The four-level coverage hierarchy: module → document → class → method.
//!
//! Every level is a string-keyed map with the same merge rule: a key absent
//! on the accumulated side is inserted by value transfer (nothing below it
//! needs reconciling), a key present on both sides recurses one level down.
//! Hit counts are only ever summed, never overwritten.

use crate::branch::Branches;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// One level's insert-or-recurse merge rule, shared by all keyed levels
pub(crate) trait Merge {
    /// Fold `incoming` into `self`
    fn merge(&mut self, incoming: Self);
}

fn merge_keyed<V: Merge>(accumulated: &mut HashMap<String, V>, incoming: HashMap<String, V>) {
    for (key, value) in incoming {
        match accumulated.entry(key) {
            Entry::Vacant(slot) => {
                let _ = slot.insert(value);
            }
            Entry::Occupied(mut slot) => slot.get_mut().merge(value),
        }
    }
}

/// Per-line hit counts for one method, ordered by line number
///
/// Ordering matters for deterministic downstream reporting, so the backing
/// store is a `BTreeMap` rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lines(BTreeMap<u32, u64>);

impl Lines {
    /// Create an empty line table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record hits for a line: insert if absent, otherwise add to the
    /// existing count
    pub fn add(&mut self, line: u32, hits: u64) {
        let slot = self.0.entry(line).or_insert(0);
        *slot = slot.saturating_add(hits);
    }

    /// Fold an incoming line table into this one
    pub fn merge(&mut self, incoming: Lines) {
        for (line, hits) in incoming.0 {
            self.add(line, hits);
        }
    }

    /// Hit count for a line, if instrumented
    #[must_use]
    pub fn hit_count(&self, line: u32) -> Option<u64> {
        self.0.get(&line).copied()
    }

    /// Number of instrumented lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether any lines were instrumented
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of lines executed at least once
    #[must_use]
    pub fn covered_count(&self) -> usize {
        self.0.values().filter(|&&h| h > 0).count()
    }

    /// Check whether any line was executed at least once
    #[must_use]
    pub fn any_hit(&self) -> bool {
        self.0.values().any(|&h| h > 0)
    }

    /// Iterate `(line, hits)` in ascending line order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.0.iter().map(|(&line, &hits)| (line, hits))
    }
}

/// Coverage owned by a single method: its line table and its branches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Method {
    /// Per-line hit counts
    pub lines: Lines,
    /// Branch records, indexed by identity
    pub branches: Branches,
}

impl Method {
    /// Create an empty method entry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an incoming method measurement into this one
    pub fn merge(&mut self, incoming: Method) {
        self.lines.merge(incoming.lines);
        self.branches.merge(incoming.branches);
    }

    /// A method counts as covered once any of its lines was executed
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.lines.any_hit()
    }
}

impl Merge for Method {
    fn merge(&mut self, incoming: Self) {
        Method::merge(self, incoming);
    }
}

macro_rules! keyed_level {
    ($(#[$doc:meta])* $name:ident => $child:ty, $key_doc:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name(HashMap<String, $child>);

        impl $name {
            /// Create an empty level
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            #[doc = concat!("Insert a subtree under ", $key_doc)]
            ///
            /// Replaces any existing entry; use [`Self::merge`] to combine.
            pub fn insert(&mut self, key: impl Into<String>, value: $child) {
                let _ = self.0.insert(key.into(), value);
            }

            #[doc = concat!("Look up the subtree under ", $key_doc)]
            #[must_use]
            pub fn get(&self, key: &str) -> Option<&$child> {
                self.0.get(key)
            }

            /// Number of entries at this level
            #[must_use]
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Check whether this level is empty
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Iterate entries in arbitrary order
            pub fn iter(&self) -> impl Iterator<Item = (&str, &$child)> {
                self.0.iter().map(|(key, value)| (key.as_str(), value))
            }

            pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut $child)> {
                self.0.iter_mut().map(|(key, value)| (key.as_str(), value))
            }

            /// Fold an incoming level into this one: insert new keys by
            /// value transfer, recurse into keys present on both sides
            pub fn merge(&mut self, incoming: $name) {
                merge_keyed(&mut self.0, incoming.0);
            }
        }

        impl Merge for $name {
            fn merge(&mut self, incoming: Self) {
                $name::merge(self, incoming);
            }
        }
    };
}

keyed_level!(
    /// Method signature → [`Method`]
    Methods => Method,
    "a method signature"
);

keyed_level!(
    /// Class name → [`Methods`]
    Classes => Methods,
    "a class name"
);

keyed_level!(
    /// Document (source file) path → [`Classes`]
    Documents => Classes,
    "a document path"
);

keyed_level!(
    /// Module (compiled unit) path → [`Documents`]
    ///
    /// The root level of a coverage tree.
    Modules => Documents,
    "a module path"
);
