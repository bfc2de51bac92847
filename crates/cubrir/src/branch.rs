//! Branch records and identity-indexed branch collections.
//!
//! A branch is one control-flow edge out of a decision point. Its identity
//! is the tuple `(line, offset, end_offset, path, ordinal)` — never its
//! position in whatever list the instrumenter produced it in. Only `hits`
//! accumulates across runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single branch measurement produced by an instrumented run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    /// Source line of the decision point
    pub line: u32,
    /// Instruction offset of the decision point
    pub offset: i32,
    /// Instruction offset where the branch ends
    pub end_offset: i32,
    /// Path discriminator among branches leaving the same decision point
    pub path: u32,
    /// Ordinal discriminator among branches on the same line
    pub ordinal: u32,
    /// Number of times this branch was taken
    pub hits: u64,
}

impl BranchInfo {
    /// Identity of this record; `hits` never participates
    #[must_use]
    pub const fn key(&self) -> BranchKey {
        BranchKey {
            line: self.line,
            offset: self.offset,
            end_offset: self.end_offset,
            path: self.path,
            ordinal: self.ordinal,
        }
    }
}

/// Composite identity of a branch (Poka-Yoke)
///
/// Two records with equal keys are the same branch and merge by summing
/// `hits`; records differing in any field here never merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchKey {
    /// Source line of the decision point
    pub line: u32,
    /// Instruction offset of the decision point
    pub offset: i32,
    /// Instruction offset where the branch ends
    pub end_offset: i32,
    /// Path discriminator
    pub path: u32,
    /// Ordinal discriminator
    pub ordinal: u32,
}

impl BranchKey {
    /// Reassemble a full record from this identity and a hit count
    #[must_use]
    pub const fn with_hits(self, hits: u64) -> BranchInfo {
        BranchInfo {
            line: self.line,
            offset: self.offset,
            end_offset: self.end_offset,
            path: self.path,
            ordinal: self.ordinal,
            hits,
        }
    }
}

/// Unordered branch collection owned by one method, indexed by identity
///
/// Backed by a map keyed on [`BranchKey`] so merge lookups never linear-scan.
/// Serializes as a flat record list, which is the shape instrumenters
/// produce; duplicate identities in one list sum benignly on ingest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<BranchInfo>", into = "Vec<BranchInfo>")]
pub struct Branches {
    hits: HashMap<BranchKey, u64>,
}

impl Branches {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record in: insert if the identity is new, otherwise add
    /// its hits to the existing record
    pub fn add(&mut self, record: BranchInfo) {
        let slot = self.hits.entry(record.key()).or_insert(0);
        *slot = slot.saturating_add(record.hits);
    }

    /// Fold an entire incoming collection into this one
    pub fn merge(&mut self, incoming: Branches) {
        for (key, hits) in incoming.hits {
            let slot = self.hits.entry(key).or_insert(0);
            *slot = slot.saturating_add(hits);
        }
    }

    /// Hit count for a branch identity, if present
    #[must_use]
    pub fn hits_for(&self, key: &BranchKey) -> Option<u64> {
        self.hits.get(key).copied()
    }

    /// Number of branch records
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Check whether the collection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Number of branches with at least one hit
    #[must_use]
    pub fn covered_count(&self) -> usize {
        self.hits.values().filter(|&&h| h > 0).count()
    }

    /// Check whether any branch was taken at least once
    #[must_use]
    pub fn any_hit(&self) -> bool {
        self.hits.values().any(|&h| h > 0)
    }

    /// Full records, ordered by identity for deterministic consumption
    #[must_use]
    pub fn records(&self) -> Vec<BranchInfo> {
        let mut records: Vec<BranchInfo> = self
            .hits
            .iter()
            .map(|(key, &hits)| key.with_hits(hits))
            .collect();
        records.sort_unstable_by_key(BranchInfo::key);
        records
    }

    /// Drop every zero-hit branch, returning how many were removed
    pub(crate) fn remove_unhit(&mut self) -> usize {
        let before = self.hits.len();
        self.hits.retain(|_, &mut h| h > 0);
        before - self.hits.len()
    }
}

impl From<Vec<BranchInfo>> for Branches {
    fn from(records: Vec<BranchInfo>) -> Self {
        let mut branches = Self::new();
        for record in records {
            branches.add(record);
        }
        branches
    }
}

impl From<Branches> for Vec<BranchInfo> {
    fn from(branches: Branches) -> Self {
        branches.records()
    }
}
