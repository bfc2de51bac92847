//! Run aggregation: fold per-run coverage trees into one accumulated tree.
//!
//! One [`CoverageTree`] is built per analysis session. The surrounding tool
//! calls [`CoverageTree::merge_run`] once per completed instrumented run,
//! in any order — merge is commutative and associative — and must serialize
//! those calls itself; the tree performs no locking and assumes exclusive
//! access for the duration of each merge.
//!
//! After every merge the tree patches a known class of false positives:
//! compiler-generated async state machines instrument mutually exclusive
//! branch outcomes per await point, and a covered outcome can sit next to a
//! spurious uncovered sibling that no test could ever take.

use crate::result::CubrirResult;
use crate::tree::Modules;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Suffix of compiler-generated async state-machine resume methods
pub const STATE_MACHINE_METHOD_SUFFIX: &str = "::MoveNext()";

/// Coverage contributed by one instrumented run
///
/// Produced by the instrumentation collaborator, consumed destructively by
/// [`CoverageTree::merge_run`]. `state_machines` lists the qualified names
/// of methods the instrumenter recognized as compiler-generated async state
/// machines; it is passed through unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageRun {
    /// Module map measured by this run
    pub modules: Modules,
    /// Qualified method names registered as async state machines
    #[serde(default)]
    pub state_machines: HashSet<String>,
}

impl CoverageRun {
    /// Create a run around a measured module map
    #[must_use]
    pub fn new(modules: Modules) -> Self {
        Self {
            modules,
            state_machines: HashSet::new(),
        }
    }

    /// Attach the instrumenter's async state-machine registry
    #[must_use]
    pub fn with_state_machines<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_machines = names.into_iter().map(Into::into).collect();
        self
    }

    /// Decode a run payload handed over by the instrumentation collaborator
    pub fn from_json(payload: &str) -> CubrirResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// The accumulated coverage tree for one analysis session
///
/// Owns every node top-down: modules own documents, documents own classes,
/// classes own methods, methods own their lines and branches. Nothing in
/// the tree outlives the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageTree {
    identifier: String,
    modules: Modules,
    state_machines: HashSet<String>,
}

impl CoverageTree {
    /// Create an empty tree for a new aggregation session
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            modules: Modules::new(),
            state_machines: HashSet::new(),
        }
    }

    /// Session identifier
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The merged module map built so far
    #[must_use]
    pub fn modules(&self) -> &Modules {
        &self.modules
    }

    /// Consume the tree, yielding the merged module map
    #[must_use]
    pub fn into_modules(self) -> Modules {
        self.modules
    }

    /// Fold one run into the accumulated tree
    ///
    /// New module/document/class/method keys transfer their whole subtree;
    /// keys present on both sides recurse level by level, summing line hits
    /// and merging branches by identity. The state-machine registry is
    /// absorbed for the rest of the session, then the spurious-branch patch
    /// runs over the whole tree.
    pub fn merge_run(&mut self, run: CoverageRun) {
        self.modules.merge(run.modules);
        self.state_machines.extend(run.state_machines);

        let removed = self.patch_state_machines();
        debug!(
            identifier = %self.identifier,
            modules = self.modules.len(),
            spurious_branches_removed = removed,
            "merged coverage run"
        );
    }

    /// Remove false-positive uncovered branches from async state machines
    ///
    /// Scoped strictly per method: for each registered `MoveNext` method
    /// that has at least one taken branch, drop that method's zero-hit
    /// branches. Never fabricates hits, never crosses method boundaries,
    /// and running it again removes nothing further.
    fn patch_state_machines(&mut self) -> usize {
        let state_machines = &self.state_machines;
        let mut removed = 0;

        for (_module, documents) in self.modules.iter_mut() {
            for (_document, classes) in documents.iter_mut() {
                for (_class, methods) in classes.iter_mut() {
                    for (signature, method) in methods.iter_mut() {
                        if !signature.ends_with(STATE_MACHINE_METHOD_SUFFIX)
                            || !state_machines.contains(signature)
                        {
                            continue;
                        }
                        if method.branches.any_hit() {
                            removed += method.branches.remove_unhit();
                        }
                    }
                }
            }
        }

        removed
    }
}
