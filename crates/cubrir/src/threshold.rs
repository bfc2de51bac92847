//! Threshold evaluation over a merged coverage tree.
//!
//! Given a threshold percentage, a set of requested coverage dimensions and
//! an aggregation statistic, report which requested dimensions fall below
//! the threshold. The percentage math itself is delegated to a
//! [`Summarizer`]; this module only picks the subtrees to summarize and
//! combines the results.

use crate::aggregate::CoverageTree;
use crate::summary::Summarizer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of coverage dimensions (Poka-Yoke bitmask)
///
/// Used both to request which dimensions to evaluate and to report which
/// ones violated the threshold. An empty set of violations means every
/// requested dimension passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThresholdKinds(u8);

impl ThresholdKinds {
    /// The empty set
    pub const NONE: Self = Self(0);
    /// Line coverage
    pub const LINE: Self = Self(1);
    /// Branch coverage
    pub const BRANCH: Self = Self(1 << 1);
    /// Method coverage
    pub const METHOD: Self = Self(1 << 2);
    /// All three dimensions
    pub const ALL: Self = Self(Self::LINE.0 | Self::BRANCH.0 | Self::METHOD.0);

    /// Check whether every dimension in `other` is present in `self`
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check whether no dimension is set
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bit representation
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for ThresholdKinds {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ThresholdKinds {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ThresholdKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::LINE) {
            names.push("line");
        }
        if self.contains(Self::BRANCH) {
            names.push("branch");
        }
        if self.contains(Self::METHOD) {
            names.push("method");
        }
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(", "))
        }
    }
}

/// Rule for reducing per-module percentages to one pass/fail decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdStatistic {
    /// Flag a dimension if any single module falls below the threshold
    Minimum,
    /// Compare the mean of per-module percentages against the threshold
    Average,
    /// Compare percentages over the entire tree as one unit
    Total,
}

impl CoverageTree {
    /// Report which requested dimensions fall below `threshold`
    ///
    /// The threshold is a percentage, typically in `[0, 100]` but not
    /// range-checked here. An empty tree violates nothing: under `Minimum`
    /// there is no module to fail, and `Average` explicitly special-cases
    /// a zero module count instead of dividing by it.
    #[must_use]
    pub fn threshold_violations(
        &self,
        summary: &dyn Summarizer,
        threshold: f64,
        kinds: ThresholdKinds,
        statistic: ThresholdStatistic,
    ) -> ThresholdKinds {
        let mut violated = ThresholdKinds::NONE;

        match statistic {
            ThresholdStatistic::Minimum => {
                // Scan every module even after a violation: the result is
                // a flag set, not a counterexample module.
                for (_path, documents) in self.modules().iter() {
                    if kinds.contains(ThresholdKinds::LINE)
                        && summary.line_coverage(documents).percent() < threshold
                    {
                        violated |= ThresholdKinds::LINE;
                    }
                    if kinds.contains(ThresholdKinds::BRANCH)
                        && summary.branch_coverage(documents).percent() < threshold
                    {
                        violated |= ThresholdKinds::BRANCH;
                    }
                    if kinds.contains(ThresholdKinds::METHOD)
                        && summary.method_coverage(documents).percent() < threshold
                    {
                        violated |= ThresholdKinds::METHOD;
                    }
                }
            }
            ThresholdStatistic::Average => {
                let module_count = self.modules().len();
                if module_count == 0 {
                    return ThresholdKinds::NONE;
                }

                let mut line = 0.0;
                let mut branch = 0.0;
                let mut method = 0.0;
                for (_path, documents) in self.modules().iter() {
                    line += summary.line_coverage(documents).percent();
                    branch += summary.branch_coverage(documents).percent();
                    method += summary.method_coverage(documents).percent();
                }

                let count = module_count as f64;
                if kinds.contains(ThresholdKinds::LINE) && line / count < threshold {
                    violated |= ThresholdKinds::LINE;
                }
                if kinds.contains(ThresholdKinds::BRANCH) && branch / count < threshold {
                    violated |= ThresholdKinds::BRANCH;
                }
                if kinds.contains(ThresholdKinds::METHOD) && method / count < threshold {
                    violated |= ThresholdKinds::METHOD;
                }
            }
            ThresholdStatistic::Total => {
                if kinds.contains(ThresholdKinds::LINE)
                    && summary.line_coverage(self.modules()).percent() < threshold
                {
                    violated |= ThresholdKinds::LINE;
                }
                if kinds.contains(ThresholdKinds::BRANCH)
                    && summary.branch_coverage(self.modules()).percent() < threshold
                {
                    violated |= ThresholdKinds::BRANCH;
                }
                if kinds.contains(ThresholdKinds::METHOD)
                    && summary.method_coverage(self.modules()).percent() < threshold
                {
                    violated |= ThresholdKinds::METHOD;
                }
            }
        }

        violated
    }
}
