//! Cubrir: Coverage Aggregation and Threshold Evaluation
//!
//! Cubrir (Spanish: "to cover") is the analytical core of a code-coverage
//! tool. It folds the per-run hit-count trees produced by instrumented test
//! executions into one merged coverage tree, then evaluates that tree
//! against minimum-coverage policies. Instrumentation and report rendering
//! are external collaborators: the core consumes raw trees and produces a
//! merged tree plus a set of threshold violations, nothing else.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    CUBRIR Architecture                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Run Trees  │    │ Coverage   │    │ Threshold  │            │
//! │   │ (N runs)   │───►│ Tree       │───►│ Evaluator  │──► flags   │
//! │   │            │    │ (merged)   │    │            │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use cubrir::{
//!     Classes, CoverageRun, CoverageSummary, CoverageTree, Documents, Method,
//!     Methods, Modules, ThresholdKinds, ThresholdStatistic,
//! };
//!
//! let mut method = Method::new();
//! method.lines.add(10, 1);
//! method.lines.add(11, 0);
//!
//! let mut methods = Methods::new();
//! methods.insert("App::Run()", method);
//! let mut classes = Classes::new();
//! classes.insert("App", methods);
//! let mut documents = Documents::new();
//! documents.insert("src/app.rs", classes);
//! let mut modules = Modules::new();
//! modules.insert("app", documents);
//!
//! let mut tree = CoverageTree::new("session-1");
//! tree.merge_run(CoverageRun::new(modules));
//!
//! let violated = tree.threshold_violations(
//!     &CoverageSummary::new(),
//!     80.0,
//!     ThresholdKinds::LINE,
//!     ThresholdStatistic::Total,
//! );
//! assert_eq!(violated, ThresholdKinds::LINE); // 1 of 2 lines = 50%
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod aggregate;
mod branch;
mod result;
mod summary;
mod threshold;
mod tree;

pub use aggregate::{CoverageRun, CoverageTree, STATE_MACHINE_METHOD_SUFFIX};
pub use branch::{BranchInfo, BranchKey, Branches};
pub use result::{CubrirError, CubrirResult};
pub use summary::{CoverageNumbers, CoverageSummary, MethodScope, Summarizer};
pub use threshold::{ThresholdKinds, ThresholdStatistic};
pub use tree::{Classes, Documents, Lines, Method, Methods, Modules};
