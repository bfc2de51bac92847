//! Coverage summary computation over any subtree.
//!
//! A summary is a pure, non-destructive function of the counts currently in
//! a (sub)tree; it holds no state of its own. The threshold evaluator only
//! decides which subtree to summarize and how to combine the results, so
//! the computation sits behind the [`Summarizer`] trait with
//! [`CoverageSummary`] as the stateless default implementation.

use crate::tree::{Classes, Documents, Method, Methods, Modules};

/// A covered/total unit count for one coverage dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageNumbers {
    /// Units executed at least once
    pub covered: usize,
    /// Units instrumented
    pub total: usize,
}

impl CoverageNumbers {
    /// Create a count pair
    #[must_use]
    pub const fn new(covered: usize, total: usize) -> Self {
        Self { covered, total }
    }

    /// Coverage as a percentage in `[0, 100]`
    ///
    /// An empty denominator yields 100.0: with nothing instrumented there
    /// is nothing uncovered, and the ratio must never poison downstream
    /// arithmetic with NaN.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0; // Vacuously covered
        }
        (self.covered as f64 / self.total as f64) * 100.0
    }
}

/// Any subtree of the coverage hierarchy that can be summarized
///
/// Implemented by every level of the tree so summaries can be taken over a
/// whole tree, a single module, or anything narrower.
pub trait MethodScope {
    /// Visit every method reachable from this scope
    fn for_each_method(&self, visit: &mut dyn FnMut(&Method));
}

impl MethodScope for Method {
    fn for_each_method(&self, visit: &mut dyn FnMut(&Method)) {
        visit(self);
    }
}

impl MethodScope for Methods {
    fn for_each_method(&self, visit: &mut dyn FnMut(&Method)) {
        for (_signature, method) in self.iter() {
            visit(method);
        }
    }
}

impl MethodScope for Classes {
    fn for_each_method(&self, visit: &mut dyn FnMut(&Method)) {
        for (_class, methods) in self.iter() {
            methods.for_each_method(visit);
        }
    }
}

impl MethodScope for Documents {
    fn for_each_method(&self, visit: &mut dyn FnMut(&Method)) {
        for (_document, classes) in self.iter() {
            classes.for_each_method(visit);
        }
    }
}

impl MethodScope for Modules {
    fn for_each_method(&self, visit: &mut dyn FnMut(&Method)) {
        for (_module, documents) in self.iter() {
            documents.for_each_method(visit);
        }
    }
}

/// Summary-computation collaborator consumed by the threshold evaluator
pub trait Summarizer {
    /// Line coverage of a scope: a unit is an instrumented source line,
    /// covered iff its hit count is positive
    fn line_coverage(&self, scope: &dyn MethodScope) -> CoverageNumbers;

    /// Branch coverage of a scope: a unit is a branch record, covered iff
    /// its hit count is positive
    fn branch_coverage(&self, scope: &dyn MethodScope) -> CoverageNumbers;

    /// Method coverage of a scope: a unit is a method with at least one
    /// instrumented line, covered iff any of its lines was executed
    ///
    /// Methods without lines contribute to neither side of the ratio.
    fn method_coverage(&self, scope: &dyn MethodScope) -> CoverageNumbers;
}

/// Stateless default [`Summarizer`] over the tree's own counts
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageSummary;

impl CoverageSummary {
    /// Create the default summarizer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Summarizer for CoverageSummary {
    fn line_coverage(&self, scope: &dyn MethodScope) -> CoverageNumbers {
        let mut numbers = CoverageNumbers::default();
        scope.for_each_method(&mut |method| {
            numbers.covered += method.lines.covered_count();
            numbers.total += method.lines.len();
        });
        numbers
    }

    fn branch_coverage(&self, scope: &dyn MethodScope) -> CoverageNumbers {
        let mut numbers = CoverageNumbers::default();
        scope.for_each_method(&mut |method| {
            numbers.covered += method.branches.covered_count();
            numbers.total += method.branches.len();
        });
        numbers
    }

    fn method_coverage(&self, scope: &dyn MethodScope) -> CoverageNumbers {
        let mut numbers = CoverageNumbers::default();
        scope.for_each_method(&mut |method| {
            if method.lines.is_empty() {
                return;
            }
            numbers.total += 1;
            if method.is_covered() {
                numbers.covered += 1;
            }
        });
        numbers
    }
}
