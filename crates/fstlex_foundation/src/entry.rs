//! The lexicon entry-node interface.
//!
//! The lexicon store and its query engine live outside this workspace.
//! Everything here needs only string-valued evaluation of XPath-like
//! expressions against one entry, so that is all [`EntryNode`] asks for.

use std::collections::BTreeMap;
use std::fmt;

/// Expression that yields an entry's lemma text.
pub const LEMMA_EXPR: &str = ".//l/text()";

/// Expression that yields an entry's generation context.
pub const CONTEXT_EXPR: &str = ".//l/@context";

/// A lexicon entry that can answer string-valued expressions.
pub trait EntryNode: fmt::Debug + Send + Sync {
    /// Evaluates `expr` against this entry.
    ///
    /// Returns `None` when the expression selects nothing.
    fn evaluate(&self, expr: &str) -> Option<String>;

    /// Evaluates `expr` and applies [`normalize_space`], mapping an empty
    /// result to `None`.
    fn evaluate_normalized(&self, expr: &str) -> Option<String> {
        self.evaluate(expr)
            .map(|v| normalize_space(&v))
            .filter(|v| !v.is_empty())
    }
}

/// An in-memory entry keyed by expression text.
///
/// ```
/// use fstlex_foundation::entry::{EntryNode, MapEntry, LEMMA_EXPR};
///
/// let entry = MapEntry::new().with(LEMMA_EXPR, "  beaggit ");
/// assert_eq!(entry.evaluate_normalized(LEMMA_EXPR).as_deref(), Some("beaggit"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapEntry {
    values: BTreeMap<String, String>,
}

impl MapEntry {
    /// Creates an empty entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the value of an expression.
    #[must_use]
    pub fn with(mut self, expr: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(expr, value);
        self
    }

    /// Sets the value of an expression.
    pub fn insert(&mut self, expr: impl Into<String>, value: impl Into<String>) {
        self.values.insert(expr.into(), value.into());
    }
}

impl EntryNode for MapEntry {
    fn evaluate(&self, expr: &str) -> Option<String> {
        self.values.get(expr).cloned()
    }
}

/// Collapses whitespace runs to a single space and trims both ends.
#[must_use]
pub fn normalize_space(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
