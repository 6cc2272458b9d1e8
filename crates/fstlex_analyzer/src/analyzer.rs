//! The backend-neutral analyzer contract.

use fstlex_foundation::{AnalyzerOptions, Result};

use crate::output::LookupOutput;

/// A morphological analyzer with an optional generator.
///
/// Implementations differ only in how they obtain raw output. Everything
/// they return has already gone through [`parse_output`](crate::parse_output),
/// so callers never see backend-specific formats.
pub trait Analyzer: Send + Sync {
    /// Backend name used in diagnostics (`XFST`, `HFST`, ...).
    fn name(&self) -> &str;

    /// The options the backend was configured with.
    fn options(&self) -> &AnalyzerOptions;

    /// Analyzes a batch of surface forms.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot run or exceeds its time bound.
    fn lookup(&self, forms: &[&str]) -> Result<LookupOutput>;

    /// Generates from pre-built, newline-separated generator input.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InverseUnavailable`](fstlex_foundation::ErrorKind::InverseUnavailable)
    /// if the backend has no generator, or a run failure.
    fn inverse_lookup_raw(&self, input: &str) -> Result<LookupOutput>;

    /// Generates every tag sequence for `lemma`.
    ///
    /// # Errors
    ///
    /// See [`inverse_lookup_raw`](Self::inverse_lookup_raw).
    fn inverse_lookup(&self, lemma: &str, tag_sequences: &[Vec<String>]) -> Result<LookupOutput> {
        let input = inverse_input(self.options(), lemma, tag_sequences);
        self.inverse_lookup_raw(&input)
    }
}

/// Builds generator input, one line per tag sequence.
///
/// Each element of a sequence is split on the inverse separator, so both
/// `["N", "Sg"]` and `["N+Sg"]` are accepted. A sequence that already
/// contains the lemma is taken as complete; otherwise the lemma is
/// prepended.
#[must_use]
pub fn inverse_input(options: &AnalyzerOptions, lemma: &str, tag_sequences: &[Vec<String>]) -> String {
    tag_sequences
        .iter()
        .map(|sequence| {
            let parts: Vec<String> = sequence
                .iter()
                .flat_map(|p| options.split_inverse(p))
                .collect();
            if parts.iter().any(|p| p == lemma) {
                options.format_tag(&parts)
            } else {
                let mut combined = Vec::with_capacity(parts.len() + 1);
                combined.push(lemma.to_string());
                combined.extend(parts);
                options.format_tag(&combined)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
