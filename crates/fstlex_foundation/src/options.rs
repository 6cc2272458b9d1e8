//! Per-language analyzer options.
//!
//! These are the knobs that the disambiguation heuristics read: the tag
//! separator, the compound and derivation markers, the action-noun tag,
//! and the break set used to split derived analyses into separate
//! entries.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Suffix appended to a tag string whose analyzer line carried `?`.
pub const UNKNOWN_SUFFIX: &str = "\t+?";

/// Options shared by the analyzer adapter and the morphology engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    /// Separator between tag parts in analyzer output.
    pub tagsep: String,

    /// Separator used for inverse (generation) tag strings; defaults to `tagsep`.
    pub inverse_tagsep: Option<String>,

    /// Compound boundary marker(s); empty when the language has none.
    #[serde(alias = "compoundBoundary", deserialize_with = "one_or_many")]
    pub compound_boundary: Vec<String>,

    /// Marker whose presence flags a derivation analysis (e.g. `Der/`).
    #[serde(alias = "derivationMarker")]
    pub derivation_marker: Option<String>,

    /// The action-noun tag.
    pub actio_tag: String,

    /// Tags that start a new entry when they appear after the lemma.
    pub tags_in_lexicon: Vec<String>,

    /// Orthographic-error tag counted by the rearrangement heuristic.
    pub error_marker: String,

    /// Derivation tag counted by the rearrangement heuristic.
    pub derivation_tag: String,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            tagsep: "+".to_string(),
            inverse_tagsep: None,
            compound_boundary: Vec::new(),
            derivation_marker: None,
            actio_tag: "Actio".to_string(),
            tags_in_lexicon: vec!["Dummy1".to_string(), "Dummy2".to_string()],
            error_marker: "Err/Orth".to_string(),
            derivation_tag: "Der".to_string(),
        }
    }
}

impl AnalyzerOptions {
    /// Creates options with the default `+` separator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the tag separator.
    #[must_use]
    pub fn with_tagsep(mut self, sep: impl Into<String>) -> Self {
        self.tagsep = sep.into();
        self
    }

    /// Builder method to set the inverse tag separator.
    #[must_use]
    pub fn with_inverse_tagsep(mut self, sep: impl Into<String>) -> Self {
        self.inverse_tagsep = Some(sep.into());
        self
    }

    /// Builder method to add a compound boundary alternative.
    #[must_use]
    pub fn with_compound_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.compound_boundary.push(boundary.into());
        self
    }

    /// Builder method to set the derivation marker.
    #[must_use]
    pub fn with_derivation_marker(mut self, marker: impl Into<String>) -> Self {
        self.derivation_marker = Some(marker.into());
        self
    }

    /// Builder method to set the action-noun tag.
    #[must_use]
    pub fn with_actio_tag(mut self, tag: impl Into<String>) -> Self {
        self.actio_tag = tag.into();
        self
    }

    /// Builder method to set the break set.
    #[must_use]
    pub fn with_tags_in_lexicon<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags_in_lexicon = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Checks that the options can drive the heuristics.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for empty separators or markers.
    pub fn validate(&self) -> Result<()> {
        if self.tagsep.is_empty() {
            return Err(Error::config("tagsep must not be empty"));
        }
        if self.inverse_tagsep.as_deref() == Some("") {
            return Err(Error::config("inverse_tagsep must not be empty"));
        }
        if self.compound_boundary.iter().any(String::is_empty) {
            return Err(Error::config("compound boundary must not be empty"));
        }
        if self.derivation_marker.as_deref() == Some("") {
            return Err(Error::config("derivation marker must not be empty"));
        }
        if self.actio_tag.is_empty() {
            return Err(Error::config("actio_tag must not be empty"));
        }
        if self.tags_in_lexicon.iter().any(String::is_empty) {
            return Err(Error::config("tags_in_lexicon entries must not be empty"));
        }
        if self.error_marker.is_empty() {
            return Err(Error::config("error_marker must not be empty"));
        }
        if self.derivation_tag.is_empty() {
            return Err(Error::config("derivation_tag must not be empty"));
        }
        Ok(())
    }

    /// The separator for analysis tag strings.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.tagsep
    }

    /// The separator for generation tag strings.
    #[must_use]
    pub fn inverse_separator(&self) -> &str {
        self.inverse_tagsep.as_deref().unwrap_or(&self.tagsep)
    }

    /// The action-noun tag followed by the separator (`Actio+`).
    #[must_use]
    pub fn actio_with_sep(&self) -> String {
        format!("{}{}", self.actio_tag, self.tagsep)
    }

    /// Returns true if a compound boundary is configured.
    #[must_use]
    pub fn has_compound_boundary(&self) -> bool {
        !self.compound_boundary.is_empty()
    }

    /// `lemma+Tag+Tag` → `["lemma", "Tag", "Tag"]`.
    #[must_use]
    pub fn split_analysis(&self, analysis: &str) -> Vec<String> {
        analysis.split(self.separator()).map(String::from).collect()
    }

    /// Like [`split_analysis`](Self::split_analysis), using the inverse separator.
    #[must_use]
    pub fn split_inverse(&self, analysis: &str) -> Vec<String> {
        analysis
            .split(self.inverse_separator())
            .map(String::from)
            .collect()
    }

    /// Joins parts with the analysis separator.
    #[must_use]
    pub fn format_tag<S: AsRef<str>>(&self, parts: &[S]) -> String {
        join(parts, self.separator())
    }

    /// Joins parts with the inverse separator.
    #[must_use]
    pub fn format_inverse<S: AsRef<str>>(&self, parts: &[S]) -> String {
        join(parts, self.inverse_separator())
    }
}

fn join<S: AsRef<str>>(parts: &[S], sep: &str) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(part.as_ref());
    }
    out
}

/// Accepts either a single string or a list of strings.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
        None => Vec::new(),
    })
}
