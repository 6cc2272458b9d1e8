//! Generation requests and results.

use std::sync::Arc;

use fstlex_foundation::EntryNode;

/// The generated forms for one tag sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedParadigm {
    /// The generator input split into parts (lemma first, normally).
    pub tags: Vec<String>,
    /// The forms, or `None` if the generator flagged the input unknown.
    pub forms: Option<Vec<String>>,
}

impl GeneratedParadigm {
    /// Creates a paradigm cell with forms.
    #[must_use]
    pub fn new<S: Into<String>>(tags: impl IntoIterator<Item = S>, forms: Vec<String>) -> Self {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            forms: Some(forms),
        }
    }

    /// Creates a paradigm cell the generator could not produce.
    #[must_use]
    pub fn unknown<S: Into<String>>(tags: impl IntoIterator<Item = S>) -> Self {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            forms: None,
        }
    }
}

/// Result of one generation call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Generated {
    /// One cell per generator input line that produced output.
    pub paradigm: Vec<GeneratedParadigm>,
    /// Raw generator output, or `pregenerated`.
    pub stdout: String,
    /// Raw generator diagnostics.
    pub stderr: String,
}

impl Generated {
    /// Returns true if nothing was generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paradigm.is_empty()
    }
}

/// Everything a generation call needs.
#[derive(Clone, Debug, Default)]
pub struct GenerationRequest {
    /// The lemma to generate from.
    pub lemma: String,
    /// Tag sequences, one generator input line each.
    pub tags: Vec<Vec<String>>,
    /// The lexicon entry being displayed, if any.
    pub node: Option<Arc<dyn EntryNode>>,
    /// Forms that bypass the generator entirely.
    pub pregenerated: Option<Vec<GeneratedParadigm>>,
    /// Send `tags` to the generator as is, without adding the lemma.
    pub no_preprocess: bool,
    /// Extra `key: value` pairs for the failure log line.
    pub extra_log_info: Vec<(String, String)>,
}

impl GenerationRequest {
    /// Creates a request for `lemma` over `tags`.
    #[must_use]
    pub fn new(lemma: impl Into<String>, tags: Vec<Vec<String>>) -> Self {
        Self {
            lemma: lemma.into(),
            tags,
            ..Self::default()
        }
    }

    /// Builder method to attach the lexicon entry.
    #[must_use]
    pub fn with_node(mut self, node: Arc<dyn EntryNode>) -> Self {
        self.node = Some(node);
        self
    }

    /// Builder method to supply pregenerated forms.
    #[must_use]
    pub fn with_pregenerated(mut self, paradigm: Vec<GeneratedParadigm>) -> Self {
        self.pregenerated = Some(paradigm);
        self
    }

    /// Builder method to skip input preprocessing.
    #[must_use]
    pub fn with_no_preprocess(mut self, on: bool) -> Self {
        self.no_preprocess = on;
        self
    }

    /// Builder method to add a log field.
    #[must_use]
    pub fn with_extra_log_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_log_info.push((key.into(), value.into()));
        self
    }
}
