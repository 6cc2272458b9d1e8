//! Lemma records and the lemma builder.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use fstlex_foundation::{AnalyzerOptions, Tag, Tagsets};
use log::warn;

/// POS assigned when nothing else resolves one.
pub const UNKNOWN_POS: &str = "Unknown";

/// Where a lemma record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LemmaKind {
    /// Built from an analysis of a surface form.
    Analysis,
    /// Built from a generated form.
    Generated,
}

/// A disambiguated lemma/tag record.
///
/// Two lemmas are equal when lemma, POS and formatted raw tag agree; the
/// surface form is not part of the identity.
#[derive(Clone, Debug)]
pub struct Lemma {
    /// The text this record was built for.
    pub input: String,
    /// The displayed form.
    pub form: String,
    /// The resolved lemma.
    pub lemma: String,
    /// The resolved part of speech, never empty.
    pub pos: String,
    /// The parsed tag.
    pub tag: Tag,
    /// The raw tag parts the record was built from.
    pub tag_raw: Vec<String>,
    /// Analysis or generated form.
    pub kind: LemmaKind,
}

impl Lemma {
    /// The formatted raw tag, as used for identity.
    #[must_use]
    pub fn tag_string(&self) -> &str {
        self.tag.as_str()
    }

    /// Returns true for generated-form records.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.kind == LemmaKind::Generated
    }

    fn key(&self) -> (&str, &str, &str) {
        (&self.lemma, &self.pos, self.tag.as_str())
    }
}

impl PartialEq for Lemma {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Lemma {}

impl Hash for Lemma {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Lemma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            LemmaKind::Analysis => "Lemma",
            LemmaKind::Generated => "GeneratedForm",
        };
        write!(
            f,
            "<{label}: {}, {}, {}, {}>",
            self.form,
            self.lemma,
            self.pos,
            self.tag.as_str()
        )
    }
}

/// Builds [`Lemma`] records for one language.
#[derive(Clone, Copy, Debug)]
pub struct LemmaBuilder<'a> {
    options: &'a AnalyzerOptions,
    tagsets: &'a Arc<Tagsets>,
}

impl<'a> LemmaBuilder<'a> {
    /// Creates a builder over a language's options and tagsets.
    #[must_use]
    pub fn new(options: &'a AnalyzerOptions, tagsets: &'a Arc<Tagsets>) -> Self {
        Self { options, tagsets }
    }

    /// Builds a record from already-split tag parts.
    ///
    /// The lemma is the first part unless that part is itself a known tag,
    /// in which case the first non-tag part is used. A single action-noun
    /// token (`Actio+Gen`) is its own lemma.
    #[must_use]
    pub fn build<S: AsRef<str>>(&self, parts: &[S], input: &str, kind: LemmaKind) -> Lemma {
        let tag_raw: Vec<String> = parts.iter().map(|p| p.as_ref().to_string()).collect();
        let tag = Tag::from_parts(&tag_raw, self.options.separator(), Arc::clone(self.tagsets));

        let lemma = self.resolve_lemma(&tag_raw);
        let pos = self.resolve_pos(&tag, &lemma);

        Lemma {
            input: input.to_string(),
            form: input.to_string(),
            lemma,
            pos,
            tag,
            tag_raw,
            kind,
        }
    }

    fn resolve_lemma(&self, parts: &[String]) -> String {
        let Some(first) = parts.first() else {
            return String::new();
        };

        if parts.len() == 1 && first.starts_with(&self.options.actio_with_sep()) {
            return first.clone();
        }

        if !self.tagsets.is_known_tag(first) {
            return first.clone();
        }

        parts
            .iter()
            .find(|p| !self.tagsets.is_known_tag(p))
            .unwrap_or(first)
            .clone()
    }

    fn resolve_pos(&self, tag: &Tag, lemma: &str) -> String {
        let from_tag = self
            .tagsets
            .get("pos")
            .and_then(|set| tag.by_tagset(set))
            .filter(|p| !p.is_empty());
        if let Some(pos) = from_tag {
            return pos.to_string();
        }

        if self.tagsets.is_member("verb_derivations", lemma) {
            return "V".to_string();
        }
        if self.tagsets.is_member("adjective_derivations", lemma) {
            return "A".to_string();
        }

        warn!(
            target: "fstlex::morphology",
            "No part of speech found for lemma \"{lemma}\". Make sure it is listed in the appropriate tagset file"
        );
        UNKNOWN_POS.to_string()
    }
}
