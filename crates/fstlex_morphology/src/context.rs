//! Context decoration for generated forms.
//!
//! Some paradigms read better with a context word, e.g. a pronoun before a
//! verb form: `(mun) dieđán`. Formats are keyed by the entry's context
//! (read from [`CONTEXT_EXPR`]) and the generated tag without the lemma.

use std::collections::HashMap;

use fstlex_foundation::CONTEXT_EXPR;

use crate::generation::{GeneratedParadigm, GenerationRequest};
use crate::overrides::PostGenerationProcessor;

type ContextKey = (Option<String>, String);

/// Decorates generated forms with per-context format strings.
///
/// A format may use `{word_form}` and `{context}`. Lookup falls back from
/// the entry's context to the `None` context for the same tag.
#[derive(Clone, Debug, Default)]
pub struct GenerationContextFormatter {
    formats: HashMap<String, HashMap<ContextKey, String>>,
}

impl GenerationContextFormatter {
    /// The processor name under which it is registered.
    pub const NAME: &'static str = "word_generation_context";

    /// Creates a formatter with no formats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a format.
    #[must_use]
    pub fn with_format(mut self, language: &str, context: Option<&str>, tag: &str, format: &str) -> Self {
        self.insert(language, context, tag, format);
        self
    }

    /// Adds a format.
    pub fn insert(&mut self, language: &str, context: Option<&str>, tag: &str, format: &str) {
        self.formats
            .entry(language.to_string())
            .or_default()
            .insert((context.map(String::from), tag.to_string()), format.to_string());
    }

    /// Returns true if no formats are configured for any language.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.values().all(HashMap::is_empty)
    }

    fn lookup(&self, language: &str, context: Option<&str>, tag: &str) -> Option<&str> {
        let table = self.formats.get(language)?;
        table
            .get(&(context.map(String::from), tag.to_string()))
            .or_else(|| table.get(&(None, tag.to_string())))
            .map(String::as_str)
    }
}

/// Substitutes placeholders in one pass; substituted text is never rescanned.
fn render(format: &str, word_form: &str, context: Option<&str>) -> String {
    let mut out = String::with_capacity(format.len() + word_form.len());
    let mut rest = format;
    while let Some(at) = rest.find('{') {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        if let Some(tail) = rest.strip_prefix("{word_form}") {
            out.push_str(word_form);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("{context}") {
            out.push_str(context.unwrap_or_default());
            rest = tail;
        } else {
            out.push('{');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

impl PostGenerationProcessor for GenerationContextFormatter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(
        &self,
        paradigm: Vec<GeneratedParadigm>,
        request: &GenerationRequest,
        language: &str,
    ) -> Vec<GeneratedParadigm> {
        let Some(node) = &request.node else {
            return paradigm;
        };
        if !self.formats.contains_key(language) {
            return paradigm;
        }
        let context = node.evaluate(CONTEXT_EXPR);

        paradigm
            .into_iter()
            .map(|mut cell| {
                let tag = cell.tags.get(1..).unwrap_or_default().join("+");
                if let (Some(format), Some(forms)) =
                    (self.lookup(language, context.as_deref(), &tag), cell.forms.as_mut())
                {
                    for form in forms.iter_mut() {
                        *form = render(format, form, context.as_deref());
                    }
                }
                cell
            })
            .collect()
    }
}
