//! Per-language hooks around lemmatization and generation.
//!
//! The registry holds four ordered chains per language:
//!
//! | Hook                        | Runs                                   |
//! |-----------------------------|----------------------------------------|
//! | [`TagFilter`]               | on the request, before anything else   |
//! | [`PregeneratedSelector`]    | may supply forms, bypassing generation |
//! | [`PostGenerationProcessor`] | on the generated paradigm              |
//! | [`PostAnalysisProcessor`]   | on lemmatization output                |
//!
//! Post-generation processors registered under [`GLOBAL`] run for every
//! language, after that language's own chain.

use std::collections::HashMap;
use std::sync::Arc;

use log::info;

use crate::generation::{GeneratedParadigm, GenerationRequest};
use crate::heuristics::LemmatizeOptions;
use crate::lemma::Lemma;

/// Registry key for hooks that apply to every language.
pub const GLOBAL: &str = "all";

/// Rewrites a generation request before generation.
pub trait TagFilter: Send + Sync {
    /// Identifies the hook; registering a second hook with the same name
    /// for the same language is ignored.
    fn name(&self) -> &str;

    /// Returns the rewritten request.
    fn filter(&self, request: GenerationRequest) -> GenerationRequest;
}

/// Supplies forms from the lexicon instead of the generator.
pub trait PregeneratedSelector: Send + Sync {
    /// Identifies the hook.
    fn name(&self) -> &str;

    /// Returns forms to use verbatim, or `None` to keep whatever the
    /// request already carries. Runs even when the caller supplied forms.
    fn select(&self, request: &GenerationRequest) -> Option<Vec<GeneratedParadigm>>;
}

/// Rewrites the generated paradigm.
pub trait PostGenerationProcessor: Send + Sync {
    /// Identifies the hook.
    fn name(&self) -> &str;

    /// Returns the rewritten paradigm.
    fn process(
        &self,
        paradigm: Vec<GeneratedParadigm>,
        request: &GenerationRequest,
        language: &str,
    ) -> Vec<GeneratedParadigm>;
}

/// Rewrites lemmatization output.
pub trait PostAnalysisProcessor: Send + Sync {
    /// Identifies the hook.
    fn name(&self) -> &str;

    /// Returns the rewritten lemmas.
    fn process(&self, lemmas: Vec<Lemma>, form: &str, options: LemmatizeOptions) -> Vec<Lemma>;
}

/// Ordered hook chains keyed by language code.
#[derive(Default)]
pub struct OverrideRegistry {
    tag_filters: HashMap<String, Vec<Arc<dyn TagFilter>>>,
    pregenerated: HashMap<String, Arc<dyn PregeneratedSelector>>,
    post_generation: HashMap<String, Vec<Arc<dyn PostGenerationProcessor>>>,
    post_analysis: HashMap<String, Vec<Arc<dyn PostAnalysisProcessor>>>,
}

/// Appends `hook` unless a hook with the same name is already present.
fn register<T: ?Sized>(chain: &mut Vec<Arc<T>>, hook: Arc<T>, name_of: impl Fn(&T) -> &str) -> bool {
    let name = name_of(hook.as_ref());
    if chain.iter().any(|h| name_of(h.as_ref()) == name) {
        return false;
    }
    chain.push(hook);
    true
}

impl OverrideRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tag filter. Returns false if the name was taken.
    pub fn register_tag_filter(&mut self, language: &str, filter: Arc<dyn TagFilter>) -> bool {
        let name = filter.name().to_string();
        let added = register(
            self.tag_filters.entry(language.to_string()).or_default(),
            filter,
            |f| f.name(),
        );
        if added {
            info!(target: "fstlex::morphology", "{language} overrides: registered pregeneration tag filterer - {name}");
        }
        added
    }

    /// Installs the pregenerated-form selector, replacing any previous one.
    pub fn register_pregenerated_selector(&mut self, language: &str, selector: Arc<dyn PregeneratedSelector>) {
        info!(
            target: "fstlex::morphology",
            "{language} overrides: registered static paradigm selector - {}",
            selector.name()
        );
        self.pregenerated.insert(language.to_string(), selector);
    }

    /// Registers a post-generation processor. Use [`GLOBAL`] for one that
    /// applies to every language. Returns false if the name was taken.
    pub fn register_post_generation(&mut self, language: &str, processor: Arc<dyn PostGenerationProcessor>) -> bool {
        let name = processor.name().to_string();
        let added = register(
            self.post_generation.entry(language.to_string()).or_default(),
            processor,
            |p| p.name(),
        );
        if added {
            info!(target: "fstlex::morphology", "{language} overrides: registered entry context formatter - {name}");
        }
        added
    }

    /// Registers a post-analysis processor. Returns false if the name was taken.
    pub fn register_post_analysis(&mut self, language: &str, processor: Arc<dyn PostAnalysisProcessor>) -> bool {
        let name = processor.name().to_string();
        let added = register(
            self.post_analysis.entry(language.to_string()).or_default(),
            processor,
            |p| p.name(),
        );
        if added {
            info!(target: "fstlex::morphology", "{language} overrides: registered post-analysis processor - {name}");
        }
        added
    }

    /// Runs the language's tag filters in registration order.
    #[must_use]
    pub fn apply_tag_filters(&self, language: &str, request: GenerationRequest) -> GenerationRequest {
        self.tag_filters
            .get(language)
            .into_iter()
            .flatten()
            .fold(request, |req, f| f.filter(req))
    }

    /// Asks the language's selector, if any, for pregenerated forms.
    #[must_use]
    pub fn select_pregenerated(&self, language: &str, request: &GenerationRequest) -> Option<Vec<GeneratedParadigm>> {
        self.pregenerated.get(language)?.select(request)
    }

    /// Runs the language's post-generation chain, then the global chain
    /// minus any processor the language chain already ran.
    #[must_use]
    pub fn apply_post_generation(
        &self,
        language: &str,
        paradigm: Vec<GeneratedParadigm>,
        request: &GenerationRequest,
    ) -> Vec<GeneratedParadigm> {
        let own: &[Arc<dyn PostGenerationProcessor>] = self
            .post_generation
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let mut paradigm = own
            .iter()
            .fold(paradigm, |p, hook| hook.process(p, request, language));

        if language != GLOBAL {
            for global in self.post_generation.get(GLOBAL).into_iter().flatten() {
                if own.iter().any(|p| p.name() == global.name()) {
                    continue;
                }
                paradigm = global.process(paradigm, request, language);
            }
        }
        paradigm
    }

    /// Runs the language's post-analysis chain.
    #[must_use]
    pub fn apply_post_analysis(
        &self,
        language: &str,
        lemmas: Vec<Lemma>,
        form: &str,
        options: LemmatizeOptions,
    ) -> Vec<Lemma> {
        self.post_analysis
            .get(language)
            .into_iter()
            .flatten()
            .fold(lemmas, |l, p| p.process(l, form, options))
    }

    /// Names of every hook registered for `language`, by chain.
    #[must_use]
    pub fn describe(&self, language: &str) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        for f in self.tag_filters.get(language).into_iter().flatten() {
            out.push(("tag filter", f.name().to_string()));
        }
        if let Some(s) = self.pregenerated.get(language) {
            out.push(("pregenerated selector", s.name().to_string()));
        }
        for p in self.post_generation.get(language).into_iter().flatten() {
            out.push(("post-generation", p.name().to_string()));
        }
        for p in self.post_analysis.get(language).into_iter().flatten() {
            out.push(("post-analysis", p.name().to_string()));
        }
        out
    }
}

impl std::fmt::Debug for OverrideRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideRegistry")
            .field("tag_filters", &self.tag_filters.keys().collect::<Vec<_>>())
            .field("pregenerated", &self.pregenerated.keys().collect::<Vec<_>>())
            .field("post_generation", &self.post_generation.keys().collect::<Vec<_>>())
            .field("post_analysis", &self.post_analysis.keys().collect::<Vec<_>>())
            .finish()
    }
}
