//! Service assembly: one [`Morphology`] per language plus the paradigm
//! rules, built from a [`ServiceConfig`].

use std::collections::BTreeMap;
use std::sync::Arc;

use fstlex_foundation::{EntryNode, Error, Result, Tagsets};
use fstlex_morphology::{
    GLOBAL, Generated, GenerationContextFormatter, GenerationRequest, Lemma, LemmatizeOptions, Lemmatized, Morphology,
    OverrideRegistry,
};
use fstlex_paradigm::{ParadigmRule, ParadigmStore, Resolved};
use log::info;

use crate::config::ServiceConfig;

/// Everything a dictionary front end needs from the analysis core.
#[derive(Debug, Default)]
pub struct Service {
    languages: BTreeMap<String, Morphology>,
    paradigms: Option<ParadigmStore>,
}

fn context_formatter(config: &ServiceConfig) -> Option<GenerationContextFormatter> {
    let mut formatter = GenerationContextFormatter::new();
    for (code, language) in &config.languages {
        for format in &language.contexts {
            formatter.insert(code, format.context.as_deref(), &format.tag, &format.format);
        }
    }
    (!formatter.is_empty()).then_some(formatter)
}

impl Service {
    /// Creates a service with no languages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every language and loads the paradigm rules.
    ///
    /// # Errors
    /// Returns the first tagset, configuration, or rule-load error.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::from_config_with_overrides(config, OverrideRegistry::new())
    }

    /// Like [`Service::from_config`], with hooks already registered.
    /// Configured generation contexts are added as a global processor.
    ///
    /// # Errors
    /// Returns the first tagset, configuration, or rule-load error.
    pub fn from_config_with_overrides(config: &ServiceConfig, mut overrides: OverrideRegistry) -> Result<Self> {
        config.validate()?;
        if let Some(formatter) = context_formatter(config) {
            overrides.register_post_generation(GLOBAL, Arc::new(formatter));
        }
        let overrides = Arc::new(overrides);

        let mut service = Self::new();
        for (code, language) in &config.languages {
            let tagsets = match &language.tagsets {
                Some(path) => Tagsets::from_path(path)?,
                None => Tagsets::new(),
            };
            let morphology = Morphology::new(code.as_str(), Arc::new(tagsets), language.analyzer(code)?)
                .with_overrides(Arc::clone(&overrides));
            info!(
                target: "fstlex::morphology",
                "{code}: {} analyzer ready",
                morphology.analyzer().name()
            );
            service = service.with_morphology(morphology);
        }

        if let Some(paradigms) = &config.paradigms {
            service = service.with_paradigms(ParadigmStore::load(paradigms.clone())?);
        }
        Ok(service)
    }

    /// Builder method to add a language engine.
    #[must_use]
    pub fn with_morphology(mut self, morphology: Morphology) -> Self {
        self.languages.insert(morphology.language().to_string(), morphology);
        self
    }

    /// Builder method to set the paradigm rules.
    #[must_use]
    pub fn with_paradigms(mut self, paradigms: ParadigmStore) -> Self {
        self.paradigms = Some(paradigms);
        self
    }

    /// Configured language codes, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Returns true if `language` is configured.
    #[must_use]
    pub fn has_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// The engine for `language`.
    ///
    /// # Errors
    /// Returns a configuration error for an unknown language.
    pub fn morphology(&self, language: &str) -> Result<&Morphology> {
        self.languages
            .get(language)
            .ok_or_else(|| Error::config(format!("language not configured: {language}")))
    }

    /// The paradigm rules, if configured.
    #[must_use]
    pub fn paradigms(&self) -> Option<&ParadigmStore> {
        self.paradigms.as_ref()
    }

    fn paradigm_store(&self) -> Result<&ParadigmStore> {
        self.paradigms
            .as_ref()
            .ok_or_else(|| Error::config("no paradigm directory configured"))
    }

    /// Lemmatizes `form` in `language`.
    ///
    /// # Errors
    /// Returns an error for an unknown language or a failed analyzer call.
    pub fn lemmatize(&self, language: &str, form: &str, switches: LemmatizeOptions) -> Result<Lemmatized> {
        self.morphology(language)?.try_lemmatize(form, switches)
    }

    /// Generates forms in `language`.
    ///
    /// # Errors
    /// Returns an error for an unknown language or a failed generator call.
    pub fn generate(&self, language: &str, request: &GenerationRequest) -> Result<Generated> {
        self.morphology(language)?.try_generate(request)
    }

    /// Selects the paradigm rule for an entry and its analyses.
    ///
    /// # Errors
    /// Returns an error if no paradigms are configured or a rule names an
    /// unknown tagset.
    pub fn resolve_paradigm<'a>(
        &self,
        language: &str,
        node: Option<&'a dyn EntryNode>,
        analyses: &'a [Lemma],
    ) -> Result<Option<Resolved<'a>>> {
        self.paradigm_store()?.resolve(language, node, analyses)
    }

    /// Every matching layout for an entry and its analyses.
    ///
    /// # Errors
    /// Returns an error if no paradigms are configured or a rule names an
    /// unknown tagset.
    pub fn resolve_layouts(
        &self,
        language: &str,
        node: Option<&dyn EntryNode>,
        analyses: &[Lemma],
    ) -> Result<Vec<Arc<ParadigmRule>>> {
        self.paradigm_store()?.resolve_layouts(language, node, analyses)
    }

    /// Reloads the paradigm rules of one language, or all of them.
    ///
    /// # Errors
    /// Returns the load error; the previous rules stay in place.
    pub fn reload_paradigms(&self, language: Option<&str>) -> Result<()> {
        let store = self.paradigm_store()?;
        match language {
            Some(language) => store.reload_language(language),
            None => store.reload(),
        }
    }
}
