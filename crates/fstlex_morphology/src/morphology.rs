//! The per-language morphology engine.

use std::sync::Arc;

use fstlex_analyzer::Analyzer;
use fstlex_foundation::{AnalyzerOptions, Error, ErrorContext, Result, Tagsets};
use log::{debug, error};

use crate::generation::{Generated, GeneratedParadigm, GenerationRequest};
use crate::heuristics::{self, LemmatizeOptions};
use crate::lemma::{Lemma, LemmaBuilder, LemmaKind};
use crate::overrides::OverrideRegistry;

/// Lemmatization result with the raw analyzer streams.
#[derive(Clone, Debug, Default)]
pub struct Lemmatized {
    /// Disambiguated lemmas in heuristic order.
    pub lemmas: Vec<Lemma>,
    /// Raw analyzer output.
    pub stdout: String,
    /// Raw analyzer diagnostics.
    pub stderr: String,
}

/// Analyzer, tagsets and hooks for one language.
pub struct Morphology {
    language: String,
    tagsets: Arc<Tagsets>,
    analyzer: Box<dyn Analyzer>,
    overrides: Arc<OverrideRegistry>,
}

impl Morphology {
    /// Creates an engine with no override hooks.
    #[must_use]
    pub fn new(language: impl Into<String>, tagsets: Arc<Tagsets>, analyzer: Box<dyn Analyzer>) -> Self {
        Self {
            language: language.into(),
            tagsets,
            analyzer,
            overrides: Arc::new(OverrideRegistry::new()),
        }
    }

    /// Builder method to share an override registry.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Arc<OverrideRegistry>) -> Self {
        self.overrides = overrides;
        self
    }

    /// The language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The language's tagsets.
    #[must_use]
    pub fn tagsets(&self) -> &Arc<Tagsets> {
        &self.tagsets
    }

    /// The analyzer backend.
    #[must_use]
    pub fn analyzer(&self) -> &dyn Analyzer {
        self.analyzer.as_ref()
    }

    /// The analyzer options.
    #[must_use]
    pub fn options(&self) -> &AnalyzerOptions {
        self.analyzer.options()
    }

    /// The override registry.
    #[must_use]
    pub fn overrides(&self) -> &Arc<OverrideRegistry> {
        &self.overrides
    }

    fn builder(&self) -> LemmaBuilder<'_> {
        LemmaBuilder::new(self.analyzer.options(), &self.tagsets)
    }

    fn context(&self, frame: &str) -> ErrorContext {
        ErrorContext::new()
            .with_language(&self.language)
            .with_source(self.analyzer.name())
            .with_frame(frame)
    }

    // =========================================================================
    // Lemmatization
    // =========================================================================

    /// Looks up `form` and returns its disambiguated lemmas.
    ///
    /// An unknown form yields an empty result, not an error.
    ///
    /// # Errors
    ///
    /// Returns the analyzer's error if the lookup could not run.
    pub fn try_lemmatize(&self, form: &str, switches: LemmatizeOptions) -> Result<Lemmatized> {
        let output = self
            .analyzer
            .lookup(&[form])
            .map_err(|e| e.with_context(self.context("lemmatize")))?;

        let mut lemmas = Vec::new();
        if heuristics::has_unknown(&output.blocks) {
            debug!(target: "fstlex::morphology", "{}: unknown form {form:?}", self.language);
        } else {
            let options = self.analyzer.options();
            for block in &output.blocks {
                let analyses = heuristics::disambiguate(form, block.tags.clone(), switches, options);
                lemmas.extend(analyses.iter().map(|a| self.analysis_to_lemma(a, form)));
            }
        }

        // Post-analysis hooks also see the empty result of an unknown form
        let lemmas = self
            .overrides
            .apply_post_analysis(&self.language, lemmas, form, switches);

        Ok(Lemmatized {
            lemmas,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Like [`try_lemmatize`](Self::try_lemmatize), logging failures and
    /// returning no lemmas instead.
    #[must_use]
    pub fn lemmatize(&self, form: &str, switches: LemmatizeOptions) -> Vec<Lemma> {
        match self.try_lemmatize(form, switches) {
            Ok(result) => result.lemmas,
            Err(e) => {
                error!(target: "fstlex::morphology", "{}", self.lemmatize_failure_line(form, &e));
                Vec::new()
            }
        }
    }

    /// Builds one lemma from one post-heuristic analysis string.
    ///
    /// A lone token carrying the action-noun tag (`ActioGen`) is rebuilt as
    /// `Actio+Gen` and is its own input text.
    #[must_use]
    pub fn analysis_to_lemma(&self, analysis: &str, wordform: &str) -> Lemma {
        let options = self.analyzer.options();
        let parts = options.split_analysis(analysis);

        if let [single] = parts.as_slice() {
            if single.contains(options.actio_tag.as_str()) {
                let right = single.split(options.actio_tag.as_str()).nth(1).unwrap_or_default();
                let token = format!("{}{right}", options.actio_with_sep());
                return self.builder().build(&[token.as_str()], &token, LemmaKind::Analysis);
            }
        }

        self.builder().build(&parts, wordform, LemmaKind::Analysis)
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Runs tag filters, the pregenerated selector, the generator, and the
    /// post-generation chain.
    ///
    /// # Errors
    ///
    /// Returns the generator's error if it could not run.
    pub fn try_generate(&self, request: &GenerationRequest) -> Result<Generated> {
        let mut request = self.overrides.apply_tag_filters(&self.language, request.clone());
        if let Some(selected) = self.overrides.select_pregenerated(&self.language, &request) {
            request.pregenerated = Some(selected);
        }

        let mut generated = self.generate_core(&request)?;
        generated.paradigm = self
            .overrides
            .apply_post_generation(&self.language, generated.paradigm, &request);
        Ok(generated)
    }

    /// Like [`try_generate`](Self::try_generate), logging failures and
    /// returning an empty result instead.
    #[must_use]
    pub fn generate(&self, request: &GenerationRequest) -> Generated {
        self.try_generate(request).unwrap_or_else(|e| {
            error!(target: "fstlex::morphology", "{}", self.generate_failure_line(request, &e));
            Generated::default()
        })
    }

    /// Generates and wraps every produced form as a generated-form lemma.
    #[must_use]
    pub fn generate_forms(&self, request: &GenerationRequest) -> Vec<Lemma> {
        let builder = self.builder();
        self.generate(request)
            .paradigm
            .iter()
            .filter_map(|cell| cell.forms.as_ref().map(|forms| (cell, forms)))
            .flat_map(|(cell, forms)| {
                forms
                    .iter()
                    .map(move |f| builder.build(&cell.tags, f, LemmaKind::Generated))
            })
            .collect()
    }

    fn generate_core(&self, request: &GenerationRequest) -> Result<Generated> {
        // An empty pregenerated list means "generate normally"
        if let Some(pregenerated) = request.pregenerated.as_ref().filter(|p| !p.is_empty()) {
            return Ok(Generated {
                paradigm: pregenerated.clone(),
                stdout: "pregenerated".to_string(),
                stderr: String::new(),
            });
        }

        let options = self.analyzer.options();
        let result = if request.no_preprocess {
            let input = request
                .tags
                .iter()
                .map(|seq| options.format_tag(seq))
                .collect::<Vec<_>>()
                .join("\n");
            self.analyzer.inverse_lookup_raw(&input)
        } else {
            self.analyzer.inverse_lookup(&request.lemma, &request.tags)
        };
        let output = result.map_err(|e| e.with_context(self.context("generate")))?;

        let mut paradigm = Vec::with_capacity(output.blocks.len());
        for block in &output.blocks {
            let forms = lowest_weight_forms(&block.tags, &block.weights);
            let tags = options.split_inverse(&block.surface);

            if forms.iter().any(|f| f.contains("+?")) {
                error!(target: "fstlex::morphology", "{}", self.unknown_forms_line(&block.surface, &forms));
                paradigm.push(GeneratedParadigm { tags, forms: None });
            } else {
                paradigm.push(GeneratedParadigm {
                    tags,
                    forms: Some(forms),
                });
            }
        }

        if paradigm.is_empty() {
            error!(target: "fstlex::morphology", "{}", self.empty_generation_line(request));
        }

        Ok(Generated {
            paradigm,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    // =========================================================================
    // Diagnostic lines
    // =========================================================================

    fn lemmatize_failure_line(&self, form: &str, error: &Error) -> String {
        format!("LEMMATIZE\t{}\t{form}\t{error}", self.language)
    }

    fn generate_failure_line(&self, request: &GenerationRequest, error: &Error) -> String {
        format!("GENERATE\t{}\t{}\t{error}", self.language, request.lemma)
    }

    /// `(<lang>) <backend>: <tag string>\t<forms>`, forms joined by `|`.
    fn unknown_forms_line(&self, surface: &str, forms: &[String]) -> String {
        format!("({}) {}: {surface}\t{}", self.language, self.analyzer.name(), forms.join("|"))
    }

    /// `GENERATE`, language, last tag sequence, all sequences and extra
    /// log info, tab separated; empty fields are dropped.
    fn empty_generation_line(&self, request: &GenerationRequest) -> String {
        let last_tag = request
            .tags
            .last()
            .map(|t| t.join("+"))
            .unwrap_or_default();
        let sequences = request
            .tags
            .iter()
            .map(|t| t.join("+"))
            .collect::<Vec<_>>()
            .join(",");
        let extra = request
            .extra_log_info
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join(", ");

        let line = ["GENERATE", self.language.as_str(), &last_tag, &sequences, &extra]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\t");
        line.trim().to_string()
    }
}

/// Keeps the forms that attain the minimum weight; all forms when the
/// block is unweighted.
#[allow(clippy::float_cmp)]
fn lowest_weight_forms(forms: &[String], weights: &[f64]) -> Vec<String> {
    if weights.len() != forms.len() || weights.is_empty() {
        return forms.to_vec();
    }
    let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
    let kept: Vec<String> = forms
        .iter()
        .zip(weights)
        .filter(|(_, w)| **w == min)
        .map(|(f, _)| f.clone())
        .collect();
    if kept.is_empty() { forms.to_vec() } else { kept }
}

impl std::fmt::Debug for Morphology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Morphology")
            .field("language", &self.language)
            .field("analyzer", &self.analyzer.name())
            .field("tagsets", &self.tagsets.len())
            .finish_non_exhaustive()
    }
}
