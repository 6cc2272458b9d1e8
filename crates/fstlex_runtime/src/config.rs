//! Service configuration.
//!
//! A single YAML file describes every language and the paradigm rules:
//!
//! ```yaml
//! languages:
//!   sme:
//!     backend: hfst
//!     tool: hfst-lookup
//!     fst: fst/sme/analyser-dict-gt-desc.hfstol
//!     ifst: fst/sme/generator-dict-gt-norm.hfstol
//!     tagsets: tagsets/sme.yaml
//!     options:
//!       tagsep: "+"
//!       compound_boundary: ["+Cmp#", "#"]
//!     contexts:
//!       - tag: V+Ind+Prs+Sg1
//!         format: "(mun) {word_form}"
//! paradigms:
//!   path: paradigms/
//!   layouts: true
//! ```
//!
//! Relative paths are resolved against the directory of the file.
//!
//! With `backend: library` no process is run: `fst` and `ifst` name
//! tab-separated `input<TAB>output<TAB>weight` tables that are loaded into
//! memory, and `tool` may be omitted.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fstlex_analyzer::{Analyzer, DEFAULT_TIMEOUT, LibraryAnalyzer, MemoryTransducer, PipeAnalyzer};
use fstlex_foundation::{AnalyzerOptions, Error, Result};
use fstlex_paradigm::ParadigmConfig;
use serde::Deserialize;

/// Which lookup tool family a language uses.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `hfst-lookup` and friends.
    #[default]
    Hfst,
    /// `lookup` from the Xerox tools.
    Xfst,
    /// In-process lookup over tables loaded from `fst` and `ifst`.
    Library,
}

impl Backend {
    /// Returns true for backends that run an external process.
    #[must_use]
    pub fn is_pipe(self) -> bool {
        !matches!(self, Self::Library)
    }
}

/// One generation context format.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ContextFormat {
    /// The generated tag without the lemma, e.g. `V+Ind+Prs+Sg1`.
    pub tag: String,
    /// The entry context this applies to; `None` is the fallback.
    #[serde(default)]
    pub context: Option<String>,
    /// The format, with `{word_form}` and `{context}` placeholders.
    pub format: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// Analyzer and tagset settings for one language.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Lookup tool family.
    #[serde(default)]
    pub backend: Backend,
    /// The lookup executable (plus any flags); unused by the library backend.
    #[serde(default)]
    pub tool: String,
    /// The analyzer transducer.
    pub fst: PathBuf,
    /// The generator transducer, if generation is available.
    #[serde(default)]
    pub ifst: Option<PathBuf>,
    /// Seconds before a lookup is abandoned.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// The tagset file.
    #[serde(default)]
    pub tagsets: Option<PathBuf>,
    /// Analyzer options.
    #[serde(default)]
    pub options: AnalyzerOptions,
    /// Generation context formats.
    #[serde(default)]
    pub contexts: Vec<ContextFormat>,
}

impl LanguageConfig {
    /// Creates a configuration for `tool` over `fst`.
    #[must_use]
    pub fn new(backend: Backend, tool: impl Into<String>, fst: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            tool: tool.into(),
            fst: fst.into(),
            ifst: None,
            timeout_secs: default_timeout_secs(),
            tagsets: None,
            options: AnalyzerOptions::default(),
            contexts: Vec::new(),
        }
    }

    /// Builder method to set the generator transducer.
    #[must_use]
    pub fn with_ifst(mut self, ifst: impl Into<PathBuf>) -> Self {
        self.ifst = Some(ifst.into());
        self
    }

    /// Builder method to set the tagset file.
    #[must_use]
    pub fn with_tagsets(mut self, tagsets: impl Into<PathBuf>) -> Self {
        self.tagsets = Some(tagsets.into());
        self
    }

    /// Builder method to set the analyzer options.
    #[must_use]
    pub fn with_options(mut self, options: AnalyzerOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder method to set the timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// The lookup timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the process-backed analyzer for `language`.
    ///
    /// The library backend has no command line; it is built like
    /// [`Backend::Hfst`] here.
    #[must_use]
    pub fn pipe_analyzer(&self, language: &str) -> PipeAnalyzer {
        let fst = self.fst.to_string_lossy();
        let ifst = self.ifst.as_ref().map(|p| p.to_string_lossy().into_owned());
        let analyzer = match self.backend {
            Backend::Xfst => PipeAnalyzer::xfst(&self.tool, &fst, ifst.as_deref()),
            Backend::Hfst | Backend::Library => PipeAnalyzer::hfst(&self.tool, &fst, ifst.as_deref()),
        };
        analyzer
            .with_language(language)
            .with_options(self.options.clone())
            .with_timeout(self.timeout())
    }

    /// Builds the in-process analyzer from the `fst` and `ifst` tables.
    ///
    /// # Errors
    /// Returns an I/O or parse error for either table.
    pub fn library_analyzer(&self) -> Result<LibraryAnalyzer<MemoryTransducer>> {
        let forward = MemoryTransducer::from_path(&self.fst)?;
        let inverse = self.ifst.as_deref().map(MemoryTransducer::from_path).transpose()?;
        Ok(LibraryAnalyzer::new(forward, inverse).with_options(self.options.clone()))
    }

    /// Builds the analyzer the configured backend selects.
    ///
    /// # Errors
    /// Returns an error if a library table cannot be loaded.
    pub fn analyzer(&self, language: &str) -> Result<Box<dyn Analyzer>> {
        Ok(match self.backend {
            Backend::Hfst | Backend::Xfst => Box::new(self.pipe_analyzer(language)),
            Backend::Library => Box::new(self.library_analyzer()?),
        })
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.fst = resolve(base, &self.fst);
        self.ifst = self.ifst.as_deref().map(|p| resolve(base, p));
        self.tagsets = self.tagsets.as_deref().map(|p| resolve(base, p));
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Everything the service needs to start.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Per-language settings, keyed by language code.
    pub languages: BTreeMap<String, LanguageConfig>,
    /// The paradigm rule directory, if paradigms are served.
    pub paradigms: Option<ParadigmConfig>,
}

impl ServiceConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a language.
    #[must_use]
    pub fn with_language(mut self, code: impl Into<String>, language: LanguageConfig) -> Self {
        self.languages.insert(code.into(), language);
        self
    }

    /// Builder method to set the paradigm rules.
    #[must_use]
    pub fn with_paradigms(mut self, paradigms: ParadigmConfig) -> Self {
        self.paradigms = Some(paradigms);
        self
    }

    /// Parses a YAML configuration. Paths are left as written.
    ///
    /// # Errors
    /// Returns a configuration error for malformed YAML or invalid options.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(source).map_err(|e| Error::config(format!("service config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML configuration file, resolving relative paths against
    /// the file's directory.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or any
    /// [`ServiceConfig::from_yaml_str`] error.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        let mut config = Self::from_yaml_str(&source)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for language in config.languages.values_mut() {
            language.resolve_paths(base);
        }
        if let Some(paradigms) = &mut config.paradigms {
            paradigms.path = resolve(base, &paradigms.path);
        }
        Ok(config)
    }

    /// Checks every language's options.
    ///
    /// # Errors
    /// Returns the first configuration error found.
    pub fn validate(&self) -> Result<()> {
        for (code, language) in &self.languages {
            if language.backend.is_pipe() && language.tool.trim().is_empty() {
                return Err(Error::config(format!("{code}: tool must not be empty")));
            }
            if language.timeout_secs == 0 {
                return Err(Error::config(format!("{code}: timeout_secs must be positive")));
            }
            language
                .options
                .validate()
                .map_err(|e| Error::config(format!("{code}: {e}")))?;
        }
        Ok(())
    }
}
