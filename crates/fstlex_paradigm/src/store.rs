//! Per-language rule tables, selection, and reload.
//!
//! Rules live under `<root>/<lang>/` in `.paradigm` and `.layout` files,
//! at any depth. The loaded table is an immutable snapshot behind a lock;
//! a reload builds a complete new table and swaps it in, so readers see
//! either the old rules or the new ones.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fstlex_foundation::{EntryNode, Error, ErrorContext, Result};
use fstlex_morphology::Lemma;
use log::{debug, error, info};
use parking_lot::RwLock;
use serde::Deserialize;

use crate::condition::RuleContext;
use crate::loader::{ParadigmRule, read_layout_file, read_paradigm_file};

const PARADIGM_EXT: &str = "paradigm";
const LAYOUT_EXT: &str = "layout";

/// Rules for one language.
pub type RuleList = im::Vector<Arc<ParadigmRule>>;

// =============================================================================
// Configuration
// =============================================================================

/// Where rules are read from.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParadigmConfig {
    /// Directory holding one subdirectory per language.
    pub path: PathBuf,
    /// Only load these languages; all subdirectories when `None`.
    pub languages: Option<Vec<String>>,
    /// Also load `.layout` files.
    pub layouts: bool,
    /// Check for changed files before each resolution.
    pub auto_reload: bool,
}

impl ParadigmConfig {
    /// Creates a configuration rooted at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Builder method to restrict the languages loaded.
    #[must_use]
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method to enable layouts.
    #[must_use]
    pub fn with_layouts(mut self, on: bool) -> Self {
        self.layouts = on;
        self
    }

    /// Builder method to enable auto-reload.
    #[must_use]
    pub fn with_auto_reload(mut self, on: bool) -> Self {
        self.auto_reload = on;
        self
    }
}

// =============================================================================
// Rule Table
// =============================================================================

/// An immutable snapshot of every loaded rule.
#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    paradigms: im::HashMap<String, RuleList>,
    layouts: im::HashMap<String, RuleList>,
}

impl RuleTable {
    /// Paradigm rules for a language.
    #[must_use]
    pub fn paradigms(&self, language: &str) -> RuleList {
        self.paradigms.get(language).cloned().unwrap_or_default()
    }

    /// Layout rules for a language.
    #[must_use]
    pub fn layouts(&self, language: &str) -> RuleList {
        self.layouts.get(language).cloned().unwrap_or_default()
    }

    /// Languages with at least one paradigm or layout rule, sorted.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .paradigms
            .iter()
            .chain(self.layouts.iter())
            .filter(|(_, rules)| !rules.is_empty())
            .map(|(language, _)| language.clone())
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Total number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paradigms.values().chain(self.layouts.values()).map(im::Vector::len).sum()
    }

    /// Returns true if no rules are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_language(&self, language: &str, paradigms: RuleList, layouts: RuleList) -> Self {
        Self {
            paradigms: self.paradigms.update(language.to_string(), paradigms),
            layouts: self.layouts.update(language.to_string(), layouts),
        }
    }
}

// =============================================================================
// Matching
// =============================================================================

/// A rule whose condition held.
#[derive(Clone, Debug)]
pub struct RuleMatch {
    /// The rule.
    pub rule: Arc<ParadigmRule>,
    /// What it matched on.
    pub context: RuleContext,
    /// Number of context keys; more specific rules win.
    pub specificity: usize,
}

/// The variables a template is rendered with.
#[derive(Clone, Debug)]
pub struct TemplateContext<'a> {
    /// The winning rule's matched keys.
    pub matched: RuleContext,
    /// The entry, exposed to templates as `lexicon`.
    pub lexicon: Option<&'a dyn EntryNode>,
    /// The analyses, exposed to templates as `analyses`.
    pub analyses: &'a [Lemma],
}

impl TemplateContext<'_> {
    /// Looks up a matched key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.matched.get(key)?.as_deref()
    }
}

/// The selected paradigm and what to render it with.
#[derive(Clone, Debug)]
pub struct Resolved<'a> {
    /// The most specific matching rule.
    pub rule: Arc<ParadigmRule>,
    /// Template variables.
    pub context: TemplateContext<'a>,
}

/// Evaluates every rule and returns the matches, most specific first.
/// Rules of equal specificity keep their load order.
///
/// # Errors
/// Propagates condition errors, annotated with the rule's path.
pub fn find_matches(
    rules: &RuleList,
    node: Option<&dyn EntryNode>,
    analyses: &[Lemma],
) -> Result<Vec<RuleMatch>> {
    let mut matches = Vec::new();

    for rule in rules {
        let (truth, context) = rule.condition.evaluate(node, analyses).map_err(|e| {
            error!(
                target: "fstlex::paradigm",
                "Exception in evaluating rule {}: {e}",
                rule.path.display()
            );
            e.with_context(ErrorContext::new().with_source(rule.path.display().to_string()))
        })?;
        if truth {
            matches.push(RuleMatch {
                rule: Arc::clone(rule),
                specificity: context.len(),
                context,
            });
        }
    }

    // Most specific first; sort_by is stable
    matches.sort_by(|a, b| b.specificity.cmp(&a.specificity));
    Ok(matches)
}

// =============================================================================
// Loading
// =============================================================================

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, &e))?
        .map(|entry| entry.map(|e| e.path()).map_err(|e| Error::io(dir, &e)))
        .collect::<Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

fn collect_files(dir: &Path, paradigms: &mut Vec<PathBuf>, layouts: &mut Vec<PathBuf>) -> Result<()> {
    for path in sorted_entries(dir)? {
        if path.is_dir() {
            collect_files(&path, paradigms, layouts)?;
            continue;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(PARADIGM_EXT) => paradigms.push(path),
            Some(LAYOUT_EXT) => layouts.push(path),
            _ => {}
        }
    }
    Ok(())
}

fn load_language(config: &ParadigmConfig, language: &str) -> Result<(RuleList, RuleList)> {
    let dir = config.path.join(language);
    let mut paradigm_files = Vec::new();
    let mut layout_files = Vec::new();
    collect_files(&dir, &mut paradigm_files, &mut layout_files)?;

    let mut paradigms = RuleList::new();
    for path in &paradigm_files {
        if let Some(rule) = read_paradigm_file(path)? {
            info!(
                target: "fstlex::paradigm",
                " - {language}: {}",
                rule.name.as_deref().unwrap_or_default()
            );
            paradigms.push_back(Arc::new(rule));
        }
    }

    let mut layouts = RuleList::new();
    if config.layouts {
        let bases: Vec<Arc<ParadigmRule>> = paradigms.iter().cloned().collect();
        for path in &layout_files {
            match read_layout_file(path, &bases)? {
                Some(rule) => {
                    info!(
                        target: "fstlex::paradigm",
                        " - LAYOUT {language}: {}",
                        rule.name.as_deref().unwrap_or_default()
                    );
                    layouts.push_back(Arc::new(rule));
                }
                None => error!(target: "fstlex::paradigm", " ERROR: - LAYOUT {language}: {}", path.display()),
            }
        }
    }

    Ok((paradigms, layouts))
}

fn language_dirs(config: &ParadigmConfig) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for path in sorted_entries(&config.path)? {
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let wanted = config
            .languages
            .as_ref()
            .is_none_or(|langs| langs.iter().any(|l| l == name));
        if wanted {
            out.push(name.to_string());
        }
    }
    Ok(out)
}

fn build_table(config: &ParadigmConfig) -> Result<RuleTable> {
    info!(target: "fstlex::paradigm", "Reading paradigm directory {}", config.path.display());
    let mut table = RuleTable::default();
    for language in language_dirs(config)? {
        let (paradigms, layouts) = load_language(config, &language)?;
        table = table.with_language(&language, paradigms, layouts);
    }
    Ok(table)
}

fn file_changed(rule: &ParadigmRule) -> bool {
    let current = fs::metadata(&rule.path).and_then(|m| m.modified()).ok();
    current.is_none() || current != rule.modified
}

// =============================================================================
// Store
// =============================================================================

/// The loaded paradigm and layout rules of every language.
#[derive(Debug)]
pub struct ParadigmStore {
    config: ParadigmConfig,
    table: RwLock<Arc<RuleTable>>,
}

impl ParadigmStore {
    /// Loads every rule under the configured directory.
    ///
    /// # Errors
    /// Returns the first I/O, syntax, or reference error; nothing is
    /// loaded in that case.
    pub fn load(config: ParadigmConfig) -> Result<Self> {
        let table = build_table(&config)?;
        info!(target: "fstlex::paradigm", "Loaded {} paradigm rules", table.len());
        Ok(Self {
            config,
            table: RwLock::new(Arc::new(table)),
        })
    }

    /// Creates a store over an already built table.
    #[must_use]
    pub fn from_table(config: ParadigmConfig, table: RuleTable) -> Self {
        Self {
            config,
            table: RwLock::new(Arc::new(table)),
        }
    }

    /// Builder method to toggle the staleness check before each resolution.
    #[must_use]
    pub fn with_auto_reload(mut self, on: bool) -> Self {
        self.config.auto_reload = on;
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &ParadigmConfig {
        &self.config
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RuleTable> {
        Arc::clone(&self.table.read())
    }

    /// Rebuilds every language.
    ///
    /// # Errors
    /// Returns the load error; the previous table stays in place.
    pub fn reload(&self) -> Result<()> {
        let table = build_table(&self.config)?;
        *self.table.write() = Arc::new(table);
        Ok(())
    }

    /// Rebuilds one language, keeping the others as they are.
    ///
    /// # Errors
    /// Returns the load error; the previous table stays in place.
    pub fn reload_language(&self, language: &str) -> Result<()> {
        let (paradigms, layouts) = load_language(&self.config, language)?;
        let mut table = self.table.write();
        *table = Arc::new(table.with_language(language, paradigms, layouts));
        Ok(())
    }

    /// Returns true if a rule file of `language` changed or disappeared
    /// since it was read.
    #[must_use]
    pub fn is_stale(&self, language: &str) -> bool {
        let table = self.snapshot();
        table
            .paradigms(language)
            .iter()
            .chain(table.layouts(language).iter())
            .any(|rule| file_changed(rule))
    }

    fn refresh(&self, language: &str) {
        if !self.config.auto_reload || !self.is_stale(language) {
            return;
        }
        debug!(target: "fstlex::paradigm", "{language}: rule files changed, reloading");
        if let Err(e) = self.reload_language(language) {
            error!(target: "fstlex::paradigm", "{language}: reload failed, keeping previous rules: {e}");
        }
    }

    /// Selects the most specific paradigm rule for an entry.
    ///
    /// # Errors
    /// Propagates condition errors (an unknown tagset).
    pub fn resolve<'a>(
        &self,
        language: &str,
        node: Option<&'a dyn EntryNode>,
        analyses: &'a [Lemma],
    ) -> Result<Option<Resolved<'a>>> {
        self.refresh(language);
        let rules = self.snapshot().paradigms(language);
        first_match(&rules, node, analyses)
    }

    /// Selects the most specific layout rule for an entry.
    ///
    /// # Errors
    /// Propagates condition errors (an unknown tagset).
    pub fn resolve_layout<'a>(
        &self,
        language: &str,
        node: Option<&'a dyn EntryNode>,
        analyses: &'a [Lemma],
    ) -> Result<Option<Resolved<'a>>> {
        self.refresh(language);
        let rules = self.snapshot().layouts(language);
        first_match(&rules, node, analyses)
    }

    /// Every matching layout rule, ordered by display type or path.
    ///
    /// # Errors
    /// Propagates condition errors (an unknown tagset).
    pub fn resolve_layouts(
        &self,
        language: &str,
        node: Option<&dyn EntryNode>,
        analyses: &[Lemma],
    ) -> Result<Vec<Arc<ParadigmRule>>> {
        self.refresh(language);
        let rules = self.snapshot().layouts(language);
        let mut matches = find_matches(&rules, node, analyses)?;
        matches.sort_by_cached_key(|m| m.rule.display_order_key());
        Ok(matches.into_iter().map(|m| m.rule).collect())
    }
}

fn first_match<'a>(
    rules: &RuleList,
    node: Option<&'a dyn EntryNode>,
    analyses: &'a [Lemma],
) -> Result<Option<Resolved<'a>>> {
    let Some(best) = find_matches(rules, node, analyses)?.into_iter().next() else {
        return Ok(None);
    };
    Ok(Some(Resolved {
        rule: best.rule,
        context: TemplateContext {
            matched: best.context,
            lexicon: node,
            analyses,
        },
    }))
}
