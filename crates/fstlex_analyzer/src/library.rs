//! In-process analyzers.
//!
//! A [`Transducer`] is anything that can map one input string to weighted
//! outputs. [`LibraryAnalyzer`] renders those outputs in the same line
//! protocol the lookup tools print, so the parsed result is identical to
//! what a pipe backend would have produced.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use fstlex_foundation::{AnalyzerOptions, Error, Result};
use regex::Regex;

use crate::analyzer::Analyzer;
use crate::output::{DefaultTagProcessor, LookupOutput, TagProcessor};

static FLAG_DIACRITIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@[^@]*@").unwrap());

/// Removes `@...@` flag diacritics from transducer output.
#[must_use]
pub fn remove_flag_diacritics(line: &str) -> String {
    FLAG_DIACRITIC.replace_all(line, "").into_owned()
}

/// A compiled transducer that can be queried in process.
pub trait Transducer: Send + Sync {
    /// All outputs for `input`, with weights.
    fn lookup(&self, input: &str) -> Vec<(String, f64)>;
}

/// A table-backed transducer.
///
/// Useful for fixtures and for small closed-class lexicons that do not
/// warrant a compiled FST.
#[derive(Clone, Debug, Default)]
pub struct MemoryTransducer {
    table: HashMap<String, Vec<(String, f64)>>,
}

impl MemoryTransducer {
    /// Creates an empty transducer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add one input/output pair.
    #[must_use]
    pub fn with(mut self, input: &str, output: &str, weight: f64) -> Self {
        self.insert(input, output, weight);
        self
    }

    /// Adds one input/output pair.
    pub fn insert(&mut self, input: &str, output: &str, weight: f64) {
        self.table
            .entry(input.to_string())
            .or_default()
            .push((output.to_string(), weight));
    }

    /// Parses a tab-separated table of `input\toutput[\tweight]` lines.
    ///
    /// Blank lines and lines starting with `#` are skipped; a missing
    /// weight is `0`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming `origin` and the line number
    /// for a line without an output or with an unparseable weight.
    pub fn from_tsv_str(source: &str, origin: &Path) -> Result<Self> {
        let mut table = Self::new();
        for (number, line) in source.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let bad = |what: &str| Error::config(format!("{}:{}: {what}", origin.display(), number + 1));
            let mut fields = line.split('\t');
            let input = fields.next().unwrap_or_default();
            let output = fields.next().ok_or_else(|| bad("expected input<TAB>output"))?;
            let weight = match fields.next().map(str::trim) {
                None | Some("") => 0.0,
                Some(w) => w.parse::<f64>().map_err(|_| bad("weight is not a number"))?,
            };
            table.insert(input, output, weight);
        }
        Ok(table)
    }

    /// Reads a table file; see [`MemoryTransducer::from_tsv_str`].
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a parse error.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        Self::from_tsv_str(&source, path)
    }

    /// The same relation read in the other direction.
    #[must_use]
    pub fn inverted(&self) -> Self {
        let mut inverse = Self::new();
        let mut inputs: Vec<_> = self.table.keys().collect();
        inputs.sort();
        for input in inputs {
            for (output, weight) in &self.table[input] {
                inverse.insert(&remove_flag_diacritics(output), input, *weight);
            }
        }
        inverse
    }

    /// Number of distinct inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Transducer for MemoryTransducer {
    fn lookup(&self, input: &str) -> Vec<(String, f64)> {
        self.table.get(input).cloned().unwrap_or_default()
    }
}

impl<T: Transducer + ?Sized> Transducer for Arc<T> {
    fn lookup(&self, input: &str) -> Vec<(String, f64)> {
        (**self).lookup(input)
    }
}

/// An analyzer that calls a [`Transducer`] directly.
pub struct LibraryAnalyzer<T: Transducer> {
    forward: T,
    inverse: Option<T>,
    options: AnalyzerOptions,
    processor: Arc<dyn TagProcessor>,
}

impl<T: Transducer> LibraryAnalyzer<T> {
    /// Creates an analyzer over a forward and optional inverse transducer.
    #[must_use]
    pub fn new(forward: T, inverse: Option<T>) -> Self {
        Self {
            forward,
            inverse,
            options: AnalyzerOptions::default(),
            processor: Arc::new(DefaultTagProcessor),
        }
    }

    /// Builder method to set the analyzer options.
    #[must_use]
    pub fn with_options(mut self, options: AnalyzerOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder method to replace the tag processor.
    #[must_use]
    pub fn with_tag_processor(mut self, processor: Arc<dyn TagProcessor>) -> Self {
        self.processor = processor;
        self
    }

    fn render<'a>(transducer: &T, inputs: impl Iterator<Item = &'a str>) -> String {
        let mut out = String::new();
        for input in inputs {
            let results = transducer.lookup(input);
            if results.is_empty() {
                let _ = writeln!(out, "{input}\t{input}+?\tinf");
            }
            for (output, weight) in results {
                let _ = writeln!(out, "{input}\t{}\t{weight}", remove_flag_diacritics(&output));
            }
            out.push('\n');
        }
        out
    }
}

impl<T: Transducer> Analyzer for LibraryAnalyzer<T> {
    fn name(&self) -> &str {
        "Library"
    }

    fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    fn lookup(&self, forms: &[&str]) -> Result<LookupOutput> {
        let stdout = Self::render(&self.forward, forms.iter().copied());
        Ok(LookupOutput::parse(stdout, String::new(), self.processor.as_ref()))
    }

    fn inverse_lookup_raw(&self, input: &str) -> Result<LookupOutput> {
        let Some(inverse) = &self.inverse else {
            return Err(Error::inverse_unavailable(self.name()));
        };
        let lines = input.lines().filter(|l| !l.trim().is_empty());
        let stdout = Self::render(inverse, lines);
        Ok(LookupOutput::parse(stdout, String::new(), self.processor.as_ref()))
    }
}
