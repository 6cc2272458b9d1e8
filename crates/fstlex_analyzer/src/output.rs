//! Parsing of the analyzer line protocol.
//!
//! Lookup tools print one block per input, blocks separated by a blank
//! line, one analysis per line:
//!
//! ```text
//! viessu<TAB>viessu+N+Sg+Nom<TAB>0.000000
//! viessu<TAB>viessut+V+TV+Imprt+Du2<TAB>0.000000
//!
//! xyz<TAB>xyz+?<TAB>inf
//! ```

use std::fmt;

use fstlex_foundation::UNKNOWN_SUFFIX;

/// One parsed line of analyzer output.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisLine {
    /// The surface form (or lemma, for generation output).
    pub surface: String,
    /// The tag string, with [`UNKNOWN_SUFFIX`] appended for unknown lines.
    pub tags: String,
    /// The weight, if the line had a parseable one.
    pub weight: Option<f64>,
}

/// Turns one raw output line into an [`AnalysisLine`].
///
/// A language may install its own processor to relabel or reorder tags.
pub trait TagProcessor: Send + Sync {
    /// Processes a single non-blank line.
    fn process(&self, line: &str) -> AnalysisLine;
}

/// Tab-splits a line into surface, tag string, and optional weight.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTagProcessor;

impl TagProcessor for DefaultTagProcessor {
    fn process(&self, line: &str) -> AnalysisLine {
        let mut fields = line.split('\t');
        let surface = fields.next().unwrap_or_default().to_string();
        let mut tags = fields.next().unwrap_or_default().to_string();
        let weight = fields.next().and_then(|w| w.trim().parse::<f64>().ok());

        if line.contains('?') {
            tags.push_str(UNKNOWN_SUFFIX);
        }

        AnalysisLine {
            surface,
            tags,
            weight,
        }
    }
}

/// The analyses of one input, from one blank-line-delimited chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisBlock {
    /// The first surface form seen in the chunk.
    pub surface: String,
    /// Tag strings in output order.
    pub tags: Vec<String>,
    /// Weights parallel to `tags`, or empty when the block is unweighted.
    pub weights: Vec<f64>,
}

impl AnalysisBlock {
    /// Returns true if every line carried a weight.
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        !self.weights.is_empty() && self.weights.len() == self.tags.len()
    }

    /// Returns true if any tag string marks an unknown analysis.
    #[must_use]
    pub fn has_unknown(&self) -> bool {
        self.tags.iter().any(|t| t.contains('?'))
    }
}

/// Parsed output of one analyzer call, with the raw streams kept for
/// diagnostics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LookupOutput {
    /// Parsed blocks, one per input that produced output.
    pub blocks: Vec<AnalysisBlock>,
    /// Raw standard output.
    pub stdout: String,
    /// Raw standard error.
    pub stderr: String,
}

impl LookupOutput {
    /// Parses `stdout` and keeps both raw streams.
    #[must_use]
    pub fn parse(stdout: String, stderr: String, processor: &dyn TagProcessor) -> Self {
        let blocks = parse_output(&stdout, processor);
        Self {
            blocks,
            stdout,
            stderr,
        }
    }

    /// Returns true if no block was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl fmt::Display for LookupOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            writeln!(f, "{}", block.surface)?;
            for tag in &block.tags {
                writeln!(f, "  {tag}")?;
            }
        }
        Ok(())
    }
}

/// Splits analyzer text into blocks.
///
/// Blank chunks and blank lines are skipped. A block is unweighted if any
/// of its lines lacks a parseable weight.
#[must_use]
pub fn parse_output(text: &str, processor: &dyn TagProcessor) -> Vec<AnalysisBlock> {
    let text = text.replace("\r\n", "\n");
    let mut blocks = Vec::new();

    for chunk in text.split("\n\n") {
        if chunk.trim().is_empty() {
            continue;
        }

        let mut surface: Option<String> = None;
        let mut tags = Vec::new();
        let mut weights = Vec::new();
        let mut weighted = true;

        for line in chunk.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let parsed = processor.process(line);
            if surface.is_none() {
                surface = Some(parsed.surface);
            }
            tags.push(parsed.tags);
            match parsed.weight {
                Some(w) => weights.push(w),
                None => weighted = false,
            }
        }

        if !weighted {
            weights.clear();
        }

        blocks.push(AnalysisBlock {
            surface: surface.unwrap_or_default(),
            tags,
            weights,
        });
    }

    blocks
}
