//! Disambiguation heuristics over the analyses of one surface form.
//!
//! Every function here is total: any list of strings is valid input and
//! none of them fail. [`disambiguate`] chains them in lemmatization order.

use fstlex_analyzer::AnalysisBlock;
use fstlex_foundation::AnalyzerOptions;

/// Marks the last segment of a split compound.
pub const COMPOUND_MARK: char = '\u{24D2}';
/// Inserted before the derivation tag of a split compound's last segment.
pub const DERIVATION_MARK: char = '\u{24D3}';
/// Appended to a split compound's derived last segment.
pub const LAST_MARK: char = '\u{24DB}';

/// Switches for the lemmatization pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LemmatizeOptions {
    /// Split compound analyses into their segments.
    pub split_compounds: bool,
    /// Drop analyses that contain a compound boundary.
    pub non_compound_only: bool,
    /// Drop analyses that contain the derivation marker.
    pub no_derivations: bool,
}

impl LemmatizeOptions {
    /// All switches off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to enable compound splitting.
    #[must_use]
    pub fn with_split_compounds(mut self, on: bool) -> Self {
        self.split_compounds = on;
        self
    }

    /// Builder method to drop compound analyses.
    #[must_use]
    pub fn with_non_compound_only(mut self, on: bool) -> Self {
        self.non_compound_only = on;
        self
    }

    /// Builder method to drop derivation analyses.
    #[must_use]
    pub fn with_no_derivations(mut self, on: bool) -> Self {
        self.no_derivations = on;
        self
    }
}

/// Returns true if any tag string of any block marks an unknown analysis.
#[must_use]
pub fn has_unknown(blocks: &[AnalysisBlock]) -> bool {
    blocks.iter().any(AnalysisBlock::has_unknown)
}

/// Drops analyses containing any compound boundary alternative.
pub fn remove_compound_analyses(analyses: &mut Vec<String>, options: &AnalyzerOptions) {
    if options.compound_boundary.is_empty() {
        return;
    }
    analyses.retain(|a| !options.compound_boundary.iter().any(|b| a.contains(b.as_str())));
}

/// Drops analyses containing the derivation marker.
pub fn remove_derivations(analyses: &mut Vec<String>, options: &AnalyzerOptions) {
    if let Some(marker) = options.derivation_marker.as_deref() {
        analyses.retain(|a| !a.contains(marker));
    }
}

/// The text before the first separator, or the whole analysis.
fn lemma_prefix<'a>(analysis: &'a str, sep: &str) -> &'a str {
    analysis.find(sep).map_or(analysis, |i| &analysis[..i])
}

/// Moves every element matching `pred` to the front, keeping relative
/// order on both sides. Returns the number moved.
fn partition_stable<F>(items: &mut Vec<String>, pred: F) -> usize
where
    F: Fn(&str) -> bool,
{
    let (mut front, back): (Vec<String>, Vec<String>) =
        std::mem::take(items).into_iter().partition(|s| pred(s));
    let moved = front.len();
    front.extend(back);
    *items = front;
    moved
}

/// Puts analyses whose lemma equals `form` first.
///
/// Returns how many analyses matched.
pub fn place_exact_lemmas_first(form: &str, analyses: &mut Vec<String>, options: &AnalyzerOptions) -> usize {
    let sep = options.separator();
    partition_stable(analyses, |a| lemma_prefix(a, sep) == form)
}

/// Puts every analysis with the longest lemma first.
pub fn place_longest_lemmas_first(analyses: &mut Vec<String>, options: &AnalyzerOptions) {
    let sep = options.separator();
    let Some(longest) = analyses.iter().map(|a| lemma_prefix(a, sep).len()).max() else {
        return;
    };
    partition_stable(analyses, |a| lemma_prefix(a, sep).len() == longest);
}

/// Count-based tie-break on orthographic-error and derivation tags.
///
/// Rules, first match wins:
/// 1. unless no line has an error marker, or some line has none and no
///    line has more than one, the input is returned as is;
/// 2. with two or more lines, some without derivations, and the
///    second-smallest derivation count nonzero, the result is the first
///    derivation-free line followed by the first line with that count;
/// 3. without error markers and at most one derivation per line, the
///    input is returned as is;
/// 4. if every line has a derivation, only the first line with the
///    fewest is kept;
/// 5. if some lines have error markers and some do not, only the
///    error-free lines are kept.
#[must_use]
pub fn rearrange_on_count(analyses: Vec<String>, options: &AnalyzerOptions) -> Vec<String> {
    if analyses.is_empty() {
        return analyses;
    }

    let errors: Vec<usize> = analyses
        .iter()
        .map(|a| a.matches(options.error_marker.as_str()).count())
        .collect();
    let min_errors = errors.iter().copied().min().unwrap_or(0);
    let max_errors = errors.iter().copied().max().unwrap_or(0);
    let no_errors = max_errors == 0;
    let any_without_errors = min_errors == 0;
    let any_with_errors = max_errors > 0;

    if !(no_errors || (any_without_errors && max_errors == 1)) {
        return analyses;
    }

    let ders: Vec<usize> = analyses
        .iter()
        .map(|a| a.matches(options.derivation_tag.as_str()).count())
        .collect();
    let mut sorted = ders.clone();
    sorted.sort_unstable();
    let min_der = sorted[0];
    let second_der = sorted.get(1).copied().unwrap_or(min_der);
    let max_der = sorted[sorted.len() - 1];

    if analyses.len() >= 2 && min_der == 0 && second_der > 0 {
        let without = ders.iter().position(|&c| c == 0);
        let least = ders.iter().position(|&c| c == second_der);
        if let (Some(without), Some(least)) = (without, least) {
            return vec![analyses[without].clone(), analyses[least].clone()];
        }
    }

    if no_errors && max_der <= 1 {
        return analyses;
    }

    if min_der > 0 {
        if let Some(first) = ders.iter().position(|&c| c == min_der) {
            return vec![analyses[first].clone()];
        }
    }

    if any_without_errors && any_with_errors {
        return analyses
            .into_iter()
            .zip(errors)
            .filter(|(_, e)| *e == 0)
            .map(|(a, _)| a)
            .collect();
    }

    analyses
}

/// Splits one analysis at its compound boundary.
///
/// The first configured boundary alternative present in the analysis is
/// used. When the analysis carries `Cmp`, the last segment is marked with
/// `ⓒ`, or with `ⓓ` before its derivation and `ⓛ` at the end when it is
/// derived.
#[must_use]
pub fn split_compound(analysis: &str, options: &AnalyzerOptions) -> Vec<String> {
    let Some(boundary) = options
        .compound_boundary
        .iter()
        .find(|b| analysis.contains(b.as_str()))
    else {
        return vec![analysis.to_string()];
    };

    let mut segments: Vec<String> = analysis.split(boundary.as_str()).map(String::from).collect();

    if analysis.contains("Cmp") {
        if let Some(last) = segments.last_mut() {
            let sep = options.separator();
            *last = match last.find(options.derivation_tag.as_str()) {
                Some(d) => format!("{}{DERIVATION_MARK}{sep}{}{sep}{LAST_MARK}", &last[..d], &last[d..]),
                None => format!("{last}{sep}{COMPOUND_MARK}"),
            };
        }
    }

    segments
}

/// Applies [`split_compound`] to every analysis.
#[must_use]
pub fn split_on_compounds(analyses: &[String], options: &AnalyzerOptions) -> Vec<String> {
    analyses
        .iter()
        .flat_map(|a| split_compound(a, options))
        .collect()
}

/// Splits analyses at derivation boundaries.
///
/// `Actio+` is first collapsed to `Actio` so that each action-noun case
/// becomes its own entry. Each analysis is then cut before every part
/// (after the first) that starts with a tag of the break set. The result
/// is deduplicated, keeping first occurrences.
#[must_use]
pub fn make_analyses_der_fin(analyses: &[String], options: &AnalyzerOptions) -> Vec<String> {
    let sep = options.separator();
    let actio_with_sep = options.actio_with_sep();
    let mut out: Vec<String> = Vec::new();

    for analysis in analyses {
        let analysis = analysis.replace(&actio_with_sep, &options.actio_tag);
        let parts: Vec<&str> = analysis.split(sep).collect();

        let breaks: Vec<usize> = parts
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, p)| options.tags_in_lexicon.iter().any(|t| p.starts_with(t.as_str())))
            .map(|(i, _)| i)
            .collect();

        let mut start = 0;
        for &b in &breaks {
            push_unique(&mut out, parts[start..b].join(sep));
            start = b;
        }
        push_unique(&mut out, parts[start..].join(sep));
    }

    out
}

fn push_unique(out: &mut Vec<String>, item: String) {
    if !out.contains(&item) {
        out.push(item);
    }
}

/// Runs the per-block heuristics in lemmatization order.
///
/// Filtering, exact-lemma and longest-lemma ordering, count-based
/// rearrangement, optional compound splitting, then derivation splitting.
#[must_use]
pub fn disambiguate(
    form: &str,
    mut analyses: Vec<String>,
    switches: LemmatizeOptions,
    options: &AnalyzerOptions,
) -> Vec<String> {
    if switches.non_compound_only {
        remove_compound_analyses(&mut analyses, options);
    }
    if switches.no_derivations {
        remove_derivations(&mut analyses, options);
    }

    if place_exact_lemmas_first(form, &mut analyses, options) == 0 {
        place_longest_lemmas_first(&mut analyses, options);
    }

    let mut analyses = rearrange_on_count(analyses, options);

    if switches.split_compounds {
        analyses = split_on_compounds(&analyses, options);
    }

    make_analyses_der_fin(&analyses, options)
}
