//! Paradigm rule engine for fstlex.
//!
//! This crate provides:
//! - [`rule`] - Comparators over tags, tagsets, and lexicon values
//! - [`ParadigmRuleSet`] - A compiled rule condition
//! - [`loader`] - Rule file parsing (`.paradigm` and `.layout`)
//! - [`ParadigmStore`] - Per-language rule tables with specificity ranking and reload

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod condition;
pub mod loader;
pub mod rule;
pub mod store;

pub use condition::{NO_NAME, ParadigmRuleSet, RuleContext};
pub use loader::{ParadigmRule, Template, parse_layout_str, parse_paradigm_str, read_layout_file, read_paradigm_file};
pub use rule::{
    Comparator, Comparison, ContextPair, Expectation, LexRule, LexiconRuleSet, NullRule, TagRule, TagSetRule,
};
pub use store::{
    ParadigmConfig, ParadigmStore, Resolved, RuleList, RuleMatch, RuleTable, TemplateContext, find_matches,
};
