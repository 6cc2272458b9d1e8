//! Lemmatization and generation for fstlex.
//!
//! This crate provides:
//! - [`Morphology`] - The per-language lemmatization and generation engine
//! - [`Lemma`], [`LemmaBuilder`] - Disambiguated lemma records
//! - [`heuristics`] - The fixed disambiguation heuristics
//! - [`OverrideRegistry`] - Per-language hook chains
//! - [`GenerationContextFormatter`] - Context decoration for generated forms

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod context;
pub mod generation;
pub mod heuristics;
pub mod lemma;
pub mod morphology;
pub mod overrides;

pub use context::GenerationContextFormatter;
pub use generation::{Generated, GeneratedParadigm, GenerationRequest};
pub use heuristics::LemmatizeOptions;
pub use lemma::{Lemma, LemmaBuilder, LemmaKind, UNKNOWN_POS};
pub use morphology::{Lemmatized, Morphology};
pub use overrides::{
    GLOBAL, OverrideRegistry, PostAnalysisProcessor, PostGenerationProcessor, PregeneratedSelector,
    TagFilter,
};
