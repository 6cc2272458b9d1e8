//! fstlex - FST analysis normalization, lemmatization, and paradigm selection
//!
//! This crate re-exports all layers of the fstlex system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: fstlex_runtime    - Configuration, service assembly, REPL, CLI
//! Layer 3: fstlex_paradigm   - Paradigm rule engine, rule files, hot reload
//! Layer 2: fstlex_morphology - Lemma builder, heuristics, generation, overrides
//! Layer 1: fstlex_analyzer   - Analyzer adapters (pipe, in-process), output parsing
//! Layer 0: fstlex_foundation - Tags, tagsets, options, entry nodes, errors
//! ```

pub use fstlex_analyzer as analyzer;
pub use fstlex_foundation as foundation;
pub use fstlex_morphology as morphology;
pub use fstlex_paradigm as paradigm;
pub use fstlex_runtime as runtime;
