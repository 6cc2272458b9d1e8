//! Core types for fstlex.
//!
//! This crate provides:
//! - [`Tag`], [`Tagset`], [`Tagsets`] - The tag model for analyzer output
//! - [`AnalyzerOptions`] - Per-language separators and heuristic markers
//! - [`EntryNode`] - The lexicon entry interface
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entry;
pub mod error;
pub mod options;
pub mod tag;

pub use entry::{CONTEXT_EXPR, EntryNode, LEMMA_EXPR, MapEntry, normalize_space};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use options::{AnalyzerOptions, UNKNOWN_SUFFIX};
pub use tag::{Tag, TagPart, TagPartDef, Tagset, Tagsets, TagsetsConfig};
