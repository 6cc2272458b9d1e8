//! Analyzer adapters for fstlex.
//!
//! This crate provides:
//! - [`Analyzer`] - The backend-neutral lookup contract
//! - [`PipeAnalyzer`] - XFST `lookup` and `hfst-lookup` process backends
//! - [`LibraryAnalyzer`] - In-process [`Transducer`] backend
//! - [`parse_output`] - The shared line-protocol parser
//!
//! All backends return [`LookupOutput`]: parsed [`AnalysisBlock`]s plus the
//! raw output streams.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analyzer;
pub mod library;
pub mod output;
pub mod pipe;

pub use analyzer::{Analyzer, inverse_input};
pub use library::{LibraryAnalyzer, MemoryTransducer, Transducer, remove_flag_diacritics};
pub use output::{
    AnalysisBlock, AnalysisLine, DefaultTagProcessor, LookupOutput, TagProcessor, parse_output,
};
pub use pipe::{DEFAULT_TIMEOUT, PipeAnalyzer, PipeFlavor};
