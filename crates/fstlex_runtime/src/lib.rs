//! Service assembly, configuration, REPL, and CLI for fstlex.
//!
//! This crate provides:
//! - [`ServiceConfig`] - YAML configuration for languages and paradigm rules
//! - [`Service`] - Per-language engines plus the paradigm store
//! - [`Repl`] - Interactive command loop over a [`Service`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod editor;
pub mod repl;
pub mod service;

pub use config::{Backend, ContextFormat, LanguageConfig, ServiceConfig};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::{Repl, Reply};
pub use service::Service;
