//! Integration tests for Layer 1: Analyzer
//!
//! Tests for output parsing, in-process transducers, and piped lookup tools.

mod library;
