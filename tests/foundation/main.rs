//! Integration tests for Layer 0: Foundation
//!
//! Tests for the tag model, analyzer options, entry nodes, and errors.

mod errors;
mod tags;
