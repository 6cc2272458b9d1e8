//! Integration tests for Error types

use std::path::Path;
use std::time::Duration;

use fstlex_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn analyzer_failures_are_classified() {
    assert!(Error::analyzer_unavailable("lookup", "not found").is_analyzer_failure());
    assert!(Error::analyzer_timeout("lookup", Duration::from_secs(5)).is_analyzer_failure());
    assert!(Error::inverse_unavailable("HFST").is_analyzer_failure());
    assert!(!Error::config("bad").is_analyzer_failure());
}

#[test]
fn rule_errors_name_the_file() {
    let err = Error::rule_syntax(Path::new("sme/nouns.paradigm"), "expected a mapping");
    assert!(matches!(err.kind, ErrorKind::RuleFileSyntax { .. }));
    assert!(err.to_string().contains("sme/nouns.paradigm"));

    let err = Error::rule_reference(Path::new("sme/nouns.layout"), "verbs.paradigm");
    assert!(err.to_string().contains("verbs.paradigm"));
}

#[test]
fn timeout_message_includes_command() {
    let err = Error::analyzer_timeout("hfst-lookup sme.hfstol", Duration::from_secs(5));
    let msg = err.to_string();
    assert!(msg.contains("hfst-lookup sme.hfstol"));
    assert!(msg.contains("5s"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_display() {
    let context = ErrorContext::new()
        .with_language("sme")
        .with_source("HFST")
        .with_frame("lemmatize");
    let text = context.to_string();
    assert!(text.starts_with("[sme] at HFST"));
    assert!(text.contains("in lemmatize"));

    let err = Error::config("x").with_context(context);
    assert_eq!(err.context.unwrap().language.as_deref(), Some("sme"));
}
