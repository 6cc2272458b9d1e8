//! Integration tests for in-process analyzers

use fstlex_analyzer::{Analyzer, LibraryAnalyzer, MemoryTransducer, remove_flag_diacritics};
use fstlex_foundation::{AnalyzerOptions, ErrorKind};

fn guolli() -> MemoryTransducer {
    MemoryTransducer::new()
        .with("guolli", "guolli+N+Sg+Nom", 0.0)
        .with("guollit", "guolli+N+Pl+Nom", 0.0)
        .with("guollit", "@U.Cmp.On@guolli+N+Sg+Nom+PxSg2", 2.0)
}

#[test]
fn memory_transducer_table() {
    let fst = guolli();
    assert_eq!(fst.len(), 2);
    assert!(!fst.is_empty());
    assert!(MemoryTransducer::new().is_empty());
}

#[test]
fn lookup_renders_each_input_in_order() {
    let analyzer = LibraryAnalyzer::new(guolli(), None);
    let out = analyzer.lookup(&["guollit", "guolli"]).unwrap();
    assert_eq!(out.blocks.len(), 2);
    assert_eq!(out.blocks[0].surface, "guollit");
    assert_eq!(out.blocks[0].tags, ["guolli+N+Pl+Nom", "guolli+N+Sg+Nom+PxSg2"]);
    assert_eq!(out.blocks[0].weights, [0.0, 2.0]);
    assert_eq!(out.blocks[1].surface, "guolli");
    assert!(out.stderr.is_empty());
}

#[test]
fn unknown_input_is_marked() {
    let analyzer = LibraryAnalyzer::new(guolli(), None);
    let out = analyzer.lookup(&["qwerty"]).unwrap();
    assert_eq!(out.blocks.len(), 1);
    assert!(out.blocks[0].has_unknown());
    assert!(out.stdout.starts_with("qwerty\tqwerty+?\tinf\n"));
}

#[test]
fn flag_diacritics_never_reach_the_caller() {
    assert_eq!(remove_flag_diacritics("@P.Px.add@guolli@R.Px.add@+N"), "guolli+N");

    let analyzer = LibraryAnalyzer::new(guolli(), None);
    let out = analyzer.lookup(&["guollit"]).unwrap();
    assert!(out.blocks[0].tags.iter().all(|t| !t.contains('@')));
}

#[test]
fn generation_through_the_inverted_table() {
    let forward = guolli();
    let inverse = forward.inverted();
    let analyzer = LibraryAnalyzer::new(forward, Some(inverse));

    let out = analyzer
        .inverse_lookup("guolli", &[vec!["N".into(), "Pl".into(), "Nom".into()], vec!["N+Sg+Nom".into()]])
        .unwrap();
    assert_eq!(out.blocks.len(), 2);
    assert_eq!(out.blocks[0].surface, "guolli+N+Pl+Nom");
    assert_eq!(out.blocks[0].tags, ["guollit"]);
    assert_eq!(out.blocks[1].tags, ["guolli"]);
}

#[test]
fn generation_without_inverse_fails() {
    let analyzer = LibraryAnalyzer::new(guolli(), None);
    let err = analyzer.inverse_lookup("guolli", &[vec!["N".into()]]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InverseUnavailable(_)));
    assert!(err.is_analyzer_failure());
}

#[test]
fn options_are_exposed() {
    let options = AnalyzerOptions::default().with_inverse_tagsep("|");
    let analyzer = LibraryAnalyzer::new(guolli(), Some(guolli().inverted())).with_options(options.clone());
    assert_eq!(analyzer.options(), &options);
    assert_eq!(analyzer.name(), "Library");
}
