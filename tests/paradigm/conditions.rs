//! Integration tests for rule files and conditions

use std::path::Path;
use std::sync::Arc;

use fstlex_foundation::{ErrorKind, LEMMA_EXPR, MapEntry};
use fstlex_paradigm::{ParadigmRule, parse_layout_str, parse_paradigm_str};

use crate::analyses;

const NOUNS: &str = r#"
name: "Regular nouns"
desc: "Two-syllable nouns"
morphology:
  pos: N
--
{% for case in cases %}{{ case }}{% endfor %}
"#;

const PROPER: &str = r#"
name: "Place names"
morphology:
  pos: N
  type: Prop
lexicon:
  XPATH:
    sem: ".//l/@sem"
  sem: PLACE
--
{{ lemma }}
"#;

fn path(name: &str) -> &Path {
    Path::new(name)
}

#[test]
fn header_and_template() {
    let rule = parse_paradigm_str(NOUNS, path("sme/nouns.paradigm")).unwrap().unwrap();
    assert_eq!(rule.name.as_deref(), Some("Regular nouns"));
    assert_eq!(rule.description, "Two-syllable nouns");
    assert_eq!(rule.basename, "nouns.paradigm");
    assert!(rule.template.source.starts_with("{% for"));
    assert!(rule.modified.is_none());
}

#[test]
fn morphology_and_lexicon_must_all_match() {
    let rule = parse_paradigm_str(PROPER, path("sme/place.paradigm")).unwrap().unwrap();
    let node = MapEntry::new().with(LEMMA_EXPR, "Romsa").with(".//l/@sem", "PLACE");
    let lemmas = analyses(&["Romsa+N+Prop+Sg+Nom"]);

    let (matched, context) = rule.condition.evaluate(Some(&node), &lemmas).unwrap();
    assert!(matched);
    let keys: Vec<&str> = context.keys().map(String::as_str).collect();
    assert_eq!(keys, ["pos", "type", "sem", "lemma"]);
    assert_eq!(context["lemma"].as_deref(), Some("Romsa"));

    let other = MapEntry::new().with(LEMMA_EXPR, "Romsa").with(".//l/@sem", "HUMAN");
    assert!(!rule.condition.evaluate(Some(&other), &lemmas).unwrap().0);

    let common = analyses(&["guolli+N+Sg+Nom"]);
    assert!(!rule.condition.evaluate(Some(&node), &common).unwrap().0);
}

#[test]
fn entry_is_required() {
    let rule = parse_paradigm_str(NOUNS, path("nouns.paradigm")).unwrap().unwrap();
    let lemmas = analyses(&["guolli+N+Sg+Nom"]);
    assert!(!rule.condition.evaluate(None, &lemmas).unwrap().0);
}

#[test]
fn list_and_number_expectations() {
    let text = "morphology:\n  pos: [N, A]\nlexicon:\n  XPATH:\n    hid: .//l/@hid\n  hid: 2\n--\nbody\n";
    let rule = parse_paradigm_str(text, path("x.paradigm")).unwrap().unwrap();
    let node = MapEntry::new().with(LEMMA_EXPR, "buorre").with(".//l/@hid", "2");

    assert!(rule.condition.evaluate(Some(&node), &analyses(&["buorre+A+Sg+Nom"])).unwrap().0);
    assert!(!rule.condition.evaluate(Some(&node), &analyses(&["buorre+V+Inf"])).unwrap().0);
}

#[test]
fn full_tag_rule() {
    let text = "morphology:\n  tag: [guolli+N+Sg+Nom, guolli+N+Pl+Nom]\n--\nbody\n";
    let rule = parse_paradigm_str(text, path("x.paradigm")).unwrap().unwrap();
    let node = MapEntry::new().with(LEMMA_EXPR, "guolli");

    let (matched, context) = rule
        .condition
        .evaluate(Some(&node), &analyses(&["guolli+N+Pl+Nom", "guolli+N+Sg+Gen"]))
        .unwrap();
    assert!(matched);
    assert_eq!(context["tag"].as_deref(), Some("guolli+N+Pl+Nom"));
}

#[test]
fn unknown_tagset_is_an_error() {
    let text = "morphology:\n  mood: Ind\n--\nbody\n";
    let rule = parse_paradigm_str(text, path("x.paradigm")).unwrap().unwrap();
    let node = MapEntry::new().with(LEMMA_EXPR, "guolli");
    let err = rule.condition.evaluate(Some(&node), &analyses(&["guolli+N+Sg+Nom"])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidTagsetKey { .. }));
}

#[test]
fn header_without_conditions_never_matches() {
    let rule = parse_paradigm_str("name: Empty\n--\nbody\n", path("x.paradigm")).unwrap().unwrap();
    let node = MapEntry::new().with(LEMMA_EXPR, "guolli");
    assert!(!rule.condition.evaluate(Some(&node), &analyses(&["guolli+N+Sg+Nom"])).unwrap().0);
}

#[test]
fn incomplete_files_are_skipped() {
    assert!(parse_paradigm_str("", path("x.paradigm")).unwrap().is_none());
    assert!(parse_paradigm_str("name: x\n", path("x.paradigm")).unwrap().is_none());
    assert!(parse_paradigm_str("--\nbody", path("x.paradigm")).unwrap().is_none());
    assert!(parse_paradigm_str("name: x\n--", path("x.paradigm")).unwrap().is_none());
}

#[test]
fn malformed_headers() {
    let err = parse_paradigm_str("- a\n- b\n--\nbody", path("x.paradigm")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleFileSyntax { .. }));

    let err = parse_paradigm_str("morphology: [pos]\n--\nbody", path("x.paradigm")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleFileSyntax { .. }));

    let err = parse_paradigm_str("morphology:\n  tag: true\n--\nbody", path("x.paradigm")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleFileSyntax { .. }));

    let err = parse_paradigm_str("name: [unclosed\n--\nbody", path("x.paradigm")).unwrap_err();
    assert!(err.to_string().contains("x.paradigm"));
}

#[test]
fn layout_borrows_paradigm_conditions() {
    let base = Arc::new(parse_paradigm_str(PROPER, path("sme/place.paradigm")).unwrap().unwrap());
    let text = "name: Place table\nparadigm: place.paradigm\nlayout:\n  type: vertical\n--\n| {{ lemma }} |\n";
    let layout = parse_layout_str(text, path("sme/place.layout"), &[base]).unwrap().unwrap();

    assert_eq!(layout.template.display_type.as_deref(), Some("vertical"));
    assert_eq!(layout.display_order_key(), "vertical");
    assert!(layout.condition.definition().contains_key("morphology"));
    assert!(layout.condition.definition().contains_key("lexicon"));

    let node = MapEntry::new().with(LEMMA_EXPR, "Romsa").with(".//l/@sem", "PLACE");
    assert!(layout.condition.evaluate(Some(&node), &analyses(&["Romsa+N+Prop+Sg+Nom"])).unwrap().0);
}

#[test]
fn layout_reference_must_exist() {
    let text = "paradigm: missing.paradigm\n--\nbody\n";
    let bases: Vec<Arc<ParadigmRule>> = Vec::new();
    let err = parse_layout_str(text, path("sme/x.layout"), &bases).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleReference { .. }));
    assert!(err.to_string().contains("missing.paradigm"));
}
