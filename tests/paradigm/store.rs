//! Integration tests for the rule store

use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};

use fstlex_foundation::{ErrorKind, LEMMA_EXPR, MapEntry};
use fstlex_paradigm::{ParadigmConfig, ParadigmStore};
use tempfile::TempDir;

use crate::analyses;

const NOUNS: &str = "name: Nouns\nmorphology:\n  pos: N\n--\nnouns\n";

const PLACES: &str = "name: Places\nmorphology:\n  pos: N\n  type: Prop\nlexicon:\n  sem: PLACE\n  XPATH:\n    sem: .//l/@sem\n--\nplaces\n";

const VERBS: &str = "name: Verbs\nmorphology:\n  pos: V\n--\nverbs\n";

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn rule_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "sme/nouns.paradigm", NOUNS);
    write(root, "sme/nouns/places.paradigm", PLACES);
    write(root, "sme/verbs.paradigm", VERBS);
    write(root, "sme/README.txt", "not a rule");
    write(root, "sme/layouts/places.layout", "name: Place table\nparadigm: places.paradigm\nlayout:\n  type: b-table\n--\ntable\n");
    write(root, "sme/layouts/nouns.layout", "name: Noun list\nparadigm: nouns.paradigm\nlayout:\n  type: a-list\n--\nlist\n");
    write(root, "fin/draft.paradigm", "name: Draft\n");
    dir
}

fn place() -> MapEntry {
    MapEntry::new().with(LEMMA_EXPR, "Romsa").with(".//l/@sem", "PLACE")
}

#[test]
fn loads_every_language_directory() {
    let dir = rule_dir();
    let store = ParadigmStore::load(ParadigmConfig::new(dir.path())).unwrap();
    let table = store.snapshot();

    assert_eq!(table.languages(), ["sme"]);
    assert_eq!(table.paradigms("sme").len(), 3);
    assert!(table.paradigms("fin").is_empty());
    assert!(table.layouts("sme").is_empty());
    assert_eq!(table.len(), 3);
}

#[test]
fn language_filter() {
    let dir = rule_dir();
    let store = ParadigmStore::load(ParadigmConfig::new(dir.path()).with_languages(["fin"])).unwrap();
    assert!(store.snapshot().is_empty());
}

#[test]
fn most_specific_paradigm_is_selected() {
    let dir = rule_dir();
    let store = ParadigmStore::load(ParadigmConfig::new(dir.path())).unwrap();

    let node = place();
    let lemmas = analyses(&["Romsa+N+Prop+Sg+Nom"]);
    let resolved = store.resolve("sme", Some(&node), &lemmas).unwrap().unwrap();
    assert_eq!(resolved.rule.name.as_deref(), Some("Places"));
    assert_eq!(resolved.rule.template.source, "places");
    assert_eq!(resolved.context.get("sem"), Some("PLACE"));
    assert_eq!(resolved.context.get("lemma"), Some("Romsa"));
    assert_eq!(resolved.context.analyses.len(), 1);

    let common = MapEntry::new().with(LEMMA_EXPR, "guolli");
    let lemmas = analyses(&["guolli+N+Sg+Nom"]);
    let resolved = store.resolve("sme", Some(&common), &lemmas).unwrap().unwrap();
    assert_eq!(resolved.rule.name.as_deref(), Some("Nouns"));
    assert_eq!(resolved.context.get("pos"), Some("N"));
}

#[test]
fn no_match_and_unknown_language() {
    let dir = rule_dir();
    let store = ParadigmStore::load(ParadigmConfig::new(dir.path())).unwrap();
    let node = MapEntry::new().with(LEMMA_EXPR, "buorre");
    let lemmas = analyses(&["buorre+A+Sg+Nom"]);

    assert!(store.resolve("sme", Some(&node), &lemmas).unwrap().is_none());
    assert!(store.resolve("nob", Some(&node), &lemmas).unwrap().is_none());
    assert!(store.resolve("sme", None, &lemmas).unwrap().is_none());
}

#[test]
fn layouts_in_display_order() {
    let dir = rule_dir();
    let store = ParadigmStore::load(ParadigmConfig::new(dir.path()).with_layouts(true)).unwrap();
    assert_eq!(store.snapshot().layouts("sme").len(), 2);

    let node = place();
    let lemmas = analyses(&["Romsa+N+Prop+Sg+Nom"]);
    let names: Vec<String> = store
        .resolve_layouts("sme", Some(&node), &lemmas)
        .unwrap()
        .iter()
        .filter_map(|rule| rule.name.clone())
        .collect();
    assert_eq!(names, ["Noun list", "Place table"]);

    let best = store.resolve_layout("sme", Some(&node), &lemmas).unwrap().unwrap();
    assert_eq!(best.rule.name.as_deref(), Some("Place table"));
}

#[test]
fn dangling_layout_reference_fails_the_load() {
    let dir = rule_dir();
    write(dir.path(), "sme/layouts/broken.layout", "paradigm: gone.paradigm\n--\nx\n");

    let err = ParadigmStore::load(ParadigmConfig::new(dir.path()).with_layouts(true)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleReference { .. }));

    assert!(ParadigmStore::load(ParadigmConfig::new(dir.path())).is_ok());
}

#[test]
fn missing_root_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = ParadigmStore::load(ParadigmConfig::new(dir.path().join("nope"))).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Io { .. }));
}

#[test]
fn explicit_reload_swaps_the_table() {
    let dir = rule_dir();
    let store = ParadigmStore::load(ParadigmConfig::new(dir.path())).unwrap();
    let before = store.snapshot();

    write(dir.path(), "sme/adjectives.paradigm", "name: Adjectives\nmorphology:\n  pos: A\n--\nadj\n");
    store.reload().unwrap();

    assert_eq!(before.paradigms("sme").len(), 3);
    assert_eq!(store.snapshot().paradigms("sme").len(), 4);

    let node = MapEntry::new().with(LEMMA_EXPR, "buorre");
    let lemmas = analyses(&["buorre+A+Sg+Nom"]);
    let resolved = store.resolve("sme", Some(&node), &lemmas).unwrap().unwrap();
    assert_eq!(resolved.rule.name.as_deref(), Some("Adjectives"));
}

#[test]
fn failed_reload_keeps_previous_rules() {
    let dir = rule_dir();
    let store = ParadigmStore::load(ParadigmConfig::new(dir.path())).unwrap();

    write(dir.path(), "sme/broken.paradigm", "morphology: [pos]\n--\nx\n");
    assert!(store.reload_language("sme").is_err());
    assert_eq!(store.snapshot().paradigms("sme").len(), 3);

    fs::remove_file(dir.path().join("sme/broken.paradigm")).unwrap();
    write(dir.path(), "fin/draft.paradigm", "name: Draft\nmorphology:\n  pos: N\n--\ndraft\n");
    store.reload_language("fin").unwrap();
    assert_eq!(store.snapshot().languages(), ["fin", "sme"]);
}

#[test]
fn staleness_follows_the_files() {
    let dir = rule_dir();
    let store = ParadigmStore::load(ParadigmConfig::new(dir.path())).unwrap();
    assert!(!store.is_stale("sme"));

    let later = SystemTime::now() + Duration::from_secs(60);
    let file = File::options().write(true).open(dir.path().join("sme/verbs.paradigm")).unwrap();
    file.set_modified(later).unwrap();
    assert!(store.is_stale("sme"));

    store.reload_language("sme").unwrap();
    assert!(!store.is_stale("sme"));

    fs::remove_file(dir.path().join("sme/verbs.paradigm")).unwrap();
    assert!(store.is_stale("sme"));
}

#[test]
fn auto_reload_picks_up_edits() {
    let dir = rule_dir();
    let store = ParadigmStore::load(ParadigmConfig::new(dir.path()).with_auto_reload(true)).unwrap();
    let node = MapEntry::new().with(LEMMA_EXPR, "guolli");
    let lemmas = analyses(&["guolli+N+Sg+Nom"]);

    let path = dir.path().join("sme/nouns.paradigm");
    fs::write(&path, "name: Edited nouns\nmorphology:\n  pos: N\n--\nedited\n").unwrap();
    let later = SystemTime::now() + Duration::from_secs(60);
    File::options().write(true).open(&path).unwrap().set_modified(later).unwrap();

    let resolved = store.resolve("sme", Some(&node), &lemmas).unwrap().unwrap();
    assert_eq!(resolved.rule.name.as_deref(), Some("Edited nouns"));
}

#[test]
fn auto_reload_off_keeps_the_snapshot() {
    let dir = rule_dir();
    let store = ParadigmStore::load(ParadigmConfig::new(dir.path())).unwrap();
    let node = MapEntry::new().with(LEMMA_EXPR, "guolli");
    let lemmas = analyses(&["guolli+N+Sg+Nom"]);

    let path = dir.path().join("sme/nouns.paradigm");
    fs::write(&path, "name: Edited nouns\nmorphology:\n  pos: N\n--\nedited\n").unwrap();

    let resolved = store.resolve("sme", Some(&node), &lemmas).unwrap().unwrap();
    assert_eq!(resolved.rule.name.as_deref(), Some("Nouns"));
}
