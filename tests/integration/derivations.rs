//! The derived-form pipeline on a realistic analyzer block.

use std::sync::Arc;

use fstlex_analyzer::{LibraryAnalyzer, MemoryTransducer};
use fstlex_foundation::{AnalyzerOptions, LEMMA_EXPR, MapEntry, Tagsets};
use fstlex_morphology::{LemmatizeOptions, Morphology, UNKNOWN_POS};
use fstlex_paradigm::{ParadigmStore, RuleList, RuleTable, find_matches, parse_paradigm_str};

const TAGSETS: &str = r#"
pos: [N, V, A]
number: [Sg, Pl]
case: [Nom, Gen, Ess]
type: [NomAg]
verb_derivations: [Actio+Gen, Actio+Nom]
"#;

const BEAGGIN: &[&str] = &[
    "beaggin+N+Sg+Gen+Allegro",
    "beaggit+V+IV+Actio+Gen",
    "beaggit+V+IV+Actio+Nom",
    "beaggit+V+TV+Der/NomAct+N+Sg+Gen+Allegro",
    "beaggit+V+TV+Der/NomAct+N+Sg+Nom",
    "beaggin+N+Sg+Nom",
    "beaggi+N+NomAg+Ess",
];

fn sme() -> Morphology {
    let mut forward = MemoryTransducer::new();
    for analysis in BEAGGIN {
        forward.insert("beaggin", analysis, 0.0);
    }
    let options = AnalyzerOptions::new().with_tags_in_lexicon(["Der", "Actio"]);
    let tagsets = Arc::new(Tagsets::from_yaml_str(TAGSETS).unwrap());
    Morphology::new("sme", tagsets, Box::new(LibraryAnalyzer::new(forward, None).with_options(options)))
}

#[test]
fn action_nouns_are_split_from_their_verb() {
    let lemmas = sme().lemmatize("beaggin", LemmatizeOptions::new());

    let tags: Vec<&str> = lemmas.iter().map(|l| l.tag_string()).collect();
    assert!(tags.contains(&"beaggit+V+IV"));
    assert!(tags.contains(&"Actio+Gen"));
    assert!(tags.contains(&"Actio+Nom"));
    assert_eq!(tags.iter().filter(|t| **t == "beaggit+V+IV").count(), 1);

    for actio in ["Actio+Gen", "Actio+Nom"] {
        let lemma = lemmas.iter().find(|l| l.lemma == actio).unwrap();
        assert_eq!(lemma.pos, "V");
    }
    assert!(lemmas.iter().all(|l| l.pos != UNKNOWN_POS));
}

#[test]
fn derived_entries_select_their_own_paradigm() {
    let verbs = parse_paradigm_str("name: Verbs\nmorphology:\n  pos: V\n--\nverbs", "sme/verbs.paradigm".as_ref())
        .unwrap()
        .unwrap();
    let agents = parse_paradigm_str(
        "name: Agent nouns\nmorphology:\n  pos: N\n  type: NomAg\n--\nagents",
        "sme/agents.paradigm".as_ref(),
    )
    .unwrap()
    .unwrap();
    let rules: RuleList = [verbs, agents].into_iter().map(Arc::new).collect();

    let lemmas = sme().lemmatize("beaggin", LemmatizeOptions::new());
    let node = MapEntry::new().with(LEMMA_EXPR, "beaggin");

    let matches = find_matches(&rules, Some(&node), &lemmas).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].rule.name.as_deref(), Some("Agent nouns"));
    assert_eq!(matches[0].specificity, 3);
    assert_eq!(matches[1].specificity, 2);

    let store = ParadigmStore::from_table(Default::default(), RuleTable::default());
    assert!(store.resolve("sme", Some(&node), &lemmas).unwrap().is_none());
}
