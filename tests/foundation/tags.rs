//! Integration tests for tags and tagsets

use std::sync::Arc;

use fstlex_foundation::{ErrorKind, Tag, TagPart, Tagsets};

const TAGSETS: &str = r#"
pos: [N, V, A, Adv]
number: [Sg, Pl]
case: [Nom, Gen, Ill]
preverb: ["1", 2, { match: "PV", regex: true }]
derivation: [{ match: "Der/", regex: true }]
"#;

fn tagsets() -> Arc<Tagsets> {
    Arc::new(Tagsets::from_yaml_str(TAGSETS).unwrap())
}

// =============================================================================
// Tag Parts
// =============================================================================

#[test]
fn literal_part_equals_exactly_its_value() {
    let part = TagPart::literal("Sg");
    assert!(part.matches("Sg"));
    assert!(!part.matches("Sg1"));
    assert!(!part.matches("sg"));
    assert_eq!(part, "Sg");
}

#[test]
fn pattern_part_is_anchored_at_the_start() {
    let part = TagPart::pattern("Der/").unwrap();
    assert!(part.matches("Der/NomAct"));
    assert!(!part.matches("xDer/NomAct"));
    assert!(part.is_pattern());
}

#[test]
fn invalid_pattern_is_rejected() {
    let err = TagPart::pattern("(").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidPattern { .. }));
}

// =============================================================================
// Tagsets
// =============================================================================

#[test]
fn tagset_file_members() {
    let sets = tagsets();
    assert_eq!(sets.len(), 5);
    assert!(sets.is_member("preverb", "1"));
    assert!(sets.is_member("preverb", "2"));
    assert!(sets.is_member("preverb", "PV/e"));
    assert!(!sets.is_member("preverb", "3"));
    assert!(sets.is_known_tag("Ill"));
    assert!(!sets.is_known_tag("guolli"));
}

#[test]
fn unknown_tagset_key_lists_choices() {
    let err = tagsets().try_get("mood").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidTagsetKey { .. }));
    assert!(err.to_string().contains("pos"));
}

// =============================================================================
// Tags
// =============================================================================

#[test]
fn tag_lookup_by_tagset() {
    let tag = Tag::new("viessu+N+Sg+Ill", "+", tagsets());
    assert_eq!(tag.get("pos").unwrap(), Some("N"));
    assert_eq!(tag.get("case").unwrap(), Some("Ill"));
    assert_eq!(tag.get("derivation").unwrap(), None);
    assert!(tag.get("mood").is_err());
    assert_eq!(tag.len(), 4);
    assert_eq!(tag.part(0), Some("viessu"));
}

#[test]
fn first_member_wins() {
    let tag = Tag::new("x+Der/NomAct+Der/Dimin+N", "+", tagsets());
    assert_eq!(tag.get("derivation").unwrap(), Some("Der/NomAct"));
}

#[test]
fn matching_tagsets_maps_every_hit() {
    let tag = Tag::new("guolli+N+Pl+Gen", "+", tagsets());
    let hits = tag.matching_tagsets();
    assert_eq!(hits.get("pos"), Some(&"N"));
    assert_eq!(hits.get("number"), Some(&"Pl"));
    assert_eq!(hits.get("case"), Some(&"Gen"));
    assert!(!hits.contains_key("preverb"));
}

#[test]
fn tags_compare_by_string_and_separator() {
    let sets = tagsets();
    let a = Tag::new("guolli+N+Sg", "+", Arc::clone(&sets));
    let b = Tag::from_parts(&["guolli", "N", "Sg"], "+", Arc::clone(&sets));
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "guolli+N+Sg");
    assert_ne!(a, Tag::new("guolli N Sg", " ", sets));
}
