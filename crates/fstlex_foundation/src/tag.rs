//! The tag model: tag parts, tagsets, and parsed analyzer tags.
//!
//! A tagset file maps names to member lists:
//!
//! ```yaml
//! pos: [A, Adv, N, V]
//! case: [Nom, Gen, Ill, Loc]
//! preverb: ["1", "2", { match: "^PV", regex: true }]
//! ```
//!
//! Each member is either a literal tag or a start-anchored regex. A
//! [`Tag`] splits an analysis like `viessu+N+Sg+Ill` into parts and can
//! answer "which part belongs to tagset `case`?".

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// Configuration
// =============================================================================

/// One member of a tagset as written in the tagset file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagPartDef {
    /// A literal tag such as `N`.
    Literal(String),
    /// A numeric literal such as `1` (YAML reads it as an integer).
    Number(i64),
    /// A `{ match: ..., regex: true }` descriptor.
    Descriptor {
        /// The tag or pattern source.
        #[serde(rename = "match")]
        pattern: String,
        /// Whether `pattern` is a regex.
        #[serde(default)]
        regex: bool,
    },
}

/// The parsed contents of a tagset file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagsetsConfig(pub BTreeMap<String, Vec<TagPartDef>>);

impl TagsetsConfig {
    /// Parses a YAML tagset definition.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the YAML is malformed.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).map_err(|e| Error::config(format!("tagset file: {e}")))
    }

    /// Reads and parses a tagset file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        serde_yaml::from_str(&source)
            .map_err(|e| Error::config(format!("tagset file {}: {e}", path.display())))
    }
}

// =============================================================================
// TagPart
// =============================================================================

/// A tagset member: a literal string or a compiled pattern.
#[derive(Clone, Debug)]
pub enum TagPart {
    /// Matches by string equality.
    Literal(String),
    /// Matches when the regex matches at the start of the candidate.
    Pattern {
        /// The pattern as written in configuration.
        source: String,
        /// The compiled, start-anchored pattern.
        regex: Regex,
    },
}

impl TagPart {
    /// Creates a literal tag part.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Compiles a pattern tag part.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidPattern`](crate::ErrorKind::InvalidPattern)
    /// if the regex does not compile.
    pub fn pattern(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})"))
            .map_err(|e| Error::invalid_pattern(&source, e.to_string()))?;
        Ok(Self::Pattern { source, regex })
    }

    /// Builds a tag part from its configuration form.
    ///
    /// # Errors
    ///
    /// Returns an error if a regex descriptor does not compile.
    pub fn from_def(def: &TagPartDef) -> Result<Self> {
        match def {
            TagPartDef::Literal(s) => Ok(Self::literal(s.clone())),
            TagPartDef::Number(n) => Ok(Self::literal(n.to_string())),
            TagPartDef::Descriptor { pattern, regex } => {
                if *regex {
                    Self::pattern(pattern.clone())
                } else {
                    Ok(Self::literal(pattern.clone()))
                }
            }
        }
    }

    /// Tests a raw tag against this part.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Literal(value) => value == candidate,
            Self::Pattern { regex, .. } => regex.is_match(candidate),
        }
    }

    /// The literal value or pattern source.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Literal(value) => value,
            Self::Pattern { source, .. } => source,
        }
    }

    /// Returns true for pattern parts.
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Pattern { .. })
    }
}

impl PartialEq<str> for TagPart {
    fn eq(&self, other: &str) -> bool {
        self.matches(other)
    }
}

impl PartialEq<&str> for TagPart {
    fn eq(&self, other: &&str) -> bool {
        self.matches(other)
    }
}

impl fmt::Display for TagPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source())
    }
}

// =============================================================================
// Tagset
// =============================================================================

/// A named category of tags.
#[derive(Clone, Debug)]
pub struct Tagset {
    name: String,
    members: Vec<TagPart>,
}

impl Tagset {
    /// Creates a tagset from already-built parts.
    #[must_use]
    pub fn new(name: impl Into<String>, members: Vec<TagPart>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    /// Creates a tagset of literal members.
    #[must_use]
    pub fn literals<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, members.into_iter().map(TagPart::literal).collect())
    }

    /// The tagset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[TagPart] {
        &self.members
    }

    /// Returns true if any member matches `raw`.
    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        self.members.iter().any(|m| m.matches(raw))
    }
}

impl fmt::Display for Tagset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Tagset: \"{}\">", self.name)
    }
}

// =============================================================================
// Tagsets
// =============================================================================

/// All tagsets configured for one language.
#[derive(Clone, Debug, Default)]
pub struct Tagsets {
    sets: BTreeMap<String, Tagset>,
}

impl Tagsets {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles every tagset of a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex member does not compile.
    pub fn from_config(config: &TagsetsConfig) -> Result<Self> {
        let mut sets = BTreeMap::new();
        for (name, defs) in &config.0 {
            let members = defs.iter().map(TagPart::from_def).collect::<Result<_>>()?;
            sets.insert(name.clone(), Tagset::new(name.clone(), members));
        }
        Ok(Self { sets })
    }

    /// Parses and compiles a YAML tagset definition.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or compiling fails.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Self::from_config(&TagsetsConfig::from_yaml_str(source)?)
    }

    /// Reads, parses, and compiles a tagset file.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, parsing, or compiling fails.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_config(&TagsetsConfig::from_path(path)?)
    }

    /// Builder method to add a tagset.
    #[must_use]
    pub fn with(mut self, tagset: Tagset) -> Self {
        self.insert(tagset);
        self
    }

    /// Adds or replaces a tagset.
    pub fn insert(&mut self, tagset: Tagset) {
        self.sets.insert(tagset.name.clone(), tagset);
    }

    /// Looks up a tagset by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tagset> {
        self.sets.get(name)
    }

    /// Looks up a tagset by name, failing for unknown names.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidTagsetKey`](crate::ErrorKind::InvalidTagsetKey).
    pub fn try_get(&self, name: &str) -> Result<&Tagset> {
        self.sets
            .get(name)
            .ok_or_else(|| Error::invalid_tagset_key(name, self.names().map(String::from).collect()))
    }

    /// Returns true if a tagset with this name is configured.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Returns true if `name` is configured and `raw` is one of its members.
    #[must_use]
    pub fn is_member(&self, name: &str, raw: &str) -> bool {
        self.sets.get(name).is_some_and(|set| set.contains(raw))
    }

    /// The configured tagset names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Every member source across all tagsets, deduplicated.
    #[must_use]
    pub fn all_tags(&self) -> BTreeSet<&str> {
        self.sets
            .values()
            .flat_map(|set| set.members.iter().map(TagPart::source))
            .collect()
    }

    /// Returns true if `raw` is a member of any tagset, i.e. a grammatical
    /// tag rather than a lemma.
    #[must_use]
    pub fn is_known_tag(&self, raw: &str) -> bool {
        self.sets.values().any(|set| set.contains(raw))
    }

    /// Number of tagsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if no tagsets are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

// =============================================================================
// Tag
// =============================================================================

/// A parsed analyzer tag string.
///
/// Holds a shared handle to the tagsets it was parsed against so that
/// tagset lookups keep working after the tag leaves the morphology engine.
#[derive(Clone)]
pub struct Tag {
    tag_string: String,
    sep: String,
    parts: Vec<String>,
    tagsets: Arc<Tagsets>,
}

impl Tag {
    /// Parses `tag_string` by splitting on `sep`.
    #[must_use]
    pub fn new(tag_string: impl Into<String>, sep: impl Into<String>, tagsets: Arc<Tagsets>) -> Self {
        let tag_string = tag_string.into();
        let sep = sep.into();
        let parts = tag_string.split(sep.as_str()).map(String::from).collect();
        Self {
            tag_string,
            sep,
            parts,
            tagsets,
        }
    }

    /// Joins `parts` with `sep` and parses the result.
    #[must_use]
    pub fn from_parts<S: AsRef<str>>(parts: &[S], sep: &str, tagsets: Arc<Tagsets>) -> Self {
        let joined = parts
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(sep);
        Self::new(joined, sep, tagsets)
    }

    /// The full tag string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.tag_string
    }

    /// The separator this tag was split on.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.sep
    }

    /// The parts in order.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// The tagsets this tag is interpreted against.
    #[must_use]
    pub fn tagsets(&self) -> &Arc<Tagsets> {
        &self.tagsets
    }

    /// Number of parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if the tag has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Part by position.
    #[must_use]
    pub fn part(&self, index: usize) -> Option<&str> {
        self.parts.get(index).map(String::as_str)
    }

    /// Returns true if `name` is a configured tagset.
    #[must_use]
    pub fn contains_tagset(&self, name: &str) -> bool {
        self.tagsets.contains_key(name)
    }

    /// The first part that belongs to the named tagset.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidTagsetKey`](crate::ErrorKind::InvalidTagsetKey)
    /// if `name` is not a configured tagset.
    pub fn get(&self, name: &str) -> Result<Option<&str>> {
        let tagset = self.tagsets.try_get(name)?;
        Ok(self.by_tagset(tagset))
    }

    /// The first part that belongs to `tagset`.
    #[must_use]
    pub fn by_tagset(&self, tagset: &Tagset) -> Option<&str> {
        self.parts
            .iter()
            .find(|p| tagset.contains(p))
            .map(String::as_str)
    }

    /// Every configured tagset that has a member in this tag, with the
    /// matching part.
    #[must_use]
    pub fn matching_tagsets(&self) -> BTreeMap<&str, &str> {
        self.tagsets
            .sets
            .values()
            .filter_map(|set| self.by_tagset(set).map(|part| (set.name(), part)))
            .collect()
    }

    /// Iterates the parts.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(String::as_str)
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.tag_string == other.tag_string && self.sep == other.sep
    }
}

impl Eq for Tag {}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Tag: {}>", self.tag_string)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.tag_string)
    }
}
