//! The condition half of a paradigm rule file.

use std::path::Path;

use fstlex_foundation::{EntryNode, Error, Result};
use fstlex_morphology::Lemma;
use indexmap::IndexMap;
use log::warn;
use serde_yaml::{Mapping, Value};

use crate::rule::{Comparator, Expectation, LexiconRuleSet, NullRule, TagRule, TagSetRule};

/// Matched keys and their values. A later pair with the same key replaces
/// the value but keeps the original position.
pub type RuleContext = IndexMap<String, Option<String>>;

/// Name shown for a condition whose header has none.
pub const NO_NAME: &str = "NO NAME";

/// Whether a header value counts as present: not null, false, or empty.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Sequence(s) => !s.is_empty(),
        Value::Mapping(m) => !m.is_empty(),
        _ => true,
    }
}

/// A compiled rule condition: every comparator must match.
#[derive(Debug)]
pub struct ParadigmRuleSet {
    definition: Mapping,
    comparators: Vec<Box<dyn Comparator>>,
}

impl ParadigmRuleSet {
    /// Compiles a parsed rule header.
    ///
    /// `morphology.tag` becomes a [`TagRule`], the other `morphology` keys
    /// become [`TagSetRule`]s in file order, and the `lexicon` section
    /// becomes one [`LexiconRuleSet`]. A header with neither section never
    /// matches.
    ///
    /// # Errors
    /// Returns `RuleFileSyntax` if a section has the wrong shape.
    pub fn from_definition(definition: Mapping, path: &Path) -> Result<Self> {
        let lexicon = definition.get("lexicon").filter(|v| is_truthy(v));
        let morphology = definition.get("morphology").filter(|v| is_truthy(v));
        let mut comparators: Vec<Box<dyn Comparator>> = Vec::new();

        if lexicon.is_none() && morphology.is_none() {
            let name = definition.get("name").and_then(Value::as_str).unwrap_or(NO_NAME);
            warn!(
                target: "fstlex::paradigm",
                "Missing morphology or lexicon rule context in <{name}>"
            );
            comparators.push(Box::new(NullRule));
        }

        if let Some(section) = morphology {
            let Some(section) = section.as_mapping() else {
                return Err(Error::rule_syntax(path, "`morphology` must be a mapping"));
            };
            if let Some(tag) = section.get("tag") {
                comparators.push(Box::new(TagRule::new(Expectation::from_yaml(tag, "tag", path)?, path)?));
            }
            for (key, value) in section {
                let Some(key) = key.as_str() else {
                    return Err(Error::rule_syntax(path, "morphology keys must be strings"));
                };
                if key == "tag" {
                    continue;
                }
                comparators.push(Box::new(TagSetRule::new(key, Expectation::from_yaml(value, key, path)?)));
            }
        }

        let lexicon_rules = match lexicon {
            Some(section) => {
                let Some(section) = section.as_mapping() else {
                    return Err(Error::rule_syntax(path, "`lexicon` must be a mapping"));
                };
                LexiconRuleSet::from_yaml(section, path)?
            }
            None => LexiconRuleSet::default(),
        };
        comparators.push(Box::new(lexicon_rules));

        Ok(Self {
            definition,
            comparators,
        })
    }

    /// The parsed header this condition was compiled from.
    #[must_use]
    pub fn definition(&self) -> &Mapping {
        &self.definition
    }

    /// Number of comparators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    /// Returns true if there are no comparators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    /// Runs every comparator. Returns whether all matched and the merged
    /// context of those that did.
    ///
    /// # Errors
    /// Propagates comparator errors (an unknown tagset).
    pub fn evaluate(&self, node: Option<&dyn EntryNode>, analyses: &[Lemma]) -> Result<(bool, RuleContext)> {
        let mut matched = true;
        let mut context = RuleContext::new();
        for comparator in &self.comparators {
            let outcome = comparator.compare(node, analyses)?;
            if outcome.matched {
                context.extend(outcome.context);
            } else {
                matched = false;
            }
        }
        Ok((matched, context))
    }
}
