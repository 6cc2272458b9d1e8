//! Comparators: the building blocks of a paradigm rule condition.
//!
//! Each comparator inspects the lexicon entry and the analyses of the
//! looked-up word and reports whether it matched, together with the
//! `(key, value)` pairs it matched on. The pairs become the rule context,
//! and the size of the context is the rule's specificity.

use std::fmt;
use std::path::Path;

use fstlex_foundation::{EntryNode, Error, LEMMA_EXPR, Result};
use fstlex_morphology::Lemma;
use indexmap::IndexMap;
use serde_yaml::Value;

/// One `(key, value)` pair contributed to a rule context. Lexicon values
/// may be absent.
pub type ContextPair = (String, Option<String>);

// =============================================================================
// Expectation
// =============================================================================

/// The expected value on the right-hand side of a condition key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expectation {
    /// Exact equality.
    Value(String),
    /// Membership.
    OneOf(Vec<String>),
    /// Presence (`true`) or absence (`false`).
    Flag(bool),
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl Expectation {
    /// Reads an expectation from a YAML value. Numbers are compared as
    /// strings.
    ///
    /// # Errors
    /// Returns `RuleFileSyntax` for null, mapping, or nested list values.
    pub fn from_yaml(value: &Value, key: &str, path: &Path) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(Self::Flag(*b)),
            Value::Sequence(items) => items
                .iter()
                .map(|item| {
                    scalar_to_string(item).ok_or_else(|| {
                        Error::rule_syntax(path, format!("`{key}`: list items must be scalars"))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::OneOf),
            Value::Tagged(tagged) => Self::from_yaml(&tagged.value, key, path),
            other => scalar_to_string(other).map(Self::Value).ok_or_else(|| {
                Error::rule_syntax(path, format!("`{key}`: expected a string, list, or boolean"))
            }),
        }
    }

    fn accepts(&self, candidate: &str) -> bool {
        match self {
            Self::Value(v) => v == candidate,
            Self::OneOf(vs) => vs.iter().any(|v| v == candidate),
            Self::Flag(_) => true,
        }
    }
}

// =============================================================================
// Comparator
// =============================================================================

/// Outcome of one comparator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Comparison {
    /// Whether the comparator matched.
    pub matched: bool,
    /// Pairs matched on, in order.
    pub context: Vec<ContextPair>,
}

impl Comparison {
    fn failed() -> Self {
        Self::default()
    }
}

/// A single test over an entry node and its analyses.
pub trait Comparator: fmt::Debug + Send + Sync {
    /// Runs the test.
    ///
    /// # Errors
    /// Returns an error if the comparator names a tagset that does not exist.
    fn compare(&self, node: Option<&dyn EntryNode>, analyses: &[Lemma]) -> Result<Comparison>;
}

/// Stands in for a malformed condition; never matches.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRule;

impl Comparator for NullRule {
    fn compare(&self, _node: Option<&dyn EntryNode>, _analyses: &[Lemma]) -> Result<Comparison> {
        Ok(Comparison::failed())
    }
}

/// Matches the whole tag string of any analysis.
#[derive(Clone, Debug)]
pub struct TagRule {
    expected: Expectation,
}

impl TagRule {
    /// Creates a tag rule.
    ///
    /// # Errors
    /// Returns `RuleFileSyntax` for a boolean expectation.
    pub fn new(expected: Expectation, path: &Path) -> Result<Self> {
        if let Expectation::Flag(_) = expected {
            return Err(Error::rule_syntax(path, "`morphology.tag` must be a string or a list"));
        }
        Ok(Self { expected })
    }
}

impl Comparator for TagRule {
    fn compare(&self, _node: Option<&dyn EntryNode>, analyses: &[Lemma]) -> Result<Comparison> {
        let context: Vec<ContextPair> = analyses
            .iter()
            .map(|lemma| lemma.tag.as_str())
            .filter(|raw| self.expected.accepts(raw))
            .map(|raw| ("tag".to_string(), Some(raw.to_string())))
            .collect();
        Ok(Comparison {
            matched: !context.is_empty(),
            context,
        })
    }
}

/// Matches the value a tagset picks out of any analysis.
#[derive(Clone, Debug)]
pub struct TagSetRule {
    tagset: String,
    expected: Expectation,
}

impl TagSetRule {
    /// Creates a tagset rule.
    #[must_use]
    pub fn new(tagset: impl Into<String>, expected: Expectation) -> Self {
        Self {
            tagset: tagset.into(),
            expected,
        }
    }

    /// The tagset name.
    #[must_use]
    pub fn tagset(&self) -> &str {
        &self.tagset
    }
}

impl Comparator for TagSetRule {
    fn compare(&self, _node: Option<&dyn EntryNode>, analyses: &[Lemma]) -> Result<Comparison> {
        let mut context = Vec::new();
        for lemma in analyses {
            // A flag expectation only asks whether the tag has a member.
            match lemma.tag.get(&self.tagset)? {
                Some(value) if self.expected.accepts(value) => {
                    context.push((self.tagset.clone(), Some(value.to_string())));
                }
                _ => {}
            }
        }
        Ok(Comparison {
            matched: !context.is_empty(),
            context,
        })
    }
}

/// Tests one value extracted from the lexicon entry.
#[derive(Clone, Debug)]
pub struct LexRule {
    key: String,
    expected: Expectation,
}

impl LexRule {
    /// Creates a lexicon rule.
    #[must_use]
    pub fn new(key: impl Into<String>, expected: Expectation) -> Self {
        Self {
            key: key.into(),
            expected,
        }
    }

    /// Checks the rule against already extracted values. A missing or
    /// empty value never matches.
    #[must_use]
    pub fn check(&self, extracted: &IndexMap<String, Option<String>>) -> Option<ContextPair> {
        let value = extracted.get(&self.key)?.as_deref()?;
        let matched = match &self.expected {
            Expectation::Flag(expected) => *expected,
            other => other.accepts(value),
        };
        matched.then(|| (self.key.clone(), Some(value.to_string())))
    }
}

/// All lexicon tests of a condition plus the expressions they read.
#[derive(Clone, Debug)]
pub struct LexiconRuleSet {
    xpath: IndexMap<String, String>,
    rules: Vec<LexRule>,
}

impl Default for LexiconRuleSet {
    fn default() -> Self {
        let mut xpath = IndexMap::new();
        xpath.insert("lemma".to_string(), LEMMA_EXPR.to_string());
        Self {
            xpath,
            rules: Vec::new(),
        }
    }
}

impl LexiconRuleSet {
    /// Reads the `lexicon` section of a condition. `XPATH` names the
    /// extraction expressions; every other key is a [`LexRule`].
    ///
    /// # Errors
    /// Returns `RuleFileSyntax` for non-string keys or expressions, or a
    /// bad expectation.
    pub fn from_yaml(section: &serde_yaml::Mapping, path: &Path) -> Result<Self> {
        let mut xpath = IndexMap::new();
        let mut rules = Vec::new();

        for (key, value) in section {
            let key = key
                .as_str()
                .ok_or_else(|| Error::rule_syntax(path, "lexicon keys must be strings"))?;
            if key == "XPATH" {
                let Some(exprs) = value.as_mapping() else {
                    return Err(Error::rule_syntax(path, "`XPATH` must be a mapping"));
                };
                for (name, expr) in exprs {
                    match (name.as_str(), expr.as_str()) {
                        (Some(name), Some(expr)) => {
                            xpath.insert(name.to_string(), expr.to_string());
                        }
                        _ => return Err(Error::rule_syntax(path, "`XPATH` entries must be strings")),
                    }
                }
                continue;
            }
            rules.push(LexRule::new(key, Expectation::from_yaml(value, key, path)?));
        }

        xpath.insert("lemma".to_string(), LEMMA_EXPR.to_string());
        Ok(Self { xpath, rules })
    }

    /// Evaluates every expression against the node.
    #[must_use]
    pub fn extract(&self, node: &dyn EntryNode) -> IndexMap<String, Option<String>> {
        self.xpath
            .iter()
            .map(|(key, expr)| (key.clone(), node.evaluate_normalized(expr)))
            .collect()
    }

    /// The lexicon rules.
    #[must_use]
    pub fn rules(&self) -> &[LexRule] {
        &self.rules
    }
}

impl Comparator for LexiconRuleSet {
    fn compare(&self, node: Option<&dyn EntryNode>, _analyses: &[Lemma]) -> Result<Comparison> {
        let Some(node) = node else {
            return Ok(Comparison::failed());
        };
        let extracted = self.extract(node);

        let checks: Vec<Option<ContextPair>> = self.rules.iter().map(|r| r.check(&extracted)).collect();
        let matched = checks.iter().all(Option::is_some);

        let mut context: Vec<ContextPair> = checks.into_iter().flatten().collect();
        context.extend(extracted);
        Ok(Comparison { matched, context })
    }
}
