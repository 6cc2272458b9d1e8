//! Rule file parsing.
//!
//! A rule file is a YAML header and a template body separated by the first
//! `--`:
//!
//! ```text
//! name: "Regular nouns"
//! morphology:
//!   pos: N
//! --
//! {{ lemma }}
//! ```
//!
//! Files where either half is empty are skipped.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fstlex_foundation::{Error, Result};
use serde_yaml::{Mapping, Value};

use crate::condition::{ParadigmRuleSet, is_truthy};

const SEPARATOR: &str = "--";

/// The body of a rule file, handed to the template renderer unparsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    /// The trimmed template source.
    pub source: String,
    /// The declared `layout.type`, used to order layouts.
    pub display_type: Option<String>,
}

/// One parsed `.paradigm` or `.layout` file.
#[derive(Debug)]
pub struct ParadigmRule {
    /// The header's `name`.
    pub name: Option<String>,
    /// The header's `desc`, or empty.
    pub description: String,
    /// The compiled condition.
    pub condition: ParadigmRuleSet,
    /// The template body.
    pub template: Template,
    /// Where the rule was read from.
    pub path: PathBuf,
    /// The file name, used by layouts to reference a paradigm.
    pub basename: String,
    /// Modification time when read, if known.
    pub modified: Option<SystemTime>,
}

impl ParadigmRule {
    /// The key layouts are ordered by: declared display type, else path.
    #[must_use]
    pub fn display_order_key(&self) -> String {
        self.template
            .display_type
            .clone()
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

fn split_rule_text(text: &str) -> Option<(&str, &str)> {
    let (header, body) = text.split_once(SEPARATOR)?;
    if header.is_empty() || body.is_empty() {
        return None;
    }
    Some((header, body))
}

fn parse_header(header: &str, path: &Path) -> Result<Mapping> {
    let value: Value = serde_yaml::from_str(header).map_err(|e| Error::rule_syntax(path, e.to_string()))?;
    match value {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(Error::rule_syntax(path, "the rule header must be a mapping")),
    }
}

fn build_rule(definition: Mapping, body: &str, path: &Path) -> Result<ParadigmRule> {
    let name = definition.get("name").and_then(Value::as_str).map(String::from);
    let description = definition
        .get("desc")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let display_type = definition
        .get("layout")
        .and_then(|layout| layout.get("type"))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(String::from);
    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(ParadigmRule {
        name,
        description,
        condition: ParadigmRuleSet::from_definition(definition, path)?,
        template: Template {
            source: body.trim().to_string(),
            display_type,
        },
        path: path.to_path_buf(),
        basename,
        modified: None,
    })
}

/// Parses a `.paradigm` file's text.
///
/// Returns `Ok(None)` if the text has no header or no body.
///
/// # Errors
/// Returns `RuleFileSyntax` if the header is not valid YAML or has the
/// wrong shape.
pub fn parse_paradigm_str(text: &str, path: &Path) -> Result<Option<ParadigmRule>> {
    let Some((header, body)) = split_rule_text(text) else {
        return Ok(None);
    };
    let definition = parse_header(header, path)?;
    build_rule(definition, body, path).map(Some)
}

/// Parses a `.layout` file's text.
///
/// A header with `paradigm: <basename>` borrows the `morphology` and
/// `lexicon` sections of that paradigm rule.
///
/// # Errors
/// Returns `RuleFileSyntax` for a bad header and `RuleReference` if the
/// referenced paradigm is not among `paradigms`.
pub fn parse_layout_str<R>(text: &str, path: &Path, paradigms: &[R]) -> Result<Option<ParadigmRule>>
where
    R: AsRef<ParadigmRule>,
{
    let Some((header, body)) = split_rule_text(text) else {
        return Ok(None);
    };
    let mut definition = parse_header(header, path)?;

    if let Some(reference) = definition.get("paradigm").cloned() {
        let reference = match &reference {
            Value::String(s) => s.clone(),
            other => serde_yaml::to_string(other).unwrap_or_default().trim().to_string(),
        };
        let Some(base) = paradigms.iter().map(AsRef::as_ref).find(|p| p.basename == reference) else {
            return Err(Error::rule_reference(path, reference));
        };
        for section in ["lexicon", "morphology"] {
            if let Some(value) = base.condition.definition().get(section).filter(|v| is_truthy(v)) {
                definition.insert(Value::from(section), value.clone());
            }
        }
    }

    build_rule(definition, body, path).map(Some)
}

fn read_text(path: &Path) -> Result<(String, Option<SystemTime>)> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok();
    Ok((text, modified))
}

/// Reads and parses a `.paradigm` file.
///
/// # Errors
/// Returns `Io` if the file cannot be read, or any [`parse_paradigm_str`] error.
pub fn read_paradigm_file(path: &Path) -> Result<Option<ParadigmRule>> {
    let (text, modified) = read_text(path)?;
    Ok(parse_paradigm_str(&text, path)?.map(|rule| ParadigmRule { modified, ..rule }))
}

/// Reads and parses a `.layout` file.
///
/// # Errors
/// Returns `Io` if the file cannot be read, or any [`parse_layout_str`] error.
pub fn read_layout_file<R: AsRef<ParadigmRule>>(path: &Path, paradigms: &[R]) -> Result<Option<ParadigmRule>> {
    let (text, modified) = read_text(path)?;
    Ok(parse_layout_str(&text, path, paradigms)?.map(|rule| ParadigmRule { modified, ..rule }))
}
