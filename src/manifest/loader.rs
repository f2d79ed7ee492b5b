//! Strict YAML loading for manifests.
use crate::error::ManifestError;
use serde_yaml::{Mapping, Value};
use std::borrow::Cow;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Scalar resolution rules used whenever a manifest is read.
///
/// Booleans resolve only from the `true`/`false` literals, in any letter
/// case, when written as untagged plain scalars; quoted `'tRuE'` stays a
/// string. `yes`, `no`, `on`, `off`, `y` and `n` stay strings,
/// so the top-level `on:` key of a workflow is always the string `"on"`.
/// Every call site that reads manifest text goes through this type instead of
/// calling the YAML library directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictLoader;

impl StrictLoader {
    /// Parse one YAML document that must be a mapping; an empty document is
    /// an empty mapping.
    pub fn load_mapping(&self, text: &str) -> Result<Mapping, ManifestError> {
        match self.load_value(text)? {
            Value::Mapping(mapping) => Ok(mapping),
            Value::Null => Ok(Mapping::new()),
            _ => Err(ManifestError::NotAMapping),
        }
    }

    /// Parse one YAML document of any shape.
    pub fn load_value(&self, text: &str) -> Result<Value, ManifestError> {
        if is_blank_document(text) {
            return Ok(Value::Null);
        }
        let value: Value = serde_yaml::from_str(&canonical_booleans(text))?;
        Ok(value)
    }
}

/// Plain scalars spelling `true`/`false` in a case serde_yaml does not
/// resolve, recorded as (char offset, canonical literal).
#[derive(Default)]
struct PlainBooleans {
    found: Vec<(usize, &'static str)>,
}

impl MarkedEventReceiver for PlainBooleans {
    fn on_event(&mut self, event: Event, mark: Marker) {
        let Event::Scalar(value, TScalarStyle::Plain, _, None) = event else {
            return;
        };
        let literal = if value.eq_ignore_ascii_case("true") {
            "true"
        } else if value.eq_ignore_ascii_case("false") {
            "false"
        } else {
            return;
        };
        if value != literal {
            self.found.push((mark.index(), literal));
        }
    }
}

/// Rewrite mixed-case plain booleans to lowercase in place. Replacements keep
/// the text length, so every other scalar is read exactly as written. Text
/// the event parser rejects is passed through for serde_yaml to report.
fn canonical_booleans(text: &str) -> Cow<'_, str> {
    let mut booleans = PlainBooleans::default();
    let mut parser = Parser::new_from_str(text);
    if parser.load(&mut booleans, false).is_err() || booleans.found.is_empty() {
        return Cow::Borrowed(text);
    }
    let offsets: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
    let mut out = text.to_string();
    for (index, literal) in booleans.found {
        let Some(&start) = offsets.get(index) else {
            continue;
        };
        let end = start + literal.len();
        if out
            .get(start..end)
            .is_some_and(|written| written.eq_ignore_ascii_case(literal))
        {
            out.replace_range(start..end, literal);
        }
    }
    Cow::Owned(out)
}

fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}
