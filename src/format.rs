//! Lint-mode re-serialization of manifests under a fixed style policy.
//!
//! Style rules, applied by the key a scalar sits under:
//! - `name` values are double-quoted;
//! - other strings containing a newline use literal block style;
//! - `uses` values that are reusable references are single-quoted;
//! - `description` values are single-quoted;
//! - everything else is plain when it reads back as the same string, and
//!   quoted otherwise.
//!
//! Mapping order is kept as written and every `${{ expr }}` is normalized to
//! one space inside each delimiter. Formatting its own output is a no-op.
use crate::error::ManifestError;
use crate::manifest::{Manifest, ManifestKind, StrictLoader};
use crate::validate::{validate, ValidationReport};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

const INDENT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOutcome {
    pub text: String,
    pub report: ValidationReport,
}

/// Validate and re-serialize manifest text.
pub fn format_manifest(text: &str, kind: ManifestKind) -> Result<FormatOutcome, ManifestError> {
    let document = normalize_mapping(StrictLoader.load_mapping(text)?);
    let formatted = emit_document(&document)?;
    let report = validate(&Manifest::new_of_kind(document, kind));
    Ok(FormatOutcome {
        text: formatted,
        report,
    })
}

fn expression_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{\{\s*([^}]*)\s*\}\}").expect("expression regex"))
}

/// Rewrite `${{expr}}` with any inner spacing to `${{ expr }}`.
pub fn normalize_expressions(text: &str) -> String {
    expression_re()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("${{{{ {} }}}}", caps[1].trim())
        })
        .into_owned()
}

fn normalize_mapping(mapping: Mapping) -> Mapping {
    mapping
        .into_iter()
        .map(|(key, value)| (normalize_value(key), normalize_value(value)))
        .collect()
}

fn normalize_value(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(normalize_expressions(&text)),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(normalize_value).collect()),
        Value::Mapping(mapping) => Value::Mapping(normalize_mapping(mapping)),
        Value::Tagged(mut tagged) => {
            tagged.value = normalize_value(tagged.value);
            Value::Tagged(tagged)
        }
        other => other,
    }
}

/// Serialize a document mapping in block style.
pub fn emit_document(document: &Mapping) -> Result<String, ManifestError> {
    if document.is_empty() {
        return Ok("{}\n".to_string());
    }
    let mut emitter = Emitter::default();
    emitter.mapping(document, 0, "")?;
    Ok(emitter.out)
}

#[derive(Default)]
struct Emitter {
    out: String,
}

/// Where a value is written: after `key:` or after a sequence dash.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Key,
    Item,
}

impl Emitter {
    fn mapping(&mut self, mapping: &Mapping, indent: usize, path: &str) -> Result<(), ManifestError> {
        let pad = " ".repeat(indent);
        for (key, value) in mapping {
            let key_text = key_scalar(key, path)?;
            let child_path = format!("{path}/{key_text}");
            let header = format!("{pad}{key_text}:");
            let key_name = key.as_str();
            self.value(&header, Slot::Key, key_name, value, indent, &child_path)?;
        }
        Ok(())
    }

    fn sequence(&mut self, items: &[Value], indent: usize, path: &str) -> Result<(), ManifestError> {
        let pad = " ".repeat(indent);
        for (idx, item) in items.iter().enumerate() {
            let header = format!("{pad}-");
            self.value(&header, Slot::Item, None, item, indent, &format!("{path}[{idx}]"))?;
        }
        Ok(())
    }

    /// Write `value` after `header`; `indent` is the column of the header.
    fn value(
        &mut self,
        header: &str,
        slot: Slot,
        key: Option<&str>,
        value: &Value,
        indent: usize,
        path: &str,
    ) -> Result<(), ManifestError> {
        let child = indent + INDENT;
        match value {
            Value::Mapping(mapping) if mapping.is_empty() => self.line(&format!("{header} {{}}")),
            Value::Sequence(items) if items.is_empty() => self.line(&format!("{header} []")),
            Value::Mapping(mapping) => {
                let mut nested = Emitter::default();
                nested.mapping(mapping, child, path)?;
                self.nested(header, slot, child, &nested.out);
            }
            Value::Sequence(items) => {
                let mut nested = Emitter::default();
                nested.sequence(items, child, path)?;
                self.nested(header, slot, child, &nested.out);
            }
            Value::Tagged(tagged) => {
                let header = format!("{header} {}", tagged.tag);
                self.value(&header, Slot::Key, key, &tagged.value, indent, path)?;
            }
            Value::Null => match slot {
                Slot::Key => self.line(header),
                Slot::Item => self.line(&format!("{header} null")),
            },
            Value::Bool(flag) => self.line(&format!("{header} {flag}")),
            Value::Number(number) => self.line(&format!("{header} {number}")),
            Value::String(text) => match string_style(key, text) {
                Style::Literal => self.literal(header, text, child),
                style => self.line(&format!("{header} {}", quote(text, style))),
            },
        }
        Ok(())
    }

    /// Block collections go on the following lines; inside a sequence item
    /// the first nested line shares the dash line.
    fn nested(&mut self, header: &str, slot: Slot, child: usize, block: &str) {
        match slot {
            Slot::Key => {
                self.line(header);
                self.out.push_str(block);
            }
            Slot::Item => {
                self.out.push_str(header);
                self.out.push(' ');
                self.out.push_str(&block[child..]);
            }
        }
    }

    fn literal(&mut self, header: &str, text: &str, child: usize) {
        let body = text.trim_end_matches('\n');
        let trailing = text.len() - body.len();
        let chomp = match trailing {
            0 => "-",
            1 => "",
            _ => "+",
        };
        self.line(&format!("{header} |{chomp}"));
        let pad = " ".repeat(child);
        for line in body.split('\n') {
            if line.is_empty() {
                self.out.push('\n');
            } else {
                self.line(&format!("{pad}{line}"));
            }
        }
        for _ in 1..trailing {
            self.out.push('\n');
        }
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }
}

fn key_scalar(key: &Value, path: &str) -> Result<String, ManifestError> {
    match key {
        Value::String(text) => {
            let style = if text.contains('\n') {
                Style::DoubleQuoted
            } else {
                default_style(text)
            };
            Ok(quote(text, style))
        }
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
            let path = if path.is_empty() { "/" } else { path };
            Err(ManifestError::UnsupportedKey(path.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
}

fn string_style(key: Option<&str>, text: &str) -> Style {
    if key == Some("name") {
        return Style::DoubleQuoted;
    }
    if text.contains('\n') {
        return if literal_safe(text) {
            Style::Literal
        } else {
            Style::DoubleQuoted
        };
    }
    match key {
        Some("uses") if crate::validate::is_reusable_reference(text) => single_or_double(text),
        Some("description") => single_or_double(text),
        _ => default_style(text),
    }
}

fn default_style(text: &str) -> Style {
    if plain_safe(text) {
        Style::Plain
    } else {
        single_or_double(text)
    }
}

fn single_or_double(text: &str) -> Style {
    if text.chars().any(|ch| ch.is_control() || is_line_break(ch)) {
        Style::DoubleQuoted
    } else {
        Style::SingleQuoted
    }
}

/// Plain when the text has no YAML indicators and loads back unchanged.
fn plain_safe(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    if text.chars().any(|ch| ch.is_control() || is_line_break(ch)) {
        return false;
    }
    if first.is_whitespace() || text.ends_with(char::is_whitespace) {
        return false;
    }
    if "[]{},#&*!|>'\"%@`".contains(first) {
        return false;
    }
    if "-?:".contains(first) {
        match text.chars().nth(1) {
            None | Some(' ') => return false,
            Some(_) => {}
        }
    }
    if text.contains(": ") || text.contains(" #") || text.ends_with(':') {
        return false;
    }
    matches!(
        StrictLoader.load_value(text),
        Ok(Value::String(ref loaded)) if loaded == text
    )
}

fn literal_safe(text: &str) -> bool {
    let first_line = text.split('\n').find(|line| !line.is_empty());
    let Some(first_line) = first_line else {
        return false;
    };
    if first_line.starts_with(char::is_whitespace) {
        return false;
    }
    text.split('\n')
        .all(|line| {
            !line
                .chars()
                .any(|ch| (ch.is_control() && ch != '\t') || is_line_break(ch))
                && !is_blank(line)
        })
}

/// YAML line breaks besides `\n`; written raw they split a scalar.
fn is_line_break(ch: char) -> bool {
    matches!(ch, '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn is_blank(line: &str) -> bool {
    !line.is_empty() && line.chars().all(char::is_whitespace)
}

fn quote(text: &str, style: Style) -> String {
    match style {
        Style::Plain | Style::Literal => text.to_string(),
        Style::SingleQuoted => format!("'{}'", text.replace('\'', "''")),
        Style::DoubleQuoted => {
            let mut out = String::with_capacity(text.len() + 2);
            out.push('"');
            for ch in text.chars() {
                match ch {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    '\r' => out.push_str("\\r"),
                    '\0' => out.push_str("\\0"),
                    '\u{85}' => out.push_str("\\N"),
                    '\u{2028}' => out.push_str("\\L"),
                    '\u{2029}' => out.push_str("\\P"),
                    ch if ch.is_control() => {
                        let code = u32::from(ch);
                        if code <= 0xff {
                            out.push_str(&format!("\\x{code:02x}"));
                        } else {
                            out.push_str(&format!("\\u{code:04x}"));
                        }
                    }
                    ch => out.push(ch),
                }
            }
            out.push('"');
            out
        }
    }
}
