//! Expression and dotted-reference extraction over serialized manifest text.
use regex::Regex;
use serde_yaml::Mapping;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Identifiers recognized as the root of a `${{ }}` expression: runtime
/// contexts plus built-in functions.
pub const KNOWN_CONTEXT_ROOTS: &[&str] = &[
    "github",
    "env",
    "secrets",
    "vars",
    "runner",
    "job",
    "steps",
    "needs",
    "matrix",
    "strategy",
    "inputs",
    "hashFiles",
    "fromJSON",
    "toJSON",
    "always",
    "cancelled",
    "success",
    "failure",
    "format",
    "startsWith",
    "endsWith",
    "contains",
    "join",
];

/// References found in one manifest; sets iterate in lexicographic order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub context_roots: BTreeSet<String>,
    pub secret_names: BTreeSet<String>,
    pub var_names: BTreeSet<String>,
}

fn expression_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{\{\s*([^}]+)\s*\}\}").expect("expression regex"))
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\b").expect("token regex"))
}

fn secrets_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"secrets\.([A-Za-z_][A-Za-z0-9_]*)").expect("secrets regex"))
}

fn vars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"vars\.([A-Za-z_][A-Za-z0-9_]*)").expect("vars regex"))
}

/// Scan raw text for expression roots and `secrets.NAME` / `vars.NAME`
/// references.
///
/// Dotted references are matched across the whole text, not only inside
/// expressions, so prose that mentions `secrets.FOO` is reported too.
pub fn scan(raw: &str) -> ScanResult {
    let mut result = ScanResult::default();
    for expr in expressions(raw) {
        if let Some(root) = context_root(expr) {
            result.context_roots.insert(root.to_string());
        }
    }
    result.secret_names = dotted_refs(secrets_re(), raw);
    result.var_names = dotted_refs(vars_re(), raw);
    result
}

/// Scan a whole document and merge in names declared under
/// `on.workflow_call.secrets`.
pub fn scan_document(document: &Mapping, declared_secrets: &[String]) -> ScanResult {
    let mut result = scan(&serialize_for_scan(document));
    result.secret_names.extend(declared_secrets.iter().cloned());
    result
}

/// Inner text of every `${{ ... }}` occurrence.
pub fn expressions(raw: &str) -> impl Iterator<Item = &str> {
    expression_re()
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// First identifier in `expr` that is a known root; at most one per expression.
pub fn context_root(expr: &str) -> Option<&'static str> {
    token_re().find_iter(expr).find_map(|token| {
        KNOWN_CONTEXT_ROOTS
            .iter()
            .copied()
            .find(|root| *root == token.as_str())
    })
}

fn dotted_refs(re: &Regex, raw: &str) -> BTreeSet<String> {
    re.captures_iter(raw)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Pretty JSON keeps one value per line so every string is searchable.
fn serialize_for_scan(document: &Mapping) -> String {
    serde_json::to_string_pretty(document)
        .or_else(|_| serde_yaml::to_string(document))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::StrictLoader;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn extracts_roots_and_secrets_with_loose_spacing() {
        let result = scan("token: ${{ secrets.TOKEN }}\nsha: ${{   github.sha}}\n");
        assert_eq!(result.context_roots, set(&["github", "secrets"]));
        assert_eq!(result.secret_names, set(&["TOKEN"]));
        assert!(result.var_names.is_empty());
    }

    #[test]
    fn root_is_first_known_identifier() {
        assert_eq!(context_root("  always() && steps.build.outcome"), Some("always"));
        assert_eq!(context_root("foo.bar || matrix.os"), Some("matrix"));
        assert_eq!(context_root("'literal'"), None);
    }

    #[test]
    fn expression_without_known_root_contributes_nothing() {
        let result = scan("x: ${{ 1 + 2 }}\ny: ${{ custom.value }}\n");
        assert!(result.context_roots.is_empty());
    }

    #[test]
    fn dotted_refs_are_matched_outside_expressions() {
        let result = scan("description: set secrets.DOC_ONLY and vars.REGION first\n");
        assert_eq!(result.secret_names, set(&["DOC_ONLY"]));
        assert_eq!(result.var_names, set(&["REGION"]));
        assert!(result.context_roots.is_empty());
    }

    #[test]
    fn document_scan_merges_declared_secrets() {
        let doc = StrictLoader
            .load_mapping(
                "on:\n  workflow_call:\n    secrets:\n      DEPLOY_KEY: {}\njobs:\n  a:\n    steps:\n      - run: echo ${{ secrets.API_TOKEN }} ${{ vars.ZONE }}\n",
            )
            .expect("parse");
        let result = scan_document(&doc, &["DEPLOY_KEY".to_string()]);
        assert_eq!(result.secret_names, set(&["API_TOKEN", "DEPLOY_KEY"]));
        assert_eq!(result.var_names, set(&["ZONE"]));
        assert_eq!(result.context_roots, set(&["secrets", "vars"]));
    }
}
