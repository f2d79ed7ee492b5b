/// Placeholder for an empty or absent section.
pub const NONE: &str = "_None_";

/// Two-column table; the first column is back-ticked and newlines in the
/// second become `<br/>`.
pub(crate) fn to_table(rows: &[(String, String)], headers: (&str, &str)) -> String {
    if rows.is_empty() {
        return NONE.to_string();
    }
    let mut lines = vec![
        format!("| {} | {} |", headers.0, headers.1),
        "|---|---|".to_string(),
    ];
    for (key, value) in rows {
        lines.push(format!("| `{}` | {} |", escape_cell(key), escape_cell(value)));
    }
    lines.join("\n")
}

/// Bulleted list of back-ticked items.
pub(crate) fn code_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let lines: Vec<String> = items.into_iter().map(|item| format!("- `{item}`")).collect();
    if lines.is_empty() {
        return NONE.to_string();
    }
    lines.join("\n")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br/>")
}
