//! Text-to-list parsing for free-form model output.
//!
//! Two parsers, each with a fixed fallback order:
//!
//! [`parse_list_items`] works line by line. A trimmed, non-empty line is
//! stripped of a `- ` or `* ` bullet, a leading enumeration (`1.`, `2)`) or
//! a `Q:` prefix, in that order of precedence; any other line is kept as is.
//!
//! [`parse_synonym_list`] first removes a Markdown code fence, then tries a
//! JSON array, then treats any other valid JSON as "no items", and finally
//! falls back to splitting on commas.

use serde_json::Value;

/// Split model output into one item per meaningful line.
#[must_use]
pub fn parse_list_items(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_list_marker)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a synonym list the model was asked to return as a JSON array.
#[must_use]
pub fn parse_synonym_list(text: &str) -> Vec<String> {
    let body = strip_code_fence(text.trim());
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_owned(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Ok(_) => Vec::new(),
        Err(_) => body
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
    }
}

fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest.trim();
    }
    if line.starts_with(|c: char| c.is_ascii_digit()) {
        let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim();
        }
        // A line that merely starts with a number ("3 groups were ...").
        return line;
    }
    if let Some(rest) = line.strip_prefix("Q:") {
        return rest.trim();
    }
    line
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an info string such as `json` on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
#[path = "list_parse_test.rs"]
mod tests;
