//! Line-oriented extraction from work item Markdown.
//!
//! Every function here is total: malformed or missing input yields an empty
//! map or `None`, never an error. Sections are located by exact heading text
//! (e.g. `"## Context"`) rather than by a Markdown parse, since the document
//! templates fix the heading strings.

use crate::models::Frontmatter;

const FRONTMATTER_DELIMITER: &str = "---";
const UNCHECKED_MARKER: &str = "- [ ]";

/// Split on `\n`, dropping a trailing `\r` from each line.
fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Parse the `---` delimited preamble into a flat map.
///
/// Only `key: value` lines with a bare-word key (`[A-Za-z0-9_]+`) are kept.
/// Values are trimmed, lose a trailing ` #comment`, then one pair of
/// surrounding double or single quotes. A repeated key keeps its last value.
pub fn parse_frontmatter(text: &str) -> Frontmatter {
    let mut data = Frontmatter::new();
    let all: Vec<&str> = lines(text).collect();
    if all.len() < 2 || all[0].trim() != FRONTMATTER_DELIMITER {
        return data;
    }

    for line in &all[1..] {
        if line.trim() == FRONTMATTER_DELIMITER {
            break;
        }
        if let Some((key, value)) = parse_key_value(line) {
            data.insert(key.to_string(), value);
        }
    }

    data
}

fn parse_key_value(line: &str) -> Option<(&str, String)> {
    let (key, rest) = line.split_once(':')?;
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let mut value = rest.trim();
    if let Some(idx) = value.find(" #") {
        value = value[..idx].trim();
    }
    let value = strip_quotes(value, '"');
    let value = strip_quotes(value, '\'');
    Some((key, value.to_string()))
}

fn strip_quotes(value: &str, quote: char) -> &str {
    if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Walks the lines belonging to the section opened by `heading`.
///
/// The section starts after a line that trims to exactly `heading` and ends
/// at the next line starting with `#` (other than a repeat of `heading`).
fn section_lines<'a>(text: &'a str, heading: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let mut in_section = false;
    lines(text)
        .map(str::trim)
        .map_while(move |trimmed| {
            if trimmed.starts_with('#') {
                if trimmed == heading {
                    in_section = true;
                    return Some(None);
                }
                if in_section {
                    return None;
                }
            }
            Some(in_section.then_some(trimmed))
        })
        .flatten()
}

/// First substantive line under `heading`, without a leading `- ` or `* `.
///
/// Blank lines and HTML comment lines (`<!-- ... -->`) are skipped.
pub fn first_line_under_heading(text: &str, heading: &str) -> Option<String> {
    section_lines(text, heading)
        .find(|line| !line.is_empty() && !line.starts_with("<!--"))
        .map(|line| {
            let stripped = line
                .strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .map(str::trim)
                .unwrap_or(line);
            stripped.to_string()
        })
}

/// Text of the first `- [ ]` checklist item under `heading`.
pub fn first_unchecked_item(text: &str, heading: &str) -> Option<String> {
    section_lines(text, heading)
        .find(|line| line.starts_with(UNCHECKED_MARKER))
        .map(|line| line[UNCHECKED_MARKER.len()..].trim_start().to_string())
}

/// First non-blank line of the document with any leading `#` run stripped.
pub fn first_heading_or_line(text: &str) -> Option<String> {
    lines(text)
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches('#').trim_start().to_string())
}

/// Make `text` safe for a single Markdown table cell: escape `|`, collapse
/// whitespace runs (newlines included) to one space, and trim.
pub fn escape_table_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
