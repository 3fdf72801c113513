// src/analyze/list_items.rs
//! Numbered-list extraction (`1. Foo`, `2. **Bar**:`) from generated answers.
//!
//! A marker is `<digits>.` followed by whitespace. Markers count when they start a
//! line (after indentation) or, inline, when the same line carries a consecutive
//! neighbour marker, so `Top picks: 1. Acme 2. Globex` is read as a list while
//! `it costs 5. Then` is not.
//!
//! Item content runs to the end of the line or to the next accepted marker. Up to 3
//! leading/trailing emphasis markers (`*`, `_`) and one trailing colon are stripped.

use std::collections::HashSet;

use serde::Serialize;

/// Maximum emphasis characters stripped from each side of an item.
const MAX_EMPHASIS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub number: usize,
    /// Lowercased, markdown-stripped content.
    pub content: String,
    /// Byte offset of the marker in the scanned text.
    pub start_index: usize,
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    start: usize,
    number: usize,
    content_start: usize,
    at_line_start: bool,
}

/// Extract numbered items in document order, one per list number.
pub fn extract_list_items(text: &str) -> Vec<ListItem> {
    let mut items = Vec::new();
    let mut offset = 0;

    for raw_line in text.split_inclusive('\n') {
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let markers = scan_markers(line);

        let accepted: Vec<Marker> = markers
            .iter()
            .enumerate()
            .filter(|(k, m)| m.at_line_start || has_consecutive_neighbour(&markers, *k))
            .map(|(_, m)| *m)
            .collect();

        for (k, m) in accepted.iter().enumerate() {
            let content_end = accepted.get(k + 1).map(|n| n.start).unwrap_or(line.len());
            let content = clean_content(&line[m.content_start..content_end]);
            if content.is_empty() {
                continue;
            }
            items.push(ListItem {
                number: m.number,
                content,
                start_index: offset + m.start,
            });
        }

        offset += raw_line.len();
    }

    dedup_by_number(items)
}

/// Items are sorted by offset; a repeated number (the same item matched twice, or a
/// later list restarting its numbering) keeps its first instance.
fn dedup_by_number(mut items: Vec<ListItem>) -> Vec<ListItem> {
    items.sort_by_key(|it| it.start_index);
    let mut seen = HashSet::with_capacity(items.len());
    items.retain(|it| seen.insert(it.number));
    items
}

fn has_consecutive_neighbour(markers: &[Marker], k: usize) -> bool {
    let n = markers[k].number;
    let prev = k
        .checked_sub(1)
        .and_then(|p| markers.get(p))
        .is_some_and(|p| p.number.checked_add(1) == Some(n));
    let next = markers
        .get(k + 1)
        .is_some_and(|x| n.checked_add(1) == Some(x.number));
    prev || next
}

/// Find every `<digits>.<whitespace>` marker on a single line.
fn scan_markers(line: &str) -> Vec<Marker> {
    let bytes = line.as_bytes();
    let indent = line.len() - line.trim_start().len();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let starts_token = i == indent || (i > 0 && bytes[i - 1].is_ascii_whitespace());
        if !bytes[i].is_ascii_digit() || !starts_token {
            i += 1;
            continue;
        }

        let digits_end = i + bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
        let is_marker = bytes.get(digits_end) == Some(&b'.')
            && bytes
                .get(digits_end + 1)
                .is_some_and(|b| b.is_ascii_whitespace());

        if is_marker {
            if let Ok(number) = line[i..digits_end].parse::<usize>() {
                if number >= 1 {
                    out.push(Marker {
                        start: i,
                        number,
                        content_start: digits_end + 1,
                        at_line_start: i == indent,
                    });
                }
            }
        }
        i = digits_end.max(i + 1);
    }

    out
}

fn clean_content(raw: &str) -> String {
    let mut s = strip_leading_emphasis(raw.trim());
    s = strip_trailing_emphasis(s.trim_end());
    if let Some(rest) = s.strip_suffix(':') {
        s = strip_trailing_emphasis(rest.trim_end());
    }
    s.trim().to_lowercase()
}

fn is_emphasis(c: char) -> bool {
    matches!(c, '*' | '_')
}

fn strip_leading_emphasis(s: &str) -> &str {
    let n = s.chars().take(MAX_EMPHASIS).take_while(|c| is_emphasis(*c)).count();
    &s[n..]
}

fn strip_trailing_emphasis(s: &str) -> &str {
    let n = s
        .chars()
        .rev()
        .take(MAX_EMPHASIS)
        .take_while(|c| is_emphasis(*c))
        .count();
    &s[..s.len() - n]
}
