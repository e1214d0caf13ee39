//! Locating a section of a page body by heading anchor.
//!
//! Sections are delimited by ATX (`#`) headings. An anchor matches a
//! heading when their slugified forms are equal, so `"past-exams"`
//! matches `## Past exams`. The located range starts on the line AFTER
//! the matched heading and runs to the next heading of equal or higher
//! level, or to the end of the document.

use std::ops::Range;

use crate::error::StoreError;

/// Find the half-open line range `[start, end)` of the section whose
/// heading matches `anchor`.
///
/// Returns `SectionNotFound` when no heading matches — including for a
/// document with no headings at all; `(0, 0)` is never a silent success.
pub fn locate(lines: &[&str], anchor: &str) -> Result<Range<usize>, StoreError> {
    let wanted = slugify(anchor);

    let mut found: Option<(usize, usize)> = None;
    for (idx, line) in lines.iter().enumerate() {
        if let Some((level, text)) = parse_heading(line) {
            if slugify(text) == wanted {
                found = Some((idx, level));
                break;
            }
        }
    }

    let (heading_idx, level) = match found {
        Some(hit) => hit,
        None => return Err(StoreError::SectionNotFound(anchor.to_string())),
    };

    let start = heading_idx + 1;
    let end = lines
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, line)| matches!(parse_heading(line), Some((l, _)) if l <= level))
        .map(|(idx, _)| idx)
        .unwrap_or(lines.len());

    Ok(start..end)
}

/// Parse an ATX heading line into (level, heading text).
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    // `#text` without a space is not a heading.
    if !rest.starts_with(' ') && !rest.is_empty() {
        return None;
    }
    Some((level, rest.trim()))
}

/// Lower-case and collapse non-alphanumeric runs into single dashes.
fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            for lower in c.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    out
}
