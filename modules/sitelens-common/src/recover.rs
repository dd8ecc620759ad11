//! Staged recovery for free-form structured text returned by upstream
//! collaborators (search/LLM-backed lookups that wrap, truncate or mangle JSON).
//!
//! Stages, tried in order:
//! 1. strict parse
//! 2. strip code-fence / prose wrapper
//! 3. balance unclosed strings and brackets, retry
//! 4. best-effort per-record extraction of balanced `{...}` objects

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::SiteLensError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Strict,
    Unwrapped,
    Balanced,
    PerRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recovered<T> {
    pub value: T,
    pub stage: ParseStage,
}

/// Recover a single JSON object.
pub fn parse_object<T: DeserializeOwned>(raw: &str) -> Result<Recovered<T>, SiteLensError> {
    if let Some(recovered) = parse_whole(raw) {
        return Ok(recovered);
    }

    let body = unwrap(raw);
    for candidate in balanced_objects(body) {
        if let Ok(value) = serde_json::from_str::<T>(candidate) {
            debug!("Recovered object by per-record extraction");
            return Ok(Recovered {
                value,
                stage: ParseStage::PerRecord,
            });
        }
    }

    Err(SiteLensError::MalformedUpstream(format!(
        "no parseable object in {} bytes of upstream text",
        raw.len()
    )))
}

/// Recover a list of records. Individual records that fail to parse are skipped.
pub fn parse_records<T: DeserializeOwned>(raw: &str) -> Result<Recovered<Vec<T>>, SiteLensError> {
    if let Some(recovered) = parse_whole(raw) {
        return Ok(recovered);
    }

    let body = unwrap(raw);
    let records: Vec<T> = balanced_objects(body)
        .into_iter()
        .filter_map(|candidate| serde_json::from_str(candidate).ok())
        .collect();

    if records.is_empty() {
        return Err(SiteLensError::MalformedUpstream(format!(
            "no parseable records in {} bytes of upstream text",
            raw.len()
        )));
    }

    debug!(count = records.len(), "Recovered records by per-record extraction");
    Ok(Recovered {
        value: records,
        stage: ParseStage::PerRecord,
    })
}

fn parse_whole<T: DeserializeOwned>(raw: &str) -> Option<Recovered<T>> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Some(Recovered {
            value,
            stage: ParseStage::Strict,
        });
    }

    let body = unwrap(raw);
    if let Ok(value) = serde_json::from_str(body) {
        return Some(Recovered {
            value,
            stage: ParseStage::Unwrapped,
        });
    }

    let balanced = balance(body);
    if let Ok(value) = serde_json::from_str(&balanced) {
        return Some(Recovered {
            value,
            stage: ParseStage::Balanced,
        });
    }

    None
}

/// Strip markdown code fences and any prose before the first bracket or
/// after the last closing bracket.
fn unwrap(raw: &str) -> &str {
    let trimmed = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let Some(start) = trimmed.find(['{', '[']) else {
        return trimmed;
    };
    let rest = &trimmed[start..];
    match rest.rfind(['}', ']']) {
        Some(end) => &rest[..=end],
        None => rest,
    }
}

/// Close an unterminated string, drop a dangling separator, and append the
/// closers for every bracket still open.
fn balance(text: &str) -> String {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                stack.pop();
            }
            _ => {}
        }
    }

    let mut out = text.to_string();
    if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    }

    let trimmed_len = out.trim_end().trim_end_matches(',').trim_end().len();
    out.truncate(trimmed_len);
    if out.ends_with(':') {
        out.push_str("null");
    }

    while let Some(closer) = stack.pop() {
        out.push(closer);
    }
    out
}

/// Every `{...}` span that closes at the outermost object depth.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        spans.push(&text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }
    spans
}
