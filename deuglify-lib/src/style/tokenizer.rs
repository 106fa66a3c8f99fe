//! Splits canonicalized CSS into selector -> declaration tables.
//!
//! Top-level text is scanned for simple `.class{body}` rules. `@media`
//! blocks are bounded with an explicit brace-depth counter (a regex cannot
//! find the end of a block whose body holds further braces) and, when the
//! header names a known breakpoint, their bodies are scanned the same way
//! and keyed by that breakpoint.

use crate::style::breakpoints::{Breakpoint, BreakpointRegistry};
use crate::style::escape::CLASS_NAME_PATTERN;
use crate::style::rule_table::ParsedStylesheet;
use log::{debug, trace};
use regex::Regex;
use std::sync::OnceLock;

/// A piece of stylesheet text at nesting level zero.
#[derive(Debug, Clone, PartialEq)]
enum Chunk<'a> {
    /// Ordinary rules between at-rules.
    TopLevel(&'a str),
    /// An at-rule; `body` is `None` for statements such as `@import url(a.css);`.
    AtRule {
        prelude: &'a str,
        body: Option<&'a str>,
    },
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    /// Between top-level rules; `depth` tracks ordinary rule bodies.
    Scanning { depth: usize },
    /// Reading an at-rule header that starts at `start`.
    Prelude { start: usize },
    /// Inside an at-rule block, until `depth` returns to zero.
    Counting {
        prelude_start: usize,
        prelude_end: usize,
        body_start: usize,
        depth: usize,
    },
}

fn simple_rule_regex() -> &'static Regex {
    static SIMPLE_RULE: OnceLock<Regex> = OnceLock::new();
    SIMPLE_RULE.get_or_init(|| {
        Regex::new(&format!(r"\.({})\s*\{{([^{{}}]+)\}}", CLASS_NAME_PATTERN))
            .expect("simple rule pattern is valid")
    })
}

fn media_header_regex() -> &'static Regex {
    static MEDIA_HEADER: OnceLock<Regex> = OnceLock::new();
    MEDIA_HEADER.get_or_init(|| {
        Regex::new(r"(?i)^@media\s*\(\s*(?:min-width\s*:|width\s*>=)\s*([^\s)]+)\s*\)$")
            .expect("media header pattern is valid")
    })
}

/// Builds the plain and responsive rule tables for one stylesheet.
pub fn tokenize(css: &str, registry: &BreakpointRegistry) -> ParsedStylesheet {
    let mut sheet = ParsedStylesheet::default();

    for chunk in split_chunks(css) {
        match chunk {
            Chunk::TopLevel(text) => {
                for (selector, body) in simple_rules(text) {
                    sheet.rules.insert(selector, body);
                }
            }
            Chunk::AtRule {
                prelude,
                body: Some(body),
            } => match media_breakpoint(prelude, registry) {
                Some(breakpoint) => {
                    for (selector, rule_body) in simple_rules(body) {
                        sheet.responsive.insert(breakpoint, selector, rule_body);
                    }
                }
                None => debug!("Skipping at-rule block `{}`", prelude.trim()),
            },
            Chunk::AtRule {
                prelude,
                body: None,
            } => debug!("Skipping at-rule statement `{}`", prelude.trim()),
        }
    }

    trace!(
        "Tokenized {} plain and {} responsive rules",
        sheet.rules.len(),
        sheet.responsive.len()
    );
    sheet
}

/// Resolves an `@media (min-width: W)` or `@media (width>=W)` header.
/// Headers with any other shape, or widths the registry does not know,
/// yield `None`.
fn media_breakpoint(prelude: &str, registry: &BreakpointRegistry) -> Option<Breakpoint> {
    let caps = media_header_regex().captures(prelude.trim())?;
    let width = caps.get(1)?.as_str();
    let breakpoint = registry.for_width(width);
    if breakpoint.is_none() {
        debug!("Breakpoint width {} is not a known screen", width);
    }
    breakpoint
}

/// Every `.selector{body}` in `text` whose class selector starts the rule.
/// Compound, descendant and list selectors are skipped.
fn simple_rules(text: &str) -> Vec<(&str, &str)> {
    simple_rule_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let starts_rule = text[..whole.start()]
                .trim_end()
                .chars()
                .next_back()
                .map_or(true, |c| c == '}' || c == ';');
            if !starts_rule {
                return None;
            }
            Some((caps.get(1)?.as_str().trim_end(), caps.get(2)?.as_str().trim()))
        })
        .collect()
}

/// Returns the index just past the string literal opening at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn split_chunks(css: &str) -> Vec<Chunk<'_>> {
    let bytes = css.as_bytes();
    let mut chunks = Vec::new();
    let mut segment_start = 0;
    let mut state = ScanState::Scanning { depth: 0 };
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            _ => {}
        }

        state = match (state, bytes[i]) {
            (ScanState::Scanning { depth }, b'{') => ScanState::Scanning { depth: depth + 1 },
            (ScanState::Scanning { depth }, b'}') => ScanState::Scanning {
                depth: depth.saturating_sub(1),
            },
            (ScanState::Scanning { depth: 0 }, b'@') => {
                if segment_start < i {
                    chunks.push(Chunk::TopLevel(&css[segment_start..i]));
                }
                ScanState::Prelude { start: i }
            }
            (ScanState::Prelude { start }, b';') => {
                chunks.push(Chunk::AtRule {
                    prelude: &css[start..i],
                    body: None,
                });
                segment_start = i + 1;
                ScanState::Scanning { depth: 0 }
            }
            (ScanState::Prelude { start }, b'{') => ScanState::Counting {
                prelude_start: start,
                prelude_end: i,
                body_start: i + 1,
                depth: 1,
            },
            (
                ScanState::Counting {
                    prelude_start,
                    prelude_end,
                    body_start,
                    depth,
                },
                b'{',
            ) => ScanState::Counting {
                prelude_start,
                prelude_end,
                body_start,
                depth: depth + 1,
            },
            (
                ScanState::Counting {
                    prelude_start,
                    prelude_end,
                    body_start,
                    depth,
                },
                b'}',
            ) => {
                if depth == 1 {
                    chunks.push(Chunk::AtRule {
                        prelude: &css[prelude_start..prelude_end],
                        body: Some(&css[body_start..i]),
                    });
                    segment_start = i + 1;
                    ScanState::Scanning { depth: 0 }
                } else {
                    ScanState::Counting {
                        prelude_start,
                        prelude_end,
                        body_start,
                        depth: depth - 1,
                    }
                }
            }
            (state, _) => state,
        };
        i += 1;
    }

    // Unterminated input keeps whatever was read so far.
    match state {
        ScanState::Scanning { .. } => {
            if segment_start < css.len() {
                chunks.push(Chunk::TopLevel(&css[segment_start..]));
            }
        }
        ScanState::Prelude { start } => chunks.push(Chunk::AtRule {
            prelude: &css[start..],
            body: None,
        }),
        ScanState::Counting {
            prelude_start,
            prelude_end,
            body_start,
            ..
        } => chunks.push(Chunk::AtRule {
            prelude: &css[prelude_start..prelude_end],
            body: Some(&css[body_start.min(css.len())..]),
        }),
    }

    chunks
}
