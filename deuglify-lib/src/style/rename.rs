//! Renames mapped classes inside an existing stylesheet, as an alternative
//! to synthesizing a fresh one. Only selector preludes are touched;
//! declaration bodies are copied verbatim.

use crate::style::class_mapper::ClassMap;
use crate::style::escape::{unescape_class, CLASS_NAME_PATTERN};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// What the braces currently being scanned contain.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Block {
    /// Rules with selector preludes (top level, `@media`, `@supports`).
    Rules,
    /// Declarations, or anything else copied through untouched.
    Declarations,
}

/// At-rules whose block is copied through without renaming: declaration
/// blocks, and keyframes whose `12.5%` stops would read as class selectors.
const VERBATIM_AT_RULES: &[&str] = &[
    "@font-face",
    "@page",
    "@property",
    "@counter-style",
    "@keyframes",
    "@-webkit-keyframes",
];

fn class_selector_regex() -> &'static Regex {
    static CLASS_SELECTOR: OnceLock<Regex> = OnceLock::new();
    CLASS_SELECTOR.get_or_init(|| {
        Regex::new(&format!(r"\.({})", CLASS_NAME_PATTERN)).expect("class selector pattern is valid")
    })
}

/// Rewrites every `.obfuscated` class selector in `css` whose class is in
/// `map` to the descriptor's canonical selector.
pub fn rename_selectors(css: &str, map: &ClassMap) -> String {
    let mut out = String::with_capacity(css.len());
    let mut prelude = String::new();
    let mut stack = vec![Block::Rules];
    let mut chars = css.chars();

    while let Some(ch) = chars.next() {
        let in_declarations = stack.last() == Some(&Block::Declarations);

        match ch {
            '\\' | '"' | '\'' => {
                let sink = if in_declarations { &mut out } else { &mut prelude };
                sink.push(ch);
                if ch == '\\' {
                    if let Some(escaped) = chars.next() {
                        sink.push(escaped);
                    }
                } else {
                    // Copy the string literal through its closing quote.
                    while let Some(inner) = chars.next() {
                        sink.push(inner);
                        if inner == '\\' {
                            if let Some(escaped) = chars.next() {
                                sink.push(escaped);
                            }
                        } else if inner == ch {
                            break;
                        }
                    }
                }
            }
            '{' if in_declarations => {
                out.push('{');
                stack.push(Block::Declarations);
            }
            '{' => {
                let head = prelude.trim_start();
                let block = if head.starts_with('@') {
                    out.push_str(&prelude);
                    let is_verbatim = VERBATIM_AT_RULES
                        .iter()
                        .any(|name| head.to_ascii_lowercase().starts_with(name));
                    if is_verbatim {
                        Block::Declarations
                    } else {
                        Block::Rules
                    }
                } else {
                    out.push_str(&rename_prelude(&prelude, map));
                    Block::Declarations
                };
                prelude.clear();
                out.push('{');
                stack.push(block);
            }
            '}' => {
                out.push_str(&prelude);
                prelude.clear();
                out.push('}');
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            ';' if !in_declarations => {
                out.push_str(&prelude);
                prelude.clear();
                out.push(';');
            }
            _ if in_declarations => out.push(ch),
            _ => prelude.push(ch),
        }
    }

    out.push_str(&prelude);
    out
}

/// Renames class selectors in one prelude, leaving quoted attribute values
/// such as `[data-x=".a"]` alone.
fn rename_prelude(prelude: &str, map: &ClassMap) -> String {
    let mut out = String::with_capacity(prelude.len());
    let mut segment_start = 0;
    let mut chars = prelude.char_indices();

    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '"' | '\'' => {
                out.push_str(&rename_classes(&prelude[segment_start..i], map));
                let mut end = prelude.len();
                while let Some((j, inner)) = chars.next() {
                    if inner == '\\' {
                        chars.next();
                    } else if inner == ch {
                        end = j + inner.len_utf8();
                        break;
                    }
                }
                out.push_str(&prelude[i..end]);
                segment_start = end;
            }
            _ => {}
        }
    }

    out.push_str(&rename_classes(&prelude[segment_start..], map));
    out
}

fn rename_classes(text: &str, map: &ClassMap) -> String {
    class_selector_regex()
        .replace_all(text, |caps: &Captures| {
            let selector = &caps[1];
            // `.5` in `12.5%` or `1.5em` is a number, not a class.
            if selector.starts_with(|c: char| c.is_ascii_digit()) {
                return caps[0].to_string();
            }
            match map.get(&unescape_class(selector)) {
                Some(descriptor) => format!(".{}", descriptor.canonical_selector),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
