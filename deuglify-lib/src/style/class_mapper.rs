//! Pairs the framework's rules with the document's rules by declaration
//! body, yielding the obfuscated class -> canonical class map.

use crate::style::breakpoints::{Breakpoint, BreakpointRegistry};
use crate::style::escape::{leading_component, unescape_class};
use crate::style::rule_table::{ParsedStylesheet, ResponsiveRuleTable, RuleTable};
use indexmap::IndexMap;
use log::{debug, trace};
use std::collections::HashMap;

/// What an obfuscated class resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    /// Framework selector in stylesheet form, e.g. `md\:flex`.
    pub canonical_selector: String,
    /// Set when the rule lives in a breakpoint `@media` block.
    pub breakpoint: Option<Breakpoint>,
    pub declaration_body: String,
}

impl ClassDescriptor {
    /// The canonical class as it should appear in a `class` attribute.
    pub fn class_name(&self) -> String {
        unescape_class(&self.canonical_selector)
    }
}

/// Obfuscated class -> descriptor, in the order the matches were made.
///
/// Keys are class names in attribute form (CSS escapes decoded), so a
/// token read from a `class` attribute can be looked up directly.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClassMap {
    entries: IndexMap<String, ClassDescriptor>,
}

impl ClassMap {
    pub fn new() -> Self {
        ClassMap::default()
    }

    /// Records a match unless `class_name` is already mapped.
    /// Returns whether the entry was added.
    pub fn insert(&mut self, class_name: impl Into<String>, descriptor: ClassDescriptor) -> bool {
        let class_name = class_name.into();
        if self.entries.contains_key(&class_name) {
            return false;
        }
        self.entries.insert(class_name, descriptor);
        true
    }

    pub fn get(&self, class_name: &str) -> Option<&ClassDescriptor> {
        self.entries.get(class_name)
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.entries.contains_key(class_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassDescriptor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Declaration body -> target selectors carrying it, in table order.
struct PlainIndex<'a> {
    by_body: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> PlainIndex<'a> {
    fn build(table: &'a RuleTable) -> Self {
        let mut by_body: HashMap<&str, Vec<&str>> = HashMap::new();
        for (selector, body) in table.iter() {
            by_body.entry(body).or_default().push(selector);
        }
        PlainIndex { by_body }
    }

    fn candidates(&self, body: &str) -> &[&'a str] {
        self.by_body.get(body).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Same as [`PlainIndex`], scoped by breakpoint.
struct ResponsiveIndex<'a> {
    by_breakpoint: HashMap<Breakpoint, HashMap<&'a str, Vec<&'a str>>>,
}

impl<'a> ResponsiveIndex<'a> {
    fn build(table: &'a ResponsiveRuleTable) -> Self {
        let mut by_breakpoint: HashMap<Breakpoint, HashMap<&str, Vec<&str>>> = HashMap::new();
        for (key, body) in table.iter() {
            by_breakpoint
                .entry(key.breakpoint)
                .or_default()
                .entry(body)
                .or_default()
                .push(key.selector.as_str());
        }
        ResponsiveIndex { by_breakpoint }
    }

    fn candidates(&self, breakpoint: Breakpoint, body: &str) -> &[&'a str] {
        self.by_breakpoint
            .get(&breakpoint)
            .and_then(|by_body| by_body.get(body))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Matches every canonical rule against the target rules.
///
/// Canonical rules are visited plain table first, then responsive table,
/// each in insertion order. Each one claims the first target selector with
/// an identical body that no earlier canonical rule has claimed. When two
/// canonical rules share a body, the pairing follows table order, which is
/// deterministic but not necessarily what the obfuscator did.
pub fn map_classes(
    canonical: &ParsedStylesheet,
    target: &ParsedStylesheet,
    registry: &BreakpointRegistry,
) -> ClassMap {
    let plain_index = PlainIndex::build(&target.rules);
    let responsive_index = ResponsiveIndex::build(&target.responsive);
    let mut map = ClassMap::new();
    let mut unmatched = 0usize;

    let canonical_rules = canonical
        .rules
        .iter()
        .map(|(selector, body)| (selector, body, None))
        .chain(
            canonical
                .responsive
                .iter()
                .map(|(key, body)| (key.selector.as_str(), body, Some(key.breakpoint))),
        );

    for (selector, body, media_scope) in canonical_rules {
        let variant = leading_component(selector).and_then(|prefix| registry.for_prefix(&prefix));

        let candidates = match (variant, media_scope) {
            (Some(breakpoint), _) => responsive_index.candidates(breakpoint, body),
            (None, None) => plain_index.candidates(body),
            (None, Some(scope)) => {
                trace!("`{}` under {} is not a responsive variant", selector, scope);
                continue;
            }
        };

        let hit = candidates
            .iter()
            .map(|candidate| unescape_class(candidate))
            .find(|class_name| !map.contains(class_name));

        match hit {
            Some(class_name) => {
                trace!("{} -> {}", class_name, selector);
                map.insert(
                    class_name,
                    ClassDescriptor {
                        canonical_selector: selector.to_string(),
                        breakpoint: variant,
                        declaration_body: body.to_string(),
                    },
                );
            }
            None => unmatched += 1,
        }
    }

    debug!(
        "Mapped {} classes, {} canonical rules had no counterpart",
        map.len(),
        unmatched
    );
    map
}
