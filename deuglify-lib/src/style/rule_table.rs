// Owned selector -> declaration tables extracted from one stylesheet.
use crate::style::breakpoints::Breakpoint;
use indexmap::IndexMap;
use std::fmt;

/// Selector -> declaration body, in order of first appearance.
///
/// Re-inserting a selector replaces its body but keeps its original
/// position, which is what the cascade-style "last write wins" needs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RuleTable {
    rules: IndexMap<String, String>,
}

impl RuleTable {
    pub fn new() -> Self {
        RuleTable::default()
    }

    pub fn insert(&mut self, selector: impl Into<String>, body: impl Into<String>) {
        self.rules.insert(selector.into(), body.into());
    }

    pub fn get(&self, selector: &str) -> Option<&str> {
        self.rules.get(selector).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(s, b)| (s.as_str(), b.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Key of a rule found inside a breakpoint `@media` block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponsiveKey {
    pub breakpoint: Breakpoint,
    pub selector: String,
}

impl fmt::Display for ResponsiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.breakpoint.prefix, self.selector)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResponsiveRuleTable {
    rules: IndexMap<ResponsiveKey, String>,
}

impl ResponsiveRuleTable {
    pub fn new() -> Self {
        ResponsiveRuleTable::default()
    }

    pub fn insert(&mut self, breakpoint: Breakpoint, selector: impl Into<String>, body: impl Into<String>) {
        let key = ResponsiveKey {
            breakpoint,
            selector: selector.into(),
        };
        self.rules.insert(key, body.into());
    }

    pub fn get(&self, breakpoint: Breakpoint, selector: &str) -> Option<&str> {
        let key = ResponsiveKey {
            breakpoint,
            selector: selector.to_string(),
        };
        self.rules.get(&key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResponsiveKey, &str)> {
        self.rules.iter().map(|(k, b)| (k, b.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Both tables for one stylesheet.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedStylesheet {
    pub rules: RuleTable,
    pub responsive: ResponsiveRuleTable,
}

impl ParsedStylesheet {
    pub fn len(&self) -> usize {
        self.rules.len() + self.responsive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.responsive.is_empty()
    }
}

impl fmt::Display for ParsedStylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (selector, body) in self.rules.iter() {
            writeln!(f, ".{} {{ {} }}", selector, body)?;
        }
        for (key, body) in self.responsive.iter() {
            writeln!(f, "[{}] .{} {{ {} }}", key.breakpoint, key.selector, body)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::breakpoints::BreakpointRegistry;

    #[test]
    fn test_overwrite_keeps_first_position() {
        let mut table = RuleTable::new();
        table.insert("a", "color:red");
        table.insert("b", "color:blue");
        table.insert("a", "color:green");

        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![("a", "color:green"), ("b", "color:blue")]);
    }

    #[test]
    fn test_responsive_keys_are_scoped_by_breakpoint() {
        let registry = BreakpointRegistry::TAILWIND_DEFAULT;
        let md = registry.for_prefix("md").unwrap();
        let lg = registry.for_prefix("lg").unwrap();

        let mut table = ResponsiveRuleTable::new();
        table.insert(md, "b", "display:flex");
        table.insert(lg, "b", "display:grid");

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(md, "b"), Some("display:flex"));
        assert_eq!(table.get(lg, "b"), Some("display:grid"));
        let keys: Vec<String> = table.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["md:b", "lg:b"]);
    }

    #[test]
    fn test_display_lists_plain_then_responsive_rules() {
        let md = BreakpointRegistry::TAILWIND_DEFAULT.for_prefix("md").unwrap();
        let mut sheet = ParsedStylesheet::default();
        sheet.responsive.insert(md, "b", "display:flex");
        sheet.rules.insert("a", "color:red");

        assert_eq!(
            sheet.to_string(),
            ".a { color:red }\n[md (768px)] .b { display:flex }\n"
        );
    }
}
