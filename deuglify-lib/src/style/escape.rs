//! Conversions between a class name as written in a stylesheet selector
//! (`md\:flex`, `\32 xl\:p-4`) and as written in a `class` attribute.

/// One escape-aware class-name token, without the leading dot.
///
/// Accepts word characters, `-`, hex escapes with their optional
/// terminating whitespace, and backslash-escaped punctuation.
pub const CLASS_NAME_PATTERN: &str =
    r"(?:\\[0-9a-fA-F]{1,6}[ \t\r\n\x0C]?|\\[^\r\n\x0C0-9a-fA-F]|[\w-])+";

/// Decodes CSS escapes so the result can be used as an attribute value.
pub fn unescape_class(selector: &str) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut chars = selector.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let mut hex = String::new();
        while hex.len() < 6 {
            match chars.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(*c);
                    chars.next();
                }
                _ => break,
            }
        }

        if hex.is_empty() {
            // `\:` and friends; a dangling backslash is dropped.
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
            continue;
        }

        if matches!(chars.peek(), Some(' ' | '\t' | '\r' | '\n' | '\x0C')) {
            chars.next();
        }
        let decoded = u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .filter(|c| *c != '\0')
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        out.push(decoded);
    }

    out
}

/// The decoded text before the first colon of a class name, if it has one.
/// `md\:flex` yields `md`; `\32 xl\:p-4` yields `2xl`; `flex` yields `None`.
pub fn leading_component(selector: &str) -> Option<String> {
    let decoded = unescape_class(selector);
    decoded
        .split_once(':')
        .map(|(prefix, _)| prefix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_simple_escapes() {
        assert_eq!(unescape_class("md\\:flex"), "md:flex");
        assert_eq!(unescape_class("w-1\\/2"), "w-1/2");
        assert_eq!(unescape_class("top-\\[3px\\]"), "top-[3px]");
        assert_eq!(unescape_class("plain"), "plain");
    }

    #[test]
    fn test_unescape_hex_escapes() {
        assert_eq!(unescape_class("\\32xl\\:flex"), "2xl:flex");
        assert_eq!(unescape_class("\\32 xl\\:flex"), "2xl:flex");
        assert_eq!(unescape_class("\\31 0"), "10");
    }

    #[test]
    fn test_leading_component() {
        assert_eq!(leading_component("md\\:flex").as_deref(), Some("md"));
        assert_eq!(leading_component("\\32 xl\\:p-4").as_deref(), Some("2xl"));
        assert_eq!(leading_component("mt-4"), None);
    }
}
