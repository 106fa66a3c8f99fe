//! Stylesheet canonicalization.
//!
//! Every stylesheet goes through a [`Minify`] implementation before it is
//! tokenized, so that two rules with the same declarations end up with
//! byte-identical bodies.

use crate::error::{DeuglifyError, Result};
use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{ParserOptions, StyleSheet as LightningStyleSheet};

/// Turns CSS text into a deterministic single-line form.
///
/// Implementations must be idempotent and must not reorder rules or change
/// the set of declared properties.
pub trait Minify {
    fn minify(&self, css: &str) -> Result<String>;
}

/// [`Minify`] backed by LightningCSS' parser and minifying printer.
///
/// The AST-level `minify` pass is deliberately not run: it merges rules
/// with identical bodies into selector lists, which the tokenizer ignores.
#[derive(Debug, Default, Clone, Copy)]
pub struct LightningMinifier;

impl Minify for LightningMinifier {
    fn minify(&self, css: &str) -> Result<String> {
        let parser_opts = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };
        let sheet = LightningStyleSheet::parse(css, parser_opts)
            .map_err(|e| DeuglifyError::Css(e.to_string()))?;

        let printed = sheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|e| DeuglifyError::Css(e.to_string()))?;

        Ok(printed.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_whitespace_and_trailing_semicolons_are_removed() {
        let css = "
            .mt-4 {
                margin-top: 1rem;
            }
        ";
        assert_eq!(LightningMinifier.minify(css).unwrap(), ".mt-4{margin-top:1rem}");
    }

    #[test]
    fn test_minify_is_idempotent() {
        let inputs = [
            ".a { color: red; }\n.b { display: flex; flex-direction: column; }",
            "@media (min-width: 768px) { .md\\:flex { display: flex; } }",
            "/* comment */ .c { margin: 0 auto; }",
        ];
        for css in inputs {
            let once = LightningMinifier.minify(css).unwrap();
            let twice = LightningMinifier.minify(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_rules_with_equal_bodies_stay_separate() {
        let css = ".a { color: red; } .b { color: red; }";
        assert_eq!(
            LightningMinifier.minify(css).unwrap(),
            ".a{color:red}.b{color:red}"
        );
    }

    #[test]
    fn test_escaped_colon_survives() {
        let out = LightningMinifier
            .minify("@media (min-width: 768px) { .md\\:flex { display: flex; } }")
            .unwrap();
        assert!(out.contains(".md\\:flex{display:flex}"), "got {out}");
        assert!(out.contains("768px"), "got {out}");
    }
}
