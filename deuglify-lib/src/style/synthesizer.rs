use crate::error::Result;
use crate::style::class_mapper::ClassMap;
use crate::style::minify::Minify;

/// Renders the class map back into a stylesheet, one rule per mapped class,
/// re-wrapping breakpoint variants in their `@media` block.
pub fn create_stylesheet(map: &ClassMap, minifier: &dyn Minify) -> Result<String> {
    let mut stylesheet = String::new();

    for descriptor in map.descriptors() {
        let rule = format!(
            ".{} {{ {}; }}",
            descriptor.canonical_selector, descriptor.declaration_body
        );
        match descriptor.breakpoint {
            Some(breakpoint) => {
                stylesheet.push_str(&format!(
                    "@media (min-width: {}) {{{}}}\n",
                    breakpoint.width, rule
                ));
            }
            None => {
                stylesheet.push_str(&rule);
                stylesheet.push('\n');
            }
        }
    }

    minifier.minify(&stylesheet)
}
