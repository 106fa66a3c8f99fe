//! The fixed table between the framework's responsive prefixes and the
//! `min-width` each one compiles to.

use std::fmt;

/// One responsive variant, e.g. `md` at `768px`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Breakpoint {
    /// Prefix as written in a class attribute (`md`, `2xl`).
    pub prefix: &'static str,
    /// Width used in the `@media (min-width: 768px)` header.
    pub width: &'static str,
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.prefix, self.width)
    }
}

/// Bidirectional lookup between breakpoint widths and prefixes.
#[derive(Debug, Clone, Copy)]
pub struct BreakpointRegistry {
    breakpoints: &'static [Breakpoint],
}

const TAILWIND_BREAKPOINTS: &[Breakpoint] = &[
    Breakpoint {
        prefix: "sm",
        width: "640px",
    },
    Breakpoint {
        prefix: "md",
        width: "768px",
    },
    Breakpoint {
        prefix: "lg",
        width: "1024px",
    },
    Breakpoint {
        prefix: "xl",
        width: "1280px",
    },
    Breakpoint {
        prefix: "2xl",
        width: "1536px",
    },
];

impl BreakpointRegistry {
    /// The framework's default screens.
    pub const TAILWIND_DEFAULT: BreakpointRegistry = BreakpointRegistry {
        breakpoints: TAILWIND_BREAKPOINTS,
    };

    /// A registry over a project's own screens instead of the defaults.
    pub const fn new(breakpoints: &'static [Breakpoint]) -> Self {
        BreakpointRegistry { breakpoints }
    }

    pub fn for_width(&self, width: &str) -> Option<Breakpoint> {
        let width = width.trim();
        self.breakpoints
            .iter()
            .find(|bp| bp.width.eq_ignore_ascii_case(width))
            .copied()
    }

    pub fn for_prefix(&self, prefix: &str) -> Option<Breakpoint> {
        self.breakpoints
            .iter()
            .find(|bp| bp.prefix == prefix)
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.breakpoints.iter()
    }
}

impl Default for BreakpointRegistry {
    fn default() -> Self {
        Self::TAILWIND_DEFAULT
    }
}
