//! One deuglify run: canonicalize the framework stylesheet and the target
//! CSS, map classes, build the output stylesheet and rewrite the document.

use crate::error::{DeuglifyError, Result};
use crate::parser::deuglify_html::create_dom_tree;
use crate::rewrite::{rewrite_document, StyledDocument};
use crate::style::breakpoints::BreakpointRegistry;
use crate::style::class_mapper::{map_classes, ClassMap};
use crate::style::minify::Minify;
use crate::style::rename::rename_selectors;
use crate::style::synthesizer::create_stylesheet;
use crate::style::tokenizer::tokenize;
use log::{debug, info, trace};
use std::fs;
use std::path::{Path, PathBuf};

/// How the output `<style>` element is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StyleMode {
    /// One rule per mapped class, rendered from the class map.
    #[default]
    Synthesize,
    /// The document's own stylesheet with mapped selectors renamed.
    RenameExisting,
}

#[derive(Debug, Clone)]
pub struct DeuglifyOptions {
    pub tailwind_css_path: PathBuf,
    pub html_path: PathBuf,
    /// When absent, the target CSS is read from the document's `<style>` elements.
    pub css_path: Option<PathBuf>,
    pub output_path: PathBuf,
    pub style_mode: StyleMode,
}

/// Raw input texts for one run.
#[derive(Debug, Clone)]
pub struct Sources {
    pub tailwind_css: String,
    pub html: String,
    pub css: Option<String>,
}

impl Sources {
    pub fn read(options: &DeuglifyOptions) -> Result<Self> {
        let tailwind_css = read_input(&options.tailwind_css_path)?;
        let html = read_input(&options.html_path)?;
        let css = options.css_path.as_deref().map(read_input).transpose()?;
        Ok(Sources {
            tailwind_css,
            html,
            css,
        })
    }
}

fn read_input(path: &Path) -> Result<String> {
    debug!("Reading {}", path.display());
    fs::read_to_string(path).map_err(|source| DeuglifyError::InputRead {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_output(path: &Path, html: &str) -> Result<()> {
    fs::write(path, html).map_err(|source| DeuglifyError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct DeuglifyOutput {
    pub html: String,
    pub stylesheet: String,
    pub map: ClassMap,
}

pub struct Deuglifier<'m> {
    minifier: &'m dyn Minify,
    registry: BreakpointRegistry,
    style_mode: StyleMode,
}

impl<'m> Deuglifier<'m> {
    pub fn new(minifier: &'m dyn Minify) -> Self {
        Deuglifier {
            minifier,
            registry: BreakpointRegistry::TAILWIND_DEFAULT,
            style_mode: StyleMode::default(),
        }
    }

    pub fn with_style_mode(mut self, style_mode: StyleMode) -> Self {
        self.style_mode = style_mode;
        self
    }

    /// Uses `registry` instead of the default screens for both stylesheets.
    pub fn with_registry(mut self, registry: BreakpointRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn run(&self, sources: &Sources) -> Result<DeuglifyOutput> {
        let canonical_css = self.minifier.minify(&sources.tailwind_css)?;
        let canonical = tokenize(&canonical_css, &self.registry);
        info!("Framework stylesheet: {} rules", canonical.len());
        trace!("Framework rules:\n{}", canonical);

        let mut document = create_dom_tree(&sources.html);
        let raw_css = match &sources.css {
            Some(css) => css.clone(),
            None => document.style_blocks().join("\n"),
        };
        let target_css = self.minifier.minify(&raw_css)?;
        let target = tokenize(&target_css, &self.registry);
        info!("Target stylesheet: {} rules", target.len());
        trace!("Target rules:\n{}", target);

        let map = map_classes(&canonical, &target, &self.registry);
        info!("Resolved {} of {} target rules", map.len(), target.len());

        let stylesheet = match self.style_mode {
            StyleMode::Synthesize => create_stylesheet(&map, self.minifier)?,
            StyleMode::RenameExisting => self.minifier.minify(&rename_selectors(&target_css, &map))?,
        };

        let replaced = rewrite_document(&mut document, &map, &stylesheet)?;
        info!("Rewrote {} class tokens", replaced);

        Ok(DeuglifyOutput {
            html: document.serialize()?,
            stylesheet,
            map,
        })
    }
}

/// Reads the inputs named by `options`, runs the pipeline and writes the
/// rewritten document to `options.output_path`.
pub fn deuglify_files(options: &DeuglifyOptions, minifier: &dyn Minify) -> Result<DeuglifyOutput> {
    let sources = Sources::read(options)?;
    let output = Deuglifier::new(minifier)
        .with_style_mode(options.style_mode)
        .run(&sources)?;
    write_output(&options.output_path, &output.html)?;
    info!("Wrote {}", options.output_path.display());
    Ok(output)
}
