//! Reverses utility-class obfuscation: given the framework's stylesheet and
//! a document whose classes were hashed or shortened by a build step, maps
//! every obfuscated class back to the framework class with the same
//! declarations and rewrites the document to use the readable names.

pub mod deuglify;
pub mod dom;
pub mod error;
pub mod parser;
pub mod rewrite;
pub mod style;

pub use deuglify::{deuglify_files, Deuglifier, DeuglifyOptions, DeuglifyOutput, Sources, StyleMode};
pub use error::{DeuglifyError, Result};
pub use style::class_mapper::{ClassDescriptor, ClassMap};
pub use style::minify::{LightningMinifier, Minify};
