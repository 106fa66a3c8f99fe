use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeuglifyError>;

#[derive(Error, Debug)]
pub enum DeuglifyError {
    #[error("Failed to read '{}': {source}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSS error: {0}")]
    Css(String),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] io::Error),

    /// html5ever always synthesises a head; documents built by hand or by
    /// other `StyledDocument` implementations may not have one.
    #[error("Document has no <head> element to receive the stylesheet")]
    MissingHead,
}
