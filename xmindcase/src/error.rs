//! Errors returned by the conversion engine
//!
use std::path::PathBuf;

use snafu::prelude::*;

/// Errors returned by xmindcase
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum XmindCaseError {
    /// The outline container could not be opened, read, or written as a zip archive.
    #[snafu(display("outline container: {source}"))]
    Zip { source: zip::result::ZipError },

    /// An outline container is missing a required entry.
    #[snafu(display("outline container has no {entry} entry"))]
    MissingEntry { entry: String },

    /// Reading or writing a byte stream failed.
    #[snafu(display("I/O error while {action}: {source}"))]
    Io {
        action: String,
        source: std::io::Error,
    },

    /// A JSON payload (outline content, flat records, or config) did not match its schema.
    #[snafu(display("Deserialization of {what}: {source}"))]
    Deserialization {
        what: String,
        source: serde_json::Error,
    },

    /// Serialization error. Unlikely to occur.
    #[snafu(display("Serialization: {source}"))]
    Serialization { source: serde_json::Error },

    /// The XML writer rejected an event.
    #[snafu(display("XML writer: {message}"))]
    Xml { message: String },

    /// The automation marker pattern is not a valid regular expression.
    #[snafu(display("invalid marker pattern {pattern:?}: {source}"))]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    /// A source directory could not be listed during an automation scan.
    #[snafu(display("scan {path:?}: {source}"))]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },
}
