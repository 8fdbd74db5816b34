//! Error types for the xml-osi library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for inference, emission and the DOM runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed markup in a file.
    #[error("Parse error in '{path}': {message}")]
    Parse {
        path: PathBuf,
        message: String,
    },

    /// Malformed markup in an in-memory source.
    #[error("Parse error: {0}")]
    ParseText(#[from] roxmltree::Error),

    /// Loaded document's root element is not the one the bindings expect.
    #[error("Missing root element: expected <{expected}>, found <{found}>")]
    MissingRoot {
        expected: String,
        found: String,
    },

    /// A type name that is not in the registry.
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// The registry contains a cycle made only of singular edges, which no
    /// owning value type can represent.
    #[error("Singular cycle: {}", .path.join(" -> "))]
    SingularCycle {
        path: Vec<String>,
    },

    /// Error from the XML writer.
    #[error("XML write error: {0}")]
    Write(#[from] quick_xml::Error),

    /// Serializer produced bytes that are not UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type alias for xml-osi operations.
pub type Result<T> = std::result::Result<T, Error>;
