//! Error types for conversion operations

use std::fmt;

/// Errors that can occur while converting a tree.
///
/// Unknown elements and illegally nested elements are *not* errors: the
/// engine resolves those by falling through to the generic handler or by
/// demoting the node to its content. Only two things abort a conversion:
/// a malformed input document and a failing caller-supplied handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Error while parsing an input document into a tree
    Parse(String),
    /// A caller-supplied handler failed; the conversion is aborted as a whole
    Handler(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ConvertError::Handler(msg) => write!(f, "Handler error: {msg}"),
        }
    }
}

impl std::error::Error for ConvertError {}
