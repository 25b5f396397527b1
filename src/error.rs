//! Error types for paramlist

use thiserror::Error;

use crate::value::Family;

/// Errors produced by [`ParameterStore`](crate::ParameterStore) operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed XML input.
    #[error("malformed document: {0}")]
    Parse(#[from] quick_xml::Error),

    /// A document that tokenizes but has no usable element structure.
    #[error("malformed document: {0}")]
    Document(String),

    /// I/O failure while reading or writing a document.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A parameter list with this name already exists.
    #[error("duplicate parameter list {list:?}")]
    DuplicateList { list: String },

    /// The parameter instance already has a child with this tag.
    #[error("duplicate child {child:?} on parameter {parameter:?} in list {list:?}")]
    DuplicateChild {
        child: String,
        parameter: String,
        list: String,
    },

    #[error("parameter list {list:?} not found")]
    ListNotFound { list: String },

    #[error("parameter {parameter:?} not found in list {list:?}")]
    ParameterNotFound { parameter: String, list: String },

    #[error("child {child:?} not found on parameter {parameter:?} in list {list:?}")]
    ChildNotFound {
        child: String,
        parameter: String,
        list: String,
    },

    /// Children and a `value` attribute are mutually exclusive on a parameter.
    #[error(
        "parameter {parameter:?} in list {list:?} carries a value and cannot take child {child:?}"
    )]
    InvalidTarget {
        child: String,
        parameter: String,
        list: String,
    },

    /// A single-target operation matched more than one parameter.
    #[error(
        "{count} parameters named {parameter:?} in list {list:?}; use the indexed variant"
    )]
    AmbiguousParameter {
        parameter: String,
        list: String,
        count: usize,
    },

    /// A typed write disagreed with the parameter's established value family.
    #[error(
        "type mismatch on parameter {parameter:?} in list {list:?}: stored {stored}, supplied {supplied}"
    )]
    TypeMismatch {
        parameter: String,
        list: String,
        stored: Family,
        supplied: Family,
    },

    /// A stored string that cannot be decoded under its type tag.
    #[error("value {value:?} cannot be decoded as {type_tag:?}")]
    MalformedValue { value: String, type_tag: String },

    #[error("parameter {parameter:?} in list {list:?} has no value attribute")]
    MissingValue { parameter: String, list: String },

    #[error("parameter {parameter:?} in list {list:?} has no text content")]
    MissingText { parameter: String, list: String },

    /// Only bool, int, float, and string values can be encoded.
    #[error("value is not one of bool, int, float, or string")]
    UnsupportedValue,
}

/// Result type alias for paramlist
pub type Result<T> = std::result::Result<T, Error>;
