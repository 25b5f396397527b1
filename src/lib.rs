//! paramlist - Typed parameter lists over a simple XML configuration format
//!
//! A document is an array of named parameter lists, each holding named
//! parameters with a `type`/`value` attribute pair (optionally nested one
//! level as child parameters). Writes are type-checked against the value
//! family a parameter already holds.
//!
//! # Quick Start
//!
//! ```
//! use paramlist::{ParameterStore, Value};
//! # fn main() -> Result<(), paramlist::Error> {
//! let mut store = ParameterStore::new("Root");
//! store.create_list("Sec")?;
//! store.add_parameter("Sec", "n", 3)?;
//! assert_eq!(store.value("Sec", "n")?, Value::Int(3));
//!
//! let xml = store.to_xml_string()?;
//! let reparsed = paramlist::from_str(&xml)?;
//! assert_eq!(reparsed.value("Sec", "n")?, Value::Int(3));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod codec;
pub use codec::Vocabulary;

pub mod error;
pub use error::{Error, Result};

pub mod value;
pub use value::{Family, Value};

pub mod xml;

pub mod store;
pub use store::ParameterStore;

use std::path::Path;

/// Parse a parameter document from a string
pub fn from_str(input: &str) -> Result<ParameterStore> {
    ParameterStore::parse(input)
}

/// Parse a parameter document from a file
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ParameterStore> {
    ParameterStore::load(path)
}
