//! Generic XML element tree
//!
//! Tokenization, escaping, and formatting are delegated to `quick-xml`;
//! this module only defines the owned tree the store walks.

pub mod model;
pub mod reader;
pub mod writer;

pub use model::{Element, Node};
pub use reader::read_document;
pub use writer::write_document;
