//! XML primitives for the fwconv generators: an owned element tree with a small
//! builder API, an indented document writer, and a reader used to check
//! generated documents.

pub mod reader;
pub mod tree;
pub mod writer;

pub use reader::{parse, ParseError};
pub use tree::XmlNode;
pub use writer::{write_document, WriteError};
