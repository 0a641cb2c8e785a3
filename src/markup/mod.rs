//! Owned XML tree shared by the parser, packager and compiler.

pub mod element;
pub mod reader;
pub mod writer;

pub use element::{Element, Node, OPAF_PREFIX};
pub use reader::{XmlDocument, read_document};
pub use writer::write_document;
