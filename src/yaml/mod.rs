//! Unity YAML dialect: decoded node trees and the document reader.

pub mod node;
pub mod parser;

pub use node::Node;
pub use parser::{parse_documents, Document, UNITY_TAG_PREFIX};
