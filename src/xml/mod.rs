//! ISDOC XML reading and mapping.
//!
//! - [`tree`] turns bytes into a namespace-resolved element tree
//! - [`catalog`] describes the ISDOC structure as static field tables
//! - [`mapper`] materializes the typed [`Invoice`](crate::core::Invoice)

pub mod catalog;
pub mod mapper;
pub mod tree;

pub use mapper::map_document;
pub use tree::{Element, read_tree};
