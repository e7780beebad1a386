//! # isdoc
//!
//! Parsing and validation of ISDOC v6 electronic invoices, the XML format
//! used for Czech statutory e-invoicing.
//!
//! The pipeline reads raw bytes into an element tree, maps the tree into a
//! typed [`Invoice`](crate::core::Invoice) using a static field catalog, runs
//! the rule catalog over it, and collects the findings into a report.
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! # let xml = include_str!("../tests/fixtures/valid.isdoc");
//! use isdoc::core::ValidationOptions;
//!
//! let invoice = isdoc::decode(xml.as_bytes()).unwrap();
//! let report = isdoc::validate_invoice(&invoice, &ValidationOptions::default());
//! assert!(report.valid);
//!
//! // Boundary form: JSON buffers owned by the caller.
//! let encoded = isdoc::validate(xml.as_bytes()).unwrap();
//! assert_eq!(encoded.as_str(), r#"{"valid":true,"findings":[]}"#);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Document model, rule catalog, validation report |
//! | `xml` (default) | XML reader, field catalog, mapper, `parse`/`validate` |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "xml")]
mod api;

#[cfg(feature = "xml")]
pub use api::*;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
