//! Boundary operations: `parse` and `validate` over raw document bytes.
//!
//! Both return owned JSON buffers. The buffers are not `Clone`; taking the
//! payload out consumes the handle and dropping it releases the memory, so
//! a buffer can be handed over exactly once.

use std::fmt;

use serde::Serialize;

use crate::core::{Invoice, IsdocError, ParseError, ValidationOptions, ValidationReport, evaluate};
use crate::xml::{map_document, read_tree};

/// Encoded document model produced by [`parse`].
#[derive(Debug, PartialEq, Eq)]
pub struct EncodedDocument(String);

/// Encoded validation report produced by [`validate`].
#[derive(Debug, PartialEq, Eq)]
pub struct EncodedReport(String);

macro_rules! encoded_buffer {
    ($ty:ident) => {
        impl $ty {
            /// Borrow the JSON text.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Take ownership of the JSON text.
            pub fn into_string(self) -> String {
                self.0
            }

            /// Take ownership of the JSON bytes.
            pub fn into_bytes(self) -> Vec<u8> {
                self.0.into_bytes()
            }

            /// Length of the JSON text in bytes.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// True for an empty buffer; never the case for a buffer
            /// returned by this crate.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }
    };
}

encoded_buffer!(EncodedDocument);
encoded_buffer!(EncodedReport);

fn to_json<T: Serialize>(value: &T) -> Result<String, IsdocError> {
    serde_json::to_string(value).map_err(|e| IsdocError::Encoding(e.to_string()))
}

/// Read and map `bytes` into a typed [`Invoice`].
pub fn decode(bytes: &[u8]) -> Result<Invoice, ParseError> {
    let tree = read_tree(bytes)?;
    map_document(&tree)
}

/// Read and map `bytes`, returning the document model as JSON.
///
/// ```
/// # let xml = include_str!("../tests/fixtures/valid.isdoc");
/// let doc = isdoc::parse(xml.as_bytes()).unwrap();
/// let json: serde_json::Value = serde_json::from_str(doc.as_str()).unwrap();
/// assert_eq!(json["DocumentType"], 1);
/// ```
pub fn parse(bytes: &[u8]) -> Result<EncodedDocument, ParseError> {
    let invoice = decode(bytes)?;
    to_json(&invoice).map(EncodedDocument)
}

/// Run the rule catalog over an already mapped document.
pub fn validate_invoice(invoice: &Invoice, options: &ValidationOptions) -> ValidationReport {
    let report = ValidationReport::from_findings(evaluate(invoice, options));
    log::debug!(
        "validated invoice {}: {} finding(s)",
        invoice.id,
        report.findings.len()
    );
    report
}

/// Run the full pipeline with default options.
///
/// A document that cannot be read or mapped is an `Err`; rule violations
/// are reported inside the `Ok` report.
pub fn validate(bytes: &[u8]) -> Result<EncodedReport, ParseError> {
    validate_with_options(bytes, &ValidationOptions::default())
}

/// Run the full pipeline with explicit options.
pub fn validate_with_options(
    bytes: &[u8],
    options: &ValidationOptions,
) -> Result<EncodedReport, ParseError> {
    let invoice = decode(bytes)?;
    let report = validate_invoice(&invoice, options);
    to_json(&report).map(EncodedReport)
}
