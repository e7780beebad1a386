use serde::Serialize;
use thiserror::Error;

/// Fatal errors raised while reading or mapping an ISDOC document.
///
/// Any of these aborts the pipeline: no partial document is produced and
/// validation never runs. Business-rule violations are reported as
/// [`Finding`]s instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IsdocError {
    /// The bytes are not well-formed XML in the ISDOC namespace.
    #[error("malformed document at byte {position} (line {line}): {message}")]
    MalformedDocument {
        message: String,
        /// Byte offset into the input where the problem was detected.
        position: u64,
        /// 1-based line number of `position`.
        line: usize,
    },

    /// A field the catalog declares as required is absent or empty.
    #[error("missing required field {path}")]
    MissingRequiredField { path: String },

    /// A scalar value could not be coerced into the declared type.
    #[error("{path}: cannot read '{raw}' as {expected}")]
    TypeCoercionError {
        path: String,
        raw: String,
        expected: &'static str,
    },

    /// A code value lies outside its closed code list.
    #[error("{path}: '{raw}' is not one of {allowed}")]
    InvalidEnumValue {
        path: String,
        raw: String,
        allowed: String,
    },

    /// An element occurs more (or fewer) times than the catalog allows.
    #[error("{path}: expected {expected}, found {found} occurrence(s)")]
    UnexpectedCardinality {
        path: String,
        expected: &'static str,
        found: usize,
    },

    /// The encoded output could not be produced.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Name used by the boundary operations for the fatal error class.
pub type ParseError = IsdocError;

impl IsdocError {
    /// Build a [`IsdocError::MalformedDocument`] for a byte offset in `input`.
    pub fn malformed(message: impl Into<String>, input: &[u8], position: u64) -> Self {
        let end = usize::try_from(position).unwrap_or(usize::MAX).min(input.len());
        let line = input[..end].iter().filter(|b| **b == b'\n').count() + 1;
        Self::MalformedDocument {
            message: message.into(),
            position,
            line,
        }
    }

    /// True for errors raised by the reader rather than the mapper.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedDocument { .. })
    }
}

/// A single business-rule violation found in a well-typed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Dot-separated path of the offending field
    /// (e.g. `Invoice.InvoiceLines.InvoiceLine[0].LineExtensionTaxAmount`).
    pub path: String,
    /// Identifier of the violated rule (e.g. `LINE-TAX`).
    pub rule: String,
    /// Expected value or relation.
    pub expected: String,
    /// Value found in the document.
    pub actual: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {} (expected {}, actual {})",
            self.rule, self.path, self.message, self.expected, self.actual
        )
    }
}

impl Finding {
    pub fn new(
        path: impl Into<String>,
        rule: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            rule: rule.into(),
            expected: expected.into(),
            actual: actual.into(),
            message: message.into(),
        }
    }
}
