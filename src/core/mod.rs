//! Core ISDOC types, validation rules, and reporting.
//!
//! This module holds the typed document model produced by the mapper,
//! the fatal error taxonomy, and the validation engine with its rule
//! catalog. It does not depend on any XML machinery.

mod amount;
pub mod codes;
mod error;
mod options;
mod report;
mod types;
mod validation;

pub use amount::{checked_sum, format_amount, round_half_up, within_tolerance};
pub use error::*;
pub use options::*;
pub use report::*;
pub use types::*;
pub use validation::{Rule, evaluate, expected_line_tax, rules};
