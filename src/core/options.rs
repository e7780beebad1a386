use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

/// Tunables for the validation engine.
///
/// ```
/// use isdoc::core::{TaxPointGrace, ValidationOptions};
/// use rust_decimal_macros::dec;
///
/// let options = ValidationOptions::default()
///     .with_tolerance(dec!(0.05))
///     .with_tax_point_grace(TaxPointGrace::Unlimited);
/// assert_eq!(options.tolerance, dec!(0.05));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Maximum absolute difference accepted between two amounts. Never
    /// negative: the setter and the deserializer both take the absolute value.
    #[serde(deserialize_with = "absolute")]
    pub tolerance: Decimal,
    /// How far the issue date may trail the tax point date.
    pub tax_point_grace: TaxPointGrace,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            tolerance: dec!(0.01),
            tax_point_grace: TaxPointGrace::default(),
        }
    }
}

impl ValidationOptions {
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    pub fn with_tax_point_grace(mut self, grace: TaxPointGrace) -> Self {
        self.tax_point_grace = grace;
        self
    }
}

fn absolute<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    <Decimal as Deserialize>::deserialize(deserializer).map(|tolerance| tolerance.abs())
}

/// Grace policy between the tax point date and the issue date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxPointGrace {
    /// Issue date may be at most this many days after the tax point date.
    Days(u32),
    /// No constraint.
    Unlimited,
}

impl Default for TaxPointGrace {
    fn default() -> Self {
        Self::Days(15)
    }
}

impl TaxPointGrace {
    /// Latest acceptable issue date for `tax_point`, or `None` when unbounded.
    pub fn latest_issue_date(&self, tax_point: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Days(days) => tax_point.checked_add_days(chrono::Days::new(u64::from(*days))),
            Self::Unlimited => None,
        }
    }
}
