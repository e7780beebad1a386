use serde::Serialize;

use super::error::Finding;

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True iff `findings` is empty.
    pub valid: bool,
    /// Findings in rule evaluation order.
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// Aggregate findings into a report, keeping their order.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        Self {
            valid: findings.is_empty(),
            findings,
        }
    }

    /// Findings raised by a single rule.
    pub fn findings_for<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.rule == rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_valid() {
        let report = ValidationReport::from_findings(Vec::new());
        assert!(report.valid);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn keeps_order() {
        let findings = vec![
            Finding::new("Invoice.ID", "DOC-ID", "non-empty", "", "a"),
            Finding::new("Invoice.UUID", "DOC-UUID", "UUID", "x", "b"),
            Finding::new("Invoice.ID", "DOC-ID", "non-empty", "", "c"),
        ];
        let report = ValidationReport::from_findings(findings.clone());
        assert!(!report.valid);
        assert_eq!(report.findings, findings);
        assert_eq!(report.findings_for("DOC-ID").count(), 2);
    }
}
