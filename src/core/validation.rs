//! Rule catalog and validation engine.
//!
//! Every rule is an independent, read-only check over a mapped [`Invoice`].
//! Rules run in catalog order and each appends zero or more findings, so the
//! finding order of a report is stable for a given document.

use std::collections::HashSet;

use rust_decimal::Decimal;

use super::amount::{checked_sum, format_amount, round_half_up, within_tolerance};
use super::codes::{is_known_country_code, is_known_currency_code};
use super::error::Finding;
use super::options::ValidationOptions;
use super::types::*;

type Check = fn(&Invoice, &ValidationOptions, &mut Vec<Finding>);

/// One entry of the rule catalog.
pub struct Rule {
    /// Stable identifier reported in findings.
    pub id: &'static str,
    /// One-line statement of what the rule checks.
    pub description: &'static str,
    check: Check,
}

impl Rule {
    /// Run this rule alone, appending its findings to `findings`.
    pub fn apply(&self, invoice: &Invoice, options: &ValidationOptions, findings: &mut Vec<Finding>) {
        (self.check)(invoice, options, findings);
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

static RULES: &[Rule] = &[
    Rule {
        id: "DOC-ID",
        description: "document identifier is not empty",
        check: check_document_id,
    },
    Rule {
        id: "DOC-UUID",
        description: "UUID is in hyphenated 8-4-4-4-12 hex form",
        check: check_document_uuid,
    },
    Rule {
        id: "DOC-TAX-POINT",
        description: "issue date is not later than the tax point date plus grace",
        check: check_tax_point,
    },
    Rule {
        id: "DOC-CURRENCY",
        description: "currency codes are known ISO 4217 codes",
        check: check_currency,
    },
    Rule {
        id: "DOC-EXCHANGE-RATE",
        description: "exchange rates agree with the currency setup",
        check: check_exchange_rate,
    },
    Rule {
        id: "DOC-FOREIGN-AMOUNTS",
        description: "foreign currency amounts are present iff a foreign currency is set",
        check: check_foreign_amounts,
    },
    Rule {
        id: "DOC-ORIGINAL-REFERENCE",
        description: "corrective documents reference the original document",
        check: check_original_reference,
    },
    Rule {
        id: "PARTY-IDENTIFICATION",
        description: "supplier and customer carry an identifier",
        check: check_party_identification,
    },
    Rule {
        id: "PARTY-NAME",
        description: "supplier and customer carry a name",
        check: check_party_name,
    },
    Rule {
        id: "PARTY-COUNTRY",
        description: "party country is a known ISO 3166-1 alpha-2 code",
        check: check_party_country,
    },
    Rule {
        id: "LINE-ID",
        description: "line identifiers are non-empty and unique",
        check: check_line_ids,
    },
    Rule {
        id: "LINE-EXTENSION",
        description: "line extension amount = quantity x unit price",
        check: check_line_extension,
    },
    Rule {
        id: "LINE-TAX",
        description: "line tax amount follows the rate and calculation method",
        check: check_line_tax,
    },
    Rule {
        id: "LINE-TAX-INCLUSIVE",
        description: "line inclusive amount = extension + tax",
        check: check_line_tax_inclusive,
    },
    Rule {
        id: "LINE-VAT-APPLICABLE",
        description: "a document without VAT has no VAT-applicable lines",
        check: check_line_vat_applicable,
    },
    Rule {
        id: "LINE-ITEM-IDENTIFICATION",
        description: "secondary and tertiary seller identifications follow the primary one",
        check: check_item_identification,
    },
    Rule {
        id: "LINE-STORE-BATCH",
        description: "store batches share the line unit and add up to the invoiced quantity",
        check: check_store_batches,
    },
    Rule {
        id: "SUBTOTAL-DIFFERENCE",
        description: "subtotal difference = current - already claimed",
        check: check_subtotal_difference,
    },
    Rule {
        id: "SUBTOTAL-INCLUSIVE",
        description: "subtotal taxable + tax = inclusive",
        check: check_subtotal_inclusive,
    },
    Rule {
        id: "TAX-TOTAL",
        description: "tax total = sum of subtotal tax amounts",
        check: check_tax_total,
    },
    Rule {
        id: "TOTAL-LINES",
        description: "tax-exclusive total = sum of line extension amounts",
        check: check_total_lines,
    },
    Rule {
        id: "TOTAL-TAX",
        description: "tax-inclusive total = tax-exclusive total + tax total",
        check: check_total_tax,
    },
    Rule {
        id: "TOTAL-DIFFERENCE",
        description: "total difference = current - already claimed",
        check: check_total_difference,
    },
    Rule {
        id: "TOTAL-PAYABLE",
        description: "payable = difference inclusive + rounding - paid deposits",
        check: check_total_payable,
    },
];

/// The rule catalog, in evaluation order.
pub fn rules() -> &'static [Rule] {
    RULES
}

/// Run every rule over `invoice`. Never fails; an empty result means valid.
pub fn evaluate(invoice: &Invoice, options: &ValidationOptions) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in RULES {
        let before = findings.len();
        rule.apply(invoice, options, &mut findings);
        log::trace!("rule {}: {} finding(s)", rule.id, findings.len() - before);
    }
    findings
}

const SUPPLIER: &str = "Invoice.AccountingSupplierParty.Party";
const CUSTOMER: &str = "Invoice.AccountingCustomerParty.Party";
const LMT: &str = "Invoice.LegalMonetaryTotal";

fn line_path(index: usize, field: &str) -> String {
    format!("Invoice.InvoiceLines.InvoiceLine[{index}].{field}")
}

fn subtotal_path(index: usize, field: &str) -> String {
    format!("Invoice.TaxTotal.TaxSubTotal[{index}].{field}")
}

/// Supplier and, unless anonymous, customer.
fn parties(invoice: &Invoice) -> impl Iterator<Item = (&'static str, &Party)> {
    std::iter::once((SUPPLIER, &invoice.supplier))
        .chain(invoice.customer.as_ref().map(|c| (CUSTOMER, c)))
}

/// Push a finding when two amounts differ by more than the tolerance.
///
/// `expected` is `None` when computing it left the decimal range; that is
/// reported as a finding of its own instead of a mismatch.
fn compare(
    findings: &mut Vec<Finding>,
    options: &ValidationOptions,
    rule: &str,
    path: String,
    expected: Option<Decimal>,
    actual: Decimal,
    message: &str,
) {
    match expected {
        Some(expected) if within_tolerance(expected, actual, options.tolerance) => {}
        Some(expected) => findings.push(Finding::new(
            path,
            rule,
            format_amount(expected),
            format_amount(actual),
            message,
        )),
        None => findings.push(out_of_range(path, rule, format_amount(actual))),
    }
}

fn out_of_range(path: String, rule: &str, actual: String) -> Finding {
    Finding::new(
        path,
        rule,
        "amount within the decimal range",
        actual,
        "amount out of range: the calculation exceeds the supported decimal range",
    )
}

fn check_document_id(invoice: &Invoice, _: &ValidationOptions, findings: &mut Vec<Finding>) {
    if invoice.id.trim().is_empty() {
        findings.push(Finding::new(
            "Invoice.ID",
            "DOC-ID",
            "non-empty identifier",
            &invoice.id,
            "document identifier must not be empty",
        ));
    }
}

fn check_document_uuid(invoice: &Invoice, _: &ValidationOptions, findings: &mut Vec<Finding>) {
    if !is_hyphenated_uuid(&invoice.uuid) {
        findings.push(Finding::new(
            "Invoice.UUID",
            "DOC-UUID",
            "UUID in 8-4-4-4-12 hex form",
            &invoice.uuid,
            "document UUID is not a valid UUID",
        ));
    }
}

fn is_hyphenated_uuid(value: &str) -> bool {
    // Uuid::try_parse also accepts the simple, braced and urn forms.
    value.len() == 36 && uuid::Uuid::try_parse(value).is_ok()
}

fn check_tax_point(invoice: &Invoice, options: &ValidationOptions, findings: &mut Vec<Finding>) {
    let Some(tax_point) = invoice.tax_point_date else {
        return;
    };
    let Some(latest) = options.tax_point_grace.latest_issue_date(tax_point) else {
        return;
    };
    if invoice.issue_date > latest {
        findings.push(Finding::new(
            "Invoice.IssueDate",
            "DOC-TAX-POINT",
            format!("on or before {latest}"),
            invoice.issue_date.to_string(),
            format!("issue date is later than tax point date {tax_point} plus the grace period"),
        ));
    }
}

fn check_currency(invoice: &Invoice, _: &ValidationOptions, findings: &mut Vec<Finding>) {
    let codes = std::iter::once(("Invoice.LocalCurrencyCode", Some(&invoice.local_currency_code)))
        .chain(std::iter::once((
            "Invoice.ForeignCurrencyCode",
            invoice.foreign_currency_code.as_ref(),
        )));
    for (path, code) in codes {
        let Some(code) = code else { continue };
        if !is_known_currency_code(code) {
            findings.push(Finding::new(
                path,
                "DOC-CURRENCY",
                "ISO 4217 currency code",
                code,
                format!("currency code '{code}' is not a known ISO 4217 code"),
            ));
        }
    }
}

fn check_exchange_rate(invoice: &Invoice, _: &ValidationOptions, findings: &mut Vec<Finding>) {
    const RULE: &str = "DOC-EXCHANGE-RATE";
    match &invoice.foreign_currency_code {
        Some(foreign) => {
            if *foreign == invoice.local_currency_code {
                findings.push(Finding::new(
                    "Invoice.ForeignCurrencyCode",
                    RULE,
                    format!("different from {}", invoice.local_currency_code),
                    foreign,
                    "foreign currency must differ from the local currency",
                ));
            }
            for (path, rate) in [
                ("Invoice.CurrRate", invoice.curr_rate),
                ("Invoice.RefCurrRate", invoice.ref_curr_rate),
            ] {
                if rate <= Decimal::ZERO {
                    findings.push(Finding::new(
                        path,
                        RULE,
                        "positive rate",
                        rate.to_string(),
                        "exchange rate must be positive",
                    ));
                }
            }
        }
        None => {
            for (path, rate) in [
                ("Invoice.CurrRate", invoice.curr_rate),
                ("Invoice.RefCurrRate", invoice.ref_curr_rate),
            ] {
                if rate != Decimal::ONE {
                    findings.push(Finding::new(
                        path,
                        RULE,
                        "1",
                        rate.to_string(),
                        "exchange rate must be 1 without a foreign currency",
                    ));
                }
            }
        }
    }
}

/// Every foreign-currency amount slot of the document with its presence.
fn foreign_amount_slots(invoice: &Invoice) -> Vec<(String, bool)> {
    let mut slots = Vec::new();
    for (i, line) in invoice.lines.iter().enumerate() {
        slots.push((
            line_path(i, "LineExtensionAmountCurr"),
            line.line_extension_amount_curr.is_some(),
        ));
        slots.push((
            line_path(i, "LineExtensionAmountTaxInclusiveCurr"),
            line.line_extension_amount_tax_inclusive_curr.is_some(),
        ));
    }
    for (i, sub) in invoice.tax_total.tax_sub_total.iter().enumerate() {
        let fields = [
            ("TaxableAmountCurr", sub.taxable_amount_curr),
            ("TaxAmountCurr", sub.tax_amount_curr),
            ("TaxInclusiveAmountCurr", sub.tax_inclusive_amount_curr),
            ("AlreadyClaimedTaxableAmountCurr", sub.already_claimed_taxable_amount_curr),
            ("AlreadyClaimedTaxAmountCurr", sub.already_claimed_tax_amount_curr),
            (
                "AlreadyClaimedTaxInclusiveAmountCurr",
                sub.already_claimed_tax_inclusive_amount_curr,
            ),
            ("DifferenceTaxableAmountCurr", sub.difference_taxable_amount_curr),
            ("DifferenceTaxAmountCurr", sub.difference_tax_amount_curr),
            (
                "DifferenceTaxInclusiveAmountCurr",
                sub.difference_tax_inclusive_amount_curr,
            ),
        ];
        for (field, value) in fields {
            slots.push((subtotal_path(i, field), value.is_some()));
        }
    }
    for (i, deposit) in invoice.non_taxed_deposits.iter().enumerate() {
        slots.push((
            format!("Invoice.NonTaxedDeposits.NonTaxedDeposit[{i}].DepositAmountCurr"),
            deposit.deposit_amount_curr.is_some(),
        ));
    }
    for (i, deposit) in invoice.taxed_deposits.iter().enumerate() {
        let fields = [
            ("TaxableDepositAmountCurr", deposit.taxable_deposit_amount_curr),
            ("TaxInclusiveDepositAmountCurr", deposit.tax_inclusive_deposit_amount_curr),
        ];
        for (field, value) in fields {
            slots.push((
                format!("Invoice.TaxedDeposits.TaxedDeposit[{i}].{field}"),
                value.is_some(),
            ));
        }
    }
    slots.push((
        "Invoice.TaxTotal.TaxAmountCurr".to_string(),
        invoice.tax_total.tax_amount_curr.is_some(),
    ));

    let lmt = &invoice.legal_monetary_total;
    let mut totals = vec![
        ("TaxExclusiveAmountCurr", lmt.tax_exclusive_amount_curr),
        ("TaxInclusiveAmountCurr", lmt.tax_inclusive_amount_curr),
        (
            "AlreadyClaimedTaxExclusiveAmountCurr",
            lmt.already_claimed_tax_exclusive_amount_curr,
        ),
        (
            "AlreadyClaimedTaxInclusiveAmountCurr",
            lmt.already_claimed_tax_inclusive_amount_curr,
        ),
        (
            "DifferenceTaxExclusiveAmountCurr",
            lmt.difference_tax_exclusive_amount_curr,
        ),
        (
            "DifferenceTaxInclusiveAmountCurr",
            lmt.difference_tax_inclusive_amount_curr,
        ),
        ("PaidDepositsAmountCurr", lmt.paid_deposits_amount_curr),
        ("PayableAmountCurr", lmt.payable_amount_curr),
    ];
    // Rounding has a foreign counterpart only when it is stated at all.
    if lmt.payable_rounding_amount.is_some() || lmt.payable_rounding_amount_curr.is_some() {
        totals.push(("PayableRoundingAmountCurr", lmt.payable_rounding_amount_curr));
    }
    for (field, value) in totals {
        slots.push((format!("{LMT}.{field}"), value.is_some()));
    }
    slots
}

fn check_foreign_amounts(invoice: &Invoice, _: &ValidationOptions, findings: &mut Vec<Finding>) {
    let foreign = invoice.has_foreign_currency();
    for (path, present) in foreign_amount_slots(invoice) {
        if foreign && !present {
            findings.push(Finding::new(
                path,
                "DOC-FOREIGN-AMOUNTS",
                "present",
                "absent",
                "amount in foreign currency is required when ForeignCurrencyCode is set",
            ));
        } else if !foreign && present {
            findings.push(Finding::new(
                path,
                "DOC-FOREIGN-AMOUNTS",
                "absent",
                "present",
                "amount in foreign currency is not allowed without ForeignCurrencyCode",
            ));
        }
    }
}

fn check_original_reference(invoice: &Invoice, _: &ValidationOptions, findings: &mut Vec<Finding>) {
    if invoice.document_type.requires_original_reference()
        && invoice.original_document_references.is_empty()
    {
        findings.push(Finding::new(
            "Invoice.OriginalDocumentReferences",
            "DOC-ORIGINAL-REFERENCE",
            "at least one OriginalDocumentReference",
            "none",
            format!(
                "document type {} must reference the corrected document",
                invoice.document_type.code()
            ),
        ));
    }
}

fn check_party_identification(
    invoice: &Invoice,
    _: &ValidationOptions,
    findings: &mut Vec<Finding>,
) {
    for (prefix, party) in parties(invoice) {
        let id = &party.party_identification.id;
        if id.trim().is_empty() {
            findings.push(Finding::new(
                format!("{prefix}.PartyIdentification.ID"),
                "PARTY-IDENTIFICATION",
                "non-empty identifier",
                id,
                "party identifier must not be empty",
            ));
        }
    }
}

fn check_party_name(invoice: &Invoice, _: &ValidationOptions, findings: &mut Vec<Finding>) {
    for (prefix, party) in parties(invoice) {
        let name = &party.party_name.name;
        if name.trim().is_empty() {
            findings.push(Finding::new(
                format!("{prefix}.PartyName.Name"),
                "PARTY-NAME",
                "non-empty name",
                name,
                "party name must not be empty",
            ));
        }
    }
}

fn check_party_country(invoice: &Invoice, _: &ValidationOptions, findings: &mut Vec<Finding>) {
    for (prefix, party) in parties(invoice) {
        let code = &party.postal_address.country.identification_code;
        if !is_known_country_code(code) {
            findings.push(Finding::new(
                format!("{prefix}.PostalAddress.Country.IdentificationCode"),
                "PARTY-COUNTRY",
                "ISO 3166-1 alpha-2 code",
                code,
                format!("country code '{code}' is not a known ISO 3166-1 code"),
            ));
        }
    }
}

fn check_line_ids(invoice: &Invoice, _: &ValidationOptions, findings: &mut Vec<Finding>) {
    let mut seen = HashSet::new();
    for (i, line) in invoice.lines.iter().enumerate() {
        let id = line.id.trim();
        if id.is_empty() {
            findings.push(Finding::new(
                line_path(i, "ID"),
                "LINE-ID",
                "non-empty identifier",
                &line.id,
                "line identifier must not be empty",
            ));
        } else if !seen.insert(id) {
            findings.push(Finding::new(
                line_path(i, "ID"),
                "LINE-ID",
                "unique identifier",
                &line.id,
                format!("line identifier '{id}' is used by an earlier line"),
            ));
        }
    }
}

fn check_line_extension(invoice: &Invoice, options: &ValidationOptions, findings: &mut Vec<Finding>) {
    for (i, line) in invoice.lines.iter().enumerate() {
        let expected = line
            .invoiced_quantity
            .value
            .checked_mul(line.unit_price)
            .map(|amount| round_half_up(amount, 2));
        compare(
            findings,
            options,
            "LINE-EXTENSION",
            line_path(i, "LineExtensionAmount"),
            expected,
            line.line_extension_amount,
            "line extension amount does not match quantity x unit price",
        );
    }
}

/// Line VAT according to the line's calculation method, or `None` when the
/// computation leaves the decimal range.
pub fn expected_line_tax(line: &InvoiceLine) -> Option<Decimal> {
    let percent = line.classified_tax_category.percent;
    let raw = match line.classified_tax_category.vat_calculation_method {
        VatCalculationMethod::FromBottom => line
            .line_extension_amount
            .checked_mul(percent)?
            .checked_div(Decimal::ONE_HUNDRED)?,
        VatCalculationMethod::FromTop => {
            let divisor = Decimal::ONE_HUNDRED.checked_add(percent)?;
            if divisor.is_zero() {
                return Some(Decimal::ZERO);
            }
            line.line_extension_amount_tax_inclusive
                .checked_mul(percent)?
                .checked_div(divisor)?
        }
    };
    Some(round_half_up(raw, 2))
}

fn check_line_tax(invoice: &Invoice, options: &ValidationOptions, findings: &mut Vec<Finding>) {
    for (i, line) in invoice.lines.iter().enumerate() {
        compare(
            findings,
            options,
            "LINE-TAX",
            line_path(i, "LineExtensionTaxAmount"),
            expected_line_tax(line),
            line.line_extension_tax_amount,
            "line tax amount does not match the tax rate",
        );
    }
}

fn check_line_tax_inclusive(
    invoice: &Invoice,
    options: &ValidationOptions,
    findings: &mut Vec<Finding>,
) {
    for (i, line) in invoice.lines.iter().enumerate() {
        compare(
            findings,
            options,
            "LINE-TAX-INCLUSIVE",
            line_path(i, "LineExtensionAmountTaxInclusive"),
            line.line_extension_amount
                .checked_add(line.line_extension_tax_amount),
            line.line_extension_amount_tax_inclusive,
            "line inclusive amount does not equal extension amount + tax amount",
        );
    }
}

fn check_line_vat_applicable(
    invoice: &Invoice,
    _: &ValidationOptions,
    findings: &mut Vec<Finding>,
) {
    if invoice.vat_applicable {
        return;
    }
    for (i, line) in invoice.lines.iter().enumerate() {
        if line.classified_tax_category.vat_applicable == Some(true) {
            findings.push(Finding::new(
                line_path(i, "ClassifiedTaxCategory.VATApplicable"),
                "LINE-VAT-APPLICABLE",
                "false",
                "true",
                "line is VAT-applicable on a document without VAT",
            ));
        }
    }
}

fn check_item_identification(
    invoice: &Invoice,
    _: &ValidationOptions,
    findings: &mut Vec<Finding>,
) {
    for (i, line) in invoice.lines.iter().enumerate() {
        let item = &line.item;
        let primary = item.sellers_item_identification.is_some();
        let secondary = item.secondary_sellers_item_identification.is_some();
        if secondary && !primary {
            findings.push(Finding::new(
                line_path(i, "Item.SecondarySellersItemIdentification"),
                "LINE-ITEM-IDENTIFICATION",
                "SellersItemIdentification present",
                "absent",
                "secondary seller identification requires the primary one",
            ));
        }
        if item.tertiary_sellers_item_identification.is_some() && !(primary && secondary) {
            findings.push(Finding::new(
                line_path(i, "Item.TertiarySellersItemIdentification"),
                "LINE-ITEM-IDENTIFICATION",
                "primary and secondary seller identifications present",
                "absent",
                "tertiary seller identification requires the primary and secondary ones",
            ));
        }
    }
}

fn check_store_batches(invoice: &Invoice, _: &ValidationOptions, findings: &mut Vec<Finding>) {
    const RULE: &str = "LINE-STORE-BATCH";
    for (i, line) in invoice.lines.iter().enumerate() {
        let batches = &line.item.store_batches;
        if batches.is_empty() {
            continue;
        }
        let line_unit = line.invoiced_quantity.unit_code.as_deref();

        let mut units: Vec<&str> = Vec::new();
        for (j, batch) in batches.iter().enumerate() {
            let Some(unit) = batch.quantity.unit_code.as_deref() else {
                continue;
            };
            if !units.contains(&unit) {
                units.push(unit);
            }
            if let Some(line_unit) = line_unit.filter(|u| *u != unit) {
                findings.push(Finding::new(
                    line_path(i, &format!("Item.StoreBatches.StoreBatch[{j}].Quantity")),
                    RULE,
                    line_unit,
                    unit,
                    "batch unit differs from the unit of the invoiced quantity",
                ));
            }
        }
        if units.len() > 1 {
            findings.push(Finding::new(
                line_path(i, "Item.StoreBatches"),
                RULE,
                "one unit",
                units.join(", "),
                "batches of one line use different units",
            ));
        }

        let path = line_path(i, "Item.StoreBatches");
        let invoiced = line.invoiced_quantity.value;
        match checked_sum(batches.iter().map(|b| b.quantity.value)) {
            // Quantities are compared exactly; the amount tolerance does not apply.
            Some(sum) if sum == invoiced => {}
            Some(sum) => findings.push(Finding::new(
                path,
                RULE,
                invoiced.normalize().to_string(),
                sum.normalize().to_string(),
                "batch quantities do not add up to the invoiced quantity",
            )),
            None => findings.push(out_of_range(path, RULE, invoiced.normalize().to_string())),
        }
    }
}

fn check_subtotal_difference(
    invoice: &Invoice,
    options: &ValidationOptions,
    findings: &mut Vec<Finding>,
) {
    for (i, sub) in invoice.tax_total.tax_sub_total.iter().enumerate() {
        let triples = [
            (
                "DifferenceTaxableAmount",
                sub.taxable_amount,
                sub.already_claimed_taxable_amount,
                sub.difference_taxable_amount,
            ),
            (
                "DifferenceTaxAmount",
                sub.tax_amount,
                sub.already_claimed_tax_amount,
                sub.difference_tax_amount,
            ),
            (
                "DifferenceTaxInclusiveAmount",
                sub.tax_inclusive_amount,
                sub.already_claimed_tax_inclusive_amount,
                sub.difference_tax_inclusive_amount,
            ),
        ];
        for (field, current, claimed, difference) in triples {
            compare(
                findings,
                options,
                "SUBTOTAL-DIFFERENCE",
                subtotal_path(i, field),
                current.checked_sub(claimed),
                difference,
                "difference does not equal current minus already claimed amount",
            );
        }
    }
}

fn check_subtotal_inclusive(
    invoice: &Invoice,
    options: &ValidationOptions,
    findings: &mut Vec<Finding>,
) {
    for (i, sub) in invoice.tax_total.tax_sub_total.iter().enumerate() {
        compare(
            findings,
            options,
            "SUBTOTAL-INCLUSIVE",
            subtotal_path(i, "TaxInclusiveAmount"),
            sub.taxable_amount.checked_add(sub.tax_amount),
            sub.tax_inclusive_amount,
            "subtotal inclusive amount does not equal taxable amount + tax amount",
        );
    }
}

fn check_tax_total(invoice: &Invoice, options: &ValidationOptions, findings: &mut Vec<Finding>) {
    let sum = checked_sum(invoice.tax_total.tax_sub_total.iter().map(|s| s.tax_amount));
    compare(
        findings,
        options,
        "TAX-TOTAL",
        "Invoice.TaxTotal.TaxAmount".to_string(),
        sum,
        invoice.tax_total.tax_amount,
        "tax total does not equal the sum of subtotal tax amounts",
    );
}

fn check_total_lines(invoice: &Invoice, options: &ValidationOptions, findings: &mut Vec<Finding>) {
    let sum = checked_sum(invoice.lines.iter().map(|l| l.line_extension_amount));
    compare(
        findings,
        options,
        "TOTAL-LINES",
        format!("{LMT}.TaxExclusiveAmount"),
        sum,
        invoice.legal_monetary_total.tax_exclusive_amount,
        "tax-exclusive total does not equal the sum of line extension amounts",
    );
}

fn check_total_tax(invoice: &Invoice, options: &ValidationOptions, findings: &mut Vec<Finding>) {
    let lmt = &invoice.legal_monetary_total;
    compare(
        findings,
        options,
        "TOTAL-TAX",
        format!("{LMT}.TaxInclusiveAmount"),
        lmt.tax_exclusive_amount.checked_add(invoice.tax_total.tax_amount),
        lmt.tax_inclusive_amount,
        "tax-inclusive total does not equal tax-exclusive total + tax total",
    );
}

fn check_total_difference(
    invoice: &Invoice,
    options: &ValidationOptions,
    findings: &mut Vec<Finding>,
) {
    let lmt = &invoice.legal_monetary_total;
    compare(
        findings,
        options,
        "TOTAL-DIFFERENCE",
        format!("{LMT}.DifferenceTaxExclusiveAmount"),
        lmt.tax_exclusive_amount
            .checked_sub(lmt.already_claimed_tax_exclusive_amount),
        lmt.difference_tax_exclusive_amount,
        "difference does not equal current minus already claimed amount",
    );
    compare(
        findings,
        options,
        "TOTAL-DIFFERENCE",
        format!("{LMT}.DifferenceTaxInclusiveAmount"),
        lmt.tax_inclusive_amount
            .checked_sub(lmt.already_claimed_tax_inclusive_amount),
        lmt.difference_tax_inclusive_amount,
        "difference does not equal current minus already claimed amount",
    );
}

fn check_total_payable(invoice: &Invoice, options: &ValidationOptions, findings: &mut Vec<Finding>) {
    let lmt = &invoice.legal_monetary_total;
    let rounding = lmt.payable_rounding_amount.unwrap_or_default();
    compare(
        findings,
        options,
        "TOTAL-PAYABLE",
        format!("{LMT}.PayableAmount"),
        lmt.difference_tax_inclusive_amount
            .checked_add(rounding)
            .and_then(|amount| amount.checked_sub(lmt.paid_deposits_amount)),
        lmt.payable_amount,
        "payable amount does not equal difference inclusive + rounding - paid deposits",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::TaxPointGrace;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn party(name: &str, id: &str) -> Party {
        Party {
            party_identification: PartyIdentification {
                user_id: None,
                catalog_firm_identification: None,
                id: id.into(),
            },
            party_name: PartyName { name: name.into() },
            postal_address: PostalAddress {
                street_name: "Náměstí Míru".into(),
                building_number: "1".into(),
                city_name: "Praha".into(),
                postal_zone: "12000".into(),
                country: Country {
                    identification_code: "CZ".into(),
                    name: None,
                },
            },
            party_tax_scheme: Vec::new(),
            contact: None,
        }
    }

    fn line(id: &str, qty: Decimal, price: Decimal, percent: Decimal) -> InvoiceLine {
        let ext = qty * price;
        let tax = round_half_up(ext * percent / dec!(100), 2);
        InvoiceLine {
            id: id.into(),
            invoiced_quantity: Quantity {
                value: qty,
                unit_code: Some("PCE".into()),
            },
            line_extension_amount_curr: None,
            line_extension_amount: ext,
            line_extension_amount_tax_inclusive_curr: None,
            line_extension_amount_tax_inclusive: ext + tax,
            line_extension_tax_amount: tax,
            unit_price: price,
            unit_price_tax_inclusive: price,
            classified_tax_category: ClassifiedTaxCategory {
                percent,
                vat_calculation_method: VatCalculationMethod::FromBottom,
                vat_applicable: Some(true),
            },
            note: None,
            item: Item {
                description: Some("Service".into()),
                catalogue_item_identification: None,
                sellers_item_identification: None,
                secondary_sellers_item_identification: None,
                tertiary_sellers_item_identification: None,
                buyers_item_identification: None,
                store_batches: Vec::new(),
            },
        }
    }

    fn subtotal(taxable: Decimal, tax: Decimal, percent: Decimal) -> TaxSubTotal {
        TaxSubTotal {
            taxable_amount_curr: None,
            taxable_amount: taxable,
            tax_amount_curr: None,
            tax_amount: tax,
            tax_inclusive_amount_curr: None,
            tax_inclusive_amount: taxable + tax,
            already_claimed_taxable_amount_curr: None,
            already_claimed_taxable_amount: Decimal::ZERO,
            already_claimed_tax_amount_curr: None,
            already_claimed_tax_amount: Decimal::ZERO,
            already_claimed_tax_inclusive_amount_curr: None,
            already_claimed_tax_inclusive_amount: Decimal::ZERO,
            difference_taxable_amount_curr: None,
            difference_taxable_amount: taxable,
            difference_tax_amount_curr: None,
            difference_tax_amount: tax,
            difference_tax_inclusive_amount_curr: None,
            difference_tax_inclusive_amount: taxable + tax,
            tax_category: TaxCategory {
                percent,
                tax_scheme: None,
                vat_applicable: None,
                local_reverse_charge_flag: None,
            },
        }
    }

    fn totals(excl: Decimal, incl: Decimal) -> LegalMonetaryTotal {
        LegalMonetaryTotal {
            tax_exclusive_amount: excl,
            tax_exclusive_amount_curr: None,
            tax_inclusive_amount: incl,
            tax_inclusive_amount_curr: None,
            already_claimed_tax_exclusive_amount: Decimal::ZERO,
            already_claimed_tax_exclusive_amount_curr: None,
            already_claimed_tax_inclusive_amount: Decimal::ZERO,
            already_claimed_tax_inclusive_amount_curr: None,
            difference_tax_exclusive_amount: excl,
            difference_tax_exclusive_amount_curr: None,
            difference_tax_inclusive_amount: incl,
            difference_tax_inclusive_amount_curr: None,
            payable_rounding_amount: None,
            payable_rounding_amount_curr: None,
            paid_deposits_amount: Decimal::ZERO,
            paid_deposits_amount_curr: None,
            payable_amount: incl,
            payable_amount_curr: None,
        }
    }

    fn sample() -> Invoice {
        Invoice {
            version: "6.0.2".into(),
            document_type: DocumentType::Invoice,
            sub_document_type: None,
            sub_document_type_origin: None,
            id: "FV-2024-001".into(),
            uuid: "0fe7a8b3-5b4e-4b7c-9c1e-2f0a1b2c3d4e".into(),
            issuing_system: None,
            issue_date: date(2024, 3, 10),
            tax_point_date: Some(date(2024, 3, 1)),
            vat_applicable: true,
            note: None,
            local_currency_code: "CZK".into(),
            foreign_currency_code: None,
            curr_rate: Decimal::ONE,
            ref_curr_rate: Decimal::ONE,
            supplier: party("Dodavatel s.r.o.", "12345678"),
            anonymous_customer_party: None,
            customer: Some(party("Odběratel a.s.", "87654321")),
            original_document_references: Vec::new(),
            lines: vec![line("1", dec!(1), dec!(1000.00), dec!(21))],
            non_taxed_deposits: Vec::new(),
            taxed_deposits: Vec::new(),
            tax_total: TaxTotal {
                tax_sub_total: vec![subtotal(dec!(1000.00), dec!(210.00), dec!(21))],
                tax_amount_curr: None,
                tax_amount: dec!(210.00),
            },
            legal_monetary_total: totals(dec!(1000.00), dec!(1210.00)),
            payment_means: None,
        }
    }

    fn rule_ids(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.rule.as_str()).collect()
    }

    #[test]
    fn sample_is_clean() {
        let findings = evaluate(&sample(), &ValidationOptions::default());
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[test]
    fn catalog_order_and_unique_ids() {
        let ids: Vec<&str> = rules().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 24);
        assert_eq!(ids[0], "DOC-ID");
        assert_eq!(ids[16], "LINE-STORE-BATCH");
        assert_eq!(ids[23], "TOTAL-PAYABLE");
        assert!(rules().iter().all(|r| !r.description.is_empty()));
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn wrong_line_tax() {
        let mut invoice = sample();
        invoice.lines[0].line_extension_tax_amount = dec!(200.00);
        invoice.lines[0].line_extension_amount_tax_inclusive = dec!(1200.00);
        invoice.tax_total.tax_sub_total[0] = subtotal(dec!(1000.00), dec!(200.00), dec!(21));
        invoice.tax_total.tax_amount = dec!(200.00);
        invoice.legal_monetary_total = totals(dec!(1000.00), dec!(1200.00));

        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(rule_ids(&findings), vec!["LINE-TAX"]);
        assert_eq!(
            findings[0].path,
            "Invoice.InvoiceLines.InvoiceLine[0].LineExtensionTaxAmount"
        );
        assert_eq!(findings[0].expected, "210.00");
        assert_eq!(findings[0].actual, "200.00");
    }

    #[test]
    fn tax_from_top() {
        let mut l = line("1", dec!(1), dec!(1000), dec!(21));
        l.classified_tax_category.vat_calculation_method = VatCalculationMethod::FromTop;
        l.line_extension_amount_tax_inclusive = dec!(1210);
        assert_eq!(expected_line_tax(&l), Some(dec!(210.00)));

        l.line_extension_amount_tax_inclusive = dec!(100);
        // 100 * 21 / 121 = 17.355...
        assert_eq!(expected_line_tax(&l), Some(dec!(17.36)));
    }

    #[test]
    fn tax_point_grace() {
        let mut invoice = sample();
        invoice.issue_date = date(2024, 3, 16);
        assert!(evaluate(&invoice, &ValidationOptions::default()).is_empty());

        invoice.issue_date = date(2024, 3, 17);
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(rule_ids(&findings), vec!["DOC-TAX-POINT"]);
        assert_eq!(findings[0].expected, "on or before 2024-03-16");

        let relaxed = ValidationOptions::default().with_tax_point_grace(TaxPointGrace::Unlimited);
        assert!(evaluate(&invoice, &relaxed).is_empty());

        invoice.tax_point_date = None;
        assert!(evaluate(&invoice, &ValidationOptions::default()).is_empty());
    }

    #[test]
    fn uuid_forms() {
        assert!(is_hyphenated_uuid("0fe7a8b3-5b4e-4b7c-9c1e-2f0a1b2c3d4e"));
        assert!(is_hyphenated_uuid("0FE7A8B3-5B4E-4B7C-9C1E-2F0A1B2C3D4E"));
        assert!(!is_hyphenated_uuid("0fe7a8b35b4e4b7c9c1e2f0a1b2c3d4e"));
        assert!(!is_hyphenated_uuid("{0fe7a8b3-5b4e-4b7c-9c1e-2f0a1b2c3d4e}"));
        assert!(!is_hyphenated_uuid("not-a-uuid"));
        assert!(!is_hyphenated_uuid(""));
    }

    #[test]
    fn foreign_currency_setup() {
        let mut invoice = sample();
        invoice.foreign_currency_code = Some("EUR".into());
        invoice.curr_rate = dec!(25.10);
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert!(!findings.is_empty());
        assert!(findings.iter().all(|f| f.rule == "DOC-FOREIGN-AMOUNTS"));
        assert!(
            findings
                .iter()
                .any(|f| f.path == "Invoice.LegalMonetaryTotal.PayableAmountCurr")
        );
        // No PayableRoundingAmount, so no foreign counterpart is expected.
        assert!(
            !findings
                .iter()
                .any(|f| f.path.ends_with("PayableRoundingAmountCurr"))
        );

        let mut invoice = sample();
        invoice.curr_rate = dec!(2);
        invoice.lines[0].line_extension_amount_curr = Some(dec!(40));
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(
            rule_ids(&findings),
            vec!["DOC-EXCHANGE-RATE", "DOC-FOREIGN-AMOUNTS"]
        );
    }

    #[test]
    fn same_foreign_and_local_currency() {
        let mut invoice = sample();
        invoice.foreign_currency_code = Some("CZK".into());
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert!(findings.iter().any(|f| f.rule == "DOC-EXCHANGE-RATE"
            && f.path == "Invoice.ForeignCurrencyCode"));
    }

    #[test]
    fn credit_note_needs_reference() {
        let mut invoice = sample();
        invoice.document_type = DocumentType::CreditNote;
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(rule_ids(&findings), vec!["DOC-ORIGINAL-REFERENCE"]);

        invoice.original_document_references.push(OriginalDocumentReference {
            reference_id: "orig".into(),
            id: "FV-2024-000".into(),
            issue_date: None,
            uuid: None,
        });
        assert!(evaluate(&invoice, &ValidationOptions::default()).is_empty());
    }

    #[test]
    fn party_rules() {
        let mut invoice = sample();
        invoice.supplier.party_name.name = "  ".into();
        let customer = invoice.customer.as_mut().unwrap();
        customer.party_identification.id = String::new();
        customer.postal_address.country.identification_code = "XX".into();
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(
            rule_ids(&findings),
            vec!["PARTY-IDENTIFICATION", "PARTY-NAME", "PARTY-COUNTRY"]
        );
        assert_eq!(
            findings[0].path,
            "Invoice.AccountingCustomerParty.Party.PartyIdentification.ID"
        );
        assert_eq!(findings[1].path, "Invoice.AccountingSupplierParty.Party.PartyName.Name");
    }

    #[test]
    fn duplicate_line_ids() {
        let mut invoice = sample();
        invoice.lines.push(line("1", dec!(0), dec!(0), dec!(21)));
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(rule_ids(&findings), vec!["LINE-ID"]);
        assert_eq!(findings[0].path, "Invoice.InvoiceLines.InvoiceLine[1].ID");
    }

    #[test]
    fn line_vat_on_non_vat_document() {
        let mut invoice = sample();
        invoice.vat_applicable = false;
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(rule_ids(&findings), vec!["LINE-VAT-APPLICABLE"]);
    }

    #[test]
    fn item_identification_order() {
        let mut invoice = sample();
        invoice.lines[0].item.tertiary_sellers_item_identification =
            Some(ItemIdentification { id: "T".into() });
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(rule_ids(&findings), vec!["LINE-ITEM-IDENTIFICATION"]);

        invoice.lines[0].item.secondary_sellers_item_identification =
            Some(ItemIdentification { id: "S".into() });
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(rule_ids(&findings), vec!["LINE-ITEM-IDENTIFICATION"; 2]);

        invoice.lines[0].item.sellers_item_identification =
            Some(ItemIdentification { id: "P".into() });
        assert!(evaluate(&invoice, &ValidationOptions::default()).is_empty());
    }

    #[test]
    fn already_claimed_amounts() {
        let mut invoice = sample();
        let sub = &mut invoice.tax_total.tax_sub_total[0];
        sub.already_claimed_taxable_amount = dec!(500.00);
        sub.already_claimed_tax_amount = dec!(105.00);
        sub.already_claimed_tax_inclusive_amount = dec!(605.00);
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(rule_ids(&findings), vec!["SUBTOTAL-DIFFERENCE"; 3]);

        let sub = &mut invoice.tax_total.tax_sub_total[0];
        sub.difference_taxable_amount = dec!(500.00);
        sub.difference_tax_amount = dec!(105.00);
        sub.difference_tax_inclusive_amount = dec!(605.00);
        assert!(evaluate(&invoice, &ValidationOptions::default()).is_empty());
    }

    #[test]
    fn payable_with_rounding_and_deposits() {
        let mut invoice = sample();
        let lmt = &mut invoice.legal_monetary_total;
        lmt.payable_rounding_amount = Some(dec!(-0.40));
        lmt.paid_deposits_amount = dec!(200.00);
        lmt.payable_amount = dec!(1009.60);
        assert!(evaluate(&invoice, &ValidationOptions::default()).is_empty());

        invoice.legal_monetary_total.payable_amount = dec!(1010.00);
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(rule_ids(&findings), vec!["TOTAL-PAYABLE"]);
        assert_eq!(findings[0].expected, "1009.60");
    }

    #[test]
    fn tolerance_is_configurable() {
        let mut invoice = sample();
        invoice.legal_monetary_total.payable_amount = dec!(1210.04);
        assert_eq!(evaluate(&invoice, &ValidationOptions::default()).len(), 1);
        let loose = ValidationOptions::default().with_tolerance(dec!(0.05));
        assert!(evaluate(&invoice, &loose).is_empty());
    }

    #[test]
    fn anonymous_customer_is_not_checked_as_a_party() {
        let mut invoice = sample();
        invoice.document_type = DocumentType::SimplifiedTaxDocument;
        invoice.customer = None;
        invoice.anonymous_customer_party = Some(AnonymousCustomerParty {
            id: "CARD-0042".into(),
            id_scheme: Some("loyalty".into()),
        });
        invoice.supplier.party_name.name = String::new();
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(rule_ids(&findings), vec!["PARTY-NAME"]);
        assert!(findings[0].path.starts_with(SUPPLIER));
    }

    #[test]
    fn deposits_need_foreign_amounts() {
        let mut invoice = sample();
        invoice.non_taxed_deposits.push(NonTaxedDeposit {
            id: "ZF-1".into(),
            variable_symbol: None,
            deposit_amount_curr: Some(dec!(4)),
            deposit_amount: dec!(100),
        });
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert_eq!(rule_ids(&findings), vec!["DOC-FOREIGN-AMOUNTS"]);
        assert_eq!(
            findings[0].path,
            "Invoice.NonTaxedDeposits.NonTaxedDeposit[0].DepositAmountCurr"
        );
        assert_eq!(findings[0].expected, "absent");

        invoice.foreign_currency_code = Some("EUR".into());
        invoice.curr_rate = dec!(25);
        invoice.taxed_deposits.push(TaxedDeposit {
            id: "ZL-1".into(),
            variable_symbol: Some("2024001".into()),
            taxable_deposit_amount_curr: Some(dec!(4)),
            taxable_deposit_amount: dec!(100),
            tax_inclusive_deposit_amount_curr: None,
            tax_inclusive_deposit_amount: dec!(121),
            classified_tax_category: line("1", dec!(1), dec!(1), dec!(21)).classified_tax_category,
        });
        let findings = evaluate(&invoice, &ValidationOptions::default());
        let paths: Vec<&str> = findings.iter().map(|f| f.path.as_str()).collect();
        let taxed = "Invoice.TaxedDeposits.TaxedDeposit[0]";
        assert!(paths.contains(&format!("{taxed}.TaxInclusiveDepositAmountCurr").as_str()));
        assert!(!paths.contains(&format!("{taxed}.TaxableDepositAmountCurr").as_str()));
        assert!(!paths.contains(&"Invoice.NonTaxedDeposits.NonTaxedDeposit[0].DepositAmountCurr"));
    }

    fn batch(name: &str, value: Decimal, unit: &str) -> StoreBatch {
        StoreBatch {
            name: name.into(),
            note: None,
            expiration_date: None,
            specification: None,
            quantity: Quantity {
                value,
                unit_code: Some(unit.into()),
            },
            batch_or_serial_number: Some("B".into()),
            seal_series_id: None,
        }
    }

    #[test]
    fn store_batches() {
        let mut invoice = sample();
        invoice.lines[0].invoiced_quantity.value = dec!(3);
        invoice.lines[0].item.store_batches =
            vec![batch("A", dec!(1), "PCE"), batch("B", dec!(2.0), "PCE")];
        let findings = evaluate(&invoice, &ValidationOptions::default());
        assert!(!findings.iter().any(|f| f.rule == "LINE-STORE-BATCH"), "{findings:?}");

        invoice.lines[0].item.store_batches =
            vec![batch("A", dec!(1), "PCE"), batch("B", dec!(1), "KGM")];
        let findings: Vec<Finding> = evaluate(&invoice, &ValidationOptions::default())
            .into_iter()
            .filter(|f| f.rule == "LINE-STORE-BATCH")
            .collect();
        assert_eq!(findings.len(), 3, "{findings:?}");
        assert_eq!(
            findings[0].path,
            "Invoice.InvoiceLines.InvoiceLine[0].Item.StoreBatches.StoreBatch[1].Quantity"
        );
        assert_eq!((findings[0].expected.as_str(), findings[0].actual.as_str()), ("PCE", "KGM"));
        assert_eq!(findings[1].actual, "PCE, KGM");
        assert_eq!(findings[2].path, "Invoice.InvoiceLines.InvoiceLine[0].Item.StoreBatches");
        assert_eq!((findings[2].expected.as_str(), findings[2].actual.as_str()), ("3", "2"));
    }

    #[test]
    fn arithmetic_beyond_the_decimal_range() {
        let mut invoice = sample();
        invoice.lines[0].invoiced_quantity.value = dec!(10);
        invoice.lines[0].unit_price = Decimal::MAX;
        invoice.lines[0].line_extension_amount = Decimal::MAX;
        invoice.lines[0].line_extension_tax_amount = Decimal::MAX;
        invoice.lines.push(line("2", dec!(1), Decimal::MAX, dec!(0)));
        invoice.legal_monetary_total.payable_rounding_amount = Some(Decimal::MAX);

        let findings = evaluate(&invoice, &ValidationOptions::default());
        let out_of_range: Vec<&str> = findings
            .iter()
            .filter(|f| f.message.starts_with("amount out of range"))
            .map(|f| f.rule.as_str())
            .collect();
        let expected = [
            "LINE-EXTENSION",
            "LINE-TAX",
            "LINE-TAX-INCLUSIVE",
            "TOTAL-LINES",
            "TOTAL-PAYABLE",
        ];
        for rule in expected {
            assert!(out_of_range.contains(&rule), "{rule}: {findings:?}");
        }
        assert!(!within_tolerance(Decimal::MAX, Decimal::MIN, dec!(0.01)));
    }
}
