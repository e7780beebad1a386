//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fmt::Write;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// The two-line reference document in `tests/fixtures/valid.isdoc`.
pub const VALID: &str = include_str!("../fixtures/valid.isdoc");

pub const NS: &str = "http://isdoc.cz/namespace/2013";

pub fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One invoice line. Derived amounts are computed unless overridden.
#[derive(Debug, Clone)]
pub struct LineSpec {
    pub id: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub percent: Decimal,
    /// Stated tax amount instead of the computed one.
    pub stated_tax: Option<Decimal>,
    /// Stated unit price instead of `unit_price` (extension stays computed).
    pub stated_unit_price: Option<Decimal>,
}

impl LineSpec {
    pub fn new(id: &str, quantity: Decimal, unit_price: Decimal, percent: Decimal) -> Self {
        Self {
            id: id.into(),
            quantity,
            unit_price,
            percent,
            stated_tax: None,
            stated_unit_price: None,
        }
    }

    pub fn extension(&self) -> Decimal {
        round2(self.quantity * self.unit_price)
    }

    pub fn tax(&self) -> Decimal {
        self.stated_tax
            .unwrap_or_else(|| round2(self.extension() * self.percent / dec!(100)))
    }
}

/// A whole document, built so that every total agrees with the stated line
/// amounts.
#[derive(Debug, Clone)]
pub struct DocSpec {
    pub document_type: u8,
    pub id: String,
    pub uuid: String,
    pub issue_date: String,
    pub tax_point_date: Option<String>,
    pub lines: Vec<LineSpec>,
    /// Added to the computed payable amount.
    pub payable_adjustment: Decimal,
    /// Identifier of an anonymous customer, replacing the customer party.
    pub anonymous_customer: Option<String>,
    /// Raw XML inserted after the customer party.
    pub extra: String,
}

impl Default for DocSpec {
    fn default() -> Self {
        Self {
            document_type: 1,
            id: "FV-2024-0001".into(),
            uuid: "0fe7a8b3-5b4e-4b7c-9c1e-2f0a1b2c3d4e".into(),
            issue_date: "2024-03-10".into(),
            tax_point_date: Some("2024-03-01".into()),
            lines: vec![LineSpec::new("1", dec!(1), dec!(1000.00), dec!(21))],
            payable_adjustment: Decimal::ZERO,
            anonymous_customer: None,
            extra: String::new(),
        }
    }
}

fn party(name: &str, id: &str) -> String {
    format!(
        "<Party><PartyIdentification><ID>{id}</ID></PartyIdentification>\
         <PartyName><Name>{name}</Name></PartyName>\
         <PostalAddress><StreetName>Hlavní</StreetName><BuildingNumber>1</BuildingNumber>\
         <CityName>Praha</CityName><PostalZone>11000</PostalZone>\
         <Country><IdentificationCode>CZ</IdentificationCode></Country></PostalAddress></Party>"
    )
}

impl DocSpec {
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        let _ = write!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8"?><Invoice xmlns="{NS}" version="6.0.2">"#
        );
        let _ = write!(
            xml,
            "<DocumentType>{}</DocumentType><ID>{}</ID><UUID>{}</UUID><IssueDate>{}</IssueDate>",
            self.document_type, self.id, self.uuid, self.issue_date
        );
        if let Some(tax_point) = &self.tax_point_date {
            let _ = write!(xml, "<TaxPointDate>{tax_point}</TaxPointDate>");
        }
        xml.push_str(
            "<VATApplicable>true</VATApplicable><LocalCurrencyCode>CZK</LocalCurrencyCode>\
             <CurrRate>1</CurrRate><RefCurrRate>1</RefCurrRate>",
        );
        let _ = write!(
            xml,
            "<AccountingSupplierParty>{}</AccountingSupplierParty>",
            party("Dodavatel s.r.o.", "12345678")
        );
        match &self.anonymous_customer {
            Some(id) => {
                let _ = write!(
                    xml,
                    "<AnonymousCustomerParty><ID>{id}</ID></AnonymousCustomerParty>"
                );
            }
            None => {
                let _ = write!(
                    xml,
                    "<AccountingCustomerParty>{}</AccountingCustomerParty>",
                    party("Odběratel a.s.", "87654321")
                );
            }
        }
        xml.push_str(&self.extra);

        xml.push_str("<InvoiceLines>");
        let mut per_rate: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();
        for line in &self.lines {
            let ext = line.extension();
            let tax = line.tax();
            let entry = per_rate.entry(line.percent).or_default();
            entry.0 += ext;
            entry.1 += tax;
            let price = line.stated_unit_price.unwrap_or(line.unit_price);
            let _ = write!(
                xml,
                "<InvoiceLine><ID>{}</ID><InvoicedQuantity unitCode=\"PCE\">{}</InvoicedQuantity>\
                 <LineExtensionAmount>{ext}</LineExtensionAmount>\
                 <LineExtensionAmountTaxInclusive>{}</LineExtensionAmountTaxInclusive>\
                 <LineExtensionTaxAmount>{tax}</LineExtensionTaxAmount>\
                 <UnitPrice>{price}</UnitPrice><UnitPriceTaxInclusive>{price}</UnitPriceTaxInclusive>\
                 <ClassifiedTaxCategory><Percent>{}</Percent>\
                 <VATCalculationMethod>0</VATCalculationMethod></ClassifiedTaxCategory>\
                 <Item><Description>Položka {}</Description></Item></InvoiceLine>",
                line.id,
                line.quantity,
                ext + tax,
                line.percent,
                line.id
            );
        }
        xml.push_str("</InvoiceLines>");

        xml.push_str("<TaxTotal>");
        let mut tax_total = Decimal::ZERO;
        for (percent, (taxable, tax)) in &per_rate {
            tax_total += *tax;
            let incl = *taxable + *tax;
            let _ = write!(
                xml,
                "<TaxSubTotal><TaxableAmount>{taxable}</TaxableAmount><TaxAmount>{tax}</TaxAmount>\
                 <TaxInclusiveAmount>{incl}</TaxInclusiveAmount>\
                 <AlreadyClaimedTaxableAmount>0</AlreadyClaimedTaxableAmount>\
                 <AlreadyClaimedTaxAmount>0</AlreadyClaimedTaxAmount>\
                 <AlreadyClaimedTaxInclusiveAmount>0</AlreadyClaimedTaxInclusiveAmount>\
                 <DifferenceTaxableAmount>{taxable}</DifferenceTaxableAmount>\
                 <DifferenceTaxAmount>{tax}</DifferenceTaxAmount>\
                 <DifferenceTaxInclusiveAmount>{incl}</DifferenceTaxInclusiveAmount>\
                 <TaxCategory><Percent>{percent}</Percent></TaxCategory></TaxSubTotal>"
            );
        }
        let _ = write!(xml, "<TaxAmount>{tax_total}</TaxAmount></TaxTotal>");

        let excl: Decimal = self.lines.iter().map(LineSpec::extension).sum();
        let incl = excl + tax_total;
        let payable = incl + self.payable_adjustment;
        let _ = write!(
            xml,
            "<LegalMonetaryTotal><TaxExclusiveAmount>{excl}</TaxExclusiveAmount>\
             <TaxInclusiveAmount>{incl}</TaxInclusiveAmount>\
             <AlreadyClaimedTaxExclusiveAmount>0</AlreadyClaimedTaxExclusiveAmount>\
             <AlreadyClaimedTaxInclusiveAmount>0</AlreadyClaimedTaxInclusiveAmount>\
             <DifferenceTaxExclusiveAmount>{excl}</DifferenceTaxExclusiveAmount>\
             <DifferenceTaxInclusiveAmount>{incl}</DifferenceTaxInclusiveAmount>\
             <PaidDepositsAmount>0</PaidDepositsAmount>\
             <PayableAmount>{payable}</PayableAmount></LegalMonetaryTotal>"
        );
        xml.push_str("</Invoice>");
        xml
    }
}

/// One line of 1000.00 at 21% with a stated tax of 200.00 instead of 210.00;
/// every total is built around the stated 200.00.
pub fn example_scenario() -> String {
    let mut line = LineSpec::new("1", dec!(1), dec!(1000.00), dec!(21));
    line.stated_tax = Some(dec!(200.00));
    DocSpec {
        lines: vec![line],
        ..DocSpec::default()
    }
    .to_xml()
}

/// `VALID` with `from` replaced by `to` exactly once.
pub fn valid_with(from: &str, to: &str) -> String {
    assert!(VALID.contains(from), "fixture does not contain {from:?}");
    VALID.replacen(from, to, 1)
}

/// Deposits settled by the reference document, without foreign amounts.
pub const DEPOSITS: &str = "<NonTaxedDeposits><NonTaxedDeposit><ID>ZF-2024-7</ID>\
     <VariableSymbol>20240007</VariableSymbol><DepositAmount>500.00</DepositAmount>\
     </NonTaxedDeposit></NonTaxedDeposits>\
     <TaxedDeposits><TaxedDeposit><ID>DZ-2024-3</ID>\
     <TaxableDepositAmount>100.00</TaxableDepositAmount>\
     <TaxInclusiveDepositAmount>121.00</TaxInclusiveDepositAmount>\
     <ClassifiedTaxCategory><Percent>21</Percent>\
     <VATCalculationMethod>0</VATCalculationMethod></ClassifiedTaxCategory>\
     </TaxedDeposit></TaxedDeposits>";

/// `VALID` with deposits after the invoice lines.
pub fn valid_with_deposits() -> String {
    valid_with("</InvoiceLines>", &format!("</InvoiceLines>{DEPOSITS}"))
}

/// `VALID` with the 3 PCE of the second line split into batches of the
/// given quantities and units.
pub fn valid_with_batches(batches: &[(&str, &str)]) -> String {
    let mut xml = String::from("<Description>Příručka</Description><StoreBatches>");
    for (i, (quantity, unit)) in batches.iter().enumerate() {
        let _ = write!(
            xml,
            "<StoreBatch><Name>Šarže {i}</Name><ExpirationDate>2026-12-31</ExpirationDate>\
             <Quantity unitCode=\"{unit}\">{quantity}</Quantity>\
             <BatchOrSerialNumber>B</BatchOrSerialNumber></StoreBatch>"
        );
    }
    xml.push_str("</StoreBatches>");
    valid_with("<Description>Příručka</Description>", &xml)
}
