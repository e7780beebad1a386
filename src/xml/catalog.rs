//! Field catalog: the ISDOC document structure as static data.
//!
//! Each table lists the fields of one element in the order the mapper reads
//! them. Field names are the wire names and double as the keys of the encoded
//! document, so renaming a field here is a breaking change for callers.

use crate::core::codes::{
    CodeList, DOCUMENT_TYPE_CODES, PAYMENT_MEANS_CODES, VAT_CALCULATION_METHOD_CODES,
};

/// Scalar value types a field can be coerced into.
#[derive(Debug, Clone, Copy)]
pub enum Scalar {
    Text,
    /// Exact decimal (`-?digits[.digits]`).
    Decimal,
    /// `YYYY-MM-DD`.
    Date,
    /// `true` or `false`.
    Bool,
    /// Integer from a closed code list.
    Code(&'static CodeList),
    /// Two uppercase ASCII letters.
    CountryCode,
    /// Three uppercase ASCII letters.
    CurrencyCode,
}

impl Scalar {
    /// Human-readable type name used in coercion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Decimal => "decimal",
            Self::Date => "date (YYYY-MM-DD)",
            Self::Bool => "boolean (true|false)",
            Self::Code(_) => "integer code",
            Self::CountryCode => "country code (two uppercase letters)",
            Self::CurrencyCode => "currency code (three uppercase letters)",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Child element holding a scalar as its text.
    Scalar(Scalar),
    /// Unqualified attribute of the current element.
    Attribute(Scalar),
    /// Text content of the current element itself.
    Content(Scalar),
    /// Child element with fields of its own.
    Group(&'static [Field]),
}

/// How many times a field may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurs {
    Required,
    Optional,
    /// Zero or more.
    Repeated,
    OneOrMore,
}

impl Occurs {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Required => "exactly one",
            Self::Optional => "at most one",
            Self::Repeated => "any number",
            Self::OneOrMore => "one or more",
        }
    }

    /// Repeated fields are addressed with an index in paths.
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Repeated | Self::OneOrMore)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub occurs: Occurs,
}

impl Field {
    const fn element(name: &'static str, scalar: Scalar, occurs: Occurs) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar(scalar),
            occurs,
        }
    }

    const fn attribute(name: &'static str, scalar: Scalar, occurs: Occurs) -> Self {
        Self {
            name,
            kind: FieldKind::Attribute(scalar),
            occurs,
        }
    }

    const fn content(scalar: Scalar) -> Self {
        Self {
            name: "Value",
            kind: FieldKind::Content(scalar),
            occurs: Occurs::Required,
        }
    }

    const fn group(name: &'static str, fields: &'static [Field], occurs: Occurs) -> Self {
        Self {
            name,
            kind: FieldKind::Group(fields),
            occurs,
        }
    }

    const fn text(name: &'static str, occurs: Occurs) -> Self {
        Self::element(name, Scalar::Text, occurs)
    }

    const fn amount(name: &'static str, occurs: Occurs) -> Self {
        Self::element(name, Scalar::Decimal, occurs)
    }
}

use Occurs::{OneOrMore, Optional, Repeated, Required};

/// Root `Invoice` element.
pub static INVOICE: &[Field] = &[
    Field::attribute("version", Scalar::Text, Required),
    Field::element("DocumentType", Scalar::Code(&DOCUMENT_TYPE_CODES), Required),
    Field::text("SubDocumentType", Optional),
    Field::text("SubDocumentTypeOrigin", Optional),
    Field::text("ID", Required),
    Field::text("UUID", Required),
    Field::text("IssuingSystem", Optional),
    Field::element("IssueDate", Scalar::Date, Required),
    Field::element("TaxPointDate", Scalar::Date, Optional),
    Field::element("VATApplicable", Scalar::Bool, Required),
    Field::text("Note", Optional),
    Field::element("LocalCurrencyCode", Scalar::CurrencyCode, Required),
    Field::element("ForeignCurrencyCode", Scalar::CurrencyCode, Optional),
    Field::amount("CurrRate", Required),
    Field::amount("RefCurrRate", Required),
    Field::group("AccountingSupplierParty", PARTY_WRAPPER, Required),
    Field::group("AnonymousCustomerParty", ANONYMOUS_CUSTOMER_PARTY, Optional),
    // Required unless the document is simplified and the customer anonymous;
    // the mapper checks that combination.
    Field::group("AccountingCustomerParty", PARTY_WRAPPER, Optional),
    Field::group("OriginalDocumentReferences", ORIGINAL_DOCUMENT_REFERENCES, Optional),
    Field::group("InvoiceLines", INVOICE_LINES, Required),
    Field::group("NonTaxedDeposits", NON_TAXED_DEPOSITS, Optional),
    Field::group("TaxedDeposits", TAXED_DEPOSITS, Optional),
    Field::group("TaxTotal", TAX_TOTAL, Required),
    Field::group("LegalMonetaryTotal", LEGAL_MONETARY_TOTAL, Required),
    Field::group("PaymentMeans", PAYMENT_MEANS, Optional),
];

const ANONYMOUS_CUSTOMER_PARTY: &[Field] = &[
    Field::text("ID", Required),
    Field::text("IDScheme", Optional),
];

const PARTY_WRAPPER: &[Field] = &[Field::group("Party", PARTY, Required)];

const PARTY: &[Field] = &[
    Field::group("PartyIdentification", PARTY_IDENTIFICATION, Required),
    Field::group("PartyName", PARTY_NAME, Required),
    Field::group("PostalAddress", POSTAL_ADDRESS, Required),
    Field::group("PartyTaxScheme", PARTY_TAX_SCHEME, Repeated),
    Field::group("Contact", CONTACT, Optional),
];

const PARTY_IDENTIFICATION: &[Field] = &[
    Field::text("UserID", Optional),
    Field::text("CatalogFirmIdentification", Optional),
    Field::text("ID", Required),
];

const PARTY_NAME: &[Field] = &[Field::text("Name", Required)];

const POSTAL_ADDRESS: &[Field] = &[
    Field::text("StreetName", Required),
    Field::text("BuildingNumber", Required),
    Field::text("CityName", Required),
    Field::text("PostalZone", Required),
    Field::group("Country", COUNTRY, Required),
];

const COUNTRY: &[Field] = &[
    Field::element("IdentificationCode", Scalar::CountryCode, Required),
    Field::text("Name", Optional),
];

const PARTY_TAX_SCHEME: &[Field] = &[
    Field::text("CompanyID", Required),
    Field::text("TaxScheme", Required),
];

const CONTACT: &[Field] = &[
    Field::text("Name", Optional),
    Field::text("Telephone", Optional),
    Field::text("ElectronicMail", Optional),
];

const ORIGINAL_DOCUMENT_REFERENCES: &[Field] = &[Field::group(
    "OriginalDocumentReference",
    ORIGINAL_DOCUMENT_REFERENCE,
    OneOrMore,
)];

const ORIGINAL_DOCUMENT_REFERENCE: &[Field] = &[
    Field::attribute("id", Scalar::Text, Required),
    Field::text("ID", Required),
    Field::element("IssueDate", Scalar::Date, Optional),
    Field::text("UUID", Optional),
];

const INVOICE_LINES: &[Field] = &[Field::group("InvoiceLine", INVOICE_LINE, OneOrMore)];

const INVOICE_LINE: &[Field] = &[
    Field::text("ID", Required),
    Field::group("InvoicedQuantity", QUANTITY, Required),
    Field::amount("LineExtensionAmountCurr", Optional),
    Field::amount("LineExtensionAmount", Required),
    Field::amount("LineExtensionAmountTaxInclusiveCurr", Optional),
    Field::amount("LineExtensionAmountTaxInclusive", Required),
    Field::amount("LineExtensionTaxAmount", Required),
    Field::amount("UnitPrice", Required),
    Field::amount("UnitPriceTaxInclusive", Required),
    Field::group("ClassifiedTaxCategory", CLASSIFIED_TAX_CATEGORY, Required),
    Field::text("Note", Optional),
    Field::group("Item", ITEM, Required),
];

const QUANTITY: &[Field] = &[
    Field::content(Scalar::Decimal),
    Field::attribute("unitCode", Scalar::Text, Optional),
];

const CLASSIFIED_TAX_CATEGORY: &[Field] = &[
    Field::amount("Percent", Required),
    Field::element(
        "VATCalculationMethod",
        Scalar::Code(&VAT_CALCULATION_METHOD_CODES),
        Required,
    ),
    Field::element("VATApplicable", Scalar::Bool, Optional),
];

const ITEM: &[Field] = &[
    Field::text("Description", Optional),
    Field::group("CatalogueItemIdentification", ITEM_IDENTIFICATION, Optional),
    Field::group("SellersItemIdentification", ITEM_IDENTIFICATION, Optional),
    Field::group("SecondarySellersItemIdentification", ITEM_IDENTIFICATION, Optional),
    Field::group("TertiarySellersItemIdentification", ITEM_IDENTIFICATION, Optional),
    Field::group("BuyersItemIdentification", ITEM_IDENTIFICATION, Optional),
    Field::group("StoreBatches", STORE_BATCHES, Optional),
];

const ITEM_IDENTIFICATION: &[Field] = &[Field::text("ID", Required)];

const STORE_BATCHES: &[Field] = &[Field::group("StoreBatch", STORE_BATCH, OneOrMore)];

const STORE_BATCH: &[Field] = &[
    Field::text("Name", Required),
    Field::text("Note", Optional),
    Field::element("ExpirationDate", Scalar::Date, Optional),
    Field::text("Specification", Optional),
    Field::group("Quantity", QUANTITY, Required),
    Field::text("BatchOrSerialNumber", Optional),
    Field::text("SealSeriesID", Optional),
];

const NON_TAXED_DEPOSITS: &[Field] =
    &[Field::group("NonTaxedDeposit", NON_TAXED_DEPOSIT, OneOrMore)];

const NON_TAXED_DEPOSIT: &[Field] = &[
    Field::text("ID", Required),
    Field::text("VariableSymbol", Optional),
    Field::amount("DepositAmountCurr", Optional),
    Field::amount("DepositAmount", Required),
];

const TAXED_DEPOSITS: &[Field] = &[Field::group("TaxedDeposit", TAXED_DEPOSIT, OneOrMore)];

const TAXED_DEPOSIT: &[Field] = &[
    Field::text("ID", Required),
    Field::text("VariableSymbol", Optional),
    Field::amount("TaxableDepositAmountCurr", Optional),
    Field::amount("TaxableDepositAmount", Required),
    Field::amount("TaxInclusiveDepositAmountCurr", Optional),
    Field::amount("TaxInclusiveDepositAmount", Required),
    Field::group("ClassifiedTaxCategory", CLASSIFIED_TAX_CATEGORY, Required),
];

const TAX_TOTAL: &[Field] = &[
    Field::group("TaxSubTotal", TAX_SUB_TOTAL, OneOrMore),
    Field::amount("TaxAmountCurr", Optional),
    Field::amount("TaxAmount", Required),
];

const TAX_SUB_TOTAL: &[Field] = &[
    Field::amount("TaxableAmountCurr", Optional),
    Field::amount("TaxableAmount", Required),
    Field::amount("TaxAmountCurr", Optional),
    Field::amount("TaxAmount", Required),
    Field::amount("TaxInclusiveAmountCurr", Optional),
    Field::amount("TaxInclusiveAmount", Required),
    Field::amount("AlreadyClaimedTaxableAmountCurr", Optional),
    Field::amount("AlreadyClaimedTaxableAmount", Required),
    Field::amount("AlreadyClaimedTaxAmountCurr", Optional),
    Field::amount("AlreadyClaimedTaxAmount", Required),
    Field::amount("AlreadyClaimedTaxInclusiveAmountCurr", Optional),
    Field::amount("AlreadyClaimedTaxInclusiveAmount", Required),
    Field::amount("DifferenceTaxableAmountCurr", Optional),
    Field::amount("DifferenceTaxableAmount", Required),
    Field::amount("DifferenceTaxAmountCurr", Optional),
    Field::amount("DifferenceTaxAmount", Required),
    Field::amount("DifferenceTaxInclusiveAmountCurr", Optional),
    Field::amount("DifferenceTaxInclusiveAmount", Required),
    Field::group("TaxCategory", TAX_CATEGORY, Required),
];

const TAX_CATEGORY: &[Field] = &[
    Field::amount("Percent", Required),
    Field::text("TaxScheme", Optional),
    Field::element("VATApplicable", Scalar::Bool, Optional),
    Field::element("LocalReverseChargeFlag", Scalar::Bool, Optional),
];

const LEGAL_MONETARY_TOTAL: &[Field] = &[
    Field::amount("TaxExclusiveAmount", Required),
    Field::amount("TaxExclusiveAmountCurr", Optional),
    Field::amount("TaxInclusiveAmount", Required),
    Field::amount("TaxInclusiveAmountCurr", Optional),
    Field::amount("AlreadyClaimedTaxExclusiveAmount", Required),
    Field::amount("AlreadyClaimedTaxExclusiveAmountCurr", Optional),
    Field::amount("AlreadyClaimedTaxInclusiveAmount", Required),
    Field::amount("AlreadyClaimedTaxInclusiveAmountCurr", Optional),
    Field::amount("DifferenceTaxExclusiveAmount", Required),
    Field::amount("DifferenceTaxExclusiveAmountCurr", Optional),
    Field::amount("DifferenceTaxInclusiveAmount", Required),
    Field::amount("DifferenceTaxInclusiveAmountCurr", Optional),
    Field::amount("PayableRoundingAmount", Optional),
    Field::amount("PayableRoundingAmountCurr", Optional),
    Field::amount("PaidDepositsAmount", Required),
    Field::amount("PaidDepositsAmountCurr", Optional),
    Field::amount("PayableAmount", Required),
    Field::amount("PayableAmountCurr", Optional),
];

const PAYMENT_MEANS: &[Field] = &[
    Field::group("Payment", PAYMENT, OneOrMore),
    Field::group("AlternateBankAccounts", ALTERNATE_BANK_ACCOUNTS, Optional),
];

const PAYMENT: &[Field] = &[
    Field::amount("PaidAmount", Required),
    Field::element("PaymentMeansCode", Scalar::Code(&PAYMENT_MEANS_CODES), Required),
    Field::group("Details", PAYMENT_DETAILS, Optional),
];

const PAYMENT_DETAILS: &[Field] = &[
    Field::text("DocumentID", Optional),
    Field::element("IssueDate", Scalar::Date, Optional),
    Field::element("PaymentDueDate", Scalar::Date, Optional),
    Field::text("VariableSymbol", Optional),
    Field::text("ConstantSymbol", Optional),
    Field::text("SpecificSymbol", Optional),
    Field::group("BankAccount", BANK_ACCOUNT, Optional),
];

const ALTERNATE_BANK_ACCOUNTS: &[Field] =
    &[Field::group("AlternateBankAccount", BANK_ACCOUNT, OneOrMore)];

const BANK_ACCOUNT: &[Field] = &[
    Field::text("ID", Required),
    Field::text("BankCode", Optional),
    Field::text("Name", Optional),
    Field::text("IBAN", Optional),
    Field::text("BIC", Optional),
];

/// Look up a field by name in a table.
pub fn find(fields: &'static [Field], name: &str) -> Option<&'static Field> {
    fields.iter().find(|f| f.name == name)
}
