use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// ISDOC XML namespace (v6.x).
pub const ISDOC_NAMESPACE: &str = "http://isdoc.cz/namespace/2013";

/// Root of an ISDOC tax document.
///
/// Built once by the mapper and never mutated afterwards. Serializes to the
/// encoded form with keys equal to the field catalog names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invoice {
    /// Schema version attribute (e.g. "6.0.2").
    #[serde(rename = "version")]
    pub version: String,
    pub document_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_document_type_origin: Option<String>,
    /// Human-readable document number.
    #[serde(rename = "ID")]
    pub id: String,
    /// GUID assigned by the issuing system. Syntax is checked by validation.
    #[serde(rename = "UUID")]
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_system: Option<String>,
    pub issue_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_point_date: Option<NaiveDate>,
    #[serde(rename = "VATApplicable")]
    pub vat_applicable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub local_currency_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_currency_code: Option<String>,
    pub curr_rate: Decimal,
    pub ref_curr_rate: Decimal,
    #[serde(rename = "AccountingSupplierParty", serialize_with = "wrap_party")]
    pub supplier: Party,
    /// Buyer of a simplified tax document who is known by an identifier only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous_customer_party: Option<AnonymousCustomerParty>,
    /// Absent only on a simplified tax document with an anonymous customer.
    #[serde(
        rename = "AccountingCustomerParty",
        skip_serializing_if = "Option::is_none",
        serialize_with = "wrap_optional_party"
    )]
    pub customer: Option<Party>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "wrap_original_document_references"
    )]
    pub original_document_references: Vec<OriginalDocumentReference>,
    #[serde(rename = "InvoiceLines", serialize_with = "wrap_invoice_lines")]
    pub lines: Vec<InvoiceLine>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "wrap_non_taxed_deposits")]
    pub non_taxed_deposits: Vec<NonTaxedDeposit>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "wrap_taxed_deposits")]
    pub taxed_deposits: Vec<TaxedDeposit>,
    pub tax_total: TaxTotal,
    pub legal_monetary_total: LegalMonetaryTotal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_means: Option<PaymentMeans>,
}

impl Invoice {
    pub fn has_foreign_currency(&self) -> bool {
        self.foreign_currency_code.is_some()
    }
}

/// ISDOC document type (1-7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// 1: Invoice (daňový doklad).
    Invoice,
    /// 2: Credit note.
    CreditNote,
    /// 3: Debit note.
    DebitNote,
    /// 4: Advance invoice (not a tax document).
    AdvanceInvoice,
    /// 5: Tax document for a received advance.
    AdvanceTaxDocument,
    /// 6: Credit note to an advance tax document.
    AdvanceCreditNote,
    /// 7: Simplified tax document.
    SimplifiedTaxDocument,
}

impl DocumentType {
    pub fn code(&self) -> u8 {
        match self {
            Self::Invoice => 1,
            Self::CreditNote => 2,
            Self::DebitNote => 3,
            Self::AdvanceInvoice => 4,
            Self::AdvanceTaxDocument => 5,
            Self::AdvanceCreditNote => 6,
            Self::SimplifiedTaxDocument => 7,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Invoice),
            2 => Some(Self::CreditNote),
            3 => Some(Self::DebitNote),
            4 => Some(Self::AdvanceInvoice),
            5 => Some(Self::AdvanceTaxDocument),
            6 => Some(Self::AdvanceCreditNote),
            7 => Some(Self::SimplifiedTaxDocument),
            _ => None,
        }
    }

    /// Corrective documents must reference the document they correct.
    pub fn requires_original_reference(&self) -> bool {
        matches!(
            self,
            Self::CreditNote | Self::DebitNote | Self::AdvanceCreditNote
        )
    }
}

impl Serialize for DocumentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// How the line VAT amount is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VatCalculationMethod {
    /// 0: tax computed from the tax-exclusive amount.
    FromBottom,
    /// 1: tax extracted from the tax-inclusive amount.
    FromTop,
}

impl VatCalculationMethod {
    pub fn code(&self) -> u8 {
        match self {
            Self::FromBottom => 0,
            Self::FromTop => 1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::FromBottom),
            1 => Some(Self::FromTop),
            _ => None,
        }
    }
}

impl Serialize for VatCalculationMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Supplier or customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Party {
    pub party_identification: PartyIdentification,
    pub party_name: PartyName,
    pub postal_address: PostalAddress,
    /// VAT (DIČ) or other tax registrations.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub party_tax_scheme: Vec<PartyTaxScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
}

/// Customer of a simplified tax document, identified without an address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnonymousCustomerParty {
    #[serde(rename = "ID")]
    pub id: String,
    /// Scheme of `id`, e.g. a loyalty card or a vehicle registration.
    #[serde(rename = "IDScheme", skip_serializing_if = "Option::is_none")]
    pub id_scheme: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyIdentification {
    #[serde(rename = "UserID", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(
        rename = "CatalogFirmIdentification",
        skip_serializing_if = "Option::is_none"
    )]
    pub catalog_firm_identification: Option<String>,
    /// Company registration number (IČO).
    #[serde(rename = "ID")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyName {
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostalAddress {
    pub street_name: String,
    pub building_number: String,
    pub city_name: String,
    pub postal_zone: String,
    pub country: Country,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Country {
    /// ISO 3166-1 alpha-2 code; two uppercase letters guaranteed by the mapper.
    pub identification_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyTaxScheme {
    #[serde(rename = "CompanyID")]
    pub company_id: String,
    /// "VAT" or "TIN".
    #[serde(rename = "TaxScheme")]
    pub tax_scheme: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electronic_mail: Option<String>,
}

/// Reference to the document a credit/debit note corrects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginalDocumentReference {
    /// Local `id` attribute used for line-level links.
    #[serde(rename = "id")]
    pub reference_id: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "IssueDate", skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(rename = "UUID", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvoiceLine {
    #[serde(rename = "ID")]
    pub id: String,
    pub invoiced_quantity: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_extension_amount_curr: Option<Decimal>,
    /// Tax-exclusive line amount.
    pub line_extension_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_extension_amount_tax_inclusive_curr: Option<Decimal>,
    pub line_extension_amount_tax_inclusive: Decimal,
    pub line_extension_tax_amount: Decimal,
    pub unit_price: Decimal,
    pub unit_price_tax_inclusive: Decimal,
    pub classified_tax_category: ClassifiedTaxCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub item: Item,
}

/// Quantity with its unit of measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    #[serde(rename = "Value")]
    pub value: Decimal,
    #[serde(rename = "unitCode", skip_serializing_if = "Option::is_none")]
    pub unit_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedTaxCategory {
    #[serde(rename = "Percent")]
    pub percent: Decimal,
    #[serde(rename = "VATCalculationMethod")]
    pub vat_calculation_method: VatCalculationMethod,
    #[serde(rename = "VATApplicable", skip_serializing_if = "Option::is_none")]
    pub vat_applicable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalogue_item_identification: Option<ItemIdentification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sellers_item_identification: Option<ItemIdentification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_sellers_item_identification: Option<ItemIdentification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tertiary_sellers_item_identification: Option<ItemIdentification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyers_item_identification: Option<ItemIdentification>,
    /// Batches or serial numbers the invoiced quantity is made of.
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "wrap_store_batches")]
    pub store_batches: Vec<StoreBatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreBatch {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specification: Option<String>,
    pub quantity: Quantity,
    /// "B" for a batch, "S" for a serial number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_or_serial_number: Option<String>,
    #[serde(rename = "SealSeriesID", skip_serializing_if = "Option::is_none")]
    pub seal_series_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemIdentification {
    #[serde(rename = "ID")]
    pub id: String,
}

/// Advance paid against a proforma invoice, outside the VAT regime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NonTaxedDeposit {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_amount_curr: Option<Decimal>,
    pub deposit_amount: Decimal,
}

/// Advance settled by an advance tax document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxedDeposit {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxable_deposit_amount_curr: Option<Decimal>,
    pub taxable_deposit_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_inclusive_deposit_amount_curr: Option<Decimal>,
    pub tax_inclusive_deposit_amount: Decimal,
    pub classified_tax_category: ClassifiedTaxCategory,
}

/// Tax recapitulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxTotal {
    pub tax_sub_total: Vec<TaxSubTotal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount_curr: Option<Decimal>,
    pub tax_amount: Decimal,
}

/// Per-rate breakdown with already-claimed and difference variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxSubTotal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxable_amount_curr: Option<Decimal>,
    pub taxable_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount_curr: Option<Decimal>,
    pub tax_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_inclusive_amount_curr: Option<Decimal>,
    pub tax_inclusive_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_claimed_taxable_amount_curr: Option<Decimal>,
    pub already_claimed_taxable_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_claimed_tax_amount_curr: Option<Decimal>,
    pub already_claimed_tax_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_claimed_tax_inclusive_amount_curr: Option<Decimal>,
    pub already_claimed_tax_inclusive_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference_taxable_amount_curr: Option<Decimal>,
    pub difference_taxable_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference_tax_amount_curr: Option<Decimal>,
    pub difference_tax_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference_tax_inclusive_amount_curr: Option<Decimal>,
    pub difference_tax_inclusive_amount: Decimal,
    pub tax_category: TaxCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxCategory {
    pub percent: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_scheme: Option<String>,
    #[serde(rename = "VATApplicable", skip_serializing_if = "Option::is_none")]
    pub vat_applicable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_reverse_charge_flag: Option<bool>,
}

/// Document totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegalMonetaryTotal {
    pub tax_exclusive_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_exclusive_amount_curr: Option<Decimal>,
    pub tax_inclusive_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_inclusive_amount_curr: Option<Decimal>,
    pub already_claimed_tax_exclusive_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_claimed_tax_exclusive_amount_curr: Option<Decimal>,
    pub already_claimed_tax_inclusive_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_claimed_tax_inclusive_amount_curr: Option<Decimal>,
    pub difference_tax_exclusive_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference_tax_exclusive_amount_curr: Option<Decimal>,
    pub difference_tax_inclusive_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference_tax_inclusive_amount_curr: Option<Decimal>,
    /// Absent in the document means zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payable_rounding_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payable_rounding_amount_curr: Option<Decimal>,
    pub paid_deposits_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_deposits_amount_curr: Option<Decimal>,
    pub payable_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payable_amount_curr: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentMeans {
    pub payment: Vec<Payment>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "wrap_alternate_bank_accounts")]
    pub alternate_bank_accounts: Vec<BankAccount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    pub paid_amount: Decimal,
    /// UN/EDIFACT 4461 subset: 10 cash, 20 cheque, 31 credit transfer,
    /// 42 bank transfer, 48 card, 49 direct debit, 50 postgiro, 97 clearing.
    pub payment_means_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<PaymentDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentDetails {
    #[serde(rename = "DocumentID", skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constant_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<BankAccount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankAccount {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "BankCode", skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "IBAN", skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(rename = "BIC", skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
}

// Collection wrappers: the wire format nests `Party` and repeated children
// one level below their container element.

struct Wrapped<'a, T: ?Sized>(&'static str, &'a T);

impl<T: Serialize + ?Sized> Serialize for Wrapped<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, self.1)?;
        map.end()
    }
}

fn wrap_party<S: Serializer>(party: &Party, serializer: S) -> Result<S::Ok, S::Error> {
    Wrapped("Party", party).serialize(serializer)
}

fn wrap_optional_party<S: Serializer>(
    party: &Option<Party>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match party {
        Some(party) => wrap_party(party, serializer),
        None => serializer.serialize_none(),
    }
}

fn wrap_invoice_lines<S: Serializer>(
    lines: &[InvoiceLine],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Wrapped("InvoiceLine", lines).serialize(serializer)
}

fn wrap_original_document_references<S: Serializer>(
    references: &[OriginalDocumentReference],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Wrapped("OriginalDocumentReference", references).serialize(serializer)
}

fn wrap_non_taxed_deposits<S: Serializer>(
    deposits: &[NonTaxedDeposit],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Wrapped("NonTaxedDeposit", deposits).serialize(serializer)
}

fn wrap_taxed_deposits<S: Serializer>(
    deposits: &[TaxedDeposit],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Wrapped("TaxedDeposit", deposits).serialize(serializer)
}

fn wrap_store_batches<S: Serializer>(
    batches: &[StoreBatch],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Wrapped("StoreBatch", batches).serialize(serializer)
}

fn wrap_alternate_bank_accounts<S: Serializer>(
    accounts: &[BankAccount],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Wrapped("AlternateBankAccount", accounts).serialize(serializer)
}
