//! Schema-directed mapper: element tree to typed [`Invoice`].
//!
//! Mapping happens in two passes. [`extract`] walks the tree against the
//! field catalog, enforcing cardinality and coercing every scalar; the
//! typed builders below then move the extracted values into the document
//! model. Only the first pass can fail on input data.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::catalog::{self, Field, FieldKind, Occurs, Scalar};
use super::tree::Element;
use crate::core::*;

/// A coerced value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Decimal(Decimal),
    Date(NaiveDate),
    Bool(bool),
    Code(i64),
    Record(Record),
}

/// Values extracted for one element, keyed by catalog field name.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    path: String,
    entries: Vec<(&'static str, Vec<Value>)>,
}

impl Record {
    pub fn path(&self) -> &str {
        &self.path
    }

    fn values(&self, name: &str) -> &[Value] {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    fn missing(&self, name: &str) -> IsdocError {
        IsdocError::MissingRequiredField {
            path: format!("{}.{name}", self.path),
        }
    }

    pub fn opt_text(&self, name: &str) -> Option<String> {
        match self.values(name).first() {
            Some(Value::Text(s)) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Result<String, IsdocError> {
        self.opt_text(name).ok_or_else(|| self.missing(name))
    }

    pub fn opt_decimal(&self, name: &str) -> Option<Decimal> {
        match self.values(name).first() {
            Some(Value::Decimal(d)) => Some(*d),
            _ => None,
        }
    }

    pub fn decimal(&self, name: &str) -> Result<Decimal, IsdocError> {
        self.opt_decimal(name).ok_or_else(|| self.missing(name))
    }

    pub fn opt_date(&self, name: &str) -> Option<NaiveDate> {
        match self.values(name).first() {
            Some(Value::Date(d)) => Some(*d),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Result<NaiveDate, IsdocError> {
        self.opt_date(name).ok_or_else(|| self.missing(name))
    }

    pub fn opt_bool(&self, name: &str) -> Option<bool> {
        match self.values(name).first() {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool, IsdocError> {
        self.opt_bool(name).ok_or_else(|| self.missing(name))
    }

    pub fn code(&self, name: &str) -> Result<i64, IsdocError> {
        match self.values(name).first() {
            Some(Value::Code(c)) => Ok(*c),
            _ => Err(self.missing(name)),
        }
    }

    pub fn groups<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.values(name).iter().filter_map(|v| match v {
            Value::Record(r) => Some(r),
            _ => None,
        })
    }

    pub fn opt_group<'a>(&'a self, name: &'a str) -> Option<&'a Record> {
        self.groups(name).next()
    }

    pub fn group<'a>(&'a self, name: &'a str) -> Result<&'a Record, IsdocError> {
        self.opt_group(name).ok_or_else(|| self.missing(name))
    }
}

/// Extract the values of `fields` from `element`.
pub fn extract(element: &Element, fields: &'static [Field], path: &str) -> Result<Record, IsdocError> {
    let mut entries = Vec::with_capacity(fields.len());
    for field in fields {
        let field_path = format!("{path}.{}", field.name);
        let values = match field.kind {
            FieldKind::Attribute(scalar) => {
                single(element.attribute(field.name), scalar, field, &field_path)?
            }
            FieldKind::Content(scalar) => {
                single(Some(element.text.as_str()), scalar, field, &field_path)?
            }
            FieldKind::Scalar(scalar) => {
                let children: Vec<&Element> = element.isdoc_children(field.name).collect();
                check_cardinality(field, children.len(), &field_path)?;
                let mut values = Vec::with_capacity(children.len());
                for (i, child) in children.iter().enumerate() {
                    let child_path = indexed(field, &field_path, i);
                    if let Some(value) = coerce(&child.text, scalar, field.occurs, &child_path)? {
                        values.push(value);
                    }
                }
                values
            }
            FieldKind::Group(group) => {
                let children: Vec<&Element> = element.isdoc_children(field.name).collect();
                check_cardinality(field, children.len(), &field_path)?;
                children
                    .iter()
                    .enumerate()
                    .map(|(i, child)| {
                        extract(child, group, &indexed(field, &field_path, i)).map(Value::Record)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        entries.push((field.name, values));
    }
    Ok(Record {
        path: path.to_string(),
        entries,
    })
}

fn indexed(field: &Field, path: &str, index: usize) -> String {
    if field.occurs.is_indexed() {
        format!("{path}[{index}]")
    } else {
        path.to_string()
    }
}

fn single(
    raw: Option<&str>,
    scalar: Scalar,
    field: &Field,
    path: &str,
) -> Result<Vec<Value>, IsdocError> {
    match raw {
        Some(raw) => Ok(coerce(raw, scalar, field.occurs, path)?.into_iter().collect()),
        None if field.occurs == Occurs::Required => Err(IsdocError::MissingRequiredField {
            path: path.to_string(),
        }),
        None => Ok(Vec::new()),
    }
}

fn check_cardinality(field: &Field, found: usize, path: &str) -> Result<(), IsdocError> {
    let ok = match field.occurs {
        Occurs::Required if found == 0 => {
            return Err(IsdocError::MissingRequiredField {
                path: path.to_string(),
            });
        }
        Occurs::Required => found == 1,
        Occurs::Optional => found <= 1,
        Occurs::Repeated => true,
        Occurs::OneOrMore => found >= 1,
    };
    if ok {
        Ok(())
    } else {
        Err(IsdocError::UnexpectedCardinality {
            path: path.to_string(),
            expected: field.occurs.describe(),
            found,
        })
    }
}

/// Coerce raw text. `Ok(None)` means an empty optional value.
fn coerce(raw: &str, scalar: Scalar, occurs: Occurs, path: &str) -> Result<Option<Value>, IsdocError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return match (scalar, occurs) {
            (_, Occurs::Optional) => Ok(None),
            (Scalar::Text, _) => Ok(Some(Value::Text(String::new()))),
            _ => Err(IsdocError::MissingRequiredField {
                path: path.to_string(),
            }),
        };
    }

    let type_error = || IsdocError::TypeCoercionError {
        path: path.to_string(),
        raw: raw.to_string(),
        expected: scalar.type_name(),
    };

    let value = match scalar {
        Scalar::Text => Value::Text(raw.to_string()),
        Scalar::Decimal => Value::Decimal(parse_decimal(trimmed).ok_or_else(type_error)?),
        Scalar::Date => Value::Date(parse_date(trimmed).ok_or_else(type_error)?),
        Scalar::Bool => match trimmed {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(type_error()),
        },
        Scalar::Code(list) => {
            let code: i64 = trimmed.parse().map_err(|_| type_error())?;
            if !list.contains(code) {
                return Err(IsdocError::InvalidEnumValue {
                    path: path.to_string(),
                    raw: raw.to_string(),
                    allowed: list.describe(),
                });
            }
            Value::Code(code)
        }
        Scalar::CountryCode => Value::Text(uppercase_code(trimmed, 2).ok_or_else(type_error)?),
        Scalar::CurrencyCode => Value::Text(uppercase_code(trimmed, 3).ok_or_else(type_error)?),
    };
    Ok(Some(value))
}

/// XML Schema `xs:decimal` lexical form, parsed exactly.
fn parse_decimal(s: &str) -> Option<Decimal> {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (digits, ""),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if (int.is_empty() && frac.is_empty()) || !all_digits(int) || !all_digits(frac) {
        return None;
    }
    let sign = if s.starts_with('-') { "-" } else { "" };
    let int = if int.is_empty() { "0" } else { int };
    let normalized = if frac.is_empty() {
        format!("{sign}{int}")
    } else {
        format!("{sign}{int}.{frac}")
    };
    Decimal::from_str_exact(&normalized).ok()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn uppercase_code(s: &str, len: usize) -> Option<String> {
    (s.len() == len && s.bytes().all(|b| b.is_ascii_uppercase())).then(|| s.to_string())
}

/// Map a tree produced by [`read_tree`](super::tree::read_tree) into an [`Invoice`].
pub fn map_document(root: &Element) -> Result<Invoice, IsdocError> {
    if !root.is_isdoc("Invoice") {
        return Err(IsdocError::MissingRequiredField {
            path: "Invoice".into(),
        });
    }
    let record = extract(root, catalog::INVOICE, "Invoice")?;
    let invoice = build_invoice(&record)?;
    log::debug!(
        "mapped invoice {} with {} line(s)",
        invoice.id,
        invoice.lines.len()
    );
    Ok(invoice)
}

fn build_invoice(r: &Record) -> Result<Invoice, IsdocError> {
    let document_type = document_type(r)?;
    let anonymous_customer_party = r
        .opt_group("AnonymousCustomerParty")
        .map(|a| -> Result<AnonymousCustomerParty, IsdocError> {
            Ok(AnonymousCustomerParty {
                id: a.text("ID")?,
                id_scheme: a.opt_text("IDScheme"),
            })
        })
        .transpose()?;
    let customer = r
        .opt_group("AccountingCustomerParty")
        .map(|c| c.group("Party").and_then(build_party))
        .transpose()?;
    // Only a simplified tax document may name its buyer anonymously.
    let anonymous_allowed = document_type == DocumentType::SimplifiedTaxDocument
        && anonymous_customer_party.is_some();
    if customer.is_none() && !anonymous_allowed {
        return Err(IsdocError::MissingRequiredField {
            path: format!("{}.AccountingCustomerParty", r.path()),
        });
    }

    Ok(Invoice {
        version: r.text("version")?,
        document_type,
        sub_document_type: r.opt_text("SubDocumentType"),
        sub_document_type_origin: r.opt_text("SubDocumentTypeOrigin"),
        id: r.text("ID")?,
        uuid: r.text("UUID")?,
        issuing_system: r.opt_text("IssuingSystem"),
        issue_date: r.date("IssueDate")?,
        tax_point_date: r.opt_date("TaxPointDate"),
        vat_applicable: r.bool("VATApplicable")?,
        note: r.opt_text("Note"),
        local_currency_code: r.text("LocalCurrencyCode")?,
        foreign_currency_code: r.opt_text("ForeignCurrencyCode"),
        curr_rate: r.decimal("CurrRate")?,
        ref_curr_rate: r.decimal("RefCurrRate")?,
        supplier: build_party(r.group("AccountingSupplierParty")?.group("Party")?)?,
        anonymous_customer_party,
        customer,
        original_document_references: collection(
            r,
            "OriginalDocumentReferences",
            "OriginalDocumentReference",
            build_original_reference,
        )?,
        lines: r
            .group("InvoiceLines")?
            .groups("InvoiceLine")
            .map(build_line)
            .collect::<Result<_, _>>()?,
        non_taxed_deposits: collection(
            r,
            "NonTaxedDeposits",
            "NonTaxedDeposit",
            build_non_taxed_deposit,
        )?,
        taxed_deposits: collection(r, "TaxedDeposits", "TaxedDeposit", build_taxed_deposit)?,
        tax_total: build_tax_total(r.group("TaxTotal")?)?,
        legal_monetary_total: build_legal_monetary_total(r.group("LegalMonetaryTotal")?)?,
        payment_means: r.opt_group("PaymentMeans").map(build_payment_means).transpose()?,
    })
}

/// Items of an optional container element, e.g. `TaxedDeposits/TaxedDeposit`.
fn collection<T>(
    r: &Record,
    container: &str,
    item: &str,
    build: fn(&Record) -> Result<T, IsdocError>,
) -> Result<Vec<T>, IsdocError> {
    match r.opt_group(container) {
        Some(c) => c.groups(item).map(build).collect(),
        None => Ok(Vec::new()),
    }
}

fn document_type(r: &Record) -> Result<DocumentType, IsdocError> {
    let code = r.code("DocumentType")?;
    DocumentType::from_code(code).ok_or_else(|| IsdocError::InvalidEnumValue {
        path: format!("{}.DocumentType", r.path()),
        raw: code.to_string(),
        allowed: crate::core::codes::DOCUMENT_TYPE_CODES.describe(),
    })
}

fn build_party(r: &Record) -> Result<Party, IsdocError> {
    let identification = r.group("PartyIdentification")?;
    let address = r.group("PostalAddress")?;
    let country = address.group("Country")?;
    Ok(Party {
        party_identification: PartyIdentification {
            user_id: identification.opt_text("UserID"),
            catalog_firm_identification: identification.opt_text("CatalogFirmIdentification"),
            id: identification.text("ID")?,
        },
        party_name: PartyName {
            name: r.group("PartyName")?.text("Name")?,
        },
        postal_address: PostalAddress {
            street_name: address.text("StreetName")?,
            building_number: address.text("BuildingNumber")?,
            city_name: address.text("CityName")?,
            postal_zone: address.text("PostalZone")?,
            country: Country {
                identification_code: country.text("IdentificationCode")?,
                name: country.opt_text("Name"),
            },
        },
        party_tax_scheme: r
            .groups("PartyTaxScheme")
            .map(|s| -> Result<PartyTaxScheme, IsdocError> {
                Ok(PartyTaxScheme {
                    company_id: s.text("CompanyID")?,
                    tax_scheme: s.text("TaxScheme")?,
                })
            })
            .collect::<Result<_, _>>()?,
        contact: r.opt_group("Contact").map(|c| Contact {
            name: c.opt_text("Name"),
            telephone: c.opt_text("Telephone"),
            electronic_mail: c.opt_text("ElectronicMail"),
        }),
    })
}

fn build_original_reference(r: &Record) -> Result<OriginalDocumentReference, IsdocError> {
    Ok(OriginalDocumentReference {
        reference_id: r.text("id")?,
        id: r.text("ID")?,
        issue_date: r.opt_date("IssueDate"),
        uuid: r.opt_text("UUID"),
    })
}

fn build_quantity(r: &Record) -> Result<Quantity, IsdocError> {
    Ok(Quantity {
        value: r.decimal("Value")?,
        unit_code: r.opt_text("unitCode"),
    })
}

fn build_classified_tax_category(r: &Record) -> Result<ClassifiedTaxCategory, IsdocError> {
    let method_code = r.code("VATCalculationMethod")?;
    let method = VatCalculationMethod::from_code(method_code).ok_or_else(|| {
        IsdocError::InvalidEnumValue {
            path: format!("{}.VATCalculationMethod", r.path()),
            raw: method_code.to_string(),
            allowed: crate::core::codes::VAT_CALCULATION_METHOD_CODES.describe(),
        }
    })?;
    Ok(ClassifiedTaxCategory {
        percent: r.decimal("Percent")?,
        vat_calculation_method: method,
        vat_applicable: r.opt_bool("VATApplicable"),
    })
}

fn build_line(r: &Record) -> Result<InvoiceLine, IsdocError> {
    let item = r.group("Item")?;
    let identification = |name: &str| {
        item.opt_group(name)
            .map(|g| g.text("ID").map(|id| ItemIdentification { id }))
            .transpose()
    };

    Ok(InvoiceLine {
        id: r.text("ID")?,
        invoiced_quantity: build_quantity(r.group("InvoicedQuantity")?)?,
        line_extension_amount_curr: r.opt_decimal("LineExtensionAmountCurr"),
        line_extension_amount: r.decimal("LineExtensionAmount")?,
        line_extension_amount_tax_inclusive_curr: r.opt_decimal("LineExtensionAmountTaxInclusiveCurr"),
        line_extension_amount_tax_inclusive: r.decimal("LineExtensionAmountTaxInclusive")?,
        line_extension_tax_amount: r.decimal("LineExtensionTaxAmount")?,
        unit_price: r.decimal("UnitPrice")?,
        unit_price_tax_inclusive: r.decimal("UnitPriceTaxInclusive")?,
        classified_tax_category: build_classified_tax_category(r.group("ClassifiedTaxCategory")?)?,
        note: r.opt_text("Note"),
        item: Item {
            description: item.opt_text("Description"),
            catalogue_item_identification: identification("CatalogueItemIdentification")?,
            sellers_item_identification: identification("SellersItemIdentification")?,
            secondary_sellers_item_identification: identification(
                "SecondarySellersItemIdentification",
            )?,
            tertiary_sellers_item_identification: identification(
                "TertiarySellersItemIdentification",
            )?,
            buyers_item_identification: identification("BuyersItemIdentification")?,
            store_batches: collection(item, "StoreBatches", "StoreBatch", build_store_batch)?,
        },
    })
}

fn build_store_batch(r: &Record) -> Result<StoreBatch, IsdocError> {
    Ok(StoreBatch {
        name: r.text("Name")?,
        note: r.opt_text("Note"),
        expiration_date: r.opt_date("ExpirationDate"),
        specification: r.opt_text("Specification"),
        quantity: build_quantity(r.group("Quantity")?)?,
        batch_or_serial_number: r.opt_text("BatchOrSerialNumber"),
        seal_series_id: r.opt_text("SealSeriesID"),
    })
}

fn build_non_taxed_deposit(r: &Record) -> Result<NonTaxedDeposit, IsdocError> {
    Ok(NonTaxedDeposit {
        id: r.text("ID")?,
        variable_symbol: r.opt_text("VariableSymbol"),
        deposit_amount_curr: r.opt_decimal("DepositAmountCurr"),
        deposit_amount: r.decimal("DepositAmount")?,
    })
}

fn build_taxed_deposit(r: &Record) -> Result<TaxedDeposit, IsdocError> {
    Ok(TaxedDeposit {
        id: r.text("ID")?,
        variable_symbol: r.opt_text("VariableSymbol"),
        taxable_deposit_amount_curr: r.opt_decimal("TaxableDepositAmountCurr"),
        taxable_deposit_amount: r.decimal("TaxableDepositAmount")?,
        tax_inclusive_deposit_amount_curr: r.opt_decimal("TaxInclusiveDepositAmountCurr"),
        tax_inclusive_deposit_amount: r.decimal("TaxInclusiveDepositAmount")?,
        classified_tax_category: build_classified_tax_category(r.group("ClassifiedTaxCategory")?)?,
    })
}

fn build_tax_total(r: &Record) -> Result<TaxTotal, IsdocError> {
    Ok(TaxTotal {
        tax_sub_total: r
            .groups("TaxSubTotal")
            .map(build_tax_sub_total)
            .collect::<Result<_, _>>()?,
        tax_amount_curr: r.opt_decimal("TaxAmountCurr"),
        tax_amount: r.decimal("TaxAmount")?,
    })
}

fn build_tax_sub_total(r: &Record) -> Result<TaxSubTotal, IsdocError> {
    let category = r.group("TaxCategory")?;
    Ok(TaxSubTotal {
        taxable_amount_curr: r.opt_decimal("TaxableAmountCurr"),
        taxable_amount: r.decimal("TaxableAmount")?,
        tax_amount_curr: r.opt_decimal("TaxAmountCurr"),
        tax_amount: r.decimal("TaxAmount")?,
        tax_inclusive_amount_curr: r.opt_decimal("TaxInclusiveAmountCurr"),
        tax_inclusive_amount: r.decimal("TaxInclusiveAmount")?,
        already_claimed_taxable_amount_curr: r.opt_decimal("AlreadyClaimedTaxableAmountCurr"),
        already_claimed_taxable_amount: r.decimal("AlreadyClaimedTaxableAmount")?,
        already_claimed_tax_amount_curr: r.opt_decimal("AlreadyClaimedTaxAmountCurr"),
        already_claimed_tax_amount: r.decimal("AlreadyClaimedTaxAmount")?,
        already_claimed_tax_inclusive_amount_curr: r
            .opt_decimal("AlreadyClaimedTaxInclusiveAmountCurr"),
        already_claimed_tax_inclusive_amount: r.decimal("AlreadyClaimedTaxInclusiveAmount")?,
        difference_taxable_amount_curr: r.opt_decimal("DifferenceTaxableAmountCurr"),
        difference_taxable_amount: r.decimal("DifferenceTaxableAmount")?,
        difference_tax_amount_curr: r.opt_decimal("DifferenceTaxAmountCurr"),
        difference_tax_amount: r.decimal("DifferenceTaxAmount")?,
        difference_tax_inclusive_amount_curr: r.opt_decimal("DifferenceTaxInclusiveAmountCurr"),
        difference_tax_inclusive_amount: r.decimal("DifferenceTaxInclusiveAmount")?,
        tax_category: TaxCategory {
            percent: category.decimal("Percent")?,
            tax_scheme: category.opt_text("TaxScheme"),
            vat_applicable: category.opt_bool("VATApplicable"),
            local_reverse_charge_flag: category.opt_bool("LocalReverseChargeFlag"),
        },
    })
}

fn build_legal_monetary_total(r: &Record) -> Result<LegalMonetaryTotal, IsdocError> {
    Ok(LegalMonetaryTotal {
        tax_exclusive_amount: r.decimal("TaxExclusiveAmount")?,
        tax_exclusive_amount_curr: r.opt_decimal("TaxExclusiveAmountCurr"),
        tax_inclusive_amount: r.decimal("TaxInclusiveAmount")?,
        tax_inclusive_amount_curr: r.opt_decimal("TaxInclusiveAmountCurr"),
        already_claimed_tax_exclusive_amount: r.decimal("AlreadyClaimedTaxExclusiveAmount")?,
        already_claimed_tax_exclusive_amount_curr: r
            .opt_decimal("AlreadyClaimedTaxExclusiveAmountCurr"),
        already_claimed_tax_inclusive_amount: r.decimal("AlreadyClaimedTaxInclusiveAmount")?,
        already_claimed_tax_inclusive_amount_curr: r
            .opt_decimal("AlreadyClaimedTaxInclusiveAmountCurr"),
        difference_tax_exclusive_amount: r.decimal("DifferenceTaxExclusiveAmount")?,
        difference_tax_exclusive_amount_curr: r.opt_decimal("DifferenceTaxExclusiveAmountCurr"),
        difference_tax_inclusive_amount: r.decimal("DifferenceTaxInclusiveAmount")?,
        difference_tax_inclusive_amount_curr: r.opt_decimal("DifferenceTaxInclusiveAmountCurr"),
        payable_rounding_amount: r.opt_decimal("PayableRoundingAmount"),
        payable_rounding_amount_curr: r.opt_decimal("PayableRoundingAmountCurr"),
        paid_deposits_amount: r.decimal("PaidDepositsAmount")?,
        paid_deposits_amount_curr: r.opt_decimal("PaidDepositsAmountCurr"),
        payable_amount: r.decimal("PayableAmount")?,
        payable_amount_curr: r.opt_decimal("PayableAmountCurr"),
    })
}

fn build_payment_means(r: &Record) -> Result<PaymentMeans, IsdocError> {
    Ok(PaymentMeans {
        payment: r
            .groups("Payment")
            .map(build_payment)
            .collect::<Result<_, _>>()?,
        alternate_bank_accounts: collection(
            r,
            "AlternateBankAccounts",
            "AlternateBankAccount",
            build_bank_account,
        )?,
    })
}

fn build_payment(r: &Record) -> Result<Payment, IsdocError> {
    let code = r.code("PaymentMeansCode")?;
    let payment_means_code = u8::try_from(code).map_err(|_| IsdocError::InvalidEnumValue {
        path: format!("{}.PaymentMeansCode", r.path()),
        raw: code.to_string(),
        allowed: crate::core::codes::PAYMENT_MEANS_CODES.describe(),
    })?;
    Ok(Payment {
        paid_amount: r.decimal("PaidAmount")?,
        payment_means_code,
        details: r
            .opt_group("Details")
            .map(|d| -> Result<PaymentDetails, IsdocError> {
                Ok(PaymentDetails {
                    document_id: d.opt_text("DocumentID"),
                    issue_date: d.opt_date("IssueDate"),
                    payment_due_date: d.opt_date("PaymentDueDate"),
                    variable_symbol: d.opt_text("VariableSymbol"),
                    constant_symbol: d.opt_text("ConstantSymbol"),
                    specific_symbol: d.opt_text("SpecificSymbol"),
                    bank_account: d.opt_group("BankAccount").map(build_bank_account).transpose()?,
                })
            })
            .transpose()?,
    })
}

fn build_bank_account(r: &Record) -> Result<BankAccount, IsdocError> {
    Ok(BankAccount {
        id: r.text("ID")?,
        bank_code: r.opt_text("BankCode"),
        name: r.opt_text("Name"),
        iban: r.opt_text("IBAN"),
        bic: r.opt_text("BIC"),
    })
}
