use super::invoice::Invoice;
use super::item::GST_SLABS;
use super::numeric::Numeric;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GstinError {
    #[error("GSTIN is required")]
    Missing,
    #[error("GSTIN must be 15 characters")]
    WrongLength,
    #[error("Invalid GSTIN format (must be alphanumeric)")]
    InvalidCharacters,
}

/// Check a GSTIN is 15 upper-case alphanumeric characters.
/// The state code and checksum digit are not verified.
pub fn validate_gstin(gstin: &str) -> Result<(), GstinError> {
    if gstin.is_empty() {
        return Err(GstinError::Missing);
    }
    if gstin.chars().count() != 15 {
        return Err(GstinError::WrongLength);
    }
    if !gstin
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        return Err(GstinError::InvalidCharacters);
    }
    Ok(())
}

/// A problem with one field of the invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Form field key, e.g. `buyerGstin` or `item0Quantity`
    pub field: String,
    pub message: String,
}

/// Outcome of checking an invoice before it is issued
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Problems that block issuing the invoice
    pub errors: Vec<ValidationIssue>,
    /// Unusual but acceptable values
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[allow(dead_code)]
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn push_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    fn push_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            field: field.into(),
            message: message.into(),
        });
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check the fields required to issue an invoice.
pub fn validate_invoice(invoice: &Invoice) -> ValidationReport {
    let mut report = ValidationReport::default();
    let seller = &invoice.seller_details;
    let buyer = &invoice.buyer_details;
    let details = &invoice.invoice_details;

    if is_blank(&seller.name) {
        report.push_error("sellerName", "Seller name is required");
    }
    if is_blank(&seller.gstin) {
        report.push_error("sellerGstin", "Seller GSTIN is required");
    } else if let Err(e) = validate_gstin(&seller.gstin) {
        report.push_error("sellerGstin", e.to_string());
    }

    if is_blank(&buyer.name) {
        report.push_error("buyerName", "Buyer name is required");
    }
    if is_blank(&buyer.address) {
        report.push_error("buyerAddress", "Buyer address is required");
    }
    // buyer may be unregistered
    if !buyer.gstin.is_empty() {
        if let Err(e) = validate_gstin(&buyer.gstin) {
            report.push_error("buyerGstin", e.to_string());
        }
    }

    if is_blank(&details.number) {
        report.push_error("invoiceNumber", "Invoice number is required");
    }
    if is_blank(&details.date) {
        report.push_error("invoiceDate", "Invoice date is required");
    } else if details.date().is_none() {
        report.push_error("invoiceDate", "Invoice date must be a valid YYYY-MM-DD date");
    }

    if invoice.items.is_empty() {
        report.push_error("items", "At least one item is required");
    }
    for (index, item) in invoice.items.iter().enumerate() {
        if is_blank(&item.description) {
            report.push_error(
                format!("item{index}Description"),
                "Item description is required",
            );
        }
        if item.quantity.coerce() <= Decimal::ZERO {
            report.push_error(format!("item{index}Quantity"), "Valid quantity is required");
        }
        if item.rate.coerce() <= Decimal::ZERO {
            report.push_error(format!("item{index}Rate"), "Valid rate is required");
        }
        if item.checked_amounts().is_none() {
            report.push_error(
                format!("item{index}Amount"),
                "Item amount is too large to calculate",
            );
        }
        let gst_rate = item.gst_rate.coerce();
        if let Numeric::Text(text) = &item.gst_rate {
            if !item.gst_rate.is_numeric() {
                report.push_warning(
                    format!("item{index}GstRate"),
                    format!("GST rate '{}' is not a number and counts as 0%", text),
                );
            }
        }
        if gst_rate < Decimal::ZERO || gst_rate > dec!(100) {
            report.push_error(
                format!("item{index}GstRate"),
                "GST rate must be between 0 and 100",
            );
        } else if !GST_SLABS.contains(&gst_rate) {
            report.push_warning(
                format!("item{index}GstRate"),
                format!("GST rate {}% is not a standard slab", gst_rate.normalize()),
            );
        }
    }

    log::debug!(
        "Validated invoice '{}': {} errors, {} warnings",
        details.number,
        report.errors.len(),
        report.warnings.len()
    );
    report
}
