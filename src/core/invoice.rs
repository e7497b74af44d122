use super::item::LineItem;
use super::totals::{compute_totals, Totals};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

/// Seller or buyer on the invoice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    /// 15 character GST identification number
    #[serde(default)]
    pub gstin: String,
    #[serde(default)]
    pub state: String,
    /// Two digit GST state code (e.g. "33" for Tamil Nadu)
    #[serde(default)]
    pub state_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetails {
    #[serde(default)]
    pub number: String,
    /// Invoice date as YYYY-MM-DD
    #[serde(default)]
    pub date: String,
    /// "YES" when tax is payable on reverse charge
    #[serde(default = "default_reverse_charge")]
    pub reverse_charge: String,
}

fn default_reverse_charge() -> String {
    "NO".to_string()
}

impl Default for InvoiceDetails {
    fn default() -> Self {
        InvoiceDetails {
            number: String::new(),
            date: String::new(),
            reverse_charge: default_reverse_charge(),
        }
    }
}

impl InvoiceDetails {
    /// The invoice date, if it is a valid calendar date. A full timestamp is
    /// accepted and truncated to its date.
    pub fn date(&self) -> Option<NaiveDate> {
        let date = self.date.trim();
        let date = date.get(..10).unwrap_or(date);
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }
}

/// Payment status of a saved invoice
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
    Other(String),
}

impl From<String> for InvoiceStatus {
    fn from(s: String) -> Self {
        match s.trim() {
            "" | "Draft" => InvoiceStatus::Draft,
            "Sent" => InvoiceStatus::Sent,
            "Paid" => InvoiceStatus::Paid,
            "Overdue" => InvoiceStatus::Overdue,
            other => InvoiceStatus::Other(other.to_string()),
        }
    }
}

impl From<InvoiceStatus> for String {
    fn from(status: InvoiceStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Draft => write!(f, "Draft"),
            InvoiceStatus::Sent => write!(f, "Sent"),
            InvoiceStatus::Paid => write!(f, "Paid"),
            InvoiceStatus::Overdue => write!(f, "Overdue"),
            InvoiceStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A tax invoice as entered in the form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub seller_details: Party,
    #[serde(default)]
    pub buyer_details: Party,
    #[serde(default)]
    pub invoice_details: InvoiceDetails,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub status: Option<InvoiceStatus>,
}

impl Invoice {
    pub fn totals(&self) -> Totals {
        compute_totals(&self.items)
    }

    /// Status, with a missing one read as Draft
    pub fn status(&self) -> InvoiceStatus {
        self.status.clone().unwrap_or_default()
    }

    /// Compact JSON encoded into the printed invoice's QR code
    pub fn qr_payload(&self) -> String {
        let payload = QrPayload {
            invoice_number: &self.invoice_details.number,
            date: &self.invoice_details.date,
            total: self.totals().rounded_grand_total.to_i64(),
            seller_gstin: &self.seller_details.gstin,
            buyer_gstin: &self.buyer_details.gstin,
        };
        serde_json::to_string(&payload).unwrap_or_default()
    }
}

#[derive(Serialize)]
struct QrPayload<'a> {
    #[serde(rename = "invoiceNumber")]
    invoice_number: &'a str,
    date: &'a str,
    total: Option<i64>,
    #[serde(rename = "sellerGSTIN")]
    seller_gstin: &'a str,
    #[serde(rename = "buyerGSTIN")]
    buyer_gstin: &'a str,
}

/// Invoice number in the form INV-YYYYMMDD-HHMMSS
pub fn generate_invoice_number(now: NaiveDateTime) -> String {
    now.format("INV-%Y%m%d-%H%M%S").to_string()
}

/// Read a single invoice document from JSON
pub fn read_invoice_json<R: Read>(reader: R) -> anyhow::Result<Invoice> {
    let invoice: Invoice = serde_json::from_reader(reader)?;
    log::debug!(
        "Read invoice '{}' with {} items",
        invoice.invoice_details.number,
        invoice.items.len()
    );
    Ok(invoice)
}
