use super::invoice::{Invoice, InvoiceStatus};
use super::totals::Totals;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;
use tabled::Tabled;

/// An invoice as kept in the saved-invoice history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredInvoice {
    #[serde(flatten)]
    pub invoice: Invoice,
    /// Opaque identifier assigned when first saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Totals captured at save time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
}

impl StoredInvoice {
    /// Saved totals, or totals recomputed from the items when none were saved
    pub fn totals(&self) -> Totals {
        self.totals.unwrap_or_else(|| self.invoice.totals())
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.invoice.invoice_details.date()
    }

    pub fn buyer_name(&self) -> &str {
        &self.invoice.buyer_details.name
    }
}

impl From<Invoice> for StoredInvoice {
    fn from(invoice: Invoice) -> Self {
        StoredInvoice {
            invoice,
            ..Default::default()
        }
    }
}

/// Read saved invoices: either a bare JSON array (history export) or a full
/// data backup object with an `invoices` field.
pub fn read_history<R: Read>(reader: R) -> anyhow::Result<Vec<StoredInvoice>> {
    let value: Value = serde_json::from_reader(reader)?;
    let invoices: Vec<StoredInvoice> = match value {
        Value::Array(_) => serde_json::from_value(value)?,
        Value::Object(mut backup) => match backup.remove("invoices") {
            Some(invoices) => serde_json::from_value(invoices)?,
            None => anyhow::bail!("Backup file has no \"invoices\" field"),
        },
        _ => anyhow::bail!("Expected a list of invoices or a backup object"),
    };
    log::debug!("Read {} saved invoices", invoices.len());
    Ok(invoices)
}

/// Criteria for narrowing the invoice history. Unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub status: Option<InvoiceStatus>,
    /// Inclusive lower bound on invoice date
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on invoice date
    pub date_to: Option<NaiveDate>,
    /// Exact buyer name
    pub customer: Option<String>,
    /// Case-insensitive text in invoice number, buyer name or seller name
    pub query: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, stored: &StoredInvoice) -> bool {
        let invoice = &stored.invoice;

        if let Some(status) = &self.status {
            if invoice.status() != *status {
                return false;
            }
        }
        // an invoice without a readable date never satisfies a date bound
        if let Some(from) = self.date_from {
            if stored.date().is_none_or(|d| d < from) {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if stored.date().is_none_or(|d| d > to) {
                return false;
            }
        }
        if let Some(customer) = &self.customer {
            if stored.buyer_name() != customer {
                return false;
            }
        }
        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            let hit = [
                &invoice.invoice_details.number,
                &invoice.buyer_details.name,
                &invoice.seller_details.name,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }
        true
    }
}

pub fn filter_history<'a>(
    invoices: &'a [StoredInvoice],
    filter: &HistoryFilter,
) -> Vec<&'a StoredInvoice> {
    invoices.iter().filter(|inv| filter.matches(inv)).collect()
}

/// One row of the invoice summary export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct InvoiceSummaryRecord {
    #[serde(rename = "Invoice Number")]
    #[tabled(rename = "Invoice Number")]
    pub number: String,
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Buyer Name")]
    #[tabled(rename = "Buyer")]
    pub buyer_name: String,
    #[serde(rename = "Buyer GSTIN")]
    #[tabled(rename = "Buyer GSTIN")]
    pub buyer_gstin: String,
    #[serde(rename = "Seller Name")]
    #[tabled(rename = "Seller")]
    pub seller_name: String,
    #[serde(rename = "Subtotal")]
    #[tabled(rename = "Subtotal")]
    pub subtotal: String,
    #[serde(rename = "CGST")]
    #[tabled(rename = "CGST")]
    pub cgst: String,
    #[serde(rename = "SGST")]
    #[tabled(rename = "SGST")]
    pub sgst: String,
    #[serde(rename = "Grand Total")]
    #[tabled(rename = "Grand Total")]
    pub grand_total: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&StoredInvoice> for InvoiceSummaryRecord {
    fn from(stored: &StoredInvoice) -> Self {
        let invoice = &stored.invoice;
        let totals = stored.totals();
        InvoiceSummaryRecord {
            number: invoice.invoice_details.number.clone(),
            date: invoice.invoice_details.date.clone(),
            buyer_name: invoice.buyer_details.name.clone(),
            buyer_gstin: invoice.buyer_details.gstin.clone(),
            seller_name: invoice.seller_details.name.clone(),
            subtotal: format!("{:.2}", totals.subtotal),
            cgst: format!("{:.2}", totals.total_cgst),
            sgst: format!("{:.2}", totals.total_sgst),
            grand_total: format!("{:.2}", totals.rounded_grand_total),
            status: invoice.status().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HISTORY_JSON: &str = r#"[
        {
            "id": 1730700000000,
            "savedAt": "2025-11-04T07:00:00.000Z",
            "sellerDetails": { "name": "VR Traders", "gstin": "33CDOPV9001M1ZZ" },
            "buyerDetails": { "name": "Matheshwara Tex", "gstin": "33LVSPS3598F1ZL" },
            "invoiceDetails": { "number": "INV-20251104-123000", "date": "2025-11-04" },
            "items": [ { "description": "Yarn", "quantity": 60, "rate": 230, "gstRate": 5 } ],
            "totals": { "subtotal": 13800, "totalCgst": 345, "totalSgst": 345, "totalTax": 690,
                        "grandTotal": 14490, "roundedGrandTotal": 14490, "roundOffAmount": 0 },
            "status": "Paid"
        },
        {
            "id": 1733300000000,
            "sellerDetails": { "name": "VR Traders" },
            "buyerDetails": { "name": "Kumar Fabrics" },
            "invoiceDetails": { "number": "INV-20251204-090000", "date": "2025-12-04" },
            "items": [ { "description": "Cones", "quantity": 10, "rate": 99.95, "gstRate": 12 } ]
        },
        {
            "invoiceDetails": { "number": "DRAFT-1" },
            "items": []
        }
    ]"#;

    fn history() -> Vec<StoredInvoice> {
        read_history(HISTORY_JSON.as_bytes()).unwrap()
    }

    #[test]
    fn reads_bare_list() {
        let invoices = history();
        assert_eq!(invoices.len(), 3);
        assert_eq!(invoices[0].invoice.status(), InvoiceStatus::Paid);
        assert_eq!(invoices[0].saved_at.as_deref(), Some("2025-11-04T07:00:00.000Z"));
        assert!(invoices[0].id.is_some());
    }

    #[test]
    fn reads_backup_document() {
        let backup = format!(r#"{{ "invoices": {HISTORY_JSON}, "customers": [], "exportedAt": "x" }}"#);
        let invoices = read_history(backup.as_bytes()).unwrap();
        assert_eq!(invoices.len(), 3);
    }

    #[test]
    fn rejects_other_documents() {
        assert!(read_history(r#"{ "customers": [] }"#.as_bytes()).is_err());
        assert!(read_history("42".as_bytes()).is_err());
    }

    #[test]
    fn totals_fall_back_to_items() {
        let invoices = history();
        assert_eq!(invoices[0].totals().rounded_grand_total, dec!(14490));
        // 999.5 + 119.94 = 1119.44
        assert_eq!(invoices[1].totals().grand_total, dec!(1119.44));
        assert_eq!(invoices[1].totals().rounded_grand_total, dec!(1119));
        assert_eq!(invoices[2].totals(), Totals::default());
    }

    #[test]
    fn filters_by_status_and_customer() {
        let invoices = history();
        let paid = HistoryFilter {
            status: Some(InvoiceStatus::Paid),
            ..Default::default()
        };
        assert_eq!(filter_history(&invoices, &paid).len(), 1);

        let drafts = HistoryFilter {
            status: Some(InvoiceStatus::Draft),
            ..Default::default()
        };
        assert_eq!(filter_history(&invoices, &drafts).len(), 2);

        let kumar = HistoryFilter {
            customer: Some("Kumar Fabrics".to_string()),
            ..Default::default()
        };
        let found = filter_history(&invoices, &kumar);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].invoice.invoice_details.number, "INV-20251204-090000");
    }

    #[test]
    fn date_bounds_are_inclusive_and_skip_undated() {
        let invoices = history();
        let filter = HistoryFilter {
            date_from: NaiveDate::from_ymd_opt(2025, 11, 4),
            date_to: NaiveDate::from_ymd_opt(2025, 11, 30),
            ..Default::default()
        };
        let found = filter_history(&invoices, &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].buyer_name(), "Matheshwara Tex");
    }

    #[test]
    fn query_is_case_insensitive() {
        let invoices = history();
        let filter = HistoryFilter {
            query: Some("vr trad".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_history(&invoices, &filter).len(), 2);
        let filter = HistoryFilter {
            query: Some("draft-".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_history(&invoices, &filter).len(), 1);
    }

    #[test]
    fn summary_record_uses_rounded_total() {
        let invoices = history();
        let record = InvoiceSummaryRecord::from(&invoices[1]);
        assert_eq!(record.subtotal, "999.50");
        assert_eq!(record.grand_total, "1119.00");
        assert_eq!(record.status, "Draft");
        assert_eq!(record.buyer_gstin, "");
    }
}
