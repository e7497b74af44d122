pub mod format;
pub mod history;
pub mod invoice;
pub mod item;
pub mod numeric;
pub mod statistics;
pub mod totals;
pub mod validation;
pub mod words;

// Flat public surface for domain types and functions.
pub use format::{format_inr, format_rate};
pub use history::{filter_history, read_history, HistoryFilter, InvoiceSummaryRecord, StoredInvoice};
pub use invoice::{generate_invoice_number, read_invoice_json, Invoice, InvoiceStatus, Party};
pub use item::{read_items_csv, LineItem};
#[allow(unused_imports)]
pub use numeric::Numeric;
pub use statistics::{customer_statistics, invoice_statistics, CustomerStatistics, InvoiceStatistics};
pub use totals::{compute_totals, Totals};
pub use validation::{validate_invoice, ValidationIssue, ValidationReport};
pub use words::amount_to_words;
