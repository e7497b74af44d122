use super::history::StoredInvoice;
use super::invoice::InvoiceStatus;
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Number of months in the trailing breakdown
const BREAKDOWN_MONTHS: u32 = 12;

/// Aggregate figures over the saved invoices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStatistics {
    pub total_invoices: usize,
    /// Sum of rounded grand totals
    pub total_amount: Decimal,
    /// Invoices dated in the current month
    pub monthly_invoices: usize,
    pub monthly_total: Decimal,
    pub total_tax: Decimal,
    pub total_cgst: Decimal,
    pub total_sgst: Decimal,
    pub average_invoice: Decimal,
    pub status_counts: BTreeMap<String, usize>,
    /// Oldest month first, ending with the current month
    pub monthly_breakdown: Vec<MonthSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    /// e.g. "Nov 2025"
    pub month: String,
    pub count: usize,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStatistics {
    pub name: String,
    pub invoice_count: usize,
    pub total_amount: Decimal,
    pub average_amount: Decimal,
    pub last_invoice_date: Option<NaiveDate>,
}

fn same_month(date: NaiveDate, other: NaiveDate) -> bool {
    date.year() == other.year() && date.month() == other.month()
}

/// Saved totals are read back unchecked, so sums saturate rather than overflow.
fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

/// Statistics over the saved invoices, with monthly figures relative to `today`.
pub fn invoice_statistics(invoices: &[StoredInvoice], today: NaiveDate) -> InvoiceStatistics {
    let totals: Vec<_> = invoices.iter().map(|inv| (inv, inv.totals())).collect();

    let total_amount = saturating_sum(totals.iter().map(|(_, t)| t.rounded_grand_total));

    let month_total = |month: NaiveDate| {
        totals
            .iter()
            .filter(|(inv, _)| inv.date().is_some_and(|d| same_month(d, month)))
            .fold((0usize, Decimal::ZERO), |(count, sum), (_, t)| {
                (count + 1, sum.saturating_add(t.rounded_grand_total))
            })
    };

    let (monthly_invoices, monthly_total) = month_total(today);

    let mut status_counts = BTreeMap::new();
    for inv in invoices {
        let status: InvoiceStatus = inv.invoice.status();
        *status_counts.entry(status.to_string()).or_insert(0) += 1;
    }

    let first_of_month = today.with_day(1).unwrap_or(today);
    let monthly_breakdown = (0..BREAKDOWN_MONTHS)
        .rev()
        .filter_map(|back| first_of_month.checked_sub_months(Months::new(back)))
        .map(|month| {
            let (count, total) = month_total(month);
            MonthSummary {
                month: month.format("%b %Y").to_string(),
                count,
                total,
            }
        })
        .collect();

    InvoiceStatistics {
        total_invoices: invoices.len(),
        total_amount,
        monthly_invoices,
        monthly_total,
        total_tax: saturating_sum(totals.iter().map(|(_, t)| t.total_tax)),
        total_cgst: saturating_sum(totals.iter().map(|(_, t)| t.total_cgst)),
        total_sgst: saturating_sum(totals.iter().map(|(_, t)| t.total_sgst)),
        average_invoice: average(total_amount, invoices.len()),
        status_counts,
        monthly_breakdown,
    }
}

/// Per-buyer totals, largest total first. Invoices without a buyer name are skipped.
pub fn customer_statistics(invoices: &[StoredInvoice]) -> Vec<CustomerStatistics> {
    let mut by_customer: HashMap<&str, Vec<&StoredInvoice>> = HashMap::new();
    for inv in invoices {
        let name = inv.buyer_name();
        if !name.trim().is_empty() {
            by_customer.entry(name).or_default().push(inv);
        }
    }

    let mut stats: Vec<CustomerStatistics> = by_customer
        .into_iter()
        .map(|(name, invoices)| {
            let total_amount =
                saturating_sum(invoices.iter().map(|inv| inv.totals().rounded_grand_total));
            CustomerStatistics {
                name: name.to_string(),
                invoice_count: invoices.len(),
                total_amount,
                average_amount: average(total_amount, invoices.len()),
                last_invoice_date: invoices.iter().filter_map(|inv| inv.date()).max(),
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.name.cmp(&b.name))
    });
    stats
}
