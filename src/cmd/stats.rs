//! Stats command - totals across the saved invoice history

use crate::cmd::read_history_file;
use crate::core::{
    customer_statistics, format_inr, invoice_statistics, CustomerStatistics, InvoiceStatistics,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Invoice history export or data backup JSON
    #[arg(short, long)]
    file: PathBuf,

    /// Date the monthly figures are relative to (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Include per-customer figures
    #[arg(short, long)]
    customers: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct StatsOutput<'a> {
    #[serde(flatten)]
    invoices: &'a InvoiceStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    customers: Option<&'a [CustomerStatistics]>,
}

#[derive(Debug, Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Invoices")]
    count: usize,
    #[tabled(rename = "Total")]
    total: String,
}

#[derive(Debug, Tabled)]
struct CustomerRow {
    #[tabled(rename = "Customer")]
    name: String,
    #[tabled(rename = "Invoices")]
    count: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Average")]
    average: String,
    #[tabled(rename = "Last Invoice")]
    last: String,
}

impl StatsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let invoices = read_history_file(&self.file)?;
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let stats = invoice_statistics(&invoices, today);
        let customers = self.customers.then(|| customer_statistics(&invoices));

        if self.json {
            let output = StatsOutput {
                invoices: &stats,
                customers: customers.as_deref(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_stats(&stats);
            if let Some(customers) = &customers {
                print_customers(customers);
            }
        }
        Ok(())
    }
}

fn print_stats(stats: &InvoiceStatistics) {
    println!();
    println!("INVOICE STATISTICS");
    println!();
    println!(
        "  Invoices: {} | Total: {} | Average: {}",
        stats.total_invoices,
        format_inr(stats.total_amount),
        format_inr(stats.average_invoice)
    );
    println!(
        "  This month: {} invoice(s), {}",
        stats.monthly_invoices,
        format_inr(stats.monthly_total)
    );
    println!(
        "  Tax: {} (CGST {} | SGST {})",
        format_inr(stats.total_tax),
        format_inr(stats.total_cgst),
        format_inr(stats.total_sgst)
    );
    let statuses: Vec<String> = stats
        .status_counts
        .iter()
        .map(|(status, count)| format!("{status}: {count}"))
        .collect();
    if !statuses.is_empty() {
        println!("  Status: {}", statuses.join(" | "));
    }
    println!();

    let rows: Vec<MonthRow> = stats
        .monthly_breakdown
        .iter()
        .map(|m| MonthRow {
            month: m.month.clone(),
            count: m.count,
            total: format_inr(m.total),
        })
        .collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

fn print_customers(customers: &[CustomerStatistics]) {
    println!();
    println!("CUSTOMERS");
    if customers.is_empty() {
        println!("  No customers found");
        return;
    }

    let rows: Vec<CustomerRow> = customers
        .iter()
        .map(|c| CustomerRow {
            name: c.name.clone(),
            count: c.invoice_count,
            total: format_inr(c.total_amount),
            average: format_inr(c.average_amount),
            last: c
                .last_invoice_date
                .map_or("-".to_string(), |d| d.format("%Y-%m-%d").to_string()),
        })
        .collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..4)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}
