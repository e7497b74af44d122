//! History command - list, search and export saved invoices

use crate::cmd::read_history_file;
use crate::core::{
    filter_history, format_inr, HistoryFilter, InvoiceStatus, InvoiceSummaryRecord, Totals,
};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table,
};

#[derive(Args, Debug)]
pub struct HistoryCommand {
    /// Invoice history export or data backup JSON
    #[arg(short, long)]
    file: PathBuf,

    /// Filter by status
    #[arg(short, long, value_enum)]
    status: Option<StatusArg>,

    /// Earliest invoice date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Latest invoice date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Exact buyer name
    #[arg(short, long)]
    customer: Option<String>,

    /// Search invoice number, buyer and seller names
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl From<StatusArg> for InvoiceStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => InvoiceStatus::Draft,
            StatusArg::Sent => InvoiceStatus::Sent,
            StatusArg::Paid => InvoiceStatus::Paid,
            StatusArg::Overdue => InvoiceStatus::Overdue,
        }
    }
}

impl HistoryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let invoices = read_history_file(&self.file)?;
        let filter = HistoryFilter {
            status: self.status.map(Into::into),
            date_from: self.from,
            date_to: self.to,
            customer: self.customer.clone(),
            query: self.search.clone(),
        };
        let matched = filter_history(&invoices, &filter);
        log::info!("{} of {} invoices match", matched.len(), invoices.len());
        let rows: Vec<InvoiceSummaryRecord> = matched
            .iter()
            .copied()
            .map(InvoiceSummaryRecord::from)
            .collect();

        if self.csv {
            write_csv(&rows)
        } else {
            print_table(&rows);
            if !rows.is_empty() {
                let total = Totals::sum(matched.iter().map(|inv| inv.totals()));
                println!(
                    "{} invoices, total {}",
                    rows.len(),
                    format_inr(total.rounded_grand_total)
                );
            }
            Ok(())
        }
    }
}

fn print_table(rows: &[InvoiceSummaryRecord]) {
    if rows.is_empty() {
        println!("No invoices found matching filters");
        return;
    }

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(5..9)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

fn write_csv(rows: &[InvoiceSummaryRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
