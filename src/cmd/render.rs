//! Render command - plain-text tax invoice for the terminal or a printer

use crate::cmd::read_invoice;
use crate::cmd::totals::print_totals;
use crate::core::{amount_to_words, format_inr, format_rate, Invoice, LineItem, Party};
use clap::Args;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Invoice JSON, items CSV, or "-" for JSON on stdin
    #[arg(short, long)]
    input: PathBuf,

    /// Print the QR code payload below the invoice
    #[arg(long)]
    qr: bool,
}

/// Row of the printed items table
#[derive(Debug, Clone, Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    row: usize,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "HSN")]
    hsn: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Taxable")]
    taxable: String,
    #[tabled(rename = "CGST %")]
    cgst_rate: String,
    #[tabled(rename = "CGST")]
    cgst: String,
    #[tabled(rename = "SGST %")]
    sgst_rate: String,
    #[tabled(rename = "SGST")]
    sgst: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl ItemRow {
    fn new(row: usize, item: &LineItem) -> Self {
        let amounts = item.amounts();
        ItemRow {
            row,
            description: item.description.clone(),
            hsn: item.hsn.clone(),
            quantity: item.quantity.coerce().normalize().to_string(),
            rate: format_inr(item.rate.coerce()),
            taxable: format_inr(amounts.taxable_value),
            cgst_rate: format_rate(amounts.cgst_rate),
            cgst: format_inr(amounts.cgst_amount),
            sgst_rate: format_rate(amounts.sgst_rate),
            sgst: format_inr(amounts.sgst_amount),
            total: format_inr(amounts.total),
        }
    }
}

impl RenderCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let invoice = read_invoice(&self.input)?;
        print_invoice(&invoice);
        if self.qr {
            println!();
            println!("QR: {}", invoice.qr_payload());
        }
        Ok(())
    }
}

fn print_invoice(invoice: &Invoice) {
    let details = &invoice.invoice_details;
    let totals = invoice.totals();

    println!();
    println!("TAX INVOICE");
    println!(
        "Invoice No: {}   Date: {}   Reverse Charge: {}",
        or_dash(&details.number),
        or_dash(&details.date),
        details.reverse_charge
    );
    println!();
    print_party("SELLER", &invoice.seller_details);
    println!();
    print_party("BUYER", &invoice.buyer_details);
    println!();

    if invoice.items.is_empty() {
        println!("No items");
    } else {
        let rows: Vec<ItemRow> = invoice
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| ItemRow::new(i + 1, item))
            .collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }
    println!();

    let words = match amount_to_words(totals.rounded_grand_total) {
        Ok(words) => Some(words),
        Err(e) => {
            log::warn!("Cannot spell out grand total: {}", e);
            None
        }
    };
    print_totals(&totals, words.as_deref());
}

fn print_party(label: &str, party: &Party) {
    println!("{}: {}", label, or_dash(&party.name));
    if !party.address.is_empty() {
        println!("  {}", party.address);
    }
    println!(
        "  GSTIN: {}   State: {} ({})",
        or_dash(&party.gstin),
        or_dash(&party.state),
        or_dash(&party.state_code)
    );
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
