//! Totals command - subtotal, CGST/SGST split, round-off and amount in words

use crate::cmd::read_invoice;
use crate::core::{amount_to_words, compute_totals, format_inr, Totals};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct TotalsCommand {
    /// Invoice JSON, items CSV, or "-" for JSON on stdin
    #[arg(short, long)]
    input: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalsOutput {
    item_count: usize,
    #[serde(flatten)]
    totals: Totals,
    amount_in_words: Option<String>,
}

impl TotalsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let invoice = read_invoice(&self.input)?;
        let totals = compute_totals(&invoice.items);
        let words = match amount_to_words(totals.rounded_grand_total) {
            Ok(words) => Some(words),
            Err(e) => {
                log::warn!("Cannot spell out grand total: {}", e);
                None
            }
        };

        if self.json {
            let output = TotalsOutput {
                item_count: invoice.items.len(),
                totals,
                amount_in_words: words,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_totals(&totals, words.as_deref());
        }
        Ok(())
    }
}

/// Totals block shared with the rendered invoice
pub fn print_totals(totals: &Totals, words: Option<&str>) {
    println!("  Subtotal:     {:>16}", format_inr(totals.subtotal));
    println!("  CGST:         {:>16}", format_inr(totals.total_cgst));
    println!("  SGST:         {:>16}", format_inr(totals.total_sgst));
    println!("  Total Tax:    {:>16}", format_inr(totals.total_tax));
    println!("  Round Off:    {:>16}", format_inr(totals.round_off_amount));
    println!("  Grand Total:  {:>16}", format_inr(totals.rounded_grand_total));
    println!();
    if let Some(words) = words {
        println!("  Amount in words: {}", words);
    }
}
