//! Validate command - check an invoice is complete before it is issued

use crate::cmd::read_invoice;
use crate::core::{validate_invoice, ValidationIssue, ValidationReport};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Invoice JSON, or "-" for JSON on stdin
    #[arg(short, long)]
    input: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    invoice_number: &'a str,
    valid: bool,
    error_count: usize,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let invoice = read_invoice(&self.input)?;
        let report = validate_invoice(&invoice);
        let number = invoice.invoice_details.number.as_str();

        if self.json {
            let output = ValidationOutput {
                invoice_number: number,
                valid: report.is_valid(),
                error_count: report.errors.len(),
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(number, &report);
        }

        // Exit with code 1 if the invoice cannot be issued
        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(number: &str, report: &ValidationReport) {
    println!();
    println!("VALIDATION RESULTS ({})", if number.is_empty() { "unnumbered" } else { number });
    println!();

    if report.is_valid() {
        println!("\u{2713} Invoice is ready to issue.");
    } else {
        println!("\u{26A0} {} issue(s) found:", report.errors.len());
        println!();
        print_issues(&report.errors);
    }

    if !report.warnings.is_empty() {
        println!();
        println!("{} warning(s):", report.warnings.len());
        println!();
        print_issues(&report.warnings);
    }
}

fn print_issues(issues: &[ValidationIssue]) {
    for (i, issue) in issues.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, issue.field, issue.message);
    }
}
