pub mod history;
pub mod number;
pub mod render;
pub mod schema;
pub mod stats;
pub mod totals;
pub mod validate;
pub mod words;

use crate::core::{read_history, read_invoice_json, read_items_csv, Invoice, StoredInvoice};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read an invoice from a JSON document, a CSV of line items, or JSON on stdin ("-")
pub fn read_invoice(path: &Path) -> anyhow::Result<Invoice> {
    if path.as_os_str() == "-" {
        return read_invoice_json(read_stdin()?.as_slice());
    }

    let reader = BufReader::new(File::open(path)?);
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        let items = read_items_csv(reader)?;
        Ok(Invoice {
            items,
            ..Default::default()
        })
    } else {
        read_invoice_json(reader)
    }
}

/// Read saved invoices from a history export or data backup (or stdin with "-")
pub fn read_history_file(path: &Path) -> anyhow::Result<Vec<StoredInvoice>> {
    if path.as_os_str() == "-" {
        read_history(read_stdin()?.as_slice())
    } else {
        read_history(BufReader::new(File::open(path)?))
    }
}

fn read_stdin() -> anyhow::Result<Vec<u8>> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }
    Ok(buffer)
}
