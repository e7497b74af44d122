//! Number command - fresh invoice number from the local clock

use crate::core::generate_invoice_number;
use chrono::Local;
use clap::Args;

#[derive(Args, Debug)]
pub struct NumberCommand {}

impl NumberCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        println!("{}", generate_invoice_number(Local::now().naive_local()));
        Ok(())
    }
}
