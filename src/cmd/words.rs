//! Words command - spell out a rupee amount

use crate::core::amount_to_words;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct WordsCommand {
    /// Amount in rupees (e.g., 18427.50)
    #[arg(allow_negative_numbers = true)]
    amount: Decimal,
}

impl WordsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let words = amount_to_words(self.amount)?;
        println!("{}", words);
        Ok(())
    }
}
