use clap::{Parser, Subcommand};
use log::LevelFilter;

mod cmd;
mod core;

use cmd::{
    history::HistoryCommand, number::NumberCommand, render::RenderCommand,
    schema::SchemaCommand, stats::StatsCommand, totals::TotalsCommand,
    validate::ValidateCommand, words::WordsCommand,
};

#[derive(Parser, Debug)]
#[command(
    name = "gstinv",
    version,
    about = "GST tax invoice totals, amount in words and invoice history"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute subtotal, CGST/SGST, round-off and grand total
    Totals(TotalsCommand),
    /// Spell out a rupee amount in Indian-English words
    Words(WordsCommand),
    /// Print a plain-text tax invoice
    Render(RenderCommand),
    /// Check an invoice has everything required to issue it
    Validate(ValidateCommand),
    /// List, search or export saved invoices
    History(HistoryCommand),
    /// Statistics across saved invoices
    Stats(StatsCommand),
    /// Generate a new invoice number
    Number(NumberCommand),
    /// Print the expected input formats
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Totals(cmd) => cmd.exec(),
        Command::Words(cmd) => cmd.exec(),
        Command::Render(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::History(cmd) => cmd.exec(),
        Command::Stats(cmd) => cmd.exec(),
        Command::Number(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            let level = if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            };
            builder.filter_level(level);
        }
    }
    builder.init();
}
