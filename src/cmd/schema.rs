//! Schema command - print expected input formats

use crate::core::{Invoice, LineItem};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the invoice document
    JsonSchema,
    /// CSV header row for line items
    CsvHeader,
    /// Line item CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Invoice);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", LineItem::csv_header());
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Line Item CSV Format");
        println!("====================");
        println!();
        for field in LineItem::csv_schema() {
            let req = if field.required { "required" } else { "optional" };
            println!("{:12} ({:8})  {}", field.name, req, field.description);
        }
        println!();
        println!("Empty or non-numeric quantity, rate and gstRate cells count as 0.");
        Ok(())
    }
}
