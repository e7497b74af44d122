use super::numeric::Numeric;
use gstinv_derive::CsvSchema;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// GST slabs in common use. Other rates are accepted but flagged on validation.
pub const GST_SLABS: &[Decimal] = &[
    dec!(0),
    dec!(0.25),
    dec!(3),
    dec!(5),
    dec!(12),
    dec!(18),
    dec!(28),
];

/// Column description generated by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// One row of the invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, CsvSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Goods or service description
    #[serde(default)]
    pub description: String,
    /// HSN/SAC classification code
    #[serde(default)]
    pub hsn: String,
    /// Number of units
    #[serde(default)]
    pub quantity: Numeric,
    /// Price per unit before tax
    #[serde(default)]
    pub rate: Numeric,
    /// GST percentage, split evenly into CGST and SGST
    #[serde(default)]
    pub gst_rate: Numeric,
}

impl Default for LineItem {
    fn default() -> Self {
        LineItem {
            description: String::new(),
            hsn: String::new(),
            quantity: Numeric::from(1),
            rate: Numeric::from(0),
            gst_rate: Numeric::from(5),
        }
    }
}

/// Per-row figures printed on the invoice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAmounts {
    pub taxable_value: Decimal,
    pub gst_amount: Decimal,
    pub cgst_rate: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_rate: Decimal,
    pub sgst_amount: Decimal,
    pub total: Decimal,
}

impl LineItem {
    #[allow(dead_code)]
    pub fn new(
        description: impl Into<String>,
        hsn: impl Into<String>,
        quantity: impl Into<Numeric>,
        rate: impl Into<Numeric>,
        gst_rate: impl Into<Numeric>,
    ) -> Self {
        LineItem {
            description: description.into(),
            hsn: hsn.into(),
            quantity: quantity.into(),
            rate: rate.into(),
            gst_rate: gst_rate.into(),
        }
    }

    /// Row figures; all zero when the row is too large for `Decimal`.
    pub fn amounts(&self) -> LineAmounts {
        self.checked_amounts().unwrap_or_else(|| {
            log::warn!(
                "Item '{}' is out of range ({} × {} at {}%) and counts as 0",
                self.description,
                self.quantity,
                self.rate,
                self.gst_rate
            );
            LineAmounts::default()
        })
    }

    /// Row figures, or `None` when any of them overflows.
    pub fn checked_amounts(&self) -> Option<LineAmounts> {
        let taxable_value = self.quantity.coerce().checked_mul(self.rate.coerce())?;
        let gst_rate = self.gst_rate.coerce();
        let gst_amount = taxable_value.checked_mul(gst_rate)?.checked_div(dec!(100))?;
        let half_amount = gst_amount.checked_div(dec!(2))?;
        Some(LineAmounts {
            taxable_value,
            gst_amount,
            cgst_rate: gst_rate / dec!(2),
            cgst_amount: half_amount,
            sgst_rate: gst_rate / dec!(2),
            sgst_amount: half_amount,
            total: taxable_value.checked_add(gst_amount)?,
        })
    }
}

/// Read line items from CSV with a `description,hsn,quantity,rate,gstRate` header.
/// Columns may be omitted; numeric cells are coerced like form input.
pub fn read_items_csv<R: Read>(reader: R) -> anyhow::Result<Vec<LineItem>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut items = Vec::new();
    for record in rdr.deserialize() {
        let item: LineItem = record?;
        items.push(item);
    }
    log::debug!("Read {} line items from csv", items.len());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_row_matches_new_row_in_form() {
        let item = LineItem::default();
        assert_eq!(item.quantity.coerce(), dec!(1));
        assert_eq!(item.rate.coerce(), dec!(0));
        assert_eq!(item.gst_rate.coerce(), dec!(5));
        assert_eq!(item.amounts().taxable_value, Decimal::ZERO);
    }

    #[test]
    fn amounts_split_rate_and_tax() {
        let item = LineItem::new("2/60 polyester yarn", "55092200", dec!(60), dec!(230.0), dec!(5));
        let amounts = item.amounts();
        assert_eq!(amounts.taxable_value, dec!(13800));
        assert_eq!(amounts.cgst_rate, dec!(2.5));
        assert_eq!(amounts.sgst_rate, dec!(2.5));
        assert_eq!(amounts.cgst_amount, dec!(345));
        assert_eq!(amounts.sgst_amount, dec!(345));
        assert_eq!(amounts.total, dec!(14490));
    }

    #[test]
    fn oversized_row_is_zero_not_a_panic() {
        let item: LineItem =
            serde_json::from_str(r#"{"quantity": 1e20, "rate": 1e20, "gstRate": 5}"#).unwrap();
        assert!(item.checked_amounts().is_none());
        assert_eq!(item.amounts(), LineAmounts::default());
    }

    #[test]
    fn tax_overflowing_row_is_zero() {
        let item = LineItem::new("", "", dec!(1), Decimal::MAX, dec!(28));
        assert!(item.checked_amounts().is_none());
        assert_eq!(item.amounts().total, Decimal::ZERO);
    }

    #[test]
    fn deserializes_browser_json() {
        let json = r#"{"description":"Yarn","hsn":"5509","quantity":"","rate":"abc","gstRate":null}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.description, "Yarn");
        assert_eq!(item.amounts().taxable_value, Decimal::ZERO);
        assert_eq!(item.amounts().gst_amount, Decimal::ZERO);
    }

    #[test]
    fn missing_fields_are_zero_not_form_defaults() {
        let item: LineItem = serde_json::from_str(r#"{"rate": 10}"#).unwrap();
        assert_eq!(item.quantity, Numeric::Missing);
        assert_eq!(item.amounts().taxable_value, Decimal::ZERO);
    }

    #[test]
    fn reads_items_csv() {
        let data = "description,hsn,quantity,rate,gstRate\n\
                    Yarn,55092200,60,230.0,5\n\
                    Cones,,abc,12,18\n";
        let items = read_items_csv(data.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].amounts().taxable_value, dec!(13800));
        assert_eq!(items[1].hsn, "");
        assert_eq!(items[1].amounts().taxable_value, Decimal::ZERO);
    }

    #[test]
    fn csv_schema_uses_camel_case_columns() {
        assert_eq!(LineItem::csv_header(), "description,hsn,quantity,rate,gstRate");
        let schema = LineItem::csv_schema();
        assert_eq!(schema.len(), 5);
        assert!(schema.iter().all(|f| !f.required));
        assert_eq!(schema[4].name, "gstRate");
        assert_eq!(schema[2].description, "Number of units");
    }
}
