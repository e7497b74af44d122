use super::item::LineItem;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Rounding applied to the payable total: half a rupee rounds up (away from zero).
pub const GRAND_TOTAL_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Invoice totals derived from the line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of taxable values (quantity × rate)
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub total_cgst: Decimal,
    #[serde(default)]
    pub total_sgst: Decimal,
    #[serde(default)]
    pub total_tax: Decimal,
    /// Subtotal plus tax, before rounding
    #[serde(default)]
    pub grand_total: Decimal,
    /// Payable amount in whole rupees
    #[serde(default)]
    pub rounded_grand_total: Decimal,
    /// rounded_grand_total - grand_total
    #[serde(default)]
    pub round_off_amount: Decimal,
}

/// Running sums over the items; halves are accumulated unrounded.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    subtotal: Decimal,
    cgst: Decimal,
    sgst: Decimal,
    tax: Decimal,
    grand_total: Decimal,
}

impl Accumulator {
    /// Adds a line, or skips it when a running sum would leave the Decimal range.
    fn add(self, item: &LineItem) -> Self {
        match self.checked_add(item) {
            Some(next) => next,
            None => {
                log::warn!(
                    "Item '{}' overflows the invoice totals and counts as 0",
                    item.description
                );
                self
            }
        }
    }

    fn checked_add(self, item: &LineItem) -> Option<Self> {
        let amounts = item.amounts();
        let cgst = self.cgst.checked_add(amounts.cgst_amount)?;
        let sgst = self.sgst.checked_add(amounts.sgst_amount)?;
        let subtotal = self.subtotal.checked_add(amounts.taxable_value)?;
        let tax = cgst.checked_add(sgst)?;
        Some(Accumulator {
            subtotal,
            cgst,
            sgst,
            tax,
            grand_total: subtotal.checked_add(tax)?,
        })
    }
}

/// Compute subtotal, CGST/SGST split, grand total and round-off for the items.
///
/// Never fails: malformed numeric fields count as zero. Negative quantities,
/// rates and GST rates are not rejected and flow through the arithmetic.
/// A line too large for `Decimal` counts as zero and is logged.
pub fn compute_totals(items: &[LineItem]) -> Totals {
    let sums = items
        .iter()
        .fold(Accumulator::default(), |acc, item| acc.add(item));

    let grand_total = sums.grand_total;
    let rounded_grand_total = grand_total.round_dp_with_strategy(0, GRAND_TOTAL_ROUNDING);

    log::debug!(
        "Totals over {} items: subtotal {}, cgst {}, sgst {}, grand total {}",
        items.len(),
        sums.subtotal,
        sums.cgst,
        sums.sgst,
        grand_total
    );

    Totals {
        subtotal: sums.subtotal,
        total_cgst: sums.cgst,
        total_sgst: sums.sgst,
        total_tax: sums.tax,
        grand_total,
        rounded_grand_total,
        round_off_amount: rounded_grand_total - grand_total,
    }
}

impl Totals {
    /// Sum of several invoices' totals, field by field. Sums saturate at the
    /// `Decimal` range since saved totals are read back unchecked.
    pub fn sum(totals: impl IntoIterator<Item = Totals>) -> Totals {
        totals.into_iter().fold(Totals::default(), |acc, t| Totals {
            subtotal: acc.subtotal.saturating_add(t.subtotal),
            total_cgst: acc.total_cgst.saturating_add(t.total_cgst),
            total_sgst: acc.total_sgst.saturating_add(t.total_sgst),
            total_tax: acc.total_tax.saturating_add(t.total_tax),
            grand_total: acc.grand_total.saturating_add(t.grand_total),
            rounded_grand_total: acc.rounded_grand_total.saturating_add(t.rounded_grand_total),
            round_off_amount: acc.round_off_amount.saturating_add(t.round_off_amount),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::numeric::Numeric;

    fn item(quantity: Decimal, rate: Decimal, gst_rate: Decimal) -> LineItem {
        LineItem::new("", "", quantity, rate, gst_rate)
    }

    fn assert_invariants(items: &[LineItem]) {
        let totals = compute_totals(items);
        let subtotal: Decimal = items
            .iter()
            .map(|i| i.quantity.coerce() * i.rate.coerce())
            .sum();
        assert_eq!(totals.subtotal, subtotal);
        assert_eq!(totals.total_cgst, totals.total_sgst);
        assert_eq!(totals.total_tax, totals.total_cgst + totals.total_sgst);
        assert_eq!(totals.grand_total, totals.subtotal + totals.total_tax);
        assert_eq!(
            totals.rounded_grand_total,
            totals.grand_total.round_dp_with_strategy(0, GRAND_TOTAL_ROUNDING)
        );
        assert_eq!(
            totals.round_off_amount,
            totals.rounded_grand_total - totals.grand_total
        );
        assert_eq!(
            totals.rounded_grand_total,
            totals.grand_total + totals.round_off_amount
        );
    }

    #[test]
    fn single_item_at_five_percent() {
        let totals = compute_totals(&[item(dec!(60), dec!(230.0), dec!(5))]);
        assert_eq!(totals.subtotal, dec!(13800));
        assert_eq!(totals.total_cgst, dec!(345));
        assert_eq!(totals.total_sgst, dec!(345));
        assert_eq!(totals.total_tax, dec!(690));
        assert_eq!(totals.grand_total, dec!(14490));
        assert_eq!(totals.rounded_grand_total, dec!(14490));
        assert_eq!(totals.round_off_amount, Decimal::ZERO);
    }

    #[test]
    fn fractional_total_rounds_down_with_negative_round_off() {
        let totals = compute_totals(&[item(dec!(1), dec!(18427.33), dec!(0))]);
        assert_eq!(totals.subtotal, dec!(18427.33));
        assert_eq!(totals.total_tax, Decimal::ZERO);
        assert_eq!(totals.grand_total, dec!(18427.33));
        assert_eq!(totals.rounded_grand_total, dec!(18427));
        assert_eq!(totals.round_off_amount, dec!(-0.33));
    }

    #[test]
    fn half_rupee_rounds_up() {
        let totals = compute_totals(&[item(dec!(1), dec!(100.5), dec!(0))]);
        assert_eq!(totals.rounded_grand_total, dec!(101));
        assert_eq!(totals.round_off_amount, dec!(0.5));

        let totals = compute_totals(&[item(dec!(1), dec!(101.5), dec!(0))]);
        assert_eq!(totals.rounded_grand_total, dec!(102));
    }

    #[test]
    fn empty_items_are_all_zero() {
        assert_eq!(compute_totals(&[]), Totals::default());
        let totals = compute_totals(&[]);
        assert!(totals.subtotal.is_zero());
        assert!(totals.rounded_grand_total.is_zero());
        assert!(totals.round_off_amount.is_zero());
    }

    #[test]
    fn malformed_fields_contribute_nothing() {
        let broken = LineItem::new("", "", "", "abc", Numeric::Missing);
        let totals = compute_totals(&[broken.clone()]);
        assert_eq!(totals, Totals::default());

        let with_valid = compute_totals(&[broken, item(dec!(2), dec!(50), dec!(12))]);
        assert_eq!(with_valid.subtotal, dec!(100));
        assert_eq!(with_valid.total_cgst, dec!(6));
        assert_eq!(with_valid.total_sgst, dec!(6));
    }

    #[test]
    fn odd_tax_splits_evenly_without_per_item_rounding() {
        // 3 × 0.01 at 5%: each line's tax is 0.0005, each half 0.00025
        let items = vec![
            item(dec!(1), dec!(0.01), dec!(5)),
            item(dec!(1), dec!(0.01), dec!(5)),
            item(dec!(1), dec!(0.01), dec!(5)),
        ];
        let totals = compute_totals(&items);
        assert_eq!(totals.total_cgst, dec!(0.00075));
        assert_eq!(totals.total_sgst, dec!(0.00075));
        assert_eq!(totals.grand_total, dec!(0.0315));
        assert_eq!(totals.rounded_grand_total, Decimal::ZERO);
    }

    #[test]
    fn invariants_hold_across_mixed_items() {
        assert_invariants(&[]);
        assert_invariants(&[
            item(dec!(3), dec!(99.99), dec!(18)),
            item(dec!(0.5), dec!(1234.567), dec!(12)),
            item(dec!(7), dec!(0.33), dec!(28)),
        ]);
        assert_invariants(&[
            LineItem::new("", "", "2", "149.5", "5"),
            LineItem::new("", "", "1e2", "3.3", "0.25"),
        ]);
    }

    #[test]
    fn negative_values_propagate() {
        let totals = compute_totals(&[
            item(dec!(10), dec!(100), dec!(5)),
            item(dec!(-2), dec!(100), dec!(5)),
        ]);
        assert_eq!(totals.subtotal, dec!(800));
        assert_eq!(totals.total_tax, dec!(40));
        assert_eq!(totals.rounded_grand_total, dec!(840));
    }

    #[test]
    fn item_order_does_not_change_totals() {
        let a = item(dec!(1.5), dec!(333.33), dec!(18));
        let b = item(dec!(4), dec!(12.75), dec!(5));
        assert_eq!(
            compute_totals(&[a.clone(), b.clone()]),
            compute_totals(&[b, a])
        );
    }

    #[test]
    fn sum_adds_field_by_field() {
        let a = compute_totals(&[item(dec!(1), dec!(100), dec!(18))]);
        let b = compute_totals(&[item(dec!(1), dec!(50.4), dec!(0))]);
        let sum = Totals::sum([a, b]);
        assert_eq!(sum.subtotal, dec!(150.4));
        assert_eq!(sum.total_tax, dec!(18));
        assert_eq!(sum.rounded_grand_total, dec!(168));
    }

    #[test]
    fn oversized_line_counts_as_zero() {
        let huge: LineItem =
            serde_json::from_str(r#"{"quantity": 1e20, "rate": 1e20, "gstRate": 5}"#).unwrap();
        let totals = compute_totals(&[huge.clone()]);
        assert_eq!(totals, Totals::default());

        let totals = compute_totals(&[huge, item(dec!(60), dec!(230), dec!(5))]);
        assert_eq!(totals.subtotal, dec!(13800));
        assert_eq!(totals.rounded_grand_total, dec!(14490));
    }

    #[test]
    fn line_overflowing_running_sum_is_skipped() {
        let near_max = Decimal::MAX - dec!(5);
        let totals = compute_totals(&[
            item(dec!(1), near_max, dec!(0)),
            item(dec!(1), dec!(10), dec!(0)),
            item(dec!(1), dec!(3), dec!(0)),
        ]);
        assert_eq!(totals.subtotal, near_max + dec!(3));
        assert_eq!(totals.rounded_grand_total, near_max + dec!(3));
        assert!(totals.round_off_amount.is_zero());
    }

    #[test]
    fn sum_saturates_instead_of_overflowing() {
        let max = Totals {
            rounded_grand_total: Decimal::MAX,
            ..Default::default()
        };
        assert_eq!(Totals::sum([max, max]).rounded_grand_total, Decimal::MAX);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let totals = compute_totals(&[item(dec!(1), dec!(10), dec!(5))]);
        let json = serde_json::to_value(totals).unwrap();
        assert!(json.get("roundedGrandTotal").is_some());
        assert!(json.get("totalCgst").is_some());
        assert!(json.get("roundOffAmount").is_some());
    }
}
