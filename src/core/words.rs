//! Rupee amounts in Indian-English words, grouped by thousand, lakh and crore.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];
const TEENS: [&str; 10] = [
    "Ten", "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen",
    "Eighteen", "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u128 = 10_000_000;
const LAKH: u128 = 100_000;
const THOUSAND: u128 = 1_000;

/// Tiers below a crore, largest first
const SUB_CRORE_TIERS: [(u128, &str); 2] = [(LAKH, "Lakh"), (THOUSAND, "Thousand")];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WordsError {
    #[error("amount must not be negative: {0}")]
    NegativeAmount(Decimal),
}

/// Spell out a rupee amount, e.g. `18427.50` becomes
/// "Eighteen Thousand Four Hundred Twenty Seven Rupees and Fifty Paise Only".
///
/// Paise are rounded to the nearest whole paisa (half away from zero); a
/// fraction that rounds to 100 paise carries into the rupees.
/// Negative amounts are rejected.
pub fn amount_to_words(amount: Decimal) -> Result<String, WordsError> {
    if amount.is_zero() {
        return Ok("Zero Rupees Only".to_string());
    }
    if amount.is_sign_negative() {
        return Err(WordsError::NegativeAmount(amount));
    }

    let whole = amount.trunc();
    let mut paise = ((amount - whole) * dec!(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .expect("paise are between 0 and 100");
    let mut rupees = whole
        .to_u128()
        .expect("a non-negative whole Decimal fits in u128");
    if paise >= 100 {
        rupees += 1;
        paise -= 100;
    }

    let mut words = rupees_to_words(rupees);
    if words.is_empty() {
        words.push_str("Zero");
    }
    words.push_str(" Rupees");
    if paise > 0 {
        words.push_str(" and ");
        words.push_str(&below_thousand(paise));
        words.push_str(" Paise");
    }
    words.push_str(" Only");
    Ok(words)
}

/// Whole rupees in words without any suffix; empty for zero.
///
/// A crore count is itself spelled with the full grouping, so
/// 1,000 crore is "One Thousand Crore".
pub fn rupees_to_words(rupees: u128) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut rest = rupees;

    if rest >= CRORE {
        parts.push(format!("{} Crore", rupees_to_words(rest / CRORE)));
        rest %= CRORE;
    }
    for (size, name) in SUB_CRORE_TIERS {
        if rest >= size {
            // below a crore each tier count is under 100
            parts.push(format!("{} {}", below_thousand((rest / size) as u32), name));
            rest %= size;
        }
    }
    if rest > 0 {
        parts.push(below_thousand(rest as u32));
    }

    parts.join(" ")
}

/// Words for 1..=999; empty for zero. Only the last three digits are read.
pub fn below_thousand(n: u32) -> String {
    let mut n = (n % 1000) as usize;
    let mut parts: Vec<&str> = Vec::new();

    if n >= 100 {
        parts.push(ONES[n / 100]);
        parts.push("Hundred");
        n %= 100;
    }
    if n >= 20 {
        parts.push(TENS[n / 10]);
        n %= 10;
        if n > 0 {
            parts.push(ONES[n]);
        }
    } else if n >= 10 {
        parts.push(TEENS[n - 10]);
    } else if n > 0 {
        parts.push(ONES[n]);
    }

    parts.join(" ")
}
