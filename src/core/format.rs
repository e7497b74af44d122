use rust_decimal::{Decimal, RoundingStrategy};

/// Rupee amount with Indian digit grouping, e.g. `₹12,34,567.50`
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}₹{}.{}", sign, group_indian(whole), fraction)
}

/// Percentage with two decimals, e.g. `2.50%`
pub fn format_rate(rate: Decimal) -> String {
    format!("{:.2}%", rate)
}

/// Last three digits, then groups of two: 1234567 -> 12,34,567
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    groups.push(head);
    groups.reverse();
    format!("{},{}", groups.join(","), last_three)
}
