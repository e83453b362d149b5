//! Display formatting. Captured scenario values are produced here, so every
//! renderer must go through these functions to stay comparable with saved
//! scenarios and exported CSV files.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::fields::SliderUnit;
use crate::types::{Money, Multiple};

/// Rendering of a figure the maths could not produce (zero term, zero EBITDA).
pub const UNDEFINED_DISPLAY: &str = "n/a";

/// Whole-unit US dollars: `$1,234`, `-$1,234`. Midpoints round away from zero.
/// Any negative value keeps its sign, even when it rounds to zero (`-$0`).
pub fn format_currency(value: Money) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = group_thousands(&integer_digits(rounded));
    if value < Decimal::ZERO {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// Currency, or [`UNDEFINED_DISPLAY`] when the figure is undefined.
pub fn format_currency_opt(value: Option<Money>) -> String {
    value.map_or_else(|| UNDEFINED_DISPLAY.to_string(), format_currency)
}

/// One decimal place: `4.0`, `12.5`.
///
/// Rounds the nearest binary double rather than the exact decimal, so a
/// ratio such as 1.45 (stored as 1.4499...) shows as `1.4`. Negative values
/// keep their sign through zero (`-0.0`).
pub fn format_multiple(value: Multiple) -> String {
    let binary = value
        .to_f64()
        .and_then(Decimal::from_f64_retain)
        .unwrap_or(value);
    let mut rounded = binary
        .abs()
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    if value < Decimal::ZERO {
        format!("-{rounded}")
    } else {
        rounded.to_string()
    }
}

pub fn format_multiple_opt(value: Option<Multiple>) -> String {
    value.map_or_else(|| UNDEFINED_DISPLAY.to_string(), format_multiple)
}

/// Slider handle text: value rounded half up to an integer, grouped, with
/// the unit's prefix or suffix (`$1,000,000`, `10%`, `10 years`).
pub fn format_slider(unit: SliderUnit, value: Decimal) -> String {
    let rounded = (value + dec!(0.5)).floor();
    let mut grouped = group_thousands(&integer_digits(rounded));
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.insert(0, '-');
    }
    match unit {
        SliderUnit::Currency => format!("${grouped}"),
        SliderUnit::Percent => format!("{grouped}%"),
        SliderUnit::Years => format!("{grouped} years"),
    }
}

/// Inverse of the display formats: keep digits, `.` and `-`, then parse.
/// `"$1,000,000"` -> 1000000, `"10 years"` -> 10. Returns `None` when
/// nothing numeric is left.
pub fn parse_display(text: &str) -> Option<Decimal> {
    let numeric: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if numeric.is_empty() {
        return None;
    }
    numeric.parse::<Decimal>().ok()
}

/// Removes thousands separators, as the CSV export does for every cell.
pub fn strip_thousands(text: &str) -> String {
    text.replace(',', "")
}

fn integer_digits(value: Decimal) -> String {
    let text = value.abs().trunc().to_string();
    match text.split_once('.') {
        Some((int, _)) => int.to_string(),
        None => text,
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_currency(dec!(0)), "$0");
        assert_eq!(format_currency(dec!(999)), "$999");
        assert_eq!(format_currency(dec!(1000)), "$1,000");
        assert_eq!(format_currency(dec!(1000000)), "$1,000,000");
        assert_eq!(format_currency(dec!(123456789)), "$123,456,789");
    }

    #[test]
    fn test_currency_rounding() {
        assert_eq!(format_currency(dec!(10572.17)), "$10,572");
        assert_eq!(format_currency(dec!(1060.5)), "$1,061");
        assert_eq!(format_currency(dec!(-1060.5)), "-$1,061");
        assert_eq!(format_currency(dec!(-0.4)), "-$0");
        assert_eq!(format_currency(dec!(0.4)), "$0");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(dec!(-26868.2)), "-$26,868");
    }

    #[test]
    fn test_multiple() {
        assert_eq!(format_multiple(dec!(4)), "4.0");
        assert_eq!(format_multiple(dec!(3.3333333)), "3.3");
        assert_eq!(format_multiple(dec!(6.25)), "6.3");
        assert_eq!(format_multiple(dec!(0.25)), "0.3");
    }

    #[test]
    fn test_multiple_rounds_binary_value() {
        // 1.45 and 0.35 sit just below the midpoint as doubles
        assert_eq!(format_multiple(dec!(1.45)), "1.4");
        assert_eq!(format_multiple(dec!(0.35)), "0.3");
        assert_eq!(format_multiple(dec!(-1.45)), "-1.4");
        assert_eq!(format_multiple(dec!(-0.04)), "-0.0");
        assert_eq!(format_multiple(Decimal::ZERO), "0.0");
        assert_eq!(format_multiple_opt(None), UNDEFINED_DISPLAY);
    }

    #[test]
    fn test_slider_units() {
        assert_eq!(format_slider(SliderUnit::Currency, dec!(1000000)), "$1,000,000");
        assert_eq!(format_slider(SliderUnit::Percent, dec!(10)), "10%");
        assert_eq!(format_slider(SliderUnit::Years, dec!(10)), "10 years");
        assert_eq!(format_slider(SliderUnit::Percent, dec!(7.5)), "8%");
    }

    #[test]
    fn test_parse_display() {
        assert_eq!(parse_display("$1,000,000"), Some(dec!(1000000)));
        assert_eq!(parse_display("10%"), Some(dec!(10)));
        assert_eq!(parse_display("10 years"), Some(dec!(10)));
        assert_eq!(parse_display("-$26,868"), Some(dec!(-26868)));
        assert_eq!(parse_display("4.0"), Some(dec!(4.0)));
        assert_eq!(parse_display("n/a"), None);
        assert_eq!(parse_display(""), None);
    }

    #[test]
    fn test_strip_thousands() {
        assert_eq!(strip_thousands("$1,200,000"), "$1200000");
        assert_eq!(strip_thousands("10 years"), "10 years");
    }
}
