// src/format.rs
//! Exact decimal rendering of base-unit amounts (e.g. wei).
//!
//! Every stage works on digit strings. Nothing in the value path goes
//! through a float, so amounts of any length keep every digit until the
//! significant-figure window drops them.

use crate::error::FormatError;

/// Fewest fractional digits the significance window ever keeps.
pub const MIN_DECIMALS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Power of ten between the base unit and the display unit.
    pub decimals: u8,
    pub significant_figures: usize,
    pub separator: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimals: 18,
            significant_figures: 4,
            separator: ",".to_string(),
        }
    }
}

/// Output of [`select`]: the truncated amount and the first digit cut off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// `"<integer>.<kept fraction digits>"`
    pub candidate: String,
    pub kept_decimals: usize,
    /// Numeric value (0-9) of the digit right after the window, if any.
    pub dropped_digit: Option<u8>,
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn ensure_digits(s: &str) -> Result<(), FormatError> {
    if is_digits(s) {
        Ok(())
    } else {
        Err(FormatError::invalid(s))
    }
}

/// Splits `"123"` or `"123.45"` into its parts. Both sides must be
/// non-empty digit runs.
fn split_amount(amount: &str) -> Result<(&str, Option<&str>), FormatError> {
    let (integer, fraction) = match amount.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (amount, None),
    };
    if !is_digits(integer) || fraction.is_some_and(|f| !is_digits(f)) {
        return Err(FormatError::invalid(amount));
    }
    Ok((integer, fraction))
}

/// Divides `raw` by `10^decimals`, returning `(integer, fraction)` digit
/// strings. The fraction always has exactly `decimals` digits.
pub fn scale(raw: &str, decimals: u8) -> Result<(String, String), FormatError> {
    ensure_digits(raw)?;
    let digits = raw.trim_start_matches('0');
    let width = usize::from(decimals);

    if digits.len() <= width {
        return Ok(("0".to_string(), format!("{digits:0>width$}")));
    }
    let (integer, fraction) = digits.split_at(digits.len() - width);
    Ok((integer.to_string(), fraction.to_string()))
}

/// Picks how many fractional digits to keep so the amount shows
/// `significant_figures` significant digits, never fewer than
/// [`MIN_DECIMALS`].
///
/// When the integer part is `"0"` the count starts at the first non-zero
/// fractional digit, so smaller amounts get more decimal places. If the
/// fraction runs out before the target is reached the whole fraction is
/// kept.
pub fn select(
    integer: &str,
    fraction: &str,
    significant_figures: usize,
) -> Result<Selection, FormatError> {
    ensure_digits(integer)?;
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::invalid(fraction));
    }

    let wanted = if integer.len() >= significant_figures {
        MIN_DECIMALS
    } else if integer != "0" {
        significant_figures - integer.len()
    } else {
        significant_window(fraction, significant_figures).unwrap_or(fraction.len())
    };
    // The window never reaches past the fraction, except to pad up to the floor.
    let kept_decimals = wanted.min(fraction.len()).max(MIN_DECIMALS);

    let window = &fraction[..kept_decimals.min(fraction.len())];
    let floor = MIN_DECIMALS;
    let candidate = format!("{integer}.{window:0<floor$}");
    let dropped_digit = fraction.as_bytes().get(kept_decimals).map(|b| b - b'0');

    Ok(Selection {
        candidate,
        kept_decimals,
        dropped_digit,
    })
}

/// End of the window holding `significant_figures` digits counted from the
/// first non-zero one, or `None` if the fraction is too short.
fn significant_window(fraction: &str, significant_figures: usize) -> Option<usize> {
    let first = fraction.bytes().position(|b| b != b'0')?;
    let end = first.checked_add(significant_figures)?;
    (end <= fraction.len()).then_some(end)
}

/// Round-half-up on a single look-ahead digit.
///
/// Only `dropped_digit` is inspected; anything beyond it was already
/// discarded. A carry ripples left across the decimal point and may add a
/// new leading `1`.
pub fn round_half_up(amount: &str, dropped_digit: Option<u8>) -> Result<String, FormatError> {
    split_amount(amount)?;
    match dropped_digit {
        None | Some(0..=4) => return Ok(amount.to_string()),
        Some(5..=9) => {}
        Some(other) => return Err(FormatError::invalid(other.to_string())),
    }

    let mut digits = amount.as_bytes().to_vec();
    let mut carry = true;
    for slot in digits.iter_mut().rev().filter(|b| **b != b'.') {
        if *slot == b'9' {
            *slot = b'0';
        } else {
            *slot += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }
    Ok(digits.into_iter().map(char::from).collect())
}

/// Drops leading integer zeros (keeping at least `"0"`) and trailing
/// fractional zeros, along with the point if nothing is left after it.
///
/// This also undoes the [`MIN_DECIMALS`] floor: `"5.00"` becomes `"5"`.
pub fn trim(amount: &str) -> Result<String, FormatError> {
    let (integer, fraction) = split_amount(amount)?;
    let integer = match integer.trim_start_matches('0') {
        "" => "0",
        rest => rest,
    };
    let fraction = fraction.map_or("", |f| f.trim_end_matches('0'));

    if fraction.is_empty() {
        Ok(integer.to_string())
    } else {
        Ok(format!("{integer}.{fraction}"))
    }
}

/// Inserts `separator` between every group of three integer digits,
/// counted from the right. The fraction is left alone.
pub fn group(amount: &str, separator: &str) -> Result<String, FormatError> {
    let (integer, fraction) = split_amount(amount)?;
    let mut out = String::with_capacity(amount.len() + integer.len() / 3 * separator.len());
    for (i, digit) in integer.char_indices() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    Ok(out)
}

/// Formats a base-unit amount for display: scale, select, round, trim,
/// group.
pub fn format_amount(raw: &str, options: &FormatOptions) -> Result<String, FormatError> {
    let (integer, fraction) = scale(raw, options.decimals)?;
    let selection = select(&integer, &fraction, options.significant_figures)?;
    let rounded = round_half_up(&selection.candidate, selection.dropped_digit)?;
    let trimmed = trim(&rounded)?;
    group(&trimmed, &options.separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(s: &str) -> FormatError {
        FormatError::InvalidNumericInput(s.to_string())
    }

    #[test]
    fn scale_one_unit() {
        let (integer, fraction) = scale("1000000000000000000", 18).unwrap();
        assert_eq!(integer, "1");
        assert_eq!(fraction, "000000000000000000");
    }

    #[test]
    fn scale_pads_small_amounts() {
        let (integer, fraction) = scale("123456789", 18).unwrap();
        assert_eq!(integer, "0");
        assert_eq!(fraction, "000000000123456789");
    }

    #[test]
    fn scale_strips_leading_zeros() {
        assert_eq!(
            scale("0001234", 2).unwrap(),
            ("12".to_string(), "34".to_string())
        );
        assert_eq!(
            scale("0000", 3).unwrap(),
            ("0".to_string(), "000".to_string())
        );
    }

    #[test]
    fn scale_with_zero_decimals() {
        assert_eq!(
            scale("42", 0).unwrap(),
            ("42".to_string(), String::new())
        );
        assert_eq!(scale("0", 0).unwrap(), ("0".to_string(), String::new()));
    }

    #[test]
    fn scale_rejects_non_digits() {
        assert_eq!(scale("", 18), Err(invalid("")));
        assert_eq!(scale("12a3", 18), Err(invalid("12a3")));
        assert_eq!(scale("1.5", 18), Err(invalid("1.5")));
        assert_eq!(scale("-1", 18), Err(invalid("-1")));
    }

    #[test]
    fn select_integer_already_significant() {
        let s = select("12345", "678900", 4).unwrap();
        assert_eq!(s.kept_decimals, 2);
        assert_eq!(s.candidate, "12345.67");
        assert_eq!(s.dropped_digit, Some(8));
    }

    #[test]
    fn select_tops_up_short_integer() {
        let s = select("1", "234567", 4).unwrap();
        assert_eq!(s.kept_decimals, 3);
        assert_eq!(s.candidate, "1.234");
        assert_eq!(s.dropped_digit, Some(5));

        // 4 - 3 = 1, raised to the floor
        let s = select("123", "456", 4).unwrap();
        assert_eq!(s.kept_decimals, 2);
        assert_eq!(s.candidate, "123.45");
    }

    #[test]
    fn select_counts_from_first_nonzero_fraction_digit() {
        let s = select("0", "000000000123456789", 4).unwrap();
        assert_eq!(s.kept_decimals, 13);
        assert_eq!(s.candidate, "0.0000000001234");
        assert_eq!(s.dropped_digit, Some(5));

        let s = select("0", "123456", 4).unwrap();
        assert_eq!(s.kept_decimals, 4);
        assert_eq!(s.candidate, "0.1234");
    }

    #[test]
    fn select_keeps_whole_fraction_when_too_short() {
        let s = select("0", "000000000000000012", 4).unwrap();
        assert_eq!(s.kept_decimals, 18);
        assert_eq!(s.candidate, "0.000000000000000012");
        assert_eq!(s.dropped_digit, None);

        let s = select("0", "000", 4).unwrap();
        assert_eq!(s.kept_decimals, 3);
        assert_eq!(s.candidate, "0.000");
    }

    #[test]
    fn select_pads_short_fraction_only_to_floor() {
        let s = select("7", "", 4).unwrap();
        assert_eq!(s.kept_decimals, 2);
        assert_eq!(s.candidate, "7.00");
        assert_eq!(s.dropped_digit, None);

        let s = select("0", "5", 4).unwrap();
        assert_eq!(s.candidate, "0.50");

        let s = select("12", "345", 6).unwrap();
        assert_eq!(s.kept_decimals, 3);
        assert_eq!(s.candidate, "12.345");
    }

    #[test]
    fn select_handles_huge_significance_targets() {
        let s = select("1", "5", 70_000).unwrap();
        assert_eq!(s.kept_decimals, 2);
        assert_eq!(s.candidate, "1.50");
        assert_eq!(s.dropped_digit, None);

        let s = select("0", "000123", usize::MAX).unwrap();
        assert_eq!(s.kept_decimals, 6);
        assert_eq!(s.candidate, "0.000123");
        assert_eq!(s.dropped_digit, None);

        let s = select("123", "456", usize::MAX).unwrap();
        assert_eq!(s.candidate, "123.456");
    }

    #[test]
    fn format_with_huge_significance_keeps_every_digit() {
        let options = FormatOptions {
            significant_figures: usize::MAX,
            ..FormatOptions::default()
        };
        assert_eq!(
            format_amount("1234567890000000000123", &options).unwrap(),
            "1,234.567890000000000123"
        );
    }

    #[test]
    fn select_rejects_bad_parts() {
        assert_eq!(select("", "00", 4), Err(invalid("")));
        assert_eq!(select("1x", "00", 4), Err(invalid("1x")));
        assert_eq!(select("1", "0.0", 4), Err(invalid("0.0")));
    }

    #[test]
    fn round_leaves_low_digits_alone() {
        assert_eq!(round_half_up("1.234", Some(4)).unwrap(), "1.234");
        assert_eq!(round_half_up("1.234", Some(0)).unwrap(), "1.234");
        assert_eq!(round_half_up("1.234", None).unwrap(), "1.234");
    }

    #[test]
    fn round_increments_last_digit() {
        assert_eq!(round_half_up("1.234", Some(5)).unwrap(), "1.235");
        assert_eq!(round_half_up("1.234", Some(9)).unwrap(), "1.235");
    }

    #[test]
    fn round_carries_across_point() {
        assert_eq!(round_half_up("9.99", Some(5)).unwrap(), "10.00");
        assert_eq!(round_half_up("99.99", Some(7)).unwrap(), "100.00");
        assert_eq!(round_half_up("0.9999", Some(6)).unwrap(), "1.0000");
        assert_eq!(round_half_up("1.0999", Some(5)).unwrap(), "1.1000");
    }

    #[test]
    fn round_rejects_bad_input() {
        assert_eq!(round_half_up("", Some(5)), Err(invalid("")));
        assert_eq!(round_half_up("9.9.9", Some(5)), Err(invalid("9.9.9")));
        assert_eq!(round_half_up("1.5", Some(10)), Err(invalid("10")));
    }

    #[test]
    fn trim_strips_both_ends() {
        assert_eq!(trim("0012.3400").unwrap(), "12.34");
        assert_eq!(trim("000.0001").unwrap(), "0.0001");
        assert_eq!(trim("0.000").unwrap(), "0");
        assert_eq!(trim("100").unwrap(), "100");
    }

    #[test]
    fn trim_erases_decimal_floor() {
        assert_eq!(trim("5.00").unwrap(), "5");
        assert_eq!(trim("10.50").unwrap(), "10.5");
    }

    #[test]
    fn trim_is_idempotent() {
        for x in ["0.00", "007.0700", "1.0000000001", "120.00", "0", "45"] {
            let once = trim(x).unwrap();
            assert_eq!(trim(&once).unwrap(), once, "input {x}");
        }
    }

    #[test]
    fn trim_rejects_bad_input() {
        assert_eq!(trim(""), Err(invalid("")));
        assert_eq!(trim("5."), Err(invalid("5.")));
        assert_eq!(trim(".5"), Err(invalid(".5")));
        assert_eq!(trim("1,000"), Err(invalid("1,000")));
    }

    #[test]
    fn group_integer_digits() {
        assert_eq!(group("1234567", ",").unwrap(), "1,234,567");
        assert_eq!(group("12", ",").unwrap(), "12");
        assert_eq!(group("123", ",").unwrap(), "123");
        assert_eq!(group("1234", ",").unwrap(), "1,234");
        assert_eq!(group("123456", "_").unwrap(), "123_456");
    }

    #[test]
    fn group_leaves_fraction_untouched() {
        assert_eq!(group("1234.56789", ",").unwrap(), "1,234.56789");
        assert_eq!(group("0.0001234", ",").unwrap(), "0.0001234");
    }

    #[test]
    fn group_rejects_bad_input() {
        assert_eq!(group("12a", ","), Err(invalid("12a")));
        assert_eq!(group("", ","), Err(invalid("")));
    }

    #[test]
    fn format_small_amount_keeps_significance() {
        let options = FormatOptions::default();
        assert_eq!(
            format_amount("123456789", &options).unwrap(),
            "0.0000000001235"
        );
    }

    #[test]
    fn format_exact_integer_drops_decimals() {
        let options = FormatOptions::default();
        assert_eq!(format_amount("5000000000000000000", &options).unwrap(), "5");
        assert_eq!(format_amount("0", &options).unwrap(), "0");
    }

    #[test]
    fn format_rejects_invalid_raw() {
        let options = FormatOptions::default();
        for raw in ["", "12a3", "1.0", " 1"] {
            assert_eq!(format_amount(raw, &options), Err(invalid(raw)));
        }
    }
}
