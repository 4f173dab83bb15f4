//! Number formatting for the display.
//!
//! Results are rendered like C's `%.10g`: ten significant digits, trailing
//! zeros trimmed, and exponent notation once the magnitude no longer fits.

/// Significant digits used for results and history labels.
pub const SIGNIFICANT_DIGITS: usize = 10;

/// Format a number with [`SIGNIFICANT_DIGITS`] significant digits.
pub fn format_number(value: f64) -> String {
    format_with_precision(value, SIGNIFICANT_DIGITS)
}

/// Format a number with `precision` significant digits (at least one).
pub fn format_with_precision(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return format_non_finite(value);
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);

    // The exponent must be taken after rounding: 9.9999999999 rounds up to 10.
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn format_non_finite(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_sign_positive() {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

/// Strip trailing zeros after the decimal point, then a dangling point.
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
