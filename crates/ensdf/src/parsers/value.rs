use crate::parsers::{asymmetric_digits, last_digit_power, parse_number, sig_digits};
use crate::value::{Quality, SignInfo, UncertainValue, UncertaintyKind};

use nom::combinator::all_consuming;

/// Decode a value field and its uncertainty field
///
/// This is the shared decoder behind every numeric quantity. It never fails,
/// text that can not be interpreted gives an undefined value instead.
///
/// ```rust
/// # use nscheme_ensdf::{decode_value_uncertainty, SignInfo, UncertaintyKind};
/// let value = decode_value_uncertainty("0.0025", "LT");
/// assert_eq!(value.kind(), UncertaintyKind::LessThan);
/// assert!(!value.has_finite_value());
///
/// let value = decode_value_uncertainty("-", "");
/// assert_eq!(value.sign(), SignInfo::SignDefined);
///
/// let value = decode_value_uncertainty("ABC", "3");
/// assert_eq!(value.sign(), SignInfo::Undefined);
/// ```
pub fn decode_value_uncertainty(value_field: &str, uncertainty_field: &str) -> UncertainValue {
    decode_with_quality(value_field, uncertainty_field).0
}

/// Same as [decode_value_uncertainty], also reporting the field [Quality]
///
/// ```rust
/// # use nscheme_ensdf::{decode_with_quality, Quality, UncertaintyKind};
/// let (value, quality) = decode_with_quality("[1.5]", "");
/// assert_eq!(quality, Quality::Theoretical);
/// assert_eq!(value.kind(), UncertaintyKind::Calculated);
/// ```
pub fn decode_with_quality(value_field: &str, uncertainty_field: &str) -> (UncertainValue, Quality) {
    let (text, quality) = Quality::strip(value_field);
    let uncertainty = uncertainty_field.trim();

    if text == "+" || text == "-" {
        return (UncertainValue::sign_only(text == "-"), quality);
    }

    let Some(number) = parse_number(text) else {
        return (UncertainValue::undefined(), quality);
    };

    let sign = if text.starts_with(['+', '-']) {
        SignInfo::SignMagnitudeDefined
    } else {
        SignInfo::MagnitudeDefined
    };

    let mut value = UncertainValue::new(number, sig_digits(text), sign);
    let scale = 10f64.powi(last_digit_power(text));

    if let Some(kind) = UncertaintyKind::from_code(uncertainty) {
        value.set_kind(kind);
    } else if quality == Quality::Theoretical {
        value.set_kind(UncertaintyKind::Calculated);
    } else if quality == Quality::Tentative {
        value.set_kind(UncertaintyKind::Approximately);
    } else if uncertainty.is_empty() {
        if number == 0.0 {
            value.set_symmetric(0.0);
        } else {
            value.set_kind(UncertaintyKind::Approximately);
        }
    } else if uncertainty.contains('+') && uncertainty.contains('-') {
        match all_consuming(asymmetric_digits)(uncertainty) {
            Ok((_, (upper, lower))) => {
                value.set_asymmetric(lower as f64 * scale, upper as f64 * scale)
            }
            Err(_) => value.set_kind(UncertaintyKind::Approximately),
        }
    } else if uncertainty.chars().all(|c| c.is_ascii_digit()) {
        match uncertainty.parse::<u64>() {
            Ok(digits) => value.set_symmetric(digits as f64 * scale),
            Err(_) => value.set_kind(UncertaintyKind::Approximately),
        }
    } else {
        value.set_kind(UncertaintyKind::Approximately);
    }

    (value, quality)
}

/// True if the text reads as an uncertainty rather than a value or reference
pub(crate) fn is_uncertainty(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty()
        && (UncertaintyKind::from_code(text).is_some()
            || text.chars().all(|c| c.is_ascii_digit())
            || all_consuming(asymmetric_digits)(text).is_ok())
}
