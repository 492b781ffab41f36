// nom parser combinators
use nom::branch::alt;
use nom::character::complete::{char, digit0, digit1, one_of};
use nom::combinator::{all_consuming, opt, recognize};
use nom::sequence::{pair, preceded, tuple};
use nom::IResult;

/// Recognise a number the way ENSDF writes them
///
/// Optional sign, digits with an optional decimal point (either side may be
/// empty but not both), and an optional `E` exponent.
pub(crate) fn ensdf_number(i: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(i)
}

/// True if the whole of the text is a single ENSDF number
pub(crate) fn is_number(i: &str) -> bool {
    all_consuming(ensdf_number)(i).is_ok()
}

/// Parse the whole text as an ENSDF number
pub(crate) fn parse_number(i: &str) -> Option<f64> {
    let (_, text) = all_consuming(ensdf_number)(i).ok()?;
    text.parse::<f64>().ok()
}

/// Number of significant digits written in a numeric field
///
/// Leading zeros are not significant, trailing zeros are. A zero value counts
/// every written decimal place plus one, so `"0.0"` keeps one decimal when
/// formatted again.
pub(crate) fn sig_digits(text: &str) -> i32 {
    let text = text.trim().trim_start_matches(['+', '-']);
    let mantissa = match text.find(['e', 'E']) {
        Some(idx) => &text[..idx],
        None => text,
    };

    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    let significant = digits.trim_start_matches('0');

    if significant.is_empty() {
        let decimals = mantissa
            .split_once('.')
            .map(|(_, d)| d.len() as i32)
            .unwrap_or(0);
        decimals + 1
    } else {
        significant.len() as i32
    }
}

/// Power of ten of the last written digit, e.g. `-3` for `"1173.228"`
///
/// This is the scale ENSDF applies to the digits of an uncertainty field.
pub(crate) fn last_digit_power(text: &str) -> i32 {
    let text = text.trim().trim_start_matches(['+', '-']);
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(idx) => (&text[..idx], text[idx + 1..].parse::<i32>().unwrap_or(0)),
        None => (text, 0),
    };

    let decimals = mantissa
        .split_once('.')
        .map(|(_, d)| d.len() as i32)
        .unwrap_or(0);

    exponent - decimals
}

/// Asymmetric uncertainty digits, `+a-b` or `-b+a`, as `(upper, lower)`
pub(crate) fn asymmetric_digits(i: &str) -> IResult<&str, (u64, u64)> {
    alt((upper_first, lower_first))(i)
}

/// The usual `+a-b` ordering
fn upper_first(i: &str) -> IResult<&str, (u64, u64)> {
    let (i, upper) = preceded(char('+'), nom::character::complete::u64)(i)?;
    let (i, lower) = preceded(char('-'), nom::character::complete::u64)(i)?;
    Ok((i, (upper, lower)))
}

/// The inverted `-b+a` ordering
fn lower_first(i: &str) -> IResult<&str, (u64, u64)> {
    let (i, lower) = preceded(char('-'), nom::character::complete::u64)(i)?;
    let (i, upper) = preceded(char('+'), nom::character::complete::u64)(i)?;
    Ok((i, (upper, lower)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognise_numbers() {
        assert!(is_number("1173.228"));
        assert!(is_number("+0.35"));
        assert!(is_number("-1.5E-3"));
        assert!(is_number("1.5E3"));
        assert!(is_number(".5"));
        assert!(is_number("5."));
        assert!(is_number("0"));

        assert!(!is_number(""));
        assert!(!is_number("+"));
        assert!(!is_number("1.2.3"));
        assert!(!is_number("12A"));
        assert!(!is_number("E3"));
    }

    #[test]
    fn significant_digits() {
        assert_eq!(sig_digits("1173.228"), 7);
        assert_eq!(sig_digits("0.0025"), 2);
        assert_eq!(sig_digits("-0.0025"), 2);
        assert_eq!(sig_digits("1200"), 4);
        assert_eq!(sig_digits("1.50"), 3);
        assert_eq!(sig_digits("1.5E3"), 2);
        assert_eq!(sig_digits("0"), 1);
        assert_eq!(sig_digits("0.0"), 2);
    }

    #[test]
    fn last_digit() {
        assert_eq!(last_digit_power("1173.228"), -3);
        assert_eq!(last_digit_power("1200"), 0);
        assert_eq!(last_digit_power("1.5E3"), 2);
        assert_eq!(last_digit_power("2.5E-3"), -4);
        assert_eq!(last_digit_power("+0.35"), -2);
    }

    #[test]
    fn asymmetric() {
        assert_eq!(asymmetric_digits("+12-8"), Ok(("", (12, 8))));
        assert_eq!(asymmetric_digits("-8+12"), Ok(("", (12, 8))));
        assert!(asymmetric_digits("12").is_err());
    }
}
