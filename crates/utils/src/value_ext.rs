use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// Works for anything that can be represented as scientific using the
    /// `LowerExp` trait, which is pretty much every numerical primitive.
    /// Values without an exponent (NaN, infinities) are left as they are.
    ///
    /// ```rust
    /// # use nscheme_utils::ValueExt;
    /// let number = -1.0;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1.0).sci(5, 2), "1.00000e+00".to_string());
    /// assert_eq!((1520.0).sci(2, 1), "1.52e+3".to_string());
    /// assert_eq!(f64::NAN.sci(2, 1), "NaN".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Decimal order of magnitude
    ///
    /// The power of ten of the leading digit, taken from the exponent of the
    /// `LowerExp` representation so that there are no rounding surprises from
    /// `log10`. Zero and non-finite values have an order of zero.
    ///
    /// ```rust
    /// # use nscheme_utils::ValueExt;
    /// assert_eq!((1173.228).order(), 3);
    /// assert_eq!((-0.0025).order(), -3);
    /// assert_eq!((1000.0).order(), 3);
    /// assert_eq!((0.0).order(), 0);
    /// assert_eq!(f64::INFINITY.order(), 0);
    /// ```
    fn order(&self) -> i32;
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        let Some(idx) = num.find('e') else {
            return num;
        };
        let exp = num.split_off(idx);
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        // Pad the exponent with zeros if needed and put it back on the number
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }

    fn order(&self) -> i32 {
        let num = f!("{:e}", &self);
        num.split_once('e')
            .and_then(|(_, exp)| exp.parse::<i32>().ok())
            .unwrap_or(0)
    }
}
