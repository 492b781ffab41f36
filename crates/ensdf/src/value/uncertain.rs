//! Numeric values carrying ENSDF-style uncertainties

// standard library
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

// nscheme modules
use nscheme_utils::{f, ValueExt};

// internal modules
use crate::parsers::sig_digits;

// external crates
use serde::Serialize;

/// How much of a value's sign and magnitude is known
///
/// ENSDF fields may give a magnitude only (`0.35`), a signed magnitude
/// (`+0.35`), or a sign alone (`+`). Mixing ratios in particular depend on the
/// difference.
///
/// Variants are ordered from least to most determined, so a bare sign ranks
/// above an unsigned magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub enum SignInfo {
    /// Nothing usable was written
    #[default]
    Undefined,
    /// Unsigned magnitude
    MagnitudeDefined,
    /// Sign only, no magnitude
    SignDefined,
    /// Explicitly signed magnitude
    SignMagnitudeDefined,
}

/// Kind of uncertainty attached to a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum UncertaintyKind {
    /// No interpretation possible
    #[default]
    Undefined,
    /// Plain `± sigma`
    Symmetric,
    /// Separate upper and lower bounds, `+a-b`
    Asymmetric,
    /// Upper limit, `LT`
    LessThan,
    /// Upper limit, `LE`
    LessEqual,
    /// Lower limit, `GT`
    GreaterThan,
    /// Lower limit, `GE`
    GreaterEqual,
    /// Approximate, `AP` or no uncertainty given
    Approximately,
    /// Calculated value, `CA`
    Calculated,
    /// From systematics, `SY`
    Systematic,
}

impl UncertaintyKind {
    /// Interpret one of the ENSDF uncertainty codes
    ///
    /// ```rust
    /// # use nscheme_ensdf::UncertaintyKind;
    /// assert_eq!(UncertaintyKind::from_code("LT"), Some(UncertaintyKind::LessThan));
    /// assert_eq!(UncertaintyKind::from_code("ap"), Some(UncertaintyKind::Approximately));
    /// assert_eq!(UncertaintyKind::from_code("12"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "LT" => Some(Self::LessThan),
            "LE" => Some(Self::LessEqual),
            "GT" => Some(Self::GreaterThan),
            "GE" => Some(Self::GreaterEqual),
            "AP" => Some(Self::Approximately),
            "CA" => Some(Self::Calculated),
            "SY" => Some(Self::Systematic),
            _ => None,
        }
    }

    /// The ENSDF code for kinds that have one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::LessThan => Some("LT"),
            Self::LessEqual => Some("LE"),
            Self::GreaterThan => Some("GT"),
            Self::GreaterEqual => Some("GE"),
            Self::Approximately => Some("AP"),
            Self::Calculated => Some("CA"),
            Self::Systematic => Some("SY"),
            _ => None,
        }
    }

    /// Kind after multiplying by a negative number
    pub fn flipped(self) -> Self {
        match self {
            Self::LessThan => Self::GreaterThan,
            Self::LessEqual => Self::GreaterEqual,
            Self::GreaterThan => Self::LessThan,
            Self::GreaterEqual => Self::LessEqual,
            other => other,
        }
    }

    /// `(lower, upper)` bounds implied by kinds without numeric uncertainty
    fn implied_bounds(&self) -> (f64, f64) {
        match self {
            Self::LessThan | Self::LessEqual => (f64::INFINITY, 0.0),
            Self::GreaterThan | Self::GreaterEqual => (0.0, f64::INFINITY),
            Self::Calculated | Self::Systematic | Self::Symmetric | Self::Asymmetric => (0.0, 0.0),
            Self::Approximately | Self::Undefined => (f64::NAN, f64::NAN),
        }
    }
}

/// A value with asymmetric uncertainty bounds
///
/// This is the numeric type used for every physical quantity in the data
/// model. Alongside the value and its `lower`/`upper` uncertainties it keeps
///
/// - what is known about the sign ([SignInfo])
/// - what kind of uncertainty applies ([UncertaintyKind])
/// - how many significant figures were reported
///
/// The significant figures make it possible to write the value back out with
/// the uncertainty aligned to the last reported digit.
///
/// ```rust
/// # use nscheme_ensdf::{decode_value_uncertainty, UncertaintyKind};
/// let value = decode_value_uncertainty("1173.228", "3");
///
/// assert_eq!(value.value(), 1173.228);
/// assert_eq!(value.kind(), UncertaintyKind::Symmetric);
/// assert!((value.upper_sigma() - 0.003).abs() < 1e-12);
/// assert_eq!(value.to_string(), "1173.228(3)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UncertainValue {
    value: f64,
    lower_sigma: f64,
    upper_sigma: f64,
    sign: SignInfo,
    kind: UncertaintyKind,
    sig_figs: i32,
}

impl Default for UncertainValue {
    fn default() -> Self {
        Self::undefined()
    }
}

impl UncertainValue {
    /// Nothing known at all
    pub fn undefined() -> Self {
        Self {
            value: f64::NAN,
            lower_sigma: f64::NAN,
            upper_sigma: f64::NAN,
            sign: SignInfo::Undefined,
            kind: UncertaintyKind::Undefined,
            sig_figs: 0,
        }
    }

    /// A value with no uncertainty interpretation yet
    pub fn new(value: f64, sig_figs: i32, sign: SignInfo) -> Self {
        Self {
            value,
            lower_sigma: f64::NAN,
            upper_sigma: f64::NAN,
            sign,
            kind: UncertaintyKind::Undefined,
            sig_figs,
        }
    }

    /// A value known exactly, with zero symmetric uncertainty
    ///
    /// ```rust
    /// # use nscheme_ensdf::UncertainValue;
    /// let zero = UncertainValue::exact(0.0);
    /// assert!(zero.has_finite_value());
    /// assert!(zero.is_exact());
    /// assert_eq!(zero.to_string(), "0");
    /// ```
    pub fn exact(value: f64) -> Self {
        let sign = if value < 0.0 {
            SignInfo::SignMagnitudeDefined
        } else {
            SignInfo::MagnitudeDefined
        };
        let sig_figs = if value.is_finite() {
            sig_digits(&f!("{value}"))
        } else {
            0
        };

        let mut exact = Self::new(value, sig_figs, sign);
        exact.set_symmetric(0.0);
        exact
    }

    /// A value with a plain symmetric uncertainty
    pub fn symmetric(value: f64, sigma: f64) -> Self {
        let mut result = Self::exact(value);
        result.set_symmetric(sigma.abs());
        result
    }

    /// Only the sign is known
    pub fn sign_only(negative: bool) -> Self {
        let sign = if negative { -1.0 } else { 1.0 };
        Self::new(f64::NAN.copysign(sign), 0, SignInfo::SignDefined)
    }

    // ! Setters used while decoding fields

    /// Set a symmetric uncertainty
    pub(crate) fn set_symmetric(&mut self, sigma: f64) {
        self.lower_sigma = sigma;
        self.upper_sigma = sigma;
        self.kind = UncertaintyKind::Symmetric;
    }

    /// Set separate lower and upper uncertainties
    pub(crate) fn set_asymmetric(&mut self, lower: f64, upper: f64) {
        self.lower_sigma = lower;
        self.upper_sigma = upper;
        self.kind = UncertaintyKind::Asymmetric;
    }

    /// Set one of the kinds that carries no numeric uncertainty
    pub(crate) fn set_kind(&mut self, kind: UncertaintyKind) {
        let (lower, upper) = kind.implied_bounds();
        self.lower_sigma = lower;
        self.upper_sigma = upper;
        self.kind = kind;
    }

    // ! Getters

    /// The central value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Uncertainty below the value
    pub fn lower_sigma(&self) -> f64 {
        self.lower_sigma
    }

    /// Uncertainty above the value
    pub fn upper_sigma(&self) -> f64 {
        self.upper_sigma
    }

    /// What is known about the sign
    pub fn sign(&self) -> SignInfo {
        self.sign
    }

    /// Kind of uncertainty
    pub fn kind(&self) -> UncertaintyKind {
        self.kind
    }

    /// Number of significant figures reported, 0 if unknown
    pub fn sig_figs(&self) -> i32 {
        self.sig_figs
    }

    /// True only for a known magnitude with a usable uncertainty kind
    pub fn has_finite_value(&self) -> bool {
        matches!(
            self.sign,
            SignInfo::MagnitudeDefined | SignInfo::SignMagnitudeDefined
        ) && matches!(
            self.kind,
            UncertaintyKind::Symmetric
                | UncertaintyKind::Asymmetric
                | UncertaintyKind::Approximately
                | UncertaintyKind::Calculated
                | UncertaintyKind::Systematic
        )
    }

    /// True if anything at all was decoded
    pub fn is_defined(&self) -> bool {
        self.sign != SignInfo::Undefined
    }

    /// Symmetric with zero uncertainty
    pub fn is_exact(&self) -> bool {
        self.kind == UncertaintyKind::Symmetric && self.lower_sigma == 0.0 && self.upper_sigma == 0.0
    }

    /// The value if it is finite, otherwise the fallback
    pub fn value_or(&self, fallback: f64) -> f64 {
        if self.has_finite_value() && self.value.is_finite() {
            self.value
        } else {
            fallback
        }
    }

    /// Number of decimal places implied by the significant figures
    ///
    /// Negative when the last significant digit is left of the decimal point.
    pub fn decimals(&self) -> i32 {
        self.sig_figs - 1 - self.value.order()
    }

    /// Value of one unit in the last reported digit
    pub fn last_digit_scale(&self) -> f64 {
        10f64.powi(-self.decimals())
    }

    /// Canonical text, optionally including the uncertainty
    ///
    /// Uncertainties are written in the last reported digit, e.g.
    /// `1173.228(3)`, `1.5(+3-2)`, or with a prefix for limits, `<1.5`.
    ///
    /// ```rust
    /// # use nscheme_ensdf::decode_value_uncertainty;
    /// let value = decode_value_uncertainty("+0.35", "+12-8");
    /// assert_eq!(value.to_string_with(false), "+0.35");
    /// assert_eq!(value.to_string_with(true), "+0.35(+12-8)");
    /// ```
    pub fn to_string_with(&self, with_uncertainty: bool) -> String {
        let magnitude = self.magnitude_text();
        if !with_uncertainty || magnitude.is_empty() || self.sig_figs <= 0 {
            return magnitude;
        }

        match self.kind {
            UncertaintyKind::Symmetric if self.upper_sigma == 0.0 => magnitude,
            UncertaintyKind::Symmetric => f!("{magnitude}({})", self.digits(self.upper_sigma)),
            UncertaintyKind::Asymmetric => f!(
                "{magnitude}(+{}-{})",
                self.digits(self.upper_sigma),
                self.digits(self.lower_sigma)
            ),
            UncertaintyKind::LessThan => f!("<{magnitude}"),
            UncertaintyKind::LessEqual => f!("<={magnitude}"),
            UncertaintyKind::GreaterThan => f!(">{magnitude}"),
            UncertaintyKind::GreaterEqual => f!(">={magnitude}"),
            UncertaintyKind::Approximately => f!("~{magnitude}"),
            UncertaintyKind::Calculated => f!("{magnitude} (calc)"),
            UncertaintyKind::Systematic => f!("{magnitude} (sys)"),
            UncertaintyKind::Undefined => magnitude,
        }
    }

    /// The value alone, with a `+` prefix where the sign was explicit
    fn magnitude_text(&self) -> String {
        match self.sign {
            SignInfo::Undefined => return String::new(),
            SignInfo::SignDefined if self.value.is_sign_negative() => return "-".to_string(),
            SignInfo::SignDefined => return "+".to_string(),
            _ => {}
        }

        if self.value.is_nan() {
            return String::new();
        }

        let prefix = if self.value < 0.0 {
            "-"
        } else if self.sign == SignInfo::SignMagnitudeDefined {
            "+"
        } else {
            ""
        };

        if self.value.is_infinite() {
            return f!("{prefix}inf");
        }

        if self.sig_figs <= 0 {
            return f!("{prefix}{}", self.value.abs());
        }

        let decimals = self.decimals();
        if decimals < 0 || self.value.order() < -5 {
            let precision = (self.sig_figs - 1).max(0) as usize;
            f!("{prefix}{}", self.value.abs().sci(precision, 1))
        } else {
            f!("{prefix}{:.*}", decimals as usize, self.value.abs())
        }
    }

    /// Uncertainty in units of the last reported digit
    fn digits(&self, sigma: f64) -> String {
        f!("{}", (sigma / self.last_digit_scale()).round() as u64)
    }
}

impl std::fmt::Display for UncertainValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_string_with(true))
    }
}

impl MulAssign<f64> for UncertainValue {
    fn mul_assign(&mut self, factor: f64) {
        if self.sign == SignInfo::SignDefined {
            if factor < 0.0 {
                self.value = -self.value;
            }
            return;
        }

        self.value *= factor;
        self.lower_sigma *= factor.abs();
        self.upper_sigma *= factor.abs();

        if factor < 0.0 {
            std::mem::swap(&mut self.lower_sigma, &mut self.upper_sigma);
            self.kind = self.kind.flipped();
            if self.sign == SignInfo::MagnitudeDefined {
                self.sign = SignInfo::SignMagnitudeDefined;
            }
        }
    }
}

impl Mul<f64> for UncertainValue {
    type Output = UncertainValue;

    fn mul(mut self, factor: f64) -> Self::Output {
        self *= factor;
        self
    }
}

impl AddAssign for UncertainValue {
    fn add_assign(&mut self, other: Self) {
        let sig_figs_known = self.sig_figs > 0 && other.sig_figs > 0;
        let decimals = self.decimals().min(other.decimals());

        self.value += other.value;

        self.sign = match (self.sign, other.sign) {
            (SignInfo::SignMagnitudeDefined, SignInfo::SignMagnitudeDefined) => {
                SignInfo::SignMagnitudeDefined
            }
            (
                SignInfo::MagnitudeDefined | SignInfo::SignMagnitudeDefined,
                SignInfo::MagnitudeDefined | SignInfo::SignMagnitudeDefined,
            ) => SignInfo::MagnitudeDefined,
            _ => SignInfo::Undefined,
        };

        if self.kind != other.kind || self.kind == UncertaintyKind::Undefined {
            self.kind = UncertaintyKind::Undefined;
            self.lower_sigma = f64::NAN;
            self.upper_sigma = f64::NAN;
        } else {
            self.lower_sigma = self.lower_sigma.hypot(other.lower_sigma);
            self.upper_sigma = self.upper_sigma.hypot(other.upper_sigma);
        }

        self.sig_figs = if sig_figs_known && self.value.is_finite() {
            (decimals + 1 + self.value.order()).max(1)
        } else {
            0
        };
    }
}

impl Add for UncertainValue {
    type Output = UncertainValue;

    fn add(mut self, other: Self) -> Self::Output {
        self += other;
        self
    }
}

impl Neg for UncertainValue {
    type Output = UncertainValue;

    fn neg(self) -> Self::Output {
        self * -1.0
    }
}

impl Sub for UncertainValue {
    type Output = UncertainValue;

    fn sub(self, other: Self) -> Self::Output {
        self + (-other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::decode_value_uncertainty;

    #[test]
    fn finite_value_invariant() {
        let mut value = UncertainValue::new(1.0, 1, SignInfo::MagnitudeDefined);
        assert!(!value.has_finite_value());

        value.set_kind(UncertaintyKind::LessThan);
        assert!(!value.has_finite_value());

        value.set_kind(UncertaintyKind::Approximately);
        assert!(value.has_finite_value());

        assert!(!UncertainValue::undefined().has_finite_value());
        assert!(!UncertainValue::sign_only(true).has_finite_value());
    }

    #[test]
    fn negative_scaling_flips_limits() {
        let mut value = decode_value_uncertainty("1.5", "LT");
        value *= -2.0;
        assert_eq!(value.value(), -3.0);
        assert_eq!(value.kind(), UncertaintyKind::GreaterThan);
        assert_eq!(value.lower_sigma(), 0.0);
        assert_eq!(value.upper_sigma(), f64::INFINITY);
    }

    #[test]
    fn negative_scaling_swaps_bounds() {
        let mut value = decode_value_uncertainty("1.5", "+3-2");
        value *= -1.0;
        assert_eq!(value.kind(), UncertaintyKind::Asymmetric);
        assert!((value.lower_sigma() - 0.3).abs() < 1e-12);
        assert!((value.upper_sigma() - 0.2).abs() < 1e-12);
        assert_eq!(value.sign(), SignInfo::SignMagnitudeDefined);
    }

    #[test]
    fn sign_only_scaling() {
        let mut value = UncertainValue::sign_only(false);
        value *= -1.0;
        assert_eq!(value.to_string(), "-");
    }

    #[test]
    fn addition_in_quadrature() {
        let a = decode_value_uncertainty("10.0", "3");
        let b = decode_value_uncertainty("5.0", "4");
        let sum = a + b;
        assert_eq!(sum.value(), 15.0);
        assert!((sum.upper_sigma() - 0.5).abs() < 1e-12);
        assert_eq!(sum.to_string(), "15.0(5)");
    }

    #[test]
    fn addition_of_differing_kinds() {
        let a = decode_value_uncertainty("10.0", "3");
        let b = decode_value_uncertainty("5.0", "LT");
        let sum = a + b;
        assert_eq!(sum.kind(), UncertaintyKind::Undefined);
        assert!(!sum.has_finite_value());
    }

    #[test]
    fn subtraction() {
        let a = decode_value_uncertainty("1332.5", "3");
        let b = decode_value_uncertainty("1173.2", "4");
        let difference = a - b;
        assert!((difference.value() - 159.3).abs() < 1e-9);
        assert!((difference.upper_sigma() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn formatting() {
        assert_eq!(decode_value_uncertainty("1.5E3", "2").to_string(), "1.5e+3(2)");
        assert_eq!(decode_value_uncertainty("1.5", "GT").to_string(), ">1.5");
        assert_eq!(decode_value_uncertainty("1.5", "AP").to_string(), "~1.5");
        assert_eq!(decode_value_uncertainty("1.5", "CA").to_string(), "1.5 (calc)");
        assert_eq!(decode_value_uncertainty("", "").to_string(), "");
    }
}
