// nscheme modules
use nscheme_utils::f;

// internal modules
use crate::parsers::{decode_with_quality, is_uncertainty};
use crate::value::{Quality, UncertainValue, UncertaintyKind};

// external crates
use serde::Serialize;

/// Seconds in a tropical year
const YEAR: f64 = 365.2422 * 86400.0;

/// Units in order of decreasing size, with their length in seconds
const UNITS: [(&str, f64); 11] = [
    ("y", YEAR),
    ("d", 86400.0),
    ("h", 3600.0),
    ("m", 60.0),
    ("s", 1.0),
    ("ms", 1e-3),
    ("µs", 1e-6),
    ("ns", 1e-9),
    ("ps", 1e-12),
    ("fs", 1e-15),
    ("as", 1e-18),
];

/// Half-life of a level or parent state
///
/// The value is held in seconds. A preferred display unit is picked by
/// magnitude so that e.g. `90 M` is shown as `1.5 h`.
///
/// Widths given in energy units (`EV`, `KEV`, `MEV`) are not lifetimes and
/// decode to an undefined value, keeping the unit for reference.
///
/// ```rust
/// # use nscheme_ensdf::HalfLife;
/// let half_life = HalfLife::from_field("13.517 Y 14");
/// assert_eq!(half_life.unit(), "y");
/// assert_eq!(half_life.to_string(), "13.517(14) y");
///
/// let stable = HalfLife::from_field("STABLE");
/// assert!(stable.is_stable());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HalfLife {
    seconds: UncertainValue,
    unit: String,
    quality: Quality,
}

impl HalfLife {
    /// Decode a half-life field, `value unit [uncertainty]`
    ///
    /// The uncertainty code may also come first, as in `LT 1 NS`.
    pub fn from_field(field: &str) -> Self {
        let mut tokens: Vec<&str> = field.split_whitespace().collect();

        if tokens.is_empty() {
            return Self::default();
        }

        if tokens[0].eq_ignore_ascii_case("STABLE") {
            let mut seconds = UncertainValue::exact(f64::INFINITY);
            seconds.set_kind(UncertaintyKind::Symmetric);
            return Self {
                seconds,
                unit: "stable".to_string(),
                quality: Quality::Known,
            };
        }

        if tokens.len() > 1 && UncertaintyKind::from_code(tokens[0]).is_some() {
            let code = tokens.remove(0);
            tokens.push(code);
        }

        let value = tokens[0];
        let unit = tokens.get(1).copied().unwrap_or_default();
        let uncertainty = tokens
            .get(2)
            .copied()
            .filter(|u| is_uncertainty(u))
            .unwrap_or_default();

        let Some(factor) = unit_seconds(unit) else {
            let (_, quality) = decode_with_quality(value, uncertainty);
            return Self {
                seconds: UncertainValue::undefined(),
                unit: unit.to_string(),
                quality,
            };
        };

        let (mut seconds, quality) = decode_with_quality(value, uncertainty);
        seconds *= factor;

        let unit = preferred_unit(seconds.value()).to_string();
        Self {
            seconds,
            unit,
            quality,
        }
    }

    /// The half-life in seconds
    pub fn seconds(&self) -> &UncertainValue {
        &self.seconds
    }

    /// The half-life expressed in the preferred unit
    pub fn in_unit(&self) -> UncertainValue {
        match UNITS.iter().find(|(name, _)| *name == self.unit) {
            Some((_, factor)) => self.seconds * (1.0 / factor),
            None => self.seconds,
        }
    }

    /// Preferred unit, the original unit text for widths, empty if unknown
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Whether the value was marked tentative or theoretical
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// True for `STABLE`
    pub fn is_stable(&self) -> bool {
        self.seconds.value() == f64::INFINITY
    }

    /// True if a usable lifetime was decoded
    pub fn is_valid(&self) -> bool {
        self.is_stable() || self.seconds.has_finite_value()
    }
}

/// Length of an ENSDF time unit in seconds, `None` for anything else
fn unit_seconds(unit: &str) -> Option<f64> {
    let factor = match unit.to_uppercase().as_str() {
        "GY" => 1e9 * YEAR,
        "MY" => 1e6 * YEAR,
        "KY" => 1e3 * YEAR,
        "Y" => YEAR,
        "D" => 86400.0,
        "H" => 3600.0,
        "M" => 60.0,
        "S" => 1.0,
        "MS" => 1e-3,
        "US" => 1e-6,
        "NS" => 1e-9,
        "PS" => 1e-12,
        "FS" => 1e-15,
        "AS" => 1e-18,
        _ => return None,
    };
    Some(factor)
}

/// Largest unit the value is at least one of
fn preferred_unit(seconds: f64) -> &'static str {
    if !seconds.is_finite() {
        return "s";
    }

    UNITS
        .iter()
        .find(|(_, factor)| seconds.abs() >= *factor)
        .map(|(name, _)| *name)
        .unwrap_or("as")
}

impl std::fmt::Display for HalfLife {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let text = if self.is_stable() {
            "stable".to_string()
        } else if !self.seconds.is_defined() {
            match self.unit.is_empty() {
                true => String::new(),
                false => f!("width in {}", self.unit),
            }
        } else {
            f!("{} {}", self.in_unit(), self.unit)
        };

        match self.quality {
            Quality::Tentative if !text.is_empty() => write!(f, "({text})"),
            _ => write!(f, "{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units() {
        let half_life = HalfLife::from_field("90 M");
        assert_eq!(half_life.unit(), "h");
        assert_eq!(half_life.seconds().value(), 5400.0);
        assert!((half_life.in_unit().value() - 1.5).abs() < 1e-12);

        let half_life = HalfLife::from_field("1.5 US 2");
        assert_eq!(half_life.unit(), "µs");
        assert!((half_life.seconds().upper_sigma() - 2e-7).abs() < 1e-18);

        let half_life = HalfLife::from_field("4.47 GY");
        assert_eq!(half_life.unit(), "y");
        assert!((half_life.in_unit().value() - 4.47e9).abs() < 1.0);
    }

    #[test]
    fn widths_are_undefined() {
        let half_life = HalfLife::from_field("0.12 KEV 3");
        assert!(!half_life.is_valid());
        assert_eq!(half_life.unit(), "KEV");
    }

    #[test]
    fn limits() {
        for field in ["1 NS LT", "LT 1 NS"] {
            let half_life = HalfLife::from_field(field);
            assert_eq!(half_life.seconds().kind(), UncertaintyKind::LessThan);
            assert_eq!(half_life.unit(), "ns");
        }
    }

    #[test]
    fn empty() {
        let half_life = HalfLife::from_field("   ");
        assert!(!half_life.is_valid());
        assert_eq!(half_life.to_string(), "");
    }
}
