// standard library
use std::cmp::Ordering;
use std::ops::Sub;

// internal modules
use crate::parsers::decode_value_uncertainty;
use crate::value::UncertainValue;

// external crates
use serde::Serialize;

/// An energy in keV
///
/// Levels and transitions are keyed by their energy, so energies are totally
/// ordered on the central value (NaN sorts last) and then on the offset label.
///
/// ENSDF writes levels of unknown absolute energy relative to a band head,
/// as in `1234.5+X`. The label is kept but the offset is never resolved, so
/// `1234.5+X` and `1234.5` are different keys.
///
/// ```rust
/// # use nscheme_ensdf::Energy;
/// let energy = Energy::from_fields("1234.5+X", "3");
/// assert_eq!(energy.kev(), 1234.5);
/// assert_eq!(energy.offset(), Some('X'));
/// assert_eq!(energy.to_string(), "1234.5(3)+X keV");
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Energy {
    value: UncertainValue,
    offset: Option<char>,
}

impl Energy {
    /// Wrap an already decoded value
    pub fn new(value: UncertainValue) -> Self {
        Self {
            value,
            offset: None,
        }
    }

    /// Exact energy, mostly for lookups
    pub fn exact(kev: f64) -> Self {
        Self::new(UncertainValue::exact(kev))
    }

    /// Decode the energy and uncertainty columns of a record
    pub fn from_fields(value_field: &str, uncertainty_field: &str) -> Self {
        let text = value_field.trim();
        let (number, offset) = split_offset(text);

        let value = match (number.is_empty(), offset) {
            // a bare label is the band head itself
            (true, Some(_)) => UncertainValue::exact(0.0),
            _ => decode_value_uncertainty(number, uncertainty_field),
        };

        Self { value, offset }
    }

    /// The decoded value
    pub fn value(&self) -> &UncertainValue {
        &self.value
    }

    /// Central value in keV, NaN if unknown
    pub fn kev(&self) -> f64 {
        self.value.value()
    }

    /// Label of an unresolved `+X` offset
    pub fn offset(&self) -> Option<char> {
        self.offset
    }

    /// True if the energy can be used for matching
    pub fn is_valid(&self) -> bool {
        self.value.has_finite_value() && self.value.value().is_finite()
    }

    /// Absolute distance between two energies in keV
    pub fn distance(&self, other: &Energy) -> f64 {
        (self.kev() - other.kev()).abs()
    }

    /// True if `other` lies within `pct` percent of this energy, inclusive
    ///
    /// ```rust
    /// # use nscheme_ensdf::Energy;
    /// let energy = Energy::exact(200.0);
    /// assert!(energy.within_pct(&Energy::exact(202.0), 1.0));
    /// assert!(!energy.within_pct(&Energy::exact(202.5), 1.0));
    /// ```
    pub fn within_pct(&self, other: &Energy, pct: f64) -> bool {
        self.distance(other) <= pct / 100.0 * self.kev().abs()
    }
}

/// Split a trailing `+X` style offset label from the numeric text
fn split_offset(text: &str) -> (&str, Option<char>) {
    let is_label = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_uppercase());

    if is_label(text) && text.len() == 1 {
        return ("", text.chars().next());
    }

    match text.rsplit_once('+') {
        Some((number, label)) if is_label(label) && !number.is_empty() => {
            (number.trim(), label.chars().next())
        }
        _ => (text, None),
    }
}

impl PartialEq for Energy {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Energy {}

impl PartialOrd for Energy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Energy {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kev()
            .total_cmp(&other.kev())
            .then_with(|| self.offset.cmp(&other.offset))
    }
}

impl Sub for Energy {
    type Output = Energy;

    fn sub(self, other: Self) -> Self::Output {
        let offset = if self.offset == other.offset {
            None
        } else {
            self.offset.or(other.offset)
        };

        Energy {
            value: self.value - other.value,
            offset,
        }
    }
}

impl std::fmt::Display for Energy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.offset {
            Some(label) => write!(f, "{}+{label} keV", self.value),
            None => write!(f, "{} keV", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_level() {
        let energy = Energy::from_fields("0", "");
        assert!(energy.is_valid());
        assert_eq!(energy.kev(), 0.0);
        assert!(energy.value().is_exact());
    }

    #[test]
    fn offsets() {
        let energy = Energy::from_fields("X", "");
        assert_eq!(energy.kev(), 0.0);
        assert_eq!(energy.offset(), Some('X'));

        let energy = Energy::from_fields("  511.2+Y ", "");
        assert_eq!(energy.kev(), 511.2);
        assert_eq!(energy.offset(), Some('Y'));

        assert_ne!(Energy::from_fields("0", ""), Energy::from_fields("X", ""));
    }

    #[test]
    fn ordering() {
        let mut energies = vec![
            Energy::exact(344.3),
            Energy::from_fields("", ""),
            Energy::exact(0.0),
            Energy::exact(121.8),
        ];
        energies.sort();
        assert_eq!(energies[0].kev(), 0.0);
        assert_eq!(energies[2].kev(), 344.3);
        assert!(energies[3].kev().is_nan());
    }

    #[test]
    fn difference() {
        let upper = Energy::from_fields("1529.8", "4");
        let lower = Energy::from_fields("344.3", "3");
        let gamma = upper - lower;
        assert!((gamma.kev() - 1185.5).abs() < 1e-9);
        assert!((gamma.value().upper_sigma() - 0.5).abs() < 1e-9);
    }
}
