use crate::parsers::{decode_value_uncertainty, is_uncertainty};
use crate::value::{UncertainValue, UncertaintyKind};

use serde::Serialize;

/// Electromagnetic moment of a level, from `MOMM1` or `MOME2` continuations
///
/// The field is `value [uncertainty] [references]`. Some evaluations write
/// the uncertainty code first (`LT 0.5`), which is swapped back here.
///
/// ```rust
/// # use nscheme_ensdf::Moment;
/// let moment = Moment::from_field("+2.07 3 1986ST12,1989RA17");
/// assert_eq!(moment.value().value(), 2.07);
/// assert_eq!(moment.references(), ["1986ST12", "1989RA17"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Moment {
    value: UncertainValue,
    references: Vec<String>,
}

impl Moment {
    /// Decode the text of a moment continuation field
    pub fn from_field(field: &str) -> Self {
        let mut tokens: Vec<&str> = field.split_whitespace().collect();

        if tokens.len() > 1 && UncertaintyKind::from_code(tokens[0]).is_some() {
            tokens.swap(0, 1);
        }

        let Some(value) = tokens.first().copied() else {
            return Self::default();
        };

        let (uncertainty, rest) = match tokens.get(1) {
            Some(u) if is_uncertainty(u) => (*u, &tokens[2..]),
            _ => ("", &tokens[1..]),
        };

        let references = rest
            .iter()
            .flat_map(|r| r.split(','))
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            value: decode_value_uncertainty(value, uncertainty),
            references,
        }
    }

    /// The decoded moment
    pub fn value(&self) -> &UncertainValue {
        &self.value
    }

    /// Keynumbers of the references quoted for the value
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// True if a magnitude was decoded
    pub fn is_valid(&self) -> bool {
        self.value.has_finite_value()
    }
}

impl std::fmt::Display for Moment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swapped_code() {
        let moment = Moment::from_field("LT 0.5");
        assert_eq!(moment.value().value(), 0.5);
        assert_eq!(moment.value().kind(), UncertaintyKind::LessThan);
        assert!(moment.references().is_empty());
    }

    #[test]
    fn without_uncertainty() {
        let moment = Moment::from_field("-0.19 1990XY01");
        assert_eq!(moment.value().value(), -0.19);
        assert_eq!(moment.value().kind(), UncertaintyKind::Approximately);
        assert_eq!(moment.references(), ["1990XY01"]);
    }

    #[test]
    fn empty() {
        assert!(!Moment::from_field("").is_valid());
    }
}
