// nscheme modules
use nscheme_utils::f;

// internal modules
use crate::value::{Quality, UncertaintyKind};

// external crates
use serde::Serialize;

/// Parity of a nuclear state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Parity {
    Plus,
    Minus,
}

impl Parity {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            _ => None,
        }
    }

    /// `+` or `-`
    pub fn symbol(&self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
        }
    }
}

/// A single angular momentum `numerator/denominator` in units of ħ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spin {
    pub numerator: u32,
    pub denominator: u32,
    /// Parity written on this spin alone, as in `3/2-,5/2+`
    pub parity: Option<Parity>,
}

impl Spin {
    /// Spin as a number, e.g. 1.5 for `3/2`
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (body, parity) = match text.chars().last().and_then(Parity::from_char) {
            Some(parity) => (&text[..text.len() - 1], Some(parity)),
            None => (text, None),
        };

        let (numerator, denominator) = match body.split_once('/') {
            Some((n, d)) => (n.trim().parse().ok()?, d.trim().parse().ok()?),
            None => (body.trim().parse().ok()?, 1),
        };

        (denominator > 0).then_some(Self {
            numerator,
            denominator,
            parity,
        })
    }
}

impl std::fmt::Display for Spin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.denominator {
            1 => write!(f, "{}", self.numerator),
            d => write!(f, "{}/{d}", self.numerator),
        }
    }
}

/// Spin-parity assignment of a level, the ENSDF `J` field
///
/// One or more spins share an overall parity. Tentative assignments are kept
/// separately for the spins and for the parity since ENSDF can mark either,
/// as in `(3)-` or `3(-)`.
///
/// When no parity is written on a firmly assigned field, a `+` parity is
/// implied and flagged as such.
///
/// ```rust
/// # use nscheme_ensdf::{Parity, Quality, SpinParity};
/// let jp = SpinParity::from_field("(3/2,5/2)-");
/// assert_eq!(jp.spins().len(), 2);
/// assert_eq!(jp.parity(), Some(Parity::Minus));
/// assert_eq!(jp.spin_quality(), Quality::Tentative);
/// assert_eq!(jp.parity_quality(), Quality::Known);
/// assert_eq!(jp.to_string(), "(3/2,5/2)-");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpinParity {
    spins: Vec<Spin>,
    parity: Option<Parity>,
    spin_quality: Quality,
    parity_quality: Quality,
    relation: Option<UncertaintyKind>,
    implied_parity: bool,
}

impl SpinParity {
    /// Decode the `J` field of a level or parent record
    pub fn from_field(field: &str) -> Self {
        let mut text = field.trim();
        let mut result = Self::default();

        if text.is_empty() {
            return result;
        }

        for (prefix, kind) in [
            ("LE ", UncertaintyKind::LessEqual),
            ("GE ", UncertaintyKind::GreaterEqual),
            ("LT ", UncertaintyKind::LessThan),
            ("GT ", UncertaintyKind::GreaterThan),
            ("<", UncertaintyKind::LessThan),
            (">", UncertaintyKind::GreaterThan),
        ] {
            if let Some(rest) = text.strip_prefix(prefix) {
                result.relation = Some(kind);
                text = rest.trim();
                break;
            }
        }

        let (inner, outer_parity) = Self::split_qualities(text, &mut result);

        let mut pieces = Vec::new();
        for piece in inner.split([',', '&']) {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            match piece.split_once(':') {
                Some((low, high)) => pieces.extend(spin_range(low, high)),
                None => pieces.extend(Spin::parse(piece)),
            }
        }

        let parity = match outer_parity {
            Some(parity) => Some(parity),
            None => common_parity(&pieces),
        };

        if outer_parity.is_some() || parity.is_some() {
            // parity on the field is shared, drop the per-spin copies
            if pieces.iter().all(|s| s.parity.is_none() || s.parity == parity) {
                pieces.iter_mut().for_each(|s| s.parity = None);
            }
        }

        result.spins = pieces;
        result.parity = parity;

        if result.parity.is_none()
            && result.parity_quality == Quality::Known
            && result.spin_quality == Quality::Known
            && !result.spins.is_empty()
            && result.spins.iter().all(|s| s.parity.is_none())
        {
            result.parity = Some(Parity::Plus);
            result.implied_parity = true;
        }

        result
    }

    /// Work out the tentative/theoretical markers, returning the remaining
    /// spin text and any parity written outside the brackets
    fn split_qualities<'a>(text: &'a str, result: &mut Self) -> (&'a str, Option<Parity>) {
        // whole field wrapped
        let (stripped, quality) = Quality::strip(text);
        if quality != Quality::Known {
            result.spin_quality = quality;
            result.parity_quality = quality;
            return Self::split_parity_suffix(stripped, result);
        }

        // (3)- and [3]+ forms
        if let Some(last) = text.chars().last().and_then(Parity::from_char) {
            let body = &text[..text.len() - 1];
            let (inner, quality) = Quality::strip(body);
            if quality != Quality::Known && !body.ends_with('?') {
                result.spin_quality = quality;
                return (inner, Some(last));
            }
        }

        Self::split_parity_suffix(text, result)
    }

    /// Handle a tentative parity written on its own, `3(-)`
    fn split_parity_suffix<'a>(text: &'a str, result: &mut Self) -> (&'a str, Option<Parity>) {
        for (suffix, parity) in [("(+)", Parity::Plus), ("(-)", Parity::Minus)] {
            if let Some(rest) = text.strip_suffix(suffix) {
                result.parity_quality = Quality::Tentative;
                return (rest, Some(parity));
            }
        }
        (text, None)
    }

    /// All spins listed, in field order
    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    /// Overall parity, `None` when undetermined or when spins differ
    pub fn parity(&self) -> Option<Parity> {
        self.parity
    }

    /// Quality marker on the spin values
    pub fn spin_quality(&self) -> Quality {
        self.spin_quality
    }

    /// Quality marker on the parity
    pub fn parity_quality(&self) -> Quality {
        self.parity_quality
    }

    /// Relation for limits such as `LE 5/2`
    pub fn relation(&self) -> Option<UncertaintyKind> {
        self.relation
    }

    /// True if the parity was not written but assumed `+`
    pub fn implied_parity(&self) -> bool {
        self.implied_parity
    }

    /// True if at least one spin was decoded
    pub fn is_valid(&self) -> bool {
        !self.spins.is_empty()
    }
}

/// Longest range expanded spin by spin, anything wider keeps its end points
const MAX_RANGE_STEPS: u32 = 64;

/// Every spin from `low` to `high` in unit steps, as in `1/2:7/2`
fn spin_range(low: &str, high: &str) -> Vec<Spin> {
    let (Some(low), Some(high)) = (Spin::parse(low), Spin::parse(high)) else {
        return Vec::new();
    };

    let steps = high.numerator.saturating_sub(low.numerator) / low.denominator;
    if low.denominator != high.denominator || steps > MAX_RANGE_STEPS {
        return vec![low, high];
    }

    (low.numerator..=high.numerator)
        .step_by(low.denominator as usize)
        .map(|numerator| Spin {
            numerator,
            denominator: low.denominator,
            parity: high.parity.or(low.parity),
        })
        .collect()
}

/// The parity shared by all spins that carry one, if they agree
fn common_parity(spins: &[Spin]) -> Option<Parity> {
    let mut parities = spins.iter().filter_map(|s| s.parity);
    let first = parities.next()?;
    parities.all(|p| p == first).then_some(first)
}

impl std::fmt::Display for SpinParity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.spins.is_empty() {
            return Ok(());
        }

        let spins = self
            .spins
            .iter()
            .map(|s| match s.parity {
                Some(p) => f!("{s}{}", p.symbol()),
                None => s.to_string(),
            })
            .collect::<Vec<String>>()
            .join(",");

        let parity = match (self.parity, self.implied_parity) {
            (Some(p), false) => p.symbol().to_string(),
            _ => String::new(),
        };

        let relation = match self.relation {
            Some(UncertaintyKind::LessEqual) => "<=",
            Some(UncertaintyKind::GreaterEqual) => ">=",
            Some(UncertaintyKind::LessThan) => "<",
            Some(UncertaintyKind::GreaterThan) => ">",
            _ => "",
        };

        let wrap = |text: String, quality: Quality| match quality {
            Quality::Known => text,
            Quality::Tentative => f!("({text})"),
            Quality::Theoretical => f!("[{text}]"),
        };

        let text = if self.spin_quality == self.parity_quality || parity.is_empty() {
            wrap(f!("{spins}{parity}"), self.spin_quality)
        } else {
            f!(
                "{}{}",
                wrap(spins, self.spin_quality),
                wrap(parity, self.parity_quality)
            )
        };

        write!(f, "{relation}{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firm_assignment() {
        let jp = SpinParity::from_field("3-");
        assert_eq!(jp.spins()[0].value(), 3.0);
        assert_eq!(jp.parity(), Some(Parity::Minus));
        assert!(!jp.implied_parity());
        assert_eq!(jp.to_string(), "3-");
    }

    #[test]
    fn implied_parity() {
        let jp = SpinParity::from_field("2");
        assert_eq!(jp.parity(), Some(Parity::Plus));
        assert!(jp.implied_parity());
        assert_eq!(jp.to_string(), "2");

        let jp = SpinParity::from_field("(2)");
        assert_eq!(jp.parity(), None);
    }

    #[test]
    fn tentative_forms() {
        let jp = SpinParity::from_field("(3-)");
        assert_eq!(jp.spin_quality(), Quality::Tentative);
        assert_eq!(jp.parity_quality(), Quality::Tentative);
        assert_eq!(jp.to_string(), "(3-)");

        let jp = SpinParity::from_field("3/2(+)");
        assert_eq!(jp.spin_quality(), Quality::Known);
        assert_eq!(jp.parity_quality(), Quality::Tentative);
        assert_eq!(jp.spins()[0].value(), 1.5);
        assert_eq!(jp.to_string(), "3/2(+)");

        let jp = SpinParity::from_field("[0+]");
        assert_eq!(jp.spin_quality(), Quality::Theoretical);
        assert_eq!(jp.to_string(), "[0+]");
    }

    #[test]
    fn mixed_parities() {
        let jp = SpinParity::from_field("3/2-,5/2+");
        assert_eq!(jp.parity(), None);
        assert_eq!(jp.spins()[1].parity, Some(Parity::Plus));
        assert_eq!(jp.to_string(), "3/2-,5/2+");

        let jp = SpinParity::from_field("3/2-,5/2-");
        assert_eq!(jp.parity(), Some(Parity::Minus));
        assert_eq!(jp.to_string(), "3/2,5/2-");
    }

    #[test]
    fn ranges_and_relations() {
        let jp = SpinParity::from_field("1/2:7/2");
        assert_eq!(jp.spins().len(), 4);

        // only the end points of an unreasonably wide range
        let jp = SpinParity::from_field("0:99999999");
        assert_eq!(jp.spins().len(), 2);
        assert_eq!(jp.spins()[1].numerator, 99999999);

        let jp = SpinParity::from_field("0:64");
        assert_eq!(jp.spins().len(), 65);

        let jp = SpinParity::from_field("LE 5/2");
        assert_eq!(jp.relation(), Some(UncertaintyKind::LessEqual));
        assert_eq!(jp.to_string(), "<=5/2");
    }

    #[test]
    fn unparsable() {
        let jp = SpinParity::from_field("J");
        assert!(!jp.is_valid());
        assert_eq!(jp.to_string(), "");
    }
}
