// internal modules
use crate::nuclide::{Nucid, NuclideId};
use crate::parsers::decode_value_uncertainty;
use crate::record::{is_primary, ContinuationFields, Cursor, RawRecord};
use crate::value::{Energy, HalfLife, SpinParity, UncertainValue};

// external crates
use serde::Serialize;

/// Parent record, `P` in column 8
///
/// The NUCID is the parent nuclide of the decay, not the daughter the
/// dataset belongs to.
///
/// | Field  | Columns | Meaning                           |
/// | ------ | ------- | --------------------------------- |
/// | E/DE   | 10-21   | Parent level energy (keV)         |
/// | J      | 22-39   | Spin and parity                   |
/// | T/DT   | 40-55   | Half-life with units              |
/// | QP/DQP | 65-76   | Ground state Q-value (keV)        |
/// | ION    | 77-80   | Ionisation state                  |
#[derive(Debug, Clone, Serialize)]
pub struct ParentRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub energy: Energy,
    pub spin_parity: SpinParity,
    pub half_life: HalfLife,
    pub q_value: UncertainValue,
    pub ionisation: String,
    pub continuation: ContinuationFields,
    pub comments: Vec<String>,
}

impl ParentRecord {
    /// Read a parent record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, " P"))?;

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            energy: Energy::from_fields(raw.field(9, 18), raw.field(19, 20)),
            spin_parity: SpinParity::from_field(raw.field(21, 38)),
            half_life: HalfLife::from_field(raw.field(39, 54)),
            q_value: decode_value_uncertainty(raw.field(64, 73), raw.field(74, 75)),
            ionisation: raw.field(76, 79).to_string(),
            continuation: raw.continuation_fields(),
            comments: raw.comment_text(),
        };

        Some((record, cursor))
    }

    /// A parent must name a nuclide, the energy may be unknown
    pub fn is_valid(&self) -> bool {
        self.nuclide().is_some()
    }

    /// The parent nuclide
    pub fn nuclide(&self) -> Option<NuclideId> {
        self.nucid.and_then(|n| n.nuclide())
    }
}

/// Normalization record, `N` in column 8
///
/// | Field  | Columns | Meaning                                        |
/// | ------ | ------- | ---------------------------------------------- |
/// | NR/DNR | 10-21   | Relative photon intensity to photons per 100 decays of this branch |
/// | NT/DNT | 22-31   | Relative transition intensity multiplier       |
/// | BR/DBR | 32-41   | Branching ratio                                |
/// | NB/DNB | 42-55   | Beta and EC intensity multiplier               |
/// | NP/DNP | 56-64   | Delayed particle intensity multiplier          |
#[derive(Debug, Clone, Serialize)]
pub struct NormalizationRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub nr: UncertainValue,
    pub nt: UncertainValue,
    pub br: UncertainValue,
    pub nb: UncertainValue,
    pub np: UncertainValue,
    pub comments: Vec<String>,
}

impl NormalizationRecord {
    /// Read a normalization record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, " N"))?;

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            nr: decode_value_uncertainty(raw.field(9, 18), raw.field(19, 20)),
            nt: decode_value_uncertainty(raw.field(21, 28), raw.field(29, 30)),
            br: decode_value_uncertainty(raw.field(31, 38), raw.field(39, 40)),
            nb: decode_value_uncertainty(raw.field(41, 48), raw.field(49, 54)),
            np: decode_value_uncertainty(raw.field(55, 61), raw.field(62, 63)),
            comments: raw.comment_text(),
        };

        Some((record, cursor))
    }

    /// Every field is optional
    pub fn is_valid(&self) -> bool {
        self.nucid.is_some()
    }

    /// Factor converting relative beta, EC and alpha intensities to percent
    /// of parent decays, `NB*BR`
    pub fn decay_factor(&self) -> f64 {
        factor(&self.nb) * factor(&self.br)
    }

    /// Factor converting relative gamma intensities to percent of parent
    /// decays, `NR*BR`
    pub fn gamma_factor(&self) -> f64 {
        factor(&self.nr) * factor(&self.br)
    }
}

/// Production normalization record, `PN` in columns 7-8
///
/// Products already including the branching ratio. When present these take
/// precedence over anything derived from the `N` record.
///
/// | Field      | Columns |
/// | ---------- | ------- |
/// | NRBR/DNRBR | 10-21   |
/// | NTBR/DNTBR | 22-31   |
/// | NBBR/DNBBR | 42-55   |
/// | NP/DNP     | 56-64   |
#[derive(Debug, Clone, Serialize)]
pub struct ProdNormalizationRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub nrbr: UncertainValue,
    pub ntbr: UncertainValue,
    pub nbbr: UncertainValue,
    pub np: UncertainValue,
    pub comments: Vec<String>,
}

impl ProdNormalizationRecord {
    /// Read a production normalization record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, "PN"))?;

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            nrbr: decode_value_uncertainty(raw.field(9, 18), raw.field(19, 20)),
            ntbr: decode_value_uncertainty(raw.field(21, 28), raw.field(29, 30)),
            nbbr: decode_value_uncertainty(raw.field(41, 48), raw.field(49, 54)),
            np: decode_value_uncertainty(raw.field(55, 61), raw.field(62, 63)),
            comments: raw.comment_text(),
        };

        Some((record, cursor))
    }

    /// Every field is optional
    pub fn is_valid(&self) -> bool {
        self.nucid.is_some()
    }

    /// `NBBR`, 1.0 when blank
    pub fn decay_factor(&self) -> f64 {
        factor(&self.nbbr)
    }

    /// `NRBR`, 1.0 when blank
    pub fn gamma_factor(&self) -> f64 {
        factor(&self.nrbr)
    }
}

/// A normalization multiplier, 1.0 when missing or unreadable
fn factor(value: &UncertainValue) -> f64 {
    value.value_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn parent() {
        let text = lines(
            "152EU  P 0.0         3-                13.517 Y  6              1874.3    7",
        );
        let (parent, _) = ParentRecord::read(Cursor::new(&text)).unwrap();

        assert!(parent.is_valid());
        assert_eq!(parent.nuclide(), Some(NuclideId::new(63, 89)));
        assert_eq!(parent.energy.kev(), 0.0);
        assert_eq!(parent.half_life.unit(), "y");
        assert_eq!(parent.q_value.value(), 1874.3);
    }

    #[test]
    fn normalization_factors() {
        let text = lines("152GD  N 0.01      1           0.279   3 1.0");
        let (norm, _) = NormalizationRecord::read(Cursor::new(&text)).unwrap();

        assert!((norm.gamma_factor() - 0.01 * 0.279).abs() < 1e-12);
        assert!((norm.decay_factor() - 0.279).abs() < 1e-12);
        assert!(!norm.np.is_defined());
    }

    #[test]
    fn blank_normalization_is_unity() {
        let text = lines("152GD  N");
        let (norm, _) = NormalizationRecord::read(Cursor::new(&text)).unwrap();
        assert_eq!(norm.gamma_factor(), 1.0);
        assert_eq!(norm.decay_factor(), 1.0);
    }

    #[test]
    fn production_normalization() {
        let text = lines("152GD PN 0.00277   3                     0.279   3");
        let (pn, _) = ProdNormalizationRecord::read(Cursor::new(&text)).unwrap();

        assert_eq!(pn.gamma_factor(), 0.00277);
        assert_eq!(pn.decay_factor(), 0.279);

        // not a plain normalization record
        assert!(NormalizationRecord::read(Cursor::new(&text)).is_none());
    }
}
