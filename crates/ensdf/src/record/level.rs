// internal modules
use crate::nuclide::Nucid;
use crate::parsers::decode_value_uncertainty;
use crate::record::{is_primary, ContinuationFields, Cursor, RawRecord};
use crate::value::{Energy, HalfLife, Moment, SpinParity, UncertainValue};

// external crates
use serde::Serialize;

/// Level record, `L` in column 8
///
/// | Field | Columns | Meaning                            |
/// | ----- | ------- | ---------------------------------- |
/// | E/DE  | 10-21   | Level energy (keV)                 |
/// | J     | 22-39   | Spin and parity                    |
/// | T/DT  | 40-55   | Half-life with units               |
/// | L     | 56-64   | Angular momentum transfer          |
/// | S/DS  | 65-76   | Spectroscopic strength             |
/// | C     | 77      | Comment flag                       |
/// | MS    | 78-79   | Metastable state                   |
/// | Q     | 80      | `?` for a questionable level       |
#[derive(Debug, Clone, Serialize)]
pub struct LevelRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub energy: Energy,
    pub spin_parity: SpinParity,
    pub half_life: HalfLife,
    pub angular_momentum: String,
    pub strength: UncertainValue,
    pub flag: Option<char>,
    /// Isomer number from the `MS` field, `M` alone counts as the first
    pub isomer: Option<u8>,
    pub questionable: bool,
    pub continuation: ContinuationFields,
    pub comments: Vec<String>,
}

impl LevelRecord {
    /// Read a level record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, " L"))?;

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            energy: Energy::from_fields(raw.field(9, 18), raw.field(19, 20)),
            spin_parity: SpinParity::from_field(raw.field(21, 38)),
            half_life: HalfLife::from_field(raw.field(39, 54)),
            angular_momentum: raw.field(55, 63).to_string(),
            strength: decode_value_uncertainty(raw.field(64, 73), raw.field(74, 75)),
            flag: raw.field(76, 76).chars().next(),
            isomer: isomer_number(raw.field(77, 78)),
            questionable: raw.field(79, 79) == "?",
            continuation: raw.continuation_fields(),
            comments: raw.comment_text(),
        };

        Some((record, cursor))
    }

    /// A level needs a NUCID and a usable energy
    pub fn is_valid(&self) -> bool {
        self.nucid.is_some() && self.energy.is_valid()
    }

    /// Raw `XREF=` continuation text, adopted levels only
    pub fn xref(&self) -> Option<&str> {
        self.continuation.get("XREF")
    }

    /// Electric quadrupole moment from `MOME2=`
    pub fn quadrupole_moment(&self) -> Option<Moment> {
        self.continuation
            .get("MOME2")
            .map(Moment::from_field)
            .filter(Moment::is_valid)
    }

    /// Magnetic dipole moment from `MOMM1=`
    pub fn magnetic_moment(&self) -> Option<Moment> {
        self.continuation
            .get("MOMM1")
            .map(Moment::from_field)
            .filter(Moment::is_valid)
    }
}

/// `M`, `M1`, `M2`... to the isomer number
fn isomer_number(field: &str) -> Option<u8> {
    let rest = field.strip_prefix(['M', 'm'])?.trim();
    match rest.is_empty() {
        true => Some(1),
        false => rest.parse().ok(),
    }
}
