// internal modules
use crate::nuclide::Nucid;
use crate::parsers::decode_value_uncertainty;
use crate::record::{is_primary, ContinuationFields, Cursor, RawRecord};
use crate::value::{Energy, UncertainValue};

// external crates
use serde::Serialize;

/// Gamma record, `G` in column 8
///
/// | Field   | Columns | Meaning                           |
/// | ------- | ------- | --------------------------------- |
/// | E/DE    | 10-21   | Gamma energy (keV)                |
/// | RI/DRI  | 22-31   | Relative photon intensity         |
/// | M       | 32-41   | Multipolarity                     |
/// | MR/DMR  | 42-55   | Mixing ratio                      |
/// | CC/DCC  | 56-64   | Total conversion coefficient      |
/// | TI/DTI  | 65-76   | Relative total intensity          |
/// | C       | 77      | Comment flag                      |
/// | COIN    | 78      | Coincidence                       |
/// | Q       | 80      | `?` for a questionable placement  |
#[derive(Debug, Clone, Serialize)]
pub struct GammaRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub energy: Energy,
    pub intensity: UncertainValue,
    pub multipolarity: String,
    pub mixing_ratio: UncertainValue,
    pub conversion: UncertainValue,
    pub total_intensity: UncertainValue,
    pub flag: Option<char>,
    pub coincidence: Option<char>,
    pub questionable: bool,
    pub continuation: ContinuationFields,
    pub comments: Vec<String>,
}

impl GammaRecord {
    /// Read a gamma record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, " G"))?;

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            energy: Energy::from_fields(raw.field(9, 18), raw.field(19, 20)),
            intensity: decode_value_uncertainty(raw.field(21, 28), raw.field(29, 30)),
            multipolarity: raw.field(31, 40).to_string(),
            mixing_ratio: decode_value_uncertainty(raw.field(41, 48), raw.field(49, 54)),
            conversion: decode_value_uncertainty(raw.field(55, 61), raw.field(62, 63)),
            total_intensity: decode_value_uncertainty(raw.field(64, 73), raw.field(74, 75)),
            flag: raw.field(76, 76).chars().next(),
            coincidence: raw.field(77, 77).chars().next(),
            questionable: raw.field(79, 79) == "?",
            continuation: raw.continuation_fields(),
            comments: raw.comment_text(),
        };

        Some((record, cursor))
    }

    /// A gamma needs a NUCID and a usable energy
    pub fn is_valid(&self) -> bool {
        self.nucid.is_some() && self.energy.is_valid()
    }

    /// Final level energy given on a continuation, `FL=`
    pub fn final_level(&self) -> Option<Energy> {
        self.continuation
            .get("FL")
            .map(|fl| Energy::from_fields(fl, ""))
            .filter(Energy::is_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{SignInfo, UncertaintyKind};

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn full_record() {
        let text = lines(
            "152GD  G 344.2785  12100     16E2                      0.0399\n\
             152GD2 G FL=0",
        );
        let (gamma, _) = GammaRecord::read(Cursor::new(&text)).unwrap();

        assert!(gamma.is_valid());
        assert_eq!(gamma.energy.kev(), 344.2785);
        assert_eq!(gamma.intensity.value(), 100.0);
        assert!((gamma.intensity.upper_sigma() - 16.0).abs() < 1e-12);
        assert_eq!(gamma.multipolarity, "E2");
        assert_eq!(gamma.mixing_ratio.sign(), SignInfo::Undefined);
        assert_eq!(gamma.conversion.value(), 0.0399);
        assert_eq!(gamma.final_level().unwrap().kev(), 0.0);
    }

    #[test]
    fn signed_mixing_ratio() {
        let text = lines("152GD  G 411.1165  128.4     4 E2+M1     -7.0    +12-8");
        let (gamma, _) = GammaRecord::read(Cursor::new(&text)).unwrap();

        assert_eq!(gamma.multipolarity, "E2+M1");
        assert_eq!(gamma.mixing_ratio.sign(), SignInfo::SignMagnitudeDefined);
        assert_eq!(gamma.mixing_ratio.kind(), UncertaintyKind::Asymmetric);
        assert!((gamma.mixing_ratio.upper_sigma() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn blank_fields() {
        let text = lines("152GD  G 1085.837  10");
        let (gamma, _) = GammaRecord::read(Cursor::new(&text)).unwrap();
        assert!(gamma.multipolarity.is_empty());
        assert!(!gamma.intensity.is_defined());
    }
}
