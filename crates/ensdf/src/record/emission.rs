//! Records feeding daughter levels, one per emitted radiation

// internal modules
use crate::nuclide::Nucid;
use crate::parsers::{column, decode_value_uncertainty};
use crate::record::{is_continuation, is_primary, nucid_text, ContinuationFields, Cursor, RawRecord};
use crate::value::{Energy, HalfLife, UncertainValue};

// external crates
use serde::Serialize;

/// Beta minus record, `B` in column 8
///
/// | Field       | Columns | Meaning                     |
/// | ----------- | ------- | --------------------------- |
/// | E/DE        | 10-21   | Endpoint energy (keV)       |
/// | IB/DIB      | 22-31   | Intensity of the branch     |
/// | LOGFT/DFT   | 42-55   | log ft                      |
/// | C           | 77      | Comment flag                |
/// | UN          | 78-79   | Forbiddenness               |
/// | Q           | 80      | `?` for an expected branch  |
#[derive(Debug, Clone, Serialize)]
pub struct BetaRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub energy: Energy,
    pub intensity: UncertainValue,
    pub log_ft: UncertainValue,
    pub forbiddenness: String,
    pub questionable: bool,
    pub continuation: ContinuationFields,
    pub comments: Vec<String>,
}

impl BetaRecord {
    /// Read a beta minus record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, " B"))?;

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            energy: Energy::from_fields(raw.field(9, 18), raw.field(19, 20)),
            intensity: decode_value_uncertainty(raw.field(21, 28), raw.field(29, 30)),
            log_ft: decode_value_uncertainty(raw.field(41, 48), raw.field(49, 54)),
            forbiddenness: raw.field(77, 78).to_string(),
            questionable: raw.field(79, 79) == "?",
            continuation: raw.continuation_fields(),
            comments: raw.comment_text(),
        };

        Some((record, cursor))
    }

    /// The endpoint energy is usually computed, so only the NUCID matters
    pub fn is_valid(&self) -> bool {
        self.nucid.is_some()
    }
}

/// Electron capture and beta plus record, `E` in column 8
///
/// | Field     | Columns | Meaning                                   |
/// | --------- | ------- | ----------------------------------------- |
/// | E/DE      | 10-21   | Beta plus endpoint energy (keV)           |
/// | IB/DIB    | 22-31   | Beta plus intensity                       |
/// | IE/DIE    | 32-41   | Electron capture intensity                |
/// | LOGFT/DFT | 42-55   | log ft                                    |
/// | TI/DTI    | 65-76   | Total decay intensity, `IB + IE`          |
#[derive(Debug, Clone, Serialize)]
pub struct EcRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub energy: Energy,
    pub beta_intensity: UncertainValue,
    pub ec_intensity: UncertainValue,
    pub log_ft: UncertainValue,
    pub total_intensity: UncertainValue,
    pub forbiddenness: String,
    pub questionable: bool,
    pub continuation: ContinuationFields,
    pub comments: Vec<String>,
}

impl EcRecord {
    /// Read an EC record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, " E"))?;

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            energy: Energy::from_fields(raw.field(9, 18), raw.field(19, 20)),
            beta_intensity: decode_value_uncertainty(raw.field(21, 28), raw.field(29, 30)),
            ec_intensity: decode_value_uncertainty(raw.field(31, 38), raw.field(39, 40)),
            log_ft: decode_value_uncertainty(raw.field(41, 48), raw.field(49, 54)),
            total_intensity: decode_value_uncertainty(raw.field(64, 73), raw.field(74, 75)),
            forbiddenness: raw.field(77, 78).to_string(),
            questionable: raw.field(79, 79) == "?",
            continuation: raw.continuation_fields(),
            comments: raw.comment_text(),
        };

        Some((record, cursor))
    }

    pub fn is_valid(&self) -> bool {
        self.nucid.is_some()
    }

    /// Feeding of the level, `TI` if given, otherwise `IB + IE`
    pub fn feeding(&self) -> Option<UncertainValue> {
        if self.total_intensity.has_finite_value() {
            return Some(self.total_intensity);
        }

        match (
            self.beta_intensity.has_finite_value(),
            self.ec_intensity.has_finite_value(),
        ) {
            (true, true) => Some(self.beta_intensity + self.ec_intensity),
            (true, false) => Some(self.beta_intensity),
            (false, true) => Some(self.ec_intensity),
            (false, false) => None,
        }
    }
}

/// Alpha record, `A` in column 8
///
/// | Field  | Columns | Meaning                   |
/// | ------ | ------- | ------------------------- |
/// | E/DE   | 10-21   | Alpha energy (keV)        |
/// | IA/DIA | 22-31   | Intensity of the branch   |
/// | HF/DHF | 32-41   | Hindrance factor          |
#[derive(Debug, Clone, Serialize)]
pub struct AlphaRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub energy: Energy,
    pub intensity: UncertainValue,
    pub hindrance: UncertainValue,
    pub questionable: bool,
    pub continuation: ContinuationFields,
    pub comments: Vec<String>,
}

impl AlphaRecord {
    /// Read an alpha record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, " A"))?;

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            energy: Energy::from_fields(raw.field(9, 18), raw.field(19, 20)),
            intensity: decode_value_uncertainty(raw.field(21, 28), raw.field(29, 30)),
            hindrance: decode_value_uncertainty(raw.field(31, 38), raw.field(39, 40)),
            questionable: raw.field(79, 79) == "?",
            continuation: raw.continuation_fields(),
            comments: raw.comment_text(),
        };

        Some((record, cursor))
    }

    pub fn is_valid(&self) -> bool {
        self.nucid.is_some() && self.energy.is_valid()
    }
}

/// Delayed or prompt particle record
///
/// Column 8 is `D` for a delayed particle and blank for a prompt one, the
/// particle itself is in column 9 (`N`, `P`, `A`...).
///
/// | Field  | Columns | Meaning                                  |
/// | ------ | ------- | ---------------------------------------- |
/// | E/DE   | 10-21   | Particle energy (keV)                    |
/// | IP/DIP | 22-31   | Intensity of the branch                  |
/// | EI     | 32-39   | Energy of the intermediate level         |
/// | T/DT   | 40-55   | Width of the transition                  |
/// | L      | 56-64   | Angular momentum transfer                |
#[derive(Debug, Clone, Serialize)]
pub struct ParticleRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub delayed: bool,
    pub particle: char,
    pub energy: Energy,
    pub intensity: UncertainValue,
    pub intermediate: Energy,
    pub width: HalfLife,
    pub angular_momentum: String,
    pub questionable: bool,
    pub continuation: ContinuationFields,
    pub comments: Vec<String>,
}

impl ParticleRecord {
    /// Read a particle record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, is_particle)?;

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            delayed: column(raw.primary, 7, 7) == "D",
            particle: column(raw.primary, 8, 8).chars().next().unwrap_or(' '),
            energy: Energy::from_fields(raw.field(9, 18), raw.field(19, 20)),
            intensity: decode_value_uncertainty(raw.field(21, 28), raw.field(29, 30)),
            intermediate: Energy::from_fields(raw.field(31, 38), ""),
            width: HalfLife::from_field(raw.field(39, 54)),
            angular_momentum: raw.field(55, 63).to_string(),
            questionable: raw.field(79, 79) == "?",
            continuation: raw.continuation_fields(),
            comments: raw.comment_text(),
        };

        Some((record, cursor))
    }

    pub fn is_valid(&self) -> bool {
        self.nucid.is_some() && self.particle.is_ascii_alphabetic()
    }
}

/// Blank column 7, `D` or blank in column 8, particle letter in column 9
fn is_particle(line: &str) -> bool {
    !is_continuation(line)
        && column(line, 6, 6) == " "
        && matches!(column(line, 7, 7), " " | "D")
        && matches!(column(line, 8, 8).chars().next(), Some(c) if c.is_ascii_uppercase())
        && Nucid::parse(nucid_text(line)).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn beta() {
        let text = lines("152GD  B 1474.6    6 1.0     3           11.17   3                           1U");
        let (beta, _) = BetaRecord::read(Cursor::new(&text)).unwrap();

        assert!(beta.is_valid());
        assert_eq!(beta.intensity.value(), 1.0);
        assert_eq!(beta.log_ft.value(), 11.17);
        assert_eq!(beta.forbiddenness, "1U");
    }

    #[test]
    fn ec_feeding_prefers_total() {
        let text = lines("152SM  E             0.0071  6 0.35    3 9.3     1              0.36      3");
        let (ec, _) = EcRecord::read(Cursor::new(&text)).unwrap();

        assert!(ec.is_valid());
        assert_eq!(ec.feeding().unwrap().value(), 0.36);
    }

    #[test]
    fn ec_feeding_sums_branches() {
        let text = lines("152SM  E             0.0071  6 0.35    3");
        let (ec, _) = EcRecord::read(Cursor::new(&text)).unwrap();
        assert!((ec.feeding().unwrap().value() - 0.3571).abs() < 1e-12);

        let text = lines("152SM  E 1000");
        let (ec, _) = EcRecord::read(Cursor::new(&text)).unwrap();
        assert!(ec.feeding().is_none());
    }

    #[test]
    fn alpha() {
        let text = lines("148SM  A 1929      5 100       1.0");
        let (alpha, _) = AlphaRecord::read(Cursor::new(&text)).unwrap();

        assert!(alpha.is_valid());
        assert_eq!(alpha.energy.kev(), 1929.0);
        assert_eq!(alpha.intensity.value(), 100.0);
        assert_eq!(alpha.hindrance.value(), 1.0);
    }

    #[test]
    fn delayed_particle() {
        let text = lines(" 17O   DN1170      8 88      5 4555.0");
        let (particle, _) = ParticleRecord::read(Cursor::new(&text)).unwrap();

        assert!(particle.is_valid());
        assert!(particle.delayed);
        assert_eq!(particle.particle, 'N');
        assert_eq!(particle.energy.kev(), 1170.0);
        assert_eq!(particle.intermediate.kev(), 4555.0);
    }

    #[test]
    fn particle_is_not_a_normalization() {
        let text = lines("152GD  N 0.01");
        assert!(ParticleRecord::read(Cursor::new(&text)).is_none());

        let text = lines("152GD    152EU B- DECAY");
        assert!(ParticleRecord::read(Cursor::new(&text)).is_none());
    }
}
