// standard library
use std::collections::BTreeSet;

// nscheme modules
use nscheme_utils::{f, OptionExt};

// internal modules
use crate::model::TransitionKey;
use crate::record::LevelRecord;
use crate::value::{Energy, HalfLife, Moment, SpinParity, UncertainValue};

// external crates
use serde::Serialize;

/// An energy level of a nuclide
///
/// Transitions are referred to by key only, the [Nuclide](crate::Nuclide)
/// owning the level owns the transitions too.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Level {
    /// Level energy, also the key in the owning nuclide
    pub energy: Energy,
    pub spin_parity: SpinParity,
    pub half_life: HalfLife,
    /// Isomer number, 1 for the first metastable state
    pub isomer: Option<u8>,
    /// Total feeding as percent of parent decays
    pub feeding: Option<UncertainValue>,
    /// True if any beta, EC, alpha or particle branch feeds the level
    pub is_feeding_level: bool,
    /// Electric quadrupole moment (b)
    pub quadrupole_moment: Option<Moment>,
    /// Magnetic dipole moment (nuclear magnetons)
    pub magnetic_moment: Option<Moment>,
    /// Transitions ending on this level
    pub populating: BTreeSet<TransitionKey>,
    /// Transitions starting from this level
    pub depopulating: BTreeSet<TransitionKey>,
}

impl Level {
    /// Bare level at an energy
    pub fn new(energy: Energy) -> Self {
        Self {
            energy,
            ..Default::default()
        }
    }

    /// Level with the properties of a level record
    pub fn from_record(record: &LevelRecord) -> Self {
        Self {
            energy: record.energy,
            spin_parity: record.spin_parity.clone(),
            half_life: record.half_life.clone(),
            isomer: record.isomer,
            quadrupole_moment: record.quadrupole_moment(),
            magnetic_moment: record.magnetic_moment(),
            ..Default::default()
        }
    }

    /// Add to the feeding of the level and mark it as fed
    pub fn add_feeding(&mut self, intensity: UncertainValue) {
        self.feeding = Some(match self.feeding {
            Some(total) => total + intensity,
            None => intensity,
        });
        self.is_feeding_level = true;
    }

    /// True for the ground state and isomers
    pub fn is_long_lived(&self) -> bool {
        self.isomer.is_some() || (self.energy.kev() == 0.0 && self.energy.offset().is_none())
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Level\n".to_string();
        s += &f!("  Energy           {}\n", self.energy);
        s += &f!("  Spin parity      {}\n", self.spin_parity);
        s += &f!("  Half life        {}\n", self.half_life);
        s += &f!("  Isomer           {}\n", self.isomer.display());
        s += &f!("  Feeding          {}\n", self.feeding.display_unit("%"));
        s += &f!("  Q moment         {}\n", self.quadrupole_moment.display());
        s += &f!("  Mu moment        {}\n", self.magnetic_moment.display());
        s += &f!("  Populating       {}\n", self.populating.len());
        s += &f!("  Depopulating     {}", self.depopulating.len());
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feeding_accumulates() {
        let mut level = Level::new(Energy::exact(344.3));
        assert!(!level.is_feeding_level);

        level.add_feeding(UncertainValue::symmetric(1.5, 0.1));
        level.add_feeding(UncertainValue::symmetric(0.5, 0.1));

        assert!(level.is_feeding_level);
        assert!((level.feeding.unwrap().value() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn long_lived() {
        assert!(Level::new(Energy::exact(0.0)).is_long_lived());
        assert!(!Level::new(Energy::from_fields("X", "")).is_long_lived());

        let mut level = Level::new(Energy::exact(45.6));
        assert!(!level.is_long_lived());
        level.isomer = Some(1);
        assert!(level.is_long_lived());
    }

    #[test]
    fn summary_units() {
        let mut level = Level::new(Energy::exact(344.3));
        assert!(level.to_string().contains("Feeding          none\n"));

        level.add_feeding(UncertainValue::symmetric(1.5, 0.1));
        assert!(level.to_string().contains(" %\n"));
    }
}
