// nscheme modules
use nscheme_utils::{f, OptionExt};

// internal modules
use crate::record::GammaRecord;
use crate::value::{Energy, UncertainValue};

// external crates
use serde::Serialize;

/// Key of a transition within its nuclide
///
/// Gammas of the same energy depopulating different levels are common
/// enough that the energy alone is not unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TransitionKey {
    pub energy: Energy,
    pub from: Option<Energy>,
}

/// A gamma transition between two levels
///
/// `from` and `to` are keys into the level map of the owning nuclide. Either
/// may be `None` for a transition that could not be placed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transition {
    pub energy: Energy,
    /// Photon intensity as percent of parent decays, relative if unnormalised
    pub intensity: UncertainValue,
    pub multipolarity: String,
    /// Mixing ratio, delta
    pub mixing_ratio: UncertainValue,
    /// Total conversion coefficient
    pub conversion: UncertainValue,
    pub from: Option<Energy>,
    pub to: Option<Energy>,
}

impl Transition {
    /// Transition with the properties of a gamma record, not yet placed
    pub fn from_record(record: &GammaRecord) -> Self {
        Self {
            energy: record.energy,
            intensity: record.intensity,
            multipolarity: record.multipolarity.clone(),
            mixing_ratio: record.mixing_ratio,
            conversion: record.conversion,
            from: None,
            to: None,
        }
    }

    /// Key of this transition in its nuclide
    pub fn key(&self) -> TransitionKey {
        TransitionKey {
            energy: self.energy,
            from: self.from,
        }
    }

    /// True if both ends are linked to levels
    pub fn is_placed(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Transition\n".to_string();
        s += &f!("  Energy           {}\n", self.energy);
        s += &f!("  Intensity        {}\n", self.intensity);
        s += &f!("  Multipolarity    {}\n", self.multipolarity);
        s += &f!("  Mixing ratio     {}\n", self.mixing_ratio);
        s += &f!("  Conversion coef. {}\n", self.conversion);
        s += &f!("  From level       {}\n", self.from.display());
        s += &f!("  To level         {}", self.to.display());
        write!(f, "{s}")
    }
}
