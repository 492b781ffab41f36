// nscheme modules
use nscheme_utils::{f, OptionExt};

// internal modules
use crate::block::{DecayInfo, ReactionInfo};
use crate::diagnostics::Diagnostics;
use crate::model::Nuclide;
use crate::Result;

// external crates
use serde::Serialize;

/// Where a dataset's levels come from
#[derive(Debug, Clone, Serialize)]
pub enum SchemeInfo {
    Decay(DecayInfo),
    Reaction(ReactionInfo),
}

/// Which record the intensity normalisation was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum NormalizationSource {
    /// Nothing given, intensities are left relative
    #[default]
    None,
    /// `N` record, `NB*BR` and `NR*BR`
    Normalization,
    /// `PN` record, `NBBR` and `NRBR`
    Production,
}

/// Factors converting relative intensities to percent of parent decays
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Normalization {
    /// Applied to beta, EC, alpha and particle intensities
    pub decay_factor: f64,
    /// Applied to gamma intensities
    pub gamma_factor: f64,
    pub source: NormalizationSource,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            decay_factor: 1.0,
            gamma_factor: 1.0,
            source: NormalizationSource::None,
        }
    }
}

/// A fully assembled level scheme for one dataset
///
/// Built fresh for every request and never shared with the parser, so it
/// may be kept and inspected freely.
#[derive(Debug, Clone, Serialize)]
pub struct DecayScheme {
    pub(crate) name: String,
    pub(crate) parent: Nuclide,
    pub(crate) daughter: Nuclide,
    pub(crate) info: SchemeInfo,
    pub(crate) normalization: Normalization,
    pub(crate) comments: Vec<String>,
    pub(crate) diagnostics: Diagnostics,
}

impl DecayScheme {
    /// Name of the dataset, as written in its identification record
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent nuclide, or the target of a reaction
    pub fn parent(&self) -> &Nuclide {
        &self.parent
    }

    /// Daughter nuclide with the assembled levels and transitions
    pub fn daughter(&self) -> &Nuclide {
        &self.daughter
    }

    pub fn info(&self) -> &SchemeInfo {
        &self.info
    }

    /// Decay information, `None` for reactions
    pub fn decay_info(&self) -> Option<&DecayInfo> {
        match &self.info {
            SchemeInfo::Decay(info) => Some(info),
            SchemeInfo::Reaction(_) => None,
        }
    }

    /// Reaction information, `None` for decays
    pub fn reaction_info(&self) -> Option<&ReactionInfo> {
        match &self.info {
            SchemeInfo::Reaction(info) => Some(info),
            SchemeInfo::Decay(_) => None,
        }
    }

    pub fn normalization(&self) -> &Normalization {
        &self.normalization
    }

    /// General comments of the dataset
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Everything recovered from while assembling the scheme
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// True if no daughter levels could be assembled
    pub fn is_empty(&self) -> bool {
        self.daughter.levels().is_empty()
    }

    /// Pretty JSON of the whole scheme
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for DecayScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Decay scheme\n".to_string();
        s += &f!("  Name             {}\n", self.name);
        s += &f!("  Parent           {}\n", self.parent.id());
        s += &f!("  Daughter         {}\n", self.daughter.id());

        match &self.info {
            SchemeInfo::Decay(info) => {
                s += &f!("  Mode             {}\n", info.mode);
                s += &f!("  Half life        {}\n", info.half_life);
            }
            SchemeInfo::Reaction(info) => {
                let reactions = info
                    .reactions
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<String>>();
                s += &f!("  Reactions        {}\n", reactions.join(", "));
                s += &f!("  Qualifiers       {}\n", info.qualifiers);
            }
        }

        s += &f!(
            "  Ground state     {}\n",
            self.daughter.half_lives().first().display()
        );
        s += &f!("  Levels           {}\n", self.daughter.levels().len());
        s += &f!("  Transitions      {}\n", self.daughter.transitions().len());
        s += &f!("  Decay factor     {}\n", self.normalization.decay_factor);
        s += &f!("  Gamma factor     {}\n", self.normalization.gamma_factor);
        s += &f!("  Diagnostics      {}", self.diagnostics.len());

        let text = self.comments.join(" ");
        if !text.trim().is_empty() {
            s += "\n";
            s += &textwrap::indent(&textwrap::fill(text.trim(), 76), "  ");
        }

        write!(f, "{s}")
    }
}
