//! Adopted level lookup for merging into other datasets
//!
//! The adopted levels dataset of a nuclide holds the evaluated properties of
//! every level, and an `XREF=` continuation on each level saying which of the
//! other datasets saw it. Datasets are referred to by a single character
//! symbol defined by the cross-reference records at the top of the dataset.

// standard library
use std::collections::BTreeMap;

// nscheme modules
use nscheme_utils::NearestExt;

// internal modules
use crate::diagnostics::Diagnostics;
use crate::parsers::Xref;
use crate::record::{GammaRecord, LevelRecord, Record};
use crate::value::Energy;

// external crates
use log::trace;

/// An adopted level and the gammas depopulating it
#[derive(Debug, Clone)]
pub struct AdoptedLevel {
    pub level: LevelRecord,
    pub gammas: Vec<GammaRecord>,
}

impl AdoptedLevel {
    /// The gamma nearest to `energy`, if within `pct` percent of it
    pub fn matching_gamma(&self, energy: &Energy, pct: f64) -> Option<&GammaRecord> {
        let candidates = self
            .gammas
            .iter()
            .filter(|g| g.energy.is_valid())
            .map(|g| (g.energy, g))
            .collect::<BTreeMap<Energy, &GammaRecord>>();

        let key = candidates.nearest_key(energy, |a, b| a.distance(b))?;
        match energy.within_pct(key, pct) {
            true => candidates.get(key).copied(),
            false => None,
        }
    }
}

/// Adopted levels seen by one dataset, indexed by energy
///
/// Levels with an unresolved offset label (`+X`) are indexed separately per
/// label and only ever match levels with the same label.
#[derive(Debug, Clone, Default)]
pub struct AdoptedLevels {
    symbol: Option<char>,
    levels: BTreeMap<Option<char>, BTreeMap<Energy, AdoptedLevel>>,
}

impl AdoptedLevels {
    /// Index the adopted levels visible to the dataset named `dsid`
    ///
    /// The dataset symbol is looked up from the cross-reference records.
    /// Without one every adopted level is considered.
    pub fn new(records: &[Record], dsid: &str, diagnostics: &mut Diagnostics) -> Self {
        let symbol = dataset_symbol(records, dsid);
        if symbol.is_none() {
            diagnostics.info(
                None,
                format!("no cross-reference symbol for \"{dsid}\", all adopted levels considered"),
            );
        }

        let mut adopted = Self {
            symbol,
            levels: BTreeMap::new(),
        };

        for sub_block in sub_blocks(records) {
            adopted.insert(sub_block, diagnostics);
        }

        trace!(
            "{} adopted level(s) visible to \"{dsid}\" (symbol {:?})",
            adopted.len(),
            adopted.symbol
        );
        adopted
    }

    fn insert(&mut self, sub_block: AdoptedLevel, diagnostics: &mut Diagnostics) {
        let mut energy = sub_block.level.energy;

        if let Some(symbol) = self.symbol {
            let xref = sub_block.level.xref().map(Xref::parse).unwrap_or(Xref::All);
            if !xref.includes(symbol) {
                return;
            }

            // this dataset saw the level at a different energy
            if let Some(text) = xref.offset(symbol) {
                let seen = Energy::from_fields(text, "");
                if seen.is_valid() {
                    energy = seen;
                }
            }
        }

        let by_energy = self.levels.entry(energy.offset()).or_default();
        if by_energy.contains_key(&energy) {
            diagnostics.info(
                Some(sub_block.level.index),
                format!("duplicate adopted level at {energy}, first kept"),
            );
            return;
        }
        by_energy.insert(energy, sub_block);
    }

    /// Symbol of the dataset in the cross-reference list, if found
    pub fn symbol(&self) -> Option<char> {
        self.symbol
    }

    /// Number of indexed levels
    pub fn len(&self) -> usize {
        self.levels.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The adopted level nearest in energy with the same offset label
    ///
    /// Ties go to the lower energy.
    pub fn nearest(&self, energy: &Energy) -> Option<&AdoptedLevel> {
        let by_energy = self.levels.get(&energy.offset())?;
        let key = by_energy.nearest_key(energy, |a, b| a.distance(b))?;
        by_energy.get(key)
    }

    /// The nearest adopted level if it lies within `pct` percent, inclusive
    pub fn matching(&self, energy: &Energy, pct: f64) -> Option<&AdoptedLevel> {
        let by_energy = self.levels.get(&energy.offset())?;
        let key = by_energy.nearest_key(energy, |a, b| a.distance(b))?;
        match energy.within_pct(key, pct) {
            true => by_energy.get(key),
            false => None,
        }
    }
}

/// The symbol of the cross-reference record naming `dsid`
///
/// Cross-reference records only hold 30 characters, so a longer name
/// matches on the truncated prefix.
fn dataset_symbol(records: &[Record], dsid: &str) -> Option<char> {
    let dsid = dsid.trim().to_uppercase();

    records
        .iter()
        .take_while(|r| !matches!(r, Record::Level(_)))
        .filter_map(|r| match r {
            Record::XRef(x) => Some(x),
            _ => None,
        })
        .find(|x| {
            let listed = x.dsid.trim().to_uppercase();
            listed == dsid || (!listed.is_empty() && dsid.starts_with(&listed))
        })
        .map(|x| x.symbol)
}

/// Split records into one entry per level, with the gammas that follow it
fn sub_blocks(records: &[Record]) -> Vec<AdoptedLevel> {
    let mut sub_blocks: Vec<AdoptedLevel> = Vec::new();

    for record in records {
        match record {
            Record::Level(level) => sub_blocks.push(AdoptedLevel {
                level: level.clone(),
                gammas: Vec::new(),
            }),
            Record::Gamma(gamma) => {
                if let Some(current) = sub_blocks.last_mut() {
                    current.gammas.push(gamma.clone());
                }
            }
            _ => (),
        }
    }

    sub_blocks
}
