//! Building a level scheme from one dataset
//!
//! The records of the dataset are walked in order, keeping track of the
//! level last seen. Gammas depopulate it and feeding records add to it.
//! Properties missing from the dataset are borrowed from the matching adopted
//! level or gamma, within the configured tolerances.

// internal modules
use crate::adopted::{AdoptedLevel, AdoptedLevels};
use crate::block::{Block, BlockKind, ReactionInfo};
use crate::diagnostics::Diagnostics;
use crate::model::{
    DecayScheme, Level, Normalization, NormalizationSource, Nuclide, SchemeInfo, Transition,
};
use crate::nuclide::NuclideId;
use crate::options::SchemeOptions;
use crate::record::{CommentsRecord, GammaRecord, LevelRecord, ParentRecord, Record};
use crate::value::{Energy, SignInfo, UncertainValue};

// external crates
use log::debug;

/// Assemble the scheme of a decay or reaction dataset
///
/// Without an adopted levels dataset for the daughter the scheme is returned
/// empty, with a warning in its diagnostics.
pub(crate) fn assemble(
    lines: &[String],
    block: &Block,
    adopted: Option<&Block>,
    options: &SchemeOptions,
) -> DecayScheme {
    let mut diagnostics = Diagnostics::new();
    let daughter = block.nuclide().unwrap_or_default();
    let records = block.records(lines, &mut diagnostics);

    let info = match &block.kind {
        BlockKind::Decay(info) => SchemeInfo::Decay(info.clone()),
        BlockKind::Reaction(info) => SchemeInfo::Reaction(info.clone()),
        _ => SchemeInfo::Reaction(ReactionInfo {
            reactions: Vec::new(),
            qualifiers: block.name().to_string(),
        }),
    };

    let mut assembly = Assembly {
        daughter: Nuclide::new(daughter),
        normalization: Normalization::default(),
        is_decay: matches!(info, SchemeInfo::Decay(_)),
        options: *options,
        current: None,
        comments: Vec::new(),
        parents: Vec::new(),
    };

    let parent_id = parent_id(&info, daughter);
    let info = complete_info(info, &records);

    let Some(adopted) = adopted else {
        diagnostics.warn(
            Some(block.start),
            format!("no adopted levels for {daughter}, \"{}\" left empty", block.name()),
        );
        return DecayScheme {
            name: block.name().to_string(),
            parent: assembly.parent_nuclide(parent_id, &mut diagnostics),
            daughter: assembly.daughter,
            info,
            normalization: assembly.normalization,
            comments: Vec::new(),
            diagnostics,
        };
    };

    let adopted_records = adopted.records(lines, &mut diagnostics);
    let adopted = AdoptedLevels::new(&adopted_records, block.name(), &mut diagnostics);

    if assembly.is_decay {
        assembly.normalization = normalization(&records);
    }

    for record in &records {
        assembly.add_record(record, &adopted, &mut diagnostics);
    }

    let linked = assembly.daughter.resolve_dangling();
    debug!(
        "\"{}\": {} levels, {} transitions, {linked} linked late",
        block.name(),
        assembly.daughter.levels().len(),
        assembly.daughter.transitions().len()
    );

    let orphans = assembly.daughter.orphans().count();
    if orphans > 0 {
        diagnostics.info(None, format!("{orphans} transition(s) could not be placed"));
    }

    DecayScheme {
        name: block.name().to_string(),
        parent: assembly.parent_nuclide(parent_id, &mut diagnostics),
        daughter: assembly.daughter,
        info,
        normalization: assembly.normalization,
        comments: assembly.comments,
        diagnostics,
    }
}

/// Normalisation factors of a decay dataset
///
/// A production normalisation record takes precedence over the
/// normalisation record for every factor it gives, wherever it appears.
fn normalization(records: &[Record]) -> Normalization {
    let mut normalization = Normalization::default();

    if let Some(n) = records.iter().find_map(|r| match r {
        Record::Normalization(n) => Some(n),
        _ => None,
    }) {
        normalization.decay_factor = n.decay_factor();
        normalization.gamma_factor = n.gamma_factor();
        normalization.source = NormalizationSource::Normalization;
    }

    if let Some(pn) = records.iter().find_map(|r| match r {
        Record::ProdNormalization(pn) => Some(pn),
        _ => None,
    }) {
        if pn.nbbr.has_finite_value() {
            normalization.decay_factor = pn.decay_factor();
            normalization.source = NormalizationSource::Production;
        }
        if pn.nrbr.has_finite_value() {
            normalization.gamma_factor = pn.gamma_factor();
            normalization.source = NormalizationSource::Production;
        }
    }

    normalization
}

/// The parent of a decay, or the target of a reaction
///
/// Reactions without a target, such as Coulomb excitation, are their own
/// parent.
fn parent_id(info: &SchemeInfo, daughter: NuclideId) -> NuclideId {
    match info {
        SchemeInfo::Decay(info) => info.parents.first().copied().unwrap_or(daughter),
        SchemeInfo::Reaction(info) => info
            .reactions
            .iter()
            .find_map(|r| r.target)
            .unwrap_or(daughter),
    }
}

/// Take the decay half-life from the parent record if the name has none
fn complete_info(info: SchemeInfo, records: &[Record]) -> SchemeInfo {
    match info {
        SchemeInfo::Decay(mut decay) if !decay.half_life.is_valid() => {
            if let Some(parent) = records.iter().find_map(|r| match r {
                Record::Parent(p) if p.half_life.is_valid() => Some(p),
                _ => None,
            }) {
                decay.half_life = parent.half_life.clone();
            }
            SchemeInfo::Decay(decay)
        }
        other => other,
    }
}

/// State carried while walking the records of a dataset
struct Assembly<'a> {
    daughter: Nuclide,
    normalization: Normalization,
    is_decay: bool,
    options: SchemeOptions,
    /// Last level seen, and the adopted level it matched
    current: Option<(Energy, Option<&'a AdoptedLevel>)>,
    comments: Vec<String>,
    parents: Vec<ParentRecord>,
}

impl<'a> Assembly<'a> {
    fn add_record(
        &mut self,
        record: &Record,
        adopted: &'a AdoptedLevels,
        diagnostics: &mut Diagnostics,
    ) {
        match record {
            Record::Level(level) => self.add_level(level, adopted, diagnostics),
            Record::Gamma(gamma) => self.add_gamma(gamma, diagnostics),
            Record::Beta(beta) => self.add_feeding(beta.index, Some(beta.intensity), diagnostics),
            Record::Ec(ec) => self.add_feeding(ec.index, ec.feeding(), diagnostics),
            Record::Alpha(alpha) => {
                self.add_feeding(alpha.index, Some(alpha.intensity), diagnostics)
            }
            Record::Particle(particle) => {
                self.add_feeding(particle.index, Some(particle.intensity), diagnostics)
            }
            Record::Parent(parent) => self.parents.push(parent.clone()),
            Record::Comments(comment) => self.add_comment(comment),
            _ => (),
        }
    }

    /// New current level, completed from the matching adopted level
    fn add_level(
        &mut self,
        record: &LevelRecord,
        adopted: &'a AdoptedLevels,
        diagnostics: &mut Diagnostics,
    ) {
        let mut level = Level::from_record(record);
        let matched = adopted.matching(&record.energy, self.options.level_tolerance_pct());

        if let Some(adopted_level) = matched {
            merge_adopted(&mut level, &adopted_level.level);
        } else {
            diagnostics.info(
                Some(record.index),
                format!("no adopted level within tolerance of {}", record.energy),
            );
        }

        if !self.daughter.add_level(level) {
            diagnostics.warn(
                Some(record.index),
                format!("duplicate level at {}, first kept", record.energy),
            );
        }

        self.current = Some((record.energy, matched));
    }

    /// Gamma from the current level to the nearest level below
    fn add_gamma(&mut self, record: &GammaRecord, diagnostics: &mut Diagnostics) {
        let mut transition = Transition::from_record(record);
        transition.intensity = transition.intensity * self.normalization.gamma_factor;

        let Some((from, matched)) = self.current else {
            diagnostics.warn(
                Some(record.index),
                format!("gamma {} before any level, kept unplaced", record.energy),
            );
            self.daughter.register_transition(transition);
            return;
        };

        if let Some(adopted_gamma) =
            matched.and_then(|a| a.matching_gamma(&record.energy, self.options.gamma_tolerance_pct()))
        {
            borrow_adopted(&mut transition, adopted_gamma);
        }

        transition.from = Some(from);
        transition.to = record
            .final_level()
            .filter(|fl| self.daughter.level(fl).is_some())
            .or_else(|| self.daughter.lower_level(&from, &record.energy));

        if self.daughter.register_transition(transition).is_none() {
            diagnostics.warn(
                Some(record.index),
                format!("duplicate gamma {} from {from}, first kept", record.energy),
            );
        }
    }

    /// Feeding of the current level, scaled to percent of parent decays
    fn add_feeding(
        &mut self,
        index: usize,
        intensity: Option<UncertainValue>,
        diagnostics: &mut Diagnostics,
    ) {
        if !self.is_decay {
            return;
        }

        let Some(intensity) = intensity.filter(UncertainValue::has_finite_value) else {
            return;
        };

        let Some((energy, _)) = self.current else {
            diagnostics.warn(Some(index), "feeding before any level, ignored");
            return;
        };

        if let Some(level) = self.daughter.level_mut(&energy) {
            level.add_feeding(intensity * self.normalization.decay_factor);
        }
    }

    /// Keep general comments on the whole dataset
    fn add_comment(&mut self, comment: &CommentsRecord) {
        if comment.record_type.is_none() {
            self.comments.push(comment.joined());
        }
    }

    /// Parent nuclide from the parent records, with a ground state
    fn parent_nuclide(&self, id: NuclideId, diagnostics: &mut Diagnostics) -> Nuclide {
        let mut parent = Nuclide::new(id);

        for record in self.parents.iter().filter(|p| p.nuclide() == Some(id)) {
            if !record.energy.is_valid() {
                diagnostics.warn(Some(record.index), "parent level without an energy, skipped");
                continue;
            }

            parent.add_level(Level {
                energy: record.energy,
                spin_parity: record.spin_parity.clone(),
                half_life: record.half_life.clone(),
                ..Default::default()
            });
        }

        let needs_ground_state = parent
            .levels()
            .keys()
            .next()
            .map_or(true, |lowest| lowest.kev() > 0.0);

        if needs_ground_state {
            parent.add_level(Level::new(Energy::exact(0.0)));
        }

        parent
    }
}

/// Fill in what the dataset left blank from the adopted level
fn merge_adopted(level: &mut Level, adopted: &LevelRecord) {
    if !level.half_life.is_valid() && adopted.half_life.is_valid() {
        level.half_life = adopted.half_life.clone();
    }

    if !level.spin_parity.is_valid() && adopted.spin_parity.is_valid() {
        level.spin_parity = adopted.spin_parity.clone();
    }

    if level.isomer.is_none() {
        level.isomer = adopted.isomer;
    }

    level.quadrupole_moment = level
        .quadrupole_moment
        .take()
        .or_else(|| adopted.quadrupole_moment());
    level.magnetic_moment = level
        .magnetic_moment
        .take()
        .or_else(|| adopted.magnetic_moment());
}

/// Take multipolarity and mixing ratio from the adopted gamma when better
fn borrow_adopted(transition: &mut Transition, adopted: &GammaRecord) {
    if transition.multipolarity.is_empty() {
        transition.multipolarity = adopted.multipolarity.clone();
    }

    let own = transition.mixing_ratio.sign();
    if own != SignInfo::SignMagnitudeDefined && adopted.mixing_ratio.sign() > own {
        transition.mixing_ratio = adopted.mixing_ratio;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::read_blocks;
    use nscheme_utils::f;
    use rstest::rstest;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    const FILE: &str = "\
152GD    ADOPTED LEVELS, GAMMAS
152GD  XA152EU B- DECAY (13.517 Y)
152GD  L 0.0         0+                1.08E+14 Y 8
152GD2 L XREF=A
152GD  L 344.2789  122+                31.0 PS   11
152GD2 L XREF=A$MOME2=-1.5 3
152GD  G 344.2785  12100     16M1        -0.5    2

152GD    152EU B- DECAY (13.517 Y)
152EU  P 0.0         3-                13.517 Y  6              1818.8    7
152GD  N 0.5         1         0.279   3 1.0
152GD  L 0.0
152GD  B 1818.8    7 29.0    3
152GD  L 344.27    1
152GD  B 1474.6    6 8.0     3
152GD  G 344.28    1 100     3
152GD  G 500.0     1 1       1
";

    fn scheme(text: &str, options: SchemeOptions) -> DecayScheme {
        let text = lines(text);
        let mut diagnostics = Diagnostics::new();
        let blocks = read_blocks(&text, &mut diagnostics);
        let adopted = blocks.iter().find(|b| b.is_adopted_levels());
        let decay = blocks.iter().find(|b| b.decay_info().is_some()).unwrap();
        assemble(&text, decay, adopted, &options)
    }

    #[test]
    fn levels_and_transitions() {
        let scheme = scheme(FILE, SchemeOptions::default());
        let daughter = scheme.daughter();

        assert_eq!(daughter.levels().len(), 2);
        assert_eq!(daughter.transitions().len(), 2);

        let transition = daughter.transitions().values().next().unwrap();
        assert_eq!(transition.from, Some(Energy::from_fields("344.27", "1")));
        assert_eq!(transition.to.map(|e| e.kev()), Some(0.0));

        // 500 keV from 344 keV has nowhere lower to go but the ground state
        assert_eq!(daughter.orphans().count(), 0);
    }

    #[test]
    fn adopted_properties_merged() {
        let scheme = scheme(FILE, SchemeOptions::default());
        let level = scheme.daughter().level(&Energy::from_fields("344.27", "1")).unwrap();

        assert!(level.spin_parity.is_valid());
        assert_eq!(level.half_life.unit(), "ps");
        assert!(level.quadrupole_moment.is_some());

        let ground = scheme.daughter().level(&Energy::from_fields("0.0", "")).unwrap();
        assert!(ground.half_life.is_valid());
    }

    #[test]
    fn adopted_gamma_borrowed() {
        let scheme = scheme(FILE, SchemeOptions::default());
        let transition = scheme.daughter().transitions().values().next().unwrap();

        assert_eq!(transition.multipolarity, "M1");
        assert_eq!(transition.mixing_ratio.value(), -0.5);
    }

    /// The test file with both 344 keV gammas given these mixing ratios
    fn with_mixing_ratios(own: &str, adopted: &str) -> String {
        FILE.replace(
            "152GD  G 344.2785  12100     16M1        -0.5    2",
            &f!("152GD  G 344.2785  12100     16M1        {adopted:<8}"),
        )
        .replace(
            "152GD  G 344.28    1 100     3",
            &f!("152GD  G 344.28    1 100     3 M1        {own:<8}"),
        )
    }

    #[rstest]
    #[case("", "-0.5", SignInfo::SignMagnitudeDefined, -0.5)] // nothing of its own
    #[case("0.35", "+", SignInfo::SignDefined, f64::NAN)] // sign beats magnitude
    #[case("+", "0.35", SignInfo::SignDefined, f64::NAN)] // magnitude never beats sign
    #[case("0.35", "-0.5", SignInfo::SignMagnitudeDefined, -0.5)] // adopted fully known
    #[case("-", "+", SignInfo::SignDefined, f64::NAN)] // equal, keep own
    #[case("0.35", "0.6", SignInfo::MagnitudeDefined, 0.35)] // equal, keep own
    #[case("+0.35", "-0.5", SignInfo::SignMagnitudeDefined, 0.35)] // fully known is final
    #[case("+0.35", "", SignInfo::SignMagnitudeDefined, 0.35)]
    fn mixing_ratio_sign_preference(
        #[case] own: &str,
        #[case] adopted: &str,
        #[case] sign: SignInfo,
        #[case] value: f64,
    ) {
        let scheme = scheme(&with_mixing_ratios(own, adopted), SchemeOptions::default());
        let transition = scheme.daughter().transitions().values().next().unwrap();
        let ratio = transition.mixing_ratio;

        assert_eq!(ratio.sign(), sign);
        match value.is_nan() {
            true => assert!(ratio.value().is_nan()),
            false => assert_eq!(ratio.value(), value),
        }
    }

    #[test]
    fn sign_only_keeps_its_sign() {
        let scheme = scheme(&with_mixing_ratios("-", "0.35"), SchemeOptions::default());
        let transition = scheme.daughter().transitions().values().next().unwrap();
        assert_eq!(transition.mixing_ratio.to_string(), "-");
    }

    #[test]
    fn normalised_intensities() {
        let scheme = scheme(FILE, SchemeOptions::default());
        assert_eq!(scheme.normalization().source, NormalizationSource::Normalization);

        let ground = scheme.daughter().level(&Energy::exact(0.0)).unwrap();
        assert!(ground.is_feeding_level);
        assert!((ground.feeding.unwrap().value() - 29.0 * 0.279).abs() < 1e-9);

        let transition = scheme.daughter().transitions().values().next().unwrap();
        assert!((transition.intensity.value() - 100.0 * 0.5 * 0.279).abs() < 1e-9);
    }

    #[test]
    fn parent_ground_state() {
        let scheme = scheme(FILE, SchemeOptions::default());
        let parent = scheme.parent();

        assert_eq!(parent.id(), NuclideId::new(63, 89));
        assert_eq!(parent.levels().len(), 1);
        assert_eq!(parent.half_lives()[0].unit(), "y");
    }

    #[test]
    fn tight_tolerance_skips_merge() {
        let scheme = scheme(FILE, SchemeOptions::new(0.001, 0.001).unwrap());
        let level = scheme.daughter().level(&Energy::from_fields("344.27", "1")).unwrap();

        assert!(!level.spin_parity.is_valid());
        let transition = scheme.daughter().transitions().values().next().unwrap();
        assert!(transition.multipolarity.is_empty());
    }

    #[test]
    fn missing_adopted_levels() {
        let text = lines(FILE);
        let mut diagnostics = Diagnostics::new();
        let blocks = read_blocks(&text, &mut diagnostics);
        let decay = blocks.iter().find(|b| b.decay_info().is_some()).unwrap();

        let scheme = assemble(&text, decay, None, &SchemeOptions::default());
        assert!(scheme.is_empty());
        assert_eq!(scheme.diagnostics().warnings().count(), 1);
        assert_eq!(scheme.parent().levels().len(), 1);
    }
}
