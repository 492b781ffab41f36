//! Integration tests for scheme assembly from a real mass chain layout

use nscheme_ensdf::{
    DecayMode, DecayScheme, EnsdfParser, Energy, Error, NormalizationSource, NuclideId, Parity,
    SchemeOptions,
};
use rstest::{fixture, rstest};

const EU152_DECAY: &str = "152EU B- DECAY (13.517 Y)";
const TB152_DECAY: &str = "152TB EC DECAY (17.5 H)";
const CAPTURE: &str = "151EU(N,G) E=THERMAL";

#[fixture]
fn parser() -> EnsdfParser {
    let _ = stderrlog::new().verbosity(4).init();
    EnsdfParser::from_file("./data/ensdf.152").unwrap()
}

#[fixture]
fn gd152() -> NuclideId {
    "152Gd".parse().unwrap()
}

fn scheme(parser: &EnsdfParser, name: &str) -> DecayScheme {
    parser
        .decay(gd152(), name, &SchemeOptions::default())
        .unwrap()
}

fn transition_multipolarity(scheme: &DecayScheme, kev: f64) -> String {
    scheme
        .daughter()
        .transitions()
        .values()
        .find(|t| t.energy.kev() == kev)
        .map(|t| t.multipolarity.clone())
        .unwrap()
}

#[rstest]
fn listing(parser: EnsdfParser, gd152: NuclideId) {
    assert_eq!(parser.daughters(), vec![gd152]);
    let names = parser
        .decays(gd152)
        .into_iter()
        .map(|(name, _)| name)
        .collect::<Vec<String>>();
    assert_eq!(names, vec![EU152_DECAY, TB152_DECAY]);

    let parents = parser.decays(gd152).into_iter().map(|(_, parent)| parent);
    assert!(parents.eq(["152Eu".parse().unwrap(), "152Tb".parse().unwrap()]));
    assert_eq!(parser.reactions(gd152), vec![CAPTURE]);

    // the 9.3 h EC decay has no parent record and is dropped
    let dropped = parser
        .diagnostics()
        .warnings()
        .filter(|d| d.message.contains("no parent record"))
        .count();
    assert_eq!(dropped, 1);
}

#[rstest]
fn unknown_dataset(parser: EnsdfParser, gd152: NuclideId) {
    let result = parser.decay(gd152, "152EU EC DECAY (9.3116 H)", &SchemeOptions::default());
    assert!(matches!(result, Err(Error::DatasetNotFound { .. })));
}

#[rstest]
#[case(EU152_DECAY, 0.2792, 0.2792)] // production record after N
#[case(TB152_DECAY, 0.25, 0.5)] // production record before N
fn production_normalisation_wins(
    parser: EnsdfParser,
    #[case] name: &str,
    #[case] decay_factor: f64,
    #[case] gamma_factor: f64,
) {
    let scheme = scheme(&parser, name);
    let normalization = scheme.normalization();

    assert_eq!(normalization.source, NormalizationSource::Production);
    assert_eq!(normalization.decay_factor, decay_factor);
    assert_eq!(normalization.gamma_factor, gamma_factor);
}

#[rstest]
#[case(344.28, "E2")] // case 1
#[case(703.7, "E2")] // case 2, level given by its XREF offset
#[case(764.90, "M1")] // case 3
#[case(1109.17, "E2")] // case 4
#[case(1455.7, "")] // case 5, no adopted gamma within 1%
fn multipolarity_from_adopted(parser: EnsdfParser, #[case] kev: f64, #[case] expected: &str) {
    let scheme = scheme(&parser, EU152_DECAY);
    assert_eq!(transition_multipolarity(&scheme, kev), expected);
}

#[rstest]
fn mixing_ratio_from_adopted(parser: EnsdfParser) {
    let scheme = scheme(&parser, EU152_DECAY);
    let transition = scheme
        .daughter()
        .transitions()
        .values()
        .find(|t| t.energy.kev() == 764.90)
        .unwrap();

    assert_eq!(transition.mixing_ratio.value(), 0.4);
}

#[rstest]
#[case(1.0, true)] // exactly 18 keV away at 1800 keV
#[case(0.99, false)]
fn level_tolerance_inclusive(parser: EnsdfParser, #[case] pct: f64, #[case] merged: bool) {
    let options = SchemeOptions::new(pct, 1.0).unwrap();
    let scheme = parser.decay(gd152(), EU152_DECAY, &options).unwrap();
    let level = scheme.daughter().level(&Energy::exact(1800.0)).unwrap();

    assert_eq!(level.spin_parity.is_valid(), merged);
}

#[rstest]
fn ground_state_written_as_zero(parser: EnsdfParser) {
    let scheme = scheme(&parser, EU152_DECAY);
    let (energy, ground) = scheme.daughter().levels().iter().next().unwrap();

    assert!(energy.is_valid());
    assert!(energy.value().is_exact());
    assert_eq!(energy.kev(), 0.0);

    // half-life taken from the adopted ground state
    assert!(ground.half_life.is_valid());
    assert_eq!(ground.half_life.unit(), "y");
}

#[rstest]
fn decay_levels_and_links(parser: EnsdfParser) {
    let scheme = scheme(&parser, EU152_DECAY);
    let daughter = scheme.daughter();

    assert_eq!(daughter.levels().len(), 5);
    assert_eq!(daughter.transitions().len(), 5);
    assert_eq!(daughter.orphans().count(), 0);

    let first = daughter.level(&Energy::exact(344.28)).unwrap();
    assert_eq!(first.spin_parity.parity(), Some(Parity::Plus));
    assert_eq!(first.populating.len(), 3);
    assert_eq!(first.depopulating.len(), 1);
    assert!(first.quadrupole_moment.is_some());
    assert!(first.magnetic_moment.is_some());

    // offset energy in the cross reference
    let level = daughter.level(&Energy::exact(1048.0)).unwrap();
    assert_eq!(level.spin_parity.parity(), Some(Parity::Plus));

    let ground = daughter.level(&Energy::exact(0.0)).unwrap();
    assert!(ground.is_feeding_level);
    assert!((ground.feeding.unwrap().value() - 1.8 * 0.2792).abs() < 1e-12);
}

#[rstest]
fn decay_information(parser: EnsdfParser) {
    let scheme = scheme(&parser, EU152_DECAY);
    let info = scheme.decay_info().unwrap();

    assert_eq!(info.mode, DecayMode::BetaMinus);
    assert_eq!(info.parents, vec!["152Eu".parse::<NuclideId>().unwrap()]);
    assert_eq!(scheme.parent().levels().len(), 1);
    assert_eq!(scheme.parent().half_lives()[0].unit(), "y");
    assert_eq!(scheme.comments(), ["Measured with a Ge detector array."]);
}

#[rstest]
fn electron_capture_feeding(parser: EnsdfParser) {
    let scheme = scheme(&parser, TB152_DECAY);
    let daughter = scheme.daughter();

    // total intensity where given, otherwise beta plus and EC
    for kev in [0.0, 344.28] {
        let level = daughter.level(&Energy::exact(kev)).unwrap();
        assert!((level.feeding.unwrap().value() - 2.5).abs() < 1e-12);
    }

    let level = daughter.level(&Energy::exact(615.40)).unwrap();
    assert!(level.half_life.is_valid());
    assert!(level.feeding.is_none());
    assert_eq!(transition_multipolarity(&scheme, 271.1), "E2");
}

#[rstest]
fn gamma_before_levels_is_orphaned(parser: EnsdfParser) {
    let scheme = scheme(&parser, TB152_DECAY);
    let orphans = scheme.daughter().orphans().collect::<Vec<_>>();

    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].energy.kev(), 2000.0);
    assert!(orphans[0].from.is_none());
    assert!(scheme.diagnostics().warnings().count() >= 1);
}

#[rstest]
fn reaction_target_and_ties(parser: EnsdfParser) {
    let scheme = scheme(&parser, CAPTURE);
    assert!(scheme.decay_info().is_none());
    assert_eq!(scheme.parent().id(), "151Eu".parse::<NuclideId>().unwrap());
    assert_eq!(scheme.parent().levels().len(), 1);

    // 400 keV is equally far from 300 and 500 keV
    let transition = scheme.daughter().transitions().values().next().unwrap();
    assert_eq!(transition.to, Some(Energy::exact(300.0)));

    assert_eq!(scheme.normalization().source, NormalizationSource::None);
    assert!(scheme.daughter().levels().values().all(|l| !l.is_feeding_level));
}

#[rstest]
fn json_export(parser: EnsdfParser) {
    let scheme = scheme(&parser, EU152_DECAY);
    let json = scheme.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["name"], EU152_DECAY);
    assert_eq!(value["daughter"]["levels"].as_array().unwrap().len(), 5);
    assert_eq!(value["daughter"]["transitions"].as_array().unwrap().len(), 5);
}
