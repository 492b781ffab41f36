//! Integration tests for directory access and configuration

use nscheme_ensdf::{list_masses, EnsdfSource, Error, NuclideId, SourceConfig};
use rstest::{fixture, rstest};

#[fixture]
fn source() -> EnsdfSource {
    let _ = stderrlog::new().verbosity(4).init();
    let mut source = EnsdfSource::new("./data").unwrap();
    source.disable_progress();
    source
}

#[rstest]
fn masses_from_file_names(source: EnsdfSource) {
    assert_eq!(list_masses("./data").unwrap(), vec![3, 152]);
    assert_eq!(source.masses(), vec![3, 152]);
}

#[rstest]
fn missing_directory() {
    assert!(matches!(list_masses("./data/missing"), Err(Error::Io(_))));
}

#[rstest]
#[case(3, "3He", "3H B- DECAY (12.32 Y)")] // case 1
#[case(152, "152Gd", "152EU B- DECAY (13.517 Y)")] // case 2
fn lazy_queries(
    source: EnsdfSource,
    #[case] mass: u16,
    #[case] daughter: &str,
    #[case] decay: &str,
) {
    let daughter: NuclideId = daughter.parse().unwrap();
    assert!(source.daughters(mass).unwrap().contains(&daughter));
    assert!(source.decays(daughter).unwrap().iter().any(|(d, _)| d == decay));

    let scheme = source.decay(daughter, decay).unwrap();
    assert!(!scheme.is_empty());
    assert_eq!(scheme.daughter().id(), daughter);
}

#[rstest]
fn tritium_feeding(source: EnsdfSource) {
    let he3: NuclideId = "3He".parse().unwrap();
    let scheme = source.decay(he3, "3H B- DECAY (12.32 Y)").unwrap();

    let ground = scheme.daughter().levels().values().next().unwrap();
    assert!(ground.half_life.is_stable());
    assert_eq!(ground.feeding.unwrap().value(), 100.0);
    assert_eq!(scheme.parent().id(), "3H".parse::<NuclideId>().unwrap());

    // no cross references, so every adopted level was eligible
    assert!(!scheme.diagnostics().is_empty());
}

#[rstest]
fn mass_not_available(source: EnsdfSource) {
    let co60: NuclideId = "60Co".parse().unwrap();
    assert!(matches!(source.decays(co60), Err(Error::MassNotAvailable(60))));
}

#[rstest]
fn preloading(source: EnsdfSource) {
    assert_eq!(source.preload_all(), 2);

    // cached parsers are shared
    let first = source.parser(152).unwrap();
    let second = source.parser(152).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[rstest]
fn configured_source() {
    let config = SourceConfig::from_json_file("./data/source.json").unwrap();
    assert_eq!(config.options.level_tolerance_pct(), 0.5);
    assert_eq!(config.options.gamma_tolerance_pct(), 1.0);
    assert!(config.disable_progress);

    let source = EnsdfSource::from_config(&config).unwrap();
    assert_eq!(source.options(), &config.options);
    assert_eq!(source.masses(), vec![3, 152]);
}
