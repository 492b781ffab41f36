//! Matching tolerances and data source configuration

// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// internal modules
use crate::error::{Error, Result};

// external crates
use serde::{Deserialize, Serialize};

/// Tolerances for merging adopted level data into a dataset
///
/// Both are percentages of the energy being matched, and a difference equal
/// to the tolerance still counts as a match.
///
/// ```rust
/// # use nscheme_ensdf::SchemeOptions;
/// let options = SchemeOptions::new(0.5, 2.0).unwrap();
/// assert_eq!(options.level_tolerance_pct(), 0.5);
///
/// assert!(SchemeOptions::new(-1.0, 1.0).is_err());
/// assert!(SchemeOptions::new(1.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeOptions {
    level_tolerance_pct: f64,
    gamma_tolerance_pct: f64,
}

impl Default for SchemeOptions {
    fn default() -> Self {
        Self {
            level_tolerance_pct: 1.0,
            gamma_tolerance_pct: 1.0,
        }
    }
}

impl SchemeOptions {
    /// Tolerances for level and gamma matching, in percent
    pub fn new(level_tolerance_pct: f64, gamma_tolerance_pct: f64) -> Result<Self> {
        Ok(Self {
            level_tolerance_pct: validate(level_tolerance_pct)?,
            gamma_tolerance_pct: validate(gamma_tolerance_pct)?,
        })
    }

    /// Maximum level energy difference for an adopted level match (%)
    pub fn level_tolerance_pct(&self) -> f64 {
        self.level_tolerance_pct
    }

    /// Maximum gamma energy difference for an adopted gamma match (%)
    pub fn gamma_tolerance_pct(&self) -> f64 {
        self.gamma_tolerance_pct
    }

    /// Check values that arrived without going through [SchemeOptions::new]
    pub(crate) fn validated(self) -> Result<Self> {
        Self::new(self.level_tolerance_pct, self.gamma_tolerance_pct)
    }
}

fn validate(pct: f64) -> Result<f64> {
    match pct.is_finite() && pct >= 0.0 {
        true => Ok(pct),
        false => Err(Error::InvalidTolerance(pct)),
    }
}

/// Everything needed to set up an [EnsdfSource](crate::EnsdfSource)
///
/// Usually read from a JSON file, where the tolerances may be left out.
///
/// ```json
/// {
///     "directory": "/data/ensdf",
///     "options": { "level_tolerance_pct": 0.5 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory holding the `ensdf.<AAA>` files
    pub directory: PathBuf,
    #[serde(default)]
    pub options: SchemeOptions,
    /// Do not show a progress bar when preloading
    #[serde(default)]
    pub disable_progress: bool,
}

impl SourceConfig {
    /// Configuration for a directory with default tolerances
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            options: SchemeOptions::default(),
            disable_progress: false,
        }
    }

    /// Read a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let config: Self = serde_json::from_reader(reader)?;
        config.options.validated()?;
        Ok(config)
    }

    /// Read a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.options.validated()?;
        Ok(config)
    }
}
