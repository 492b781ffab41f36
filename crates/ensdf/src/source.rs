//! A directory of ENSDF mass chain files

// standard library
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// internal modules
use crate::error::{Error, Result};
use crate::model::DecayScheme;
use crate::nuclide::NuclideId;
use crate::options::{SchemeOptions, SourceConfig};
use crate::parser::EnsdfParser;

// external crates
use kdam::par_tqdm;
use log::{debug, warn};
use rayon::prelude::*;

/// Mass numbers with an `ensdf.<AAA>` file in a directory, sorted
///
/// Anything with a different name or a suffix that is not a number is
/// ignored.
pub fn list_masses(directory: impl AsRef<Path>) -> Result<Vec<u16>> {
    Ok(mass_files(directory.as_ref())?.into_keys().collect())
}

fn mass_files(directory: &Path) -> Result<BTreeMap<u16, PathBuf>> {
    let mut files = BTreeMap::new();

    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        let Some(mass) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(mass_number)
        else {
            continue;
        };

        files.insert(mass, path);
    }

    debug!("{} mass files in {}", files.len(), directory.display());
    Ok(files)
}

/// Mass number from a file name such as `ensdf.152`
fn mass_number(file_name: &str) -> Option<u16> {
    let suffix = file_name.strip_prefix("ensdf.")?;
    match !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
        true => suffix.parse().ok(),
        false => None,
    }
}

/// Cached access to every mass chain file in a directory
///
/// Files are parsed on first use and kept for the lifetime of the source.
/// The cache sits behind a mutex, so a source may be shared between threads
/// and queried concurrently.
///
/// ```rust, no_run
/// # use nscheme_ensdf::{EnsdfSource, NuclideId};
/// let source = EnsdfSource::new("path/to/ensdf").unwrap();
///
/// let gd152: NuclideId = "152Gd".parse().unwrap();
/// for (name, _parent) in source.decays(gd152).unwrap() {
///     let scheme = source.decay(gd152, &name).unwrap();
///     println!("{scheme}");
/// }
/// ```
#[derive(Debug)]
pub struct EnsdfSource {
    files: BTreeMap<u16, PathBuf>,
    options: SchemeOptions,
    disable_progress: bool,
    cache: Mutex<HashMap<u16, Arc<EnsdfParser>>>,
}

impl EnsdfSource {
    /// Source for a directory with default tolerances
    pub fn new(directory: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            files: mass_files(directory.as_ref())?,
            options: SchemeOptions::default(),
            disable_progress: false,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Source set up from a configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let mut source = Self::new(&config.directory)?;
        source.set_options(config.options.validated()?);
        if config.disable_progress {
            source.disable_progress();
        }
        Ok(source)
    }

    /// Setter for the tolerances used by [EnsdfSource::decay]
    pub fn set_options(&mut self, options: SchemeOptions) {
        self.options = options;
    }

    /// Do not print the progress bar in [EnsdfSource::preload_all]
    pub fn disable_progress(&mut self) {
        self.disable_progress = true;
    }

    pub fn options(&self) -> &SchemeOptions {
        &self.options
    }

    /// Mass numbers available in the directory
    pub fn masses(&self) -> Vec<u16> {
        self.files.keys().copied().collect()
    }

    /// The parser for a mass chain, reading the file if not yet cached
    pub fn parser(&self, mass: u16) -> Result<Arc<EnsdfParser>> {
        if let Some(parser) = self.cached(mass) {
            return Ok(parser);
        }

        let path = self.files.get(&mass).ok_or(Error::MassNotAvailable(mass))?;
        let parser = Arc::new(EnsdfParser::from_file(path)?);

        // another thread may have read the same file meanwhile, keep theirs
        let mut cache = self.lock();
        Ok(Arc::clone(cache.entry(mass).or_insert(parser)))
    }

    /// Nuclides of a mass chain with decay or reaction data
    pub fn daughters(&self, mass: u16) -> Result<Vec<NuclideId>> {
        Ok(self.parser(mass)?.daughters())
    }

    /// Names of the decay datasets populating `daughter`, with their parent
    pub fn decays(&self, daughter: NuclideId) -> Result<Vec<(String, NuclideId)>> {
        Ok(self.parser(daughter.a())?.decays(daughter))
    }

    /// Names of the reaction datasets populating `daughter`
    pub fn reactions(&self, daughter: NuclideId) -> Result<Vec<String>> {
        Ok(self.parser(daughter.a())?.reactions(daughter))
    }

    /// Assemble a dataset with the configured tolerances
    pub fn decay(&self, daughter: NuclideId, name: &str) -> Result<DecayScheme> {
        self.parser(daughter.a())?.decay(daughter, name, &self.options)
    }

    /// Parse every mass chain file in parallel
    ///
    /// Files that fail to read are skipped with a warning, and the number of
    /// parsers cached afterwards is returned.
    pub fn preload_all(&self) -> usize {
        let missing = self
            .files
            .iter()
            .filter(|(mass, _)| self.cached(**mass).is_none())
            .collect::<Vec<(&u16, &PathBuf)>>();

        let parsed: Vec<Option<(u16, EnsdfParser)>> = par_tqdm!(
            missing.par_iter().map(|(mass, path)| {
                match EnsdfParser::from_file(path) {
                    Ok(parser) => Some((**mass, parser)),
                    Err(e) => {
                        warn!("Skipping {}: {e}", path.display());
                        None
                    }
                }
            }),
            bar_format = "Reading mass chains: {count}/{total} [{rate:.2} files/s]  ",
            disable = self.disable_progress
        )
        .collect();

        if !self.disable_progress {
            eprintln!();
        }

        let mut cache = self.lock();
        for (mass, parser) in parsed.into_iter().flatten() {
            cache.entry(mass).or_insert_with(|| Arc::new(parser));
        }
        cache.len()
    }

    fn cached(&self, mass: u16) -> Option<Arc<EnsdfParser>> {
        self.lock().get(&mass).cloned()
    }

    /// The cache only ever gains complete entries, so a poisoned lock is
    /// still consistent
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u16, Arc<EnsdfParser>>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_file_names() {
        assert_eq!(mass_number("ensdf.152"), Some(152));
        assert_eq!(mass_number("ensdf.001"), Some(1));
        assert_eq!(mass_number("ensdf.15a"), None);
        assert_eq!(mass_number("ensdf."), None);
        assert_eq!(mass_number("ENSDF.152"), None);
        assert_eq!(mass_number("ensdf.152.bak"), None);
    }
}
