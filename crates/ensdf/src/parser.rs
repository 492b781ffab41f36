//! Reader for a single ENSDF mass chain file

// standard library
use std::path::Path;

// nscheme modules
use nscheme_utils::f;

// internal modules
use crate::assemble::assemble;
use crate::block::{read_blocks, Block, BlockKind};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::model::DecayScheme;
use crate::nuclide::NuclideId;
use crate::options::SchemeOptions;

// external crates
use log::{debug, trace};

/// Parsed datasets of one `ensdf.<AAA>` file
///
/// The file is split into datasets once, on construction. Every call to
/// [EnsdfParser::decay] then assembles a fresh [DecayScheme] from the stored
/// lines, so a parser can be shared between threads without locking.
///
/// ```rust
/// # use nscheme_ensdf::{EnsdfParser, NuclideId, SchemeOptions};
/// let text = "\
/// 152GD    ADOPTED LEVELS
/// 152GD  L 0.0         0+
///
/// 152GD    152EU B- DECAY
/// 152EU  P 0.0         3-
/// 152GD  L 0.0
/// ";
///
/// let parser: EnsdfParser = text.parse().unwrap();
/// let gd152 = NuclideId::new(64, 88);
///
/// assert_eq!(parser.daughters(), vec![gd152]);
/// let eu152 = NuclideId::new(63, 89);
/// assert_eq!(parser.decays(gd152), vec![("152EU B- DECAY".to_string(), eu152)]);
///
/// let scheme = parser
///     .decay(gd152, "152EU B- DECAY", &SchemeOptions::default())
///     .unwrap();
/// assert_eq!(scheme.daughter().levels().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EnsdfParser {
    lines: Vec<String>,
    blocks: Vec<Block>,
    diagnostics: Diagnostics,
}

impl EnsdfParser {
    /// Read and split an ENSDF file
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        trace!("Reading {}", path.display());
        let bytes = std::fs::read(path)?;
        Ok(Self::from_text(&String::from_utf8_lossy(&bytes)))
    }

    /// Split lines that have already been read
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut diagnostics = Diagnostics::new();
        let blocks = read_blocks(&lines, &mut diagnostics);
        debug!(
            "Found {} datasets in {} lines ({} diagnostics)",
            blocks.len(),
            lines.len(),
            diagnostics.len()
        );

        Self {
            lines,
            blocks,
            diagnostics,
        }
    }

    fn from_text(text: &str) -> Self {
        Self::from_lines(
            text.lines()
                .map(|l| l.trim_end_matches('\r').to_string())
                .collect(),
        )
    }

    /// Every dataset kept after segmentation, in file order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The raw lines of the file
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Everything recovered from while splitting the file
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Nuclides with at least one decay or reaction dataset, sorted
    pub fn daughters(&self) -> Vec<NuclideId> {
        let mut daughters = self
            .blocks
            .iter()
            .filter(|b| matches!(b.kind, BlockKind::Decay(_) | BlockKind::Reaction(_)))
            .filter_map(Block::nuclide)
            .collect::<Vec<NuclideId>>();

        daughters.sort();
        daughters.dedup();
        daughters
    }

    /// Names of the decay datasets populating `daughter`, with their parent
    ///
    /// Where a name lists several parents the first is given.
    pub fn decays(&self, daughter: NuclideId) -> Vec<(String, NuclideId)> {
        self.blocks
            .iter()
            .filter(|b| b.nuclide() == Some(daughter))
            .filter_map(|b| {
                let parent = b.decay_info()?.parents.first()?;
                Some((b.name().to_string(), *parent))
            })
            .collect()
    }

    /// Names of the reaction datasets populating `daughter`
    pub fn reactions(&self, daughter: NuclideId) -> Vec<String> {
        self.blocks
            .iter()
            .filter(|b| b.nuclide() == Some(daughter) && b.reaction_info().is_some())
            .map(|b| b.name().to_string())
            .collect()
    }

    /// The adopted levels dataset of a nuclide, if the file has one
    pub fn adopted_levels(&self, nuclide: NuclideId) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| b.is_adopted_levels() && b.nuclide() == Some(nuclide))
    }

    /// Assemble the level scheme of a decay or reaction dataset
    ///
    /// The name is matched against [EnsdfParser::decays] and
    /// [EnsdfParser::reactions], ignoring case. A name not listed for the
    /// daughter is an error, but a dataset that can not be assembled gives an
    /// empty scheme explained by its diagnostics.
    pub fn decay(
        &self,
        daughter: NuclideId,
        name: &str,
        options: &SchemeOptions,
    ) -> Result<DecayScheme> {
        let block = self.dataset(daughter, name).ok_or_else(|| Error::DatasetNotFound {
            nuclide: daughter.to_string(),
            name: name.to_string(),
        })?;

        trace!("Assembling \"{}\" for {daughter}", block.name());
        Ok(assemble(
            &self.lines,
            block,
            self.adopted_levels(daughter),
            options,
        ))
    }

    fn dataset(&self, daughter: NuclideId, name: &str) -> Option<&Block> {
        let name = name.trim();
        self.blocks
            .iter()
            .filter(|b| matches!(b.kind, BlockKind::Decay(_) | BlockKind::Reaction(_)))
            .filter(|b| b.nuclide() == Some(daughter))
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }
}

impl std::str::FromStr for EnsdfParser {
    type Err = Error;

    /// Split the text of a whole file, never fails
    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::from_text(s))
    }
}

impl std::fmt::Display for EnsdfParser {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "ENSDF file\n".to_string();
        s += &f!("  Lines            {}\n", self.lines.len());
        s += &f!("  Datasets         {}\n", self.blocks.len());
        s += &f!("  Daughters        {}\n", self.daughters().len());
        s += &f!("  Diagnostics      {}", self.diagnostics.len());
        for block in &self.blocks {
            s += &f!("\n  {:<16} {}", block.kind.label(), block.name());
        }
        write!(f, "{s}")
    }
}
