//! Blank line delimited datasets and their classification
//!
//! A mass chain file is a sequence of datasets separated by blank lines. The
//! identification record at the top of each one says what it contains, in
//! free text that is matched against a handful of known forms.

// internal modules
use crate::diagnostics::Diagnostics;
use crate::nuclide::{Nucid, NuclideId};
use crate::parsers::{decay_dsid, reaction_list};
use crate::record::{self, is_primary, Cursor, IdRecord, Record};
use crate::value::HalfLife;

// external crates
use log::debug;
use serde::Serialize;

/// Decay modes recognised in dataset names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DecayMode {
    BetaMinus,
    BetaPlus,
    ElectronCapture,
    IsomericTransition,
    Alpha,
}

impl DecayMode {
    /// Interpret the mode as written in a dataset name
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "B-" => Some(Self::BetaMinus),
            "B+" => Some(Self::BetaPlus),
            "EC" => Some(Self::ElectronCapture),
            "IT" => Some(Self::IsomericTransition),
            "A" => Some(Self::Alpha),
            _ => None,
        }
    }

    /// The mode as written in a dataset name
    pub fn code(&self) -> &'static str {
        match self {
            Self::BetaMinus => "B-",
            Self::BetaPlus => "B+",
            Self::ElectronCapture => "EC",
            Self::IsomericTransition => "IT",
            Self::Alpha => "A",
        }
    }
}

impl std::fmt::Display for DecayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::BetaMinus => "\u{03b2}-",
            Self::BetaPlus => "\u{03b2}+",
            Self::ElectronCapture => "EC",
            Self::IsomericTransition => "IT",
            Self::Alpha => "\u{03b1}",
        };
        write!(f, "{name}")
    }
}

/// What a decay dataset name says about the decay
#[derive(Debug, Clone, Serialize)]
pub struct DecayInfo {
    /// Parent nuclides listed before the mode
    pub parents: Vec<NuclideId>,
    pub mode: DecayMode,
    /// Parent half-life quoted in the name, the first if several
    pub half_life: HalfLife,
}

/// A single `target(in,out)` reaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reaction {
    pub target: Option<NuclideId>,
    pub incoming: String,
    pub outgoing: String,
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.target {
            Some(target) => write!(f, "{target}({},{})", self.incoming, self.outgoing),
            None => write!(f, "({},{})", self.incoming, self.outgoing),
        }
    }
}

/// What a reaction dataset name says about the reaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactionInfo {
    /// Reactions populating the nuclide, empty for Coulomb excitation
    pub reactions: Vec<Reaction>,
    /// Anything following the reactions, e.g. `E=THERMAL`
    pub qualifiers: String,
}

/// Classification of a dataset from its identification text
#[derive(Debug, Clone, Serialize)]
pub enum BlockKind {
    AdoptedLevels,
    Decay(DecayInfo),
    Reaction(ReactionInfo),
    Comments,
    References,
    Unknown,
}

impl BlockKind {
    /// Classify a dataset from its header
    ///
    /// The tests run in a fixed order since the forms overlap, e.g. a
    /// comments dataset for a decay names the decay too.
    pub fn classify(header: &IdRecord) -> Self {
        let dsid = header.dsid_upper();

        if dsid.contains("COMMENTS") {
            return Self::Comments;
        }

        if dsid.contains("REFERENCES") && matches!(header.nucid, Some(Nucid::Mass(_))) {
            return Self::References;
        }

        if let Some(info) = reaction_info(&dsid) {
            return Self::Reaction(info);
        }

        if dsid.contains("ADOPTED LEVELS") {
            return Self::AdoptedLevels;
        }

        if let Some(info) = decay_info(&dsid) {
            return Self::Decay(info);
        }

        Self::Unknown
    }

    /// Short description for reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::AdoptedLevels => "adopted levels",
            Self::Decay(_) => "decay",
            Self::Reaction(_) => "reaction",
            Self::Comments => "comments",
            Self::References => "references",
            Self::Unknown => "unknown",
        }
    }
}

fn reaction_info(dsid: &str) -> Option<ReactionInfo> {
    if dsid.trim_start().starts_with("COULOMB EXCITATION") {
        return Some(ReactionInfo {
            reactions: Vec::new(),
            qualifiers: dsid.trim().to_string(),
        });
    }

    let (rest, list) = reaction_list(dsid).ok()?;
    let reactions = list
        .into_iter()
        .map(|r| Reaction {
            target: r.target.and_then(|t| t.parse().ok()),
            incoming: r.incoming.to_string(),
            outgoing: r.outgoing.to_string(),
        })
        .collect();

    Some(ReactionInfo {
        reactions,
        qualifiers: rest.trim().trim_start_matches(':').trim().to_string(),
    })
}

fn decay_info(dsid: &str) -> Option<DecayInfo> {
    let (_, decay) = decay_dsid(dsid).ok()?;
    let parents = decay
        .parents
        .iter()
        .filter_map(|p| p.parse::<NuclideId>().ok())
        .collect::<Vec<NuclideId>>();

    if parents.is_empty() {
        return None;
    }

    Some(DecayInfo {
        parents,
        mode: DecayMode::from_code(decay.mode)?,
        half_life: decay.half_life.map(HalfLife::from_field).unwrap_or_default(),
    })
}

/// One dataset of a mass chain file
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub header: IdRecord,
    /// Index of the first line
    pub start: usize,
    /// Index one past the last line
    pub end: usize,
}

impl Block {
    /// The dataset name, the identification text as written
    pub fn name(&self) -> &str {
        self.header.dsid.trim()
    }

    /// Nuclide the dataset is for, `None` for mass chain datasets
    pub fn nuclide(&self) -> Option<NuclideId> {
        self.header.nucid.and_then(|n| n.nuclide())
    }

    /// Every valid record after the header
    pub fn records(&self, lines: &[String], diagnostics: &mut Diagnostics) -> Vec<Record> {
        let body = Cursor::range(lines, self.start, self.end);
        let body = match IdRecord::read(body) {
            Some((_, next)) => next.index(),
            None => self.start,
        };
        record::scan(lines, body, self.end, diagnostics)
    }

    /// True if any line in the block is a parent record
    pub fn has_parent_record(&self, lines: &[String]) -> bool {
        lines[self.start..self.end.min(lines.len())]
            .iter()
            .any(|l| is_primary(l, " P"))
    }

    /// The decay information if this is a decay dataset
    pub fn decay_info(&self) -> Option<&DecayInfo> {
        match &self.kind {
            BlockKind::Decay(info) => Some(info),
            _ => None,
        }
    }

    /// The reaction information if this is a reaction dataset
    pub fn reaction_info(&self) -> Option<&ReactionInfo> {
        match &self.kind {
            BlockKind::Reaction(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_adopted_levels(&self) -> bool {
        matches!(self.kind, BlockKind::AdoptedLevels)
    }
}

/// Line ranges `[start, end)` of runs of two or more non-blank lines
pub fn segment(lines: &[String]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = None;

    for (i, line) in lines.iter().enumerate() {
        match (line.trim().is_empty(), start) {
            (true, Some(s)) => {
                ranges.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => (),
        }
    }

    if let Some(s) = start {
        ranges.push((s, lines.len()));
    }

    ranges.retain(|(s, e)| e - s >= 2);
    ranges
}

/// Segment and classify every dataset of a mass chain file
///
/// Blocks without a readable header are skipped, as are decay datasets
/// without any parent record. Both are reported in `diagnostics`.
pub fn read_blocks(lines: &[String], diagnostics: &mut Diagnostics) -> Vec<Block> {
    let mut blocks = Vec::new();

    for (start, end) in segment(lines) {
        let Some((header, _)) = IdRecord::read(Cursor::range(lines, start, end)) else {
            diagnostics.warn(Some(start), "block has no identification record, skipped");
            continue;
        };

        let block = Block {
            kind: BlockKind::classify(&header),
            header,
            start,
            end,
        };

        match &block.kind {
            BlockKind::Unknown => {
                diagnostics.warn(
                    Some(start),
                    format!("unrecognised dataset \"{}\"", block.name()),
                );
            }
            BlockKind::Decay(_) if !block.has_parent_record(lines) => {
                diagnostics.warn(
                    Some(start),
                    format!("decay dataset \"{}\" has no parent record, skipped", block.name()),
                );
                continue;
            }
            BlockKind::Comments => {
                diagnostics.info(Some(start), format!("comment dataset \"{}\"", block.name()));
            }
            _ => (),
        }

        debug!(
            "lines {}-{}: {} dataset \"{}\"",
            start + 1,
            end,
            block.kind.label(),
            block.name()
        );
        blocks.push(block);
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn header(text: &str) -> IdRecord {
        let text = lines(text);
        IdRecord::read(Cursor::new(&text)).unwrap().0
    }

    #[test]
    fn segments() {
        let text = lines("A\nB\n\nC\n\n\nD\nE\nF\n");
        assert_eq!(segment(&text), vec![(0, 2), (6, 9)]);
    }

    #[test]
    fn classification() {
        let kind = BlockKind::classify(&header("152GD    152EU B- DECAY (13.517 Y)"));
        let BlockKind::Decay(info) = kind else {
            panic!("expected a decay")
        };
        assert_eq!(info.parents, [NuclideId::new(63, 89)]);
        assert_eq!(info.mode, DecayMode::BetaMinus);
        assert_eq!(info.half_life.unit(), "y");

        let kind = BlockKind::classify(&header("152GD    ADOPTED LEVELS, GAMMAS"));
        assert!(matches!(kind, BlockKind::AdoptedLevels));

        let kind = BlockKind::classify(&header("152GD    151EU(N,G) E=THERMAL"));
        let BlockKind::Reaction(info) = kind else {
            panic!("expected a reaction")
        };
        assert_eq!(info.reactions[0].to_string(), "151Eu(N,G)");
        assert_eq!(info.qualifiers, "E=THERMAL");

        let kind = BlockKind::classify(&header("152GD    COULOMB EXCITATION"));
        assert!(matches!(kind, BlockKind::Reaction(_)));

        let kind = BlockKind::classify(&header("152      COMMENTS"));
        assert!(matches!(kind, BlockKind::Comments));

        let kind = BlockKind::classify(&header("152      REFERENCES"));
        assert!(matches!(kind, BlockKind::References));

        let kind = BlockKind::classify(&header("152GD    SOMETHING ELSE"));
        assert!(matches!(kind, BlockKind::Unknown));
    }

    #[test]
    fn decay_without_parent_is_dropped() {
        let text = lines(
            "152GD    152EU B- DECAY (13.517 Y)\n\
             152GD  L 0.0          0+\n\
             \n\
             152GD    152TB EC DECAY (17.5 H)\n\
             152TB  P 0.0          2-                17.5 H    1\n\
             152GD  L 0.0          0+\n",
        );
        let mut diagnostics = Diagnostics::new();
        let blocks = read_blocks(&text, &mut diagnostics);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name(), "152TB EC DECAY (17.5 H)");
        assert_eq!(blocks[0].start, 3);
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn records_skip_the_header() {
        let text = lines(
            "152GD    ADOPTED LEVELS\n\
             152GD  L 0.0          0+\n\
             152GD  L 344.2789  12 2+",
        );
        let mut diagnostics = Diagnostics::new();
        let blocks = read_blocks(&text, &mut diagnostics);
        let records = blocks[0].records(&text, &mut diagnostics);

        assert_eq!(records.len(), 2);
        assert!(diagnostics.is_empty());
    }
}
