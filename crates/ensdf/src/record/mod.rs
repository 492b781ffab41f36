//! Fixed-column ENSDF records
//!
//! Every record kind has its own type with a `read()` function taking a
//! [Cursor] by value. On success it returns the record together with a cursor
//! moved past the primary line, its continuation lines, and any comment lines
//! that follow. On a signature mismatch it returns `None` and the caller still
//! holds the original cursor.
//!
//! Field decoding never fails. Text that can not be interpreted gives
//! undefined values and the record reports `is_valid() == false`, leaving the
//! caller to decide whether to drop it.

mod emission;
mod gamma;
mod general;
mod identification;
mod level;
mod parent;

pub use emission::{AlphaRecord, BetaRecord, EcRecord, ParticleRecord};
pub use gamma::GammaRecord;
pub use general::{
    CommentKind, CommentsRecord, HistoryRecord, QValueRecord, ReferenceRecord, XRefRecord,
};
pub use identification::IdRecord;
pub use level::LevelRecord;
pub use parent::{NormalizationRecord, ParentRecord, ProdNormalizationRecord};

// internal modules
use crate::diagnostics::Diagnostics;
use crate::nuclide::Nucid;
use crate::parsers::{column, continuation_field};

// external crates
use log::trace;
use serde::Serialize;

/// Read-only position within the lines of a file
///
/// Cheap to copy, so decoders take it by value and hand back a new one rather
/// than mutating shared state.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    lines: &'a [String],
    index: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor over every line
    pub fn new(lines: &'a [String]) -> Self {
        Self {
            lines,
            index: 0,
            end: lines.len(),
        }
    }

    /// Cursor limited to the lines `start..end`
    pub fn range(lines: &'a [String], start: usize, end: usize) -> Self {
        let end = end.min(lines.len());
        Self {
            lines,
            index: start.min(end),
            end,
        }
    }

    /// Index of the current line in the whole file
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current line, `None` past the end
    pub fn line(&self) -> Option<&'a str> {
        match self.index < self.end {
            true => Some(self.lines[self.index].as_str()),
            false => None,
        }
    }

    /// The same cursor one line further on
    pub fn advance(self) -> Self {
        Self {
            index: (self.index + 1).min(self.end),
            ..self
        }
    }

    /// True when there are no lines left
    pub fn is_end(&self) -> bool {
        self.index >= self.end
    }
}

/// The NUCID columns of a line
pub(crate) fn nucid_text(line: &str) -> &str {
    column(line, 0, 4)
}

/// True for lines continuing a previous record, marker not blank or `1`
pub(crate) fn is_continuation(line: &str) -> bool {
    !matches!(column(line, 5, 5), "" | " " | "1")
}

/// True for comment or documentation lines, `C`, `D`, or `T` in column 7
pub(crate) fn is_comment(line: &str) -> bool {
    matches!(column(line, 6, 6), "C" | "c" | "D" | "d" | "T" | "t")
}

/// True if a line is the primary line of a record with the given type columns
///
/// `letters` are columns 7 and 8 of the format, e.g. `" L"` or `"PN"`.
pub(crate) fn is_primary(line: &str, letters: &str) -> bool {
    !is_continuation(line)
        && column(line, 6, 7) == letters
        && Nucid::parse(nucid_text(line)).is_some()
}

/// A record's lines before field decoding
#[derive(Debug, Clone)]
pub(crate) struct RawRecord<'a> {
    /// Index of the primary line in the file
    pub index: usize,
    pub primary: &'a str,
    pub continuations: Vec<&'a str>,
    pub comments: Vec<&'a str>,
}

impl<'a> RawRecord<'a> {
    /// Gather a record whose primary line satisfies `signature`
    ///
    /// Following lines with the same NUCID are absorbed while they are either
    /// continuations with the same type columns or comments on a record type.
    /// General comments, blank in column 8, belong to the dataset instead.
    pub(crate) fn gather<F>(cursor: Cursor<'a>, signature: F) -> Option<(Self, Cursor<'a>)>
    where
        F: Fn(&str) -> bool,
    {
        let primary = cursor.line()?;
        if !signature(primary) {
            return None;
        }

        let nucid = nucid_text(primary);
        let letters = column(primary, 6, 7);
        let mut record = Self {
            index: cursor.index(),
            primary,
            continuations: Vec::new(),
            comments: Vec::new(),
        };

        let mut cursor = cursor.advance();
        while let Some(line) = cursor.line() {
            if nucid_text(line) != nucid {
                break;
            }

            if is_comment(line) && !column(line, 7, 7).trim().is_empty() {
                record.comments.push(line);
            } else if is_continuation(line) && column(line, 6, 7) == letters {
                record.continuations.push(line);
            } else {
                break;
            }
            cursor = cursor.advance();
        }

        trace!(
            "line {}: record \"{}\" with {} continuation(s)",
            record.index + 1,
            letters,
            record.continuations.len()
        );

        Some((record, cursor))
    }

    /// The NUCID of the record
    pub(crate) fn nucid(&self) -> Option<Nucid> {
        Nucid::parse(nucid_text(self.primary))
    }

    /// Fixed columns `start..=end` of the primary line, trimmed
    pub(crate) fn field(&self, start: usize, end: usize) -> &'a str {
        column(self.primary, start, end).trim()
    }

    /// Continuation fields of the record
    pub(crate) fn continuation_fields(&self) -> ContinuationFields {
        ContinuationFields::from_lines(&self.continuations)
    }

    /// Text of the comment lines, joined
    pub(crate) fn comment_text(&self) -> Vec<String> {
        self.comments
            .iter()
            .map(|c| column(c, 9, 79).trim_end().to_string())
            .collect()
    }
}

/// A single `KEY=value` entry from a continuation record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuationField {
    /// Quantity name, e.g. `XREF` or `MOME2`
    pub key: String,
    /// Operator as written, usually `=`
    pub relation: String,
    /// Everything after the operator
    pub value: String,
}

/// All `KEY=value` entries of a record's continuation lines
///
/// The text of every continuation line from column 10 on is joined with `$`
/// and split back into entries. Entries without an operator are ignored.
///
/// ```rust
/// # use nscheme_ensdf::ContinuationFields;
/// let fields = ContinuationFields::from_text("XREF=ABC$MOME2=-1.5 3 1986AB01");
/// assert_eq!(fields.get("xref"), Some("ABC"));
/// assert_eq!(fields.get("MOME2"), Some("-1.5 3 1986AB01"));
/// assert_eq!(fields.get("MOMM1"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContinuationFields(Vec<ContinuationField>);

impl ContinuationFields {
    /// Split `$` separated text into fields
    pub fn from_text(text: &str) -> Self {
        let fields = text
            .split('$')
            .filter_map(|entry| continuation_field(entry).ok())
            .map(|(_, (key, relation, value))| ContinuationField {
                key: key.to_uppercase(),
                relation: relation.to_string(),
                value: value.to_string(),
            })
            .collect();
        Self(fields)
    }

    /// Join the text of continuation lines and split into fields
    pub(crate) fn from_lines(lines: &[&str]) -> Self {
        let text = lines
            .iter()
            .map(|line| column(line, 9, 79).trim())
            .collect::<Vec<&str>>()
            .join("$");
        Self::from_text(&text)
    }

    /// Value of the first field with this key, case insensitive
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).map(|f| f.value.as_str())
    }

    /// The first field with this key, case insensitive
    pub fn entry(&self, key: &str) -> Option<&ContinuationField> {
        self.0.iter().find(|f| f.key.eq_ignore_ascii_case(key))
    }

    /// Iterate over all fields in the order written
    pub fn iter(&self) -> std::slice::Iter<'_, ContinuationField> {
        self.0.iter()
    }

    /// True if there were no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Any one of the ENSDF record kinds
#[derive(Debug, Clone)]
pub enum Record {
    Identification(IdRecord),
    History(HistoryRecord),
    Comments(CommentsRecord),
    QValue(QValueRecord),
    XRef(XRefRecord),
    Normalization(NormalizationRecord),
    ProdNormalization(ProdNormalizationRecord),
    Parent(ParentRecord),
    Level(LevelRecord),
    Gamma(GammaRecord),
    Alpha(AlphaRecord),
    Beta(BetaRecord),
    Ec(EcRecord),
    Particle(ParticleRecord),
    Reference(ReferenceRecord),
}

impl Record {
    /// Try every record kind at the cursor
    pub fn read(cursor: Cursor) -> Option<(Record, Cursor)> {
        fn wrap<'a, R>(
            found: Option<(R, Cursor<'a>)>,
            variant: fn(R) -> Record,
        ) -> Option<(Record, Cursor<'a>)> {
            found.map(|(record, cursor)| (variant(record), cursor))
        }

        wrap(LevelRecord::read(cursor), Record::Level)
            .or_else(|| wrap(GammaRecord::read(cursor), Record::Gamma))
            .or_else(|| wrap(BetaRecord::read(cursor), Record::Beta))
            .or_else(|| wrap(EcRecord::read(cursor), Record::Ec))
            .or_else(|| wrap(AlphaRecord::read(cursor), Record::Alpha))
            .or_else(|| wrap(ParentRecord::read(cursor), Record::Parent))
            .or_else(|| wrap(NormalizationRecord::read(cursor), Record::Normalization))
            .or_else(|| wrap(ProdNormalizationRecord::read(cursor), Record::ProdNormalization))
            .or_else(|| wrap(CommentsRecord::read(cursor), Record::Comments))
            .or_else(|| wrap(HistoryRecord::read(cursor), Record::History))
            .or_else(|| wrap(QValueRecord::read(cursor), Record::QValue))
            .or_else(|| wrap(XRefRecord::read(cursor), Record::XRef))
            .or_else(|| wrap(ReferenceRecord::read(cursor), Record::Reference))
            .or_else(|| wrap(IdRecord::read(cursor), Record::Identification))
            .or_else(|| wrap(ParticleRecord::read(cursor), Record::Particle))
    }

    /// Index of the primary line in the file
    pub fn index(&self) -> usize {
        match self {
            Record::Identification(r) => r.index,
            Record::History(r) => r.index,
            Record::Comments(r) => r.index,
            Record::QValue(r) => r.index,
            Record::XRef(r) => r.index,
            Record::Normalization(r) => r.index,
            Record::ProdNormalization(r) => r.index,
            Record::Parent(r) => r.index,
            Record::Level(r) => r.index,
            Record::Gamma(r) => r.index,
            Record::Alpha(r) => r.index,
            Record::Beta(r) => r.index,
            Record::Ec(r) => r.index,
            Record::Particle(r) => r.index,
            Record::Reference(r) => r.index,
        }
    }

    /// True if the record decoded into something usable
    pub fn is_valid(&self) -> bool {
        match self {
            Record::Identification(r) => r.is_valid(),
            Record::History(r) => r.is_valid(),
            Record::Comments(r) => r.is_valid(),
            Record::QValue(r) => r.is_valid(),
            Record::XRef(r) => r.is_valid(),
            Record::Normalization(r) => r.is_valid(),
            Record::ProdNormalization(r) => r.is_valid(),
            Record::Parent(r) => r.is_valid(),
            Record::Level(r) => r.is_valid(),
            Record::Gamma(r) => r.is_valid(),
            Record::Alpha(r) => r.is_valid(),
            Record::Beta(r) => r.is_valid(),
            Record::Ec(r) => r.is_valid(),
            Record::Particle(r) => r.is_valid(),
            Record::Reference(r) => r.is_valid(),
        }
    }

    /// Short name of the record kind for reports
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Identification(_) => "identification",
            Record::History(_) => "history",
            Record::Comments(_) => "comments",
            Record::QValue(_) => "Q-value",
            Record::XRef(_) => "cross-reference",
            Record::Normalization(_) => "normalization",
            Record::ProdNormalization(_) => "production normalization",
            Record::Parent(_) => "parent",
            Record::Level(_) => "level",
            Record::Gamma(_) => "gamma",
            Record::Alpha(_) => "alpha",
            Record::Beta(_) => "beta",
            Record::Ec(_) => "EC",
            Record::Particle(_) => "particle",
            Record::Reference(_) => "reference",
        }
    }
}

/// Read every valid record in `start..end`
///
/// Lines that match no record signature and records that fail to decode are
/// reported in `diagnostics` and skipped.
pub fn scan(
    lines: &[String],
    start: usize,
    end: usize,
    diagnostics: &mut Diagnostics,
) -> Vec<Record> {
    let mut records = Vec::new();
    let mut cursor = Cursor::range(lines, start, end);

    while let Some(line) = cursor.line() {
        match Record::read(cursor) {
            Some((record, next)) => {
                if record.is_valid() {
                    records.push(record);
                } else {
                    diagnostics.warn(
                        Some(record.index()),
                        format!("dropped invalid {} record", record.kind()),
                    );
                }
                cursor = next;
            }
            None => {
                if !line.trim().is_empty() {
                    diagnostics.warn(
                        Some(cursor.index()),
                        format!("unrecognised record \"{}\"", line.trim_end()),
                    );
                }
                cursor = cursor.advance();
            }
        }
    }

    records
}
