//! Dataset level records carrying no level scheme data

// internal modules
use crate::nuclide::Nucid;
use crate::parsers::{column, decode_value_uncertainty};
use crate::record::{
    is_comment, is_continuation, is_primary, nucid_text, ContinuationFields, Cursor, RawRecord,
};
use crate::value::UncertainValue;

// external crates
use serde::Serialize;

/// History record, `H` in column 8
///
/// Free text of `KEY=value` entries separated by `$`, which may continue
/// over several lines.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub fields: ContinuationFields,
}

impl HistoryRecord {
    /// Read a history record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, " H"))?;

        let mut lines = vec![raw.primary];
        lines.extend(&raw.continuations);

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            fields: ContinuationFields::from_lines(&lines),
        };

        Some((record, cursor))
    }

    pub fn is_valid(&self) -> bool {
        self.nucid.is_some()
    }

    /// Evaluation type, e.g. `FUL` for a full evaluation
    pub fn evaluation_type(&self) -> Option<&str> {
        self.fields.get("TYP")
    }

    /// Evaluator names
    pub fn author(&self) -> Option<&str> {
        self.fields.get("AUT")
    }
}

/// Which of the comment letters introduced a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    /// `C`, general comment
    General,
    /// `D`, documentation for evaluators
    Documentation,
    /// `T`, tabular layout to be kept as written
    Tabular,
}

impl CommentKind {
    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "C" | "c" => Some(Self::General),
            "D" | "d" => Some(Self::Documentation),
            "T" | "t" => Some(Self::Tabular),
            _ => None,
        }
    }
}

/// A free standing comment, `C`, `D` or `T` in column 7
///
/// Column 8 names the record type the comment applies to, blank for the
/// whole dataset. Comments following another record are collected by that
/// record instead.
#[derive(Debug, Clone, Serialize)]
pub struct CommentsRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub kind: CommentKind,
    /// Record type the comment applies to
    pub record_type: Option<char>,
    /// Comment text, one entry per line
    pub text: Vec<String>,
}

impl CommentsRecord {
    /// Read a comment and any lines continuing it
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let primary = cursor.line()?;
        if is_continuation(primary) || !is_comment(primary) {
            return None;
        }

        let kind = CommentKind::from_letter(column(primary, 6, 6))?;
        let letters = column(primary, 6, 7);
        let mut record = Self {
            index: cursor.index(),
            nucid: Nucid::parse(nucid_text(primary)),
            kind,
            record_type: column(primary, 7, 7).chars().find(|c| !c.is_whitespace()),
            text: vec![column(primary, 9, 79).trim_end().to_string()],
        };

        let mut cursor = cursor.advance();
        while let Some(line) = cursor.line() {
            let same_comment = nucid_text(line) == nucid_text(primary)
                && is_continuation(line)
                && column(line, 6, 7).eq_ignore_ascii_case(letters);
            if !same_comment {
                break;
            }
            record.text.push(column(line, 9, 79).trim_end().to_string());
            cursor = cursor.advance();
        }

        Some((record, cursor))
    }

    pub fn is_valid(&self) -> bool {
        self.nucid.is_some()
    }

    /// The comment as a single paragraph
    pub fn joined(&self) -> String {
        self.text
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

/// Q-value record, `Q` in column 8
///
/// | Field   | Columns | Meaning                          |
/// | ------- | ------- | -------------------------------- |
/// | Q-/DQ-  | 10-21   | Beta minus Q-value (keV)         |
/// | SN/DSN  | 22-31   | Neutron separation energy (keV)  |
/// | SP/DSP  | 32-41   | Proton separation energy (keV)   |
/// | QA/DQA  | 42-55   | Alpha Q-value (keV)              |
/// | QREF    | 56-80   | Reference keys                   |
#[derive(Debug, Clone, Serialize)]
pub struct QValueRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    pub q_beta_minus: UncertainValue,
    pub neutron_separation: UncertainValue,
    pub proton_separation: UncertainValue,
    pub q_alpha: UncertainValue,
    pub reference: String,
    pub continuation: ContinuationFields,
    pub comments: Vec<String>,
}

impl QValueRecord {
    /// Read a Q-value record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, " Q"))?;

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            q_beta_minus: decode_value_uncertainty(raw.field(9, 18), raw.field(19, 20)),
            neutron_separation: decode_value_uncertainty(raw.field(21, 28), raw.field(29, 30)),
            proton_separation: decode_value_uncertainty(raw.field(31, 38), raw.field(39, 40)),
            q_alpha: decode_value_uncertainty(raw.field(41, 48), raw.field(49, 54)),
            reference: raw.field(55, 79).to_string(),
            continuation: raw.continuation_fields(),
            comments: raw.comment_text(),
        };

        Some((record, cursor))
    }

    pub fn is_valid(&self) -> bool {
        self.nucid.is_some()
    }
}

/// Cross-reference record, `X` in column 8
///
/// Found at the top of an adopted levels dataset, mapping the single
/// character symbols used by `XREF=` entries to dataset identifiers.
#[derive(Debug, Clone, Serialize)]
pub struct XRefRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    /// Dataset symbol, column 9
    pub symbol: char,
    /// Identification of the referenced dataset
    pub dsid: String,
}

impl XRefRecord {
    /// Read a cross-reference record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, " X"))?;

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            symbol: column(raw.primary, 8, 8).chars().next().unwrap_or(' '),
            dsid: raw.field(9, 38).to_string(),
        };

        Some((record, cursor))
    }

    pub fn is_valid(&self) -> bool {
        self.nucid.is_some() && !self.symbol.is_whitespace() && !self.dsid.is_empty()
    }
}

/// Reference record, `R` in column 8 of the mass chain references dataset
///
/// | Field  | Columns |
/// | ------ | ------- |
/// | KEYNUM | 10-17   |
/// | REFERENCE | 18-80 |
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceRecord {
    /// Index of the primary line in the file
    pub index: usize,
    pub nucid: Option<Nucid>,
    /// Key number, e.g. `1979ME19`
    pub keynum: String,
    /// Abbreviated reference
    pub text: String,
}

impl ReferenceRecord {
    /// Read a reference record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, cursor) = RawRecord::gather(cursor, |l| is_primary(l, " R"))?;

        let mut text = raw.field(17, 79).to_string();
        for line in &raw.continuations {
            let more = column(line, 17, 79).trim();
            if !more.is_empty() {
                text.push(' ');
                text.push_str(more);
            }
        }

        let record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            keynum: raw.field(9, 16).to_string(),
            text,
        };

        Some((record, cursor))
    }

    pub fn is_valid(&self) -> bool {
        self.nucid.is_some() && !self.keynum.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn history() {
        let text = lines(
            "152GD  H TYP=FUL$AUT=M.J. MARTIN$CIT=NDS 114, 1497 (2013)$\n\
             152GD2 H CUT=1-Apr-2013$",
        );
        let (history, next) = HistoryRecord::read(Cursor::new(&text)).unwrap();

        assert!(next.is_end());
        assert_eq!(history.evaluation_type(), Some("FUL"));
        assert_eq!(history.author(), Some("M.J. MARTIN"));
        assert_eq!(history.fields.get("CUT"), Some("1-Apr-2013"));
    }

    #[test]
    fn comments_with_continuation() {
        let text = lines(
            "152GD cL E$From least-squares fit to EG\n\
             152GD2cL values\n\
             152GD cG another comment",
        );
        let (comment, next) = CommentsRecord::read(Cursor::new(&text)).unwrap();

        assert_eq!(comment.kind, CommentKind::General);
        assert_eq!(comment.record_type, Some('L'));
        assert_eq!(comment.joined(), "E$From least-squares fit to EG values");
        assert_eq!(next.index(), 2);
    }

    #[test]
    fn dataset_comment() {
        let text = lines("152GD t  E(level)  Jpi");
        let (comment, _) = CommentsRecord::read(Cursor::new(&text)).unwrap();
        assert_eq!(comment.kind, CommentKind::Tabular);
        assert_eq!(comment.record_type, None);
    }

    #[test]
    fn q_value() {
        let text = lines("152GD  Q -1818.6   7 8557.0  4 5613.4  222204.6  17    2012WA38");
        let (q, _) = QValueRecord::read(Cursor::new(&text)).unwrap();

        assert_eq!(q.q_beta_minus.value(), -1818.6);
        assert_eq!(q.neutron_separation.value(), 8557.0);
        assert_eq!(q.q_alpha.value(), 2204.6);
        assert_eq!(q.reference, "2012WA38");
    }

    #[test]
    fn cross_reference() {
        let text = lines("152GD  XA152EU B- DECAY (13.517 Y)");
        let (xref, _) = XRefRecord::read(Cursor::new(&text)).unwrap();

        assert!(xref.is_valid());
        assert_eq!(xref.symbol, 'A');
        assert_eq!(xref.dsid, "152EU B- DECAY (13.517 Y)");
    }

    #[test]
    fn reference() {
        let text = lines("152    R 1979ME19JOUR PRVCA 20 1513");
        let (reference, _) = ReferenceRecord::read(Cursor::new(&text)).unwrap();

        assert!(reference.is_valid());
        assert_eq!(reference.nucid.map(|n| n.mass()), Some(152));
        assert_eq!(reference.keynum, "1979ME19");
        assert_eq!(reference.text, "JOUR PRVCA 20 1513");
    }
}
