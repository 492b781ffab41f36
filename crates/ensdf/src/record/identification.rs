// internal modules
use crate::nuclide::Nucid;
use crate::parsers::column;
use crate::record::{nucid_text, Cursor, RawRecord};

// external crates
use serde::Serialize;

/// Identification record heading every dataset
///
/// | Field | Columns |
/// | ----- | ------- |
/// | DSID  | 10-39   |
/// | DSREF | 40-65   |
/// | PUB   | 66-74   |
/// | DATE  | 75-80   |
///
/// A dataset identifier longer than 30 characters continues on the next
/// identification line, either marked as a continuation or following a
/// trailing comma.
#[derive(Debug, Clone, Serialize)]
pub struct IdRecord {
    /// Index of the primary line in the file
    pub index: usize,
    /// Nuclide or mass chain the dataset is for
    pub nucid: Option<Nucid>,
    /// Full dataset identification text
    pub dsid: String,
    /// References for the dataset
    pub dsref: String,
    /// Publication information
    pub publication: String,
    /// Date entered, `YYYYMM`
    pub date: String,
    /// Record type comments directly after the header
    pub comments: Vec<String>,
}

impl IdRecord {
    /// Read an identification record at the cursor
    pub fn read(cursor: Cursor) -> Option<(Self, Cursor)> {
        let (raw, mut cursor) = RawRecord::gather(cursor, is_identification)?;

        let mut dsid = raw.field(9, 38).to_string();
        for line in &raw.continuations {
            join_dsid(&mut dsid, column(line, 9, 38).trim());
        }

        let mut record = Self {
            index: raw.index,
            nucid: raw.nucid(),
            dsid,
            dsref: raw.field(39, 64).to_string(),
            publication: raw.field(65, 73).to_string(),
            date: raw.field(74, 79).to_string(),
            comments: raw.comment_text(),
        };

        // unmarked continuation after a trailing comma
        while record.dsid.ends_with(',') {
            let Some(line) = cursor.line() else { break };
            if nucid_text(line) != nucid_text(raw.primary) || !is_identification(line) {
                break;
            }
            let Some((next, after)) = RawRecord::gather(cursor, is_identification) else {
                break;
            };
            join_dsid(&mut record.dsid, next.field(9, 38));
            record.comments.extend(next.comment_text());
            cursor = after;
        }

        Some((record, cursor))
    }

    /// True for a known NUCID and some identification text
    pub fn is_valid(&self) -> bool {
        self.nucid.is_some() && !self.dsid.is_empty()
    }

    /// The dataset text in upper case for classification
    pub fn dsid_upper(&self) -> String {
        self.dsid.to_uppercase()
    }
}

/// Columns 6 to 9 all blank with text after
fn is_identification(line: &str) -> bool {
    column(line, 6, 8) == "   "
        && !column(line, 9, 38).trim().is_empty()
        && Nucid::parse(nucid_text(line)).is_some()
}

/// Append continued identification text
fn join_dsid(dsid: &mut String, more: &str) {
    if more.is_empty() {
        return;
    }
    if !dsid.is_empty() && !dsid.ends_with(' ') {
        dsid.push(' ');
    }
    dsid.push_str(more);
}
