// All nom parsers split amoung files for organisation
mod dsid;
mod fields;
mod nucid;
mod number;
mod value;
mod xref;

// Internal re-exports for convenience
pub(crate) use dsid::*;
pub(crate) use fields::*;
pub(crate) use nucid::*;
pub(crate) use number::*;
pub(crate) use value::*;
pub(crate) use xref::*;

// Public decoders re-exported at the crate root
pub use value::{decode_value_uncertainty, decode_with_quality};

use nom::error::{Error, ErrorKind};

/// Split a string slice at a specific index
pub(in crate::parsers) fn split_index(i: &str, n: usize) -> nom::IResult<&str, &str> {
    match (i.get(..n), i.get(n..)) {
        (Some(head), Some(tail)) => Ok((tail, head)),
        _ => Err(cause(i)),
    }
}

/// More convenient error creation for nom
pub(in crate::parsers) fn cause(s: &str) -> nom::Err<Error<&str>> {
    nom::Err::Error(Error::new(s, ErrorKind::Fail))
}

/// Fixed columns `start..=end` (0-based) of an 80-column record
///
/// Lines are blank padded in the format, so columns past the end of a short
/// line are simply empty. Text that is not ASCII can not be split on columns
/// reliably and gives an empty field.
pub(crate) fn column(line: &str, start: usize, end: usize) -> &str {
    let end = (end + 1).min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}

/// Same as [column] but trimmed of padding
pub(crate) fn trimmed(line: &str, start: usize, end: usize) -> &str {
    column(line, start, end).trim()
}
