// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while1};
use nom::character::complete::{space0, space1};
use nom::combinator::rest;
use nom::sequence::delimited;
use nom::IResult;

/// One `KEY=value` entry of a continuation record, as `(key, relation, value)`
///
/// The relation is the operator as written, `=`, `<`, `LT`, `AP` etc.
pub(crate) fn continuation_field(i: &str) -> IResult<&str, (&str, &str, &str)> {
    let (i, _) = space0(i)?;
    let (i, key) = take_while1(|c: char| !"=<> ".contains(c))(i)?;
    let (i, relation) = relation(i)?;
    let (i, value) = rest(i)?;
    Ok((i, (key, relation, value.trim())))
}

/// Operators allowed between a key and its value
fn relation(i: &str) -> IResult<&str, &str> {
    alt((
        delimited(space0, alt((tag("<="), tag(">="), tag("="), tag("<"), tag(">"))), space0),
        delimited(
            space1,
            alt((
                tag_no_case("LT"),
                tag_no_case("GT"),
                tag_no_case("LE"),
                tag_no_case("GE"),
                tag_no_case("AP"),
                tag_no_case("CA"),
                tag_no_case("SY"),
            )),
            space1,
        ),
    ))(i)
}
