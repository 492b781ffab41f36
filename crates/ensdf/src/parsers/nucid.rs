// internal modules
use crate::parsers::split_index;

// nom parser combinators
use nom::branch::alt;
use nom::character::complete::{alpha1, digit1, one_of, space0};
use nom::combinator::{all_consuming, opt};
use nom::IResult;

/// The fixed 5-column NUCID, `AAAss`, as mass and optional symbol text
///
/// The symbol may be the two-digit numeric form used for Z > 103 in older
/// evaluations, so the split is on columns rather than character classes.
pub(crate) fn nucid_field(i: &str) -> IResult<&str, (u16, Option<&str>)> {
    let (symbol, mass) = split_index(i, 3)?;
    let (_, mass) = all_consuming(padded_u16)(mass)?;
    let symbol = symbol.trim();

    match symbol.is_empty() {
        true => Ok(("", (mass, None))),
        false => {
            let (_, symbol) = all_consuming(alt((alpha1, digit1)))(symbol)?;
            Ok(("", (mass, Some(symbol))))
        }
    }
}

/// Free-form names with the mass first, e.g. `152Eu` or `152-eu`
pub(crate) fn mass_symbol(i: &str) -> IResult<&str, (u16, Option<&str>)> {
    let (i, mass) = padded_u16(i)?;
    let (i, _) = opt(one_of("-_"))(i)?;
    let (i, symbol) = opt(alpha1)(i)?;
    let (i, _) = space0(i)?;
    Ok((i, (mass, symbol)))
}

/// Free-form names with the symbol first, e.g. `Eu152` or `eu-152`
pub(crate) fn symbol_mass(i: &str) -> IResult<&str, (u16, Option<&str>)> {
    let (i, _) = space0(i)?;
    let (i, symbol) = alpha1(i)?;
    let (i, _) = opt(one_of("-_"))(i)?;
    let (i, mass) = padded_u16(i)?;
    Ok((i, (mass, Some(symbol))))
}

/// Unsigned integer with surrounding blanks
fn padded_u16(i: &str) -> IResult<&str, u16> {
    let (i, _) = space0(i)?;
    let (i, value) = nom::character::complete::u16(i)?;
    let (i, _) = space0(i)?;
    Ok((i, value))
}
