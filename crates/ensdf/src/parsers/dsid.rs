// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_till, take_till1};
use nom::character::complete::{alpha1, char, digit1, space0, space1};
use nom::combinator::{opt, recognize};
use nom::multi::separated_list1;
use nom::sequence::{delimited, pair, tuple};
use nom::IResult;

/// Pieces of a decay dataset identifier, `152EU B- DECAY (13.517 Y)`
#[derive(Debug, PartialEq)]
pub(crate) struct DecayDsid<'a> {
    pub parents: Vec<&'a str>,
    pub mode: &'a str,
    pub half_life: Option<&'a str>,
}

/// Pieces of a single reaction, `152SM(N,G)`
#[derive(Debug, PartialEq)]
pub(crate) struct ReactionDsid<'a> {
    pub target: Option<&'a str>,
    pub incoming: &'a str,
    pub outgoing: &'a str,
}

/// Decay grammar, `<parents> <MODE> DECAY [(half-life)]`
pub(crate) fn decay_dsid(i: &str) -> IResult<&str, DecayDsid> {
    let (i, _) = space0(i)?;
    let (i, parents) = separated_list1(char(','), parent_nucid)(i)?;
    let (i, _) = space1(i)?;
    let (i, mode) = decay_mode(i)?;
    let (i, _) = space1(i)?;
    let (i, _) = tag_no_case("DECAY")(i)?;
    let (i, _) = space0(i)?;
    let (i, half_life) = opt(delimited(char('('), take_till(|c| c == ')'), char(')')))(i)?;

    // several half-lives may be quoted for multiple parents, keep the first
    let half_life = half_life
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|h| !h.is_empty());

    Ok((
        i,
        DecayDsid {
            parents,
            mode,
            half_life,
        },
    ))
}

/// Reaction grammar, `target(in,out)[,target(in,out)]*`, leaving qualifiers
pub(crate) fn reaction_list(i: &str) -> IResult<&str, Vec<ReactionDsid>> {
    let (i, _) = space0(i)?;
    separated_list1(tuple((space0, char(','), space0)), reaction)(i)
}

/// A single `target(in,out)` reaction
fn reaction(i: &str) -> IResult<&str, ReactionDsid> {
    let (i, target) = opt(parent_nucid)(i)?;
    let (i, _) = char('(')(i)?;
    let (i, incoming) = take_till1(|c| c == ',' || c == ')')(i)?;
    let (i, _) = char(',')(i)?;
    let (i, outgoing) = take_till(|c| c == ')')(i)?;
    let (i, _) = char(')')(i)?;

    Ok((
        i,
        ReactionDsid {
            target,
            incoming: incoming.trim(),
            outgoing: outgoing.trim(),
        },
    ))
}

/// Nuclide written as mass then symbol, e.g. `152EU`
fn parent_nucid(i: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, alpha1))(i)
}

/// One of the recognised decay modes
fn decay_mode(i: &str) -> IResult<&str, &str> {
    alt((
        tag("B-"),
        tag("B+"),
        tag_no_case("EC"),
        tag_no_case("IT"),
        tag_no_case("A"),
    ))(i)
}
