// nom parser combinators
use nom::bytes::complete::take_till;
use nom::character::complete::{char, none_of, space0};
use nom::combinator::{all_consuming, opt};
use nom::multi::many1;
use nom::sequence::delimited;
use nom::IResult;

/// Which datasets an adopted level applies to, from its `XREF=` field
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Xref {
    /// `+`, seen in every dataset
    All,
    /// `-(AB)`, seen in every dataset except those listed
    AllExcept(Vec<char>),
    /// `ABC(1234.5)`, only the listed datasets, some with their own energy
    Only(Vec<(char, Option<String>)>),
}

impl Xref {
    /// Interpret the value of an `XREF=` continuation field
    ///
    /// Anything unreadable applies to all datasets rather than none.
    pub(crate) fn parse(text: &str) -> Self {
        all_consuming(xref)(text.trim())
            .map(|(_, x)| x)
            .unwrap_or(Xref::All)
    }

    /// True if the dataset with symbol `s` should see the level
    pub(crate) fn includes(&self, s: char) -> bool {
        match self {
            Xref::All => true,
            Xref::AllExcept(excluded) => !excluded.contains(&s),
            Xref::Only(listed) => listed.iter().any(|(symbol, _)| *symbol == s),
        }
    }

    /// The per-dataset energy annotation for symbol `s`, if written
    pub(crate) fn offset(&self, s: char) -> Option<&str> {
        match self {
            Xref::Only(listed) => listed
                .iter()
                .find(|(symbol, _)| *symbol == s)
                .and_then(|(_, energy)| energy.as_deref()),
            _ => None,
        }
    }
}

fn xref(i: &str) -> IResult<&str, Xref> {
    if i == "+" {
        return Ok(("", Xref::All));
    }

    if let Some(i) = i.strip_prefix('-') {
        let (i, _) = space0(i)?;
        let (i, list) = delimited(char('('), take_till(|c| c == ')'), char(')'))(i)?;
        let symbols = list.chars().filter(|c| !c.is_whitespace()).collect();
        return Ok((i, Xref::AllExcept(symbols)));
    }

    let (i, listed) = many1(symbol_with_energy)(i)?;
    Ok((i, Xref::Only(listed)))
}

/// A dataset symbol, optionally followed by `(energy)`
fn symbol_with_energy(i: &str) -> IResult<&str, (char, Option<String>)> {
    let (i, symbol) = none_of("() ,$")(i)?;
    let (i, energy) = opt(delimited(char('('), take_till(|c| c == ')'), char(')')))(i)?;
    Ok((i, (symbol, energy.map(|e| e.trim().to_string()))))
}
