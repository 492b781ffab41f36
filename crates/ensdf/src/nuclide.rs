//! Nuclide identity and the fixed NUCID field

// nscheme modules
use nscheme_utils::f;

// internal modules
use crate::error::{Error, Result};
use crate::parsers::{mass_symbol, nucid_field, symbol_mass};

// external crates
use nom::branch::alt;
use nom::combinator::all_consuming;
use serde::Serialize;

/// Element symbols indexed by proton number, `n` for the free neutron
const SYMBOLS: [&str; 119] = [
    "n", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
    "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Element names indexed by proton number
const NAMES: [&str; 119] = [
    "Neutron", "Hydrogen", "Helium", "Lithium", "Beryllium", "Boron", "Carbon", "Nitrogen",
    "Oxygen", "Fluorine", "Neon", "Sodium", "Magnesium", "Aluminium", "Silicon", "Phosphorus",
    "Sulfur", "Chlorine", "Argon", "Potassium", "Calcium", "Scandium", "Titanium", "Vanadium",
    "Chromium", "Manganese", "Iron", "Cobalt", "Nickel", "Copper", "Zinc", "Gallium", "Germanium",
    "Arsenic", "Selenium", "Bromine", "Krypton", "Rubidium", "Strontium", "Yttrium", "Zirconium",
    "Niobium", "Molybdenum", "Technetium", "Ruthenium", "Rhodium", "Palladium", "Silver",
    "Cadmium", "Indium", "Tin", "Antimony", "Tellurium", "Iodine", "Xenon", "Caesium", "Barium",
    "Lanthanum", "Cerium", "Praseodymium", "Neodymium", "Promethium", "Samarium", "Europium",
    "Gadolinium", "Terbium", "Dysprosium", "Holmium", "Erbium", "Thulium", "Ytterbium",
    "Lutetium", "Hafnium", "Tantalum", "Tungsten", "Rhenium", "Osmium", "Iridium", "Platinum",
    "Gold", "Mercury", "Thallium", "Lead", "Bismuth", "Polonium", "Astatine", "Radon", "Francium",
    "Radium", "Actinium", "Thorium", "Protactinium", "Uranium", "Neptunium", "Plutonium",
    "Americium", "Curium", "Berkelium", "Californium", "Einsteinium", "Fermium", "Mendelevium",
    "Nobelium", "Lawrencium", "Rutherfordium", "Dubnium", "Seaborgium", "Bohrium", "Hassium",
    "Meitnerium", "Darmstadtium", "Roentgenium", "Copernicium", "Nihonium", "Flerovium",
    "Moscovium", "Livermorium", "Tennessine", "Oganesson",
];

/// Proton number for an element symbol, case insensitive
///
/// Also accepts `NN` for the neutron and the two digit numeric symbols
/// (`04` for Z=104) used for superheavy elements in older evaluations.
///
/// ```rust
/// # use nscheme_ensdf::proton_number;
/// assert_eq!(proton_number("GD"), Some(64));
/// assert_eq!(proton_number("og"), Some(118));
/// assert_eq!(proton_number("05"), Some(105));
/// assert_eq!(proton_number("XX"), None);
/// ```
pub fn proton_number(symbol: &str) -> Option<u16> {
    let symbol = symbol.trim();

    if !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_digit()) {
        return symbol.parse::<u16>().ok().map(|z| 100 + z);
    }

    if symbol.eq_ignore_ascii_case("NN") {
        return Some(0);
    }

    // skip the neutron so that "N" is nitrogen
    SYMBOLS
        .iter()
        .skip(1)
        .position(|s| s.eq_ignore_ascii_case(symbol))
        .map(|z| z as u16 + 1)
}

/// Element symbol for a proton number
pub fn element_symbol(z: u16) -> Option<&'static str> {
    SYMBOLS.get(z as usize).copied()
}

/// Element name for a proton number
pub fn element_name(z: u16) -> Option<&'static str> {
    NAMES.get(z as usize).copied()
}

/// Identity of a nuclide as proton and neutron numbers
///
/// Nuclides order by mass number first, then by neutron number, which is the
/// order ENSDF files list them within a mass chain.
///
/// The [FromStr](std::str::FromStr) implementation is permissive and accepts
/// the fixed 5-column NUCID as well as common free-form names.
///
/// ```rust
/// # use nscheme_ensdf::NuclideId;
/// # use std::str::FromStr;
/// let id = NuclideId::from_nucid("152GD").unwrap();
/// assert_eq!(id.z(), 64);
/// assert_eq!(id.a(), 152);
/// assert_eq!(id.nucid(), "152GD");
/// assert_eq!(id.to_string(), "152Gd");
///
/// assert_eq!(NuclideId::from_str("Gd-152").unwrap(), id);
/// assert_eq!(NuclideId::from_str("152gd").unwrap(), id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct NuclideId {
    z: u16,
    n: u16,
}

impl NuclideId {
    /// New identity from proton and neutron numbers
    pub fn new(z: u16, n: u16) -> Self {
        Self { z, n }
    }

    /// New identity from proton and mass numbers
    ///
    /// Returns `None` if the mass is smaller than the proton number.
    pub fn from_za(z: u16, a: u16) -> Option<Self> {
        a.checked_sub(z).map(|n| Self::new(z, n))
    }

    /// Parse the 5-column NUCID of a record, `AAAss`
    ///
    /// Mass-only identifiers such as `"152  "` are not nuclides, see
    /// [Nucid::parse] to handle both.
    pub fn from_nucid(field: &str) -> Option<Self> {
        match Nucid::parse(field)? {
            Nucid::Nuclide(id) => Some(id),
            Nucid::Mass(_) => None,
        }
    }

    /// Proton number
    pub fn z(&self) -> u16 {
        self.z
    }

    /// Neutron number
    pub fn n(&self) -> u16 {
        self.n
    }

    /// Mass number, saturating rather than wrapping for nonsense inputs
    pub fn a(&self) -> u16 {
        self.z.saturating_add(self.n)
    }

    /// True for anything with nucleons
    pub fn is_valid(&self) -> bool {
        self.a() != 0
    }

    /// Element symbol in the usual case, e.g. `Gd`
    pub fn symbol(&self) -> &'static str {
        element_symbol(self.z).unwrap_or("??")
    }

    /// Element name, e.g. `Gadolinium`
    pub fn element(&self) -> &'static str {
        element_name(self.z).unwrap_or("Unknown")
    }

    /// The 5-column NUCID field, e.g. `"152GD"` or `"  3H "`
    pub fn nucid(&self) -> String {
        let symbol = match self.z {
            0 => "NN".to_string(),
            z if z > 103 => f!("{:02}", z - 100),
            _ => self.symbol().to_uppercase(),
        };
        f!("{:>3}{:<2}", self.a(), symbol)
    }
}

impl PartialOrd for NuclideId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NuclideId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.a(), self.n).cmp(&(other.a(), other.n))
    }
}

impl std::str::FromStr for NuclideId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(id) = Self::from_nucid(s) {
            return Ok(id);
        }

        let (_, (mass, symbol)) = all_consuming(alt((mass_symbol, symbol_mass)))(s.trim())
            .map_err(|_| Error::InvalidNucid(s.to_string()))?;

        symbol
            .and_then(proton_number)
            .and_then(|z| Self::from_za(z, mass))
            .filter(|id| id.is_valid())
            .ok_or_else(|| Error::InvalidNucid(s.to_string()))
    }
}

impl std::fmt::Display for NuclideId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.a(), self.symbol())
    }
}

/// Contents of a NUCID field, either a nuclide or a whole mass chain
///
/// Mass chain records (`"152  "`) carry the references and general comments
/// for every nuclide of that mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Nucid {
    /// Mass number only
    Mass(u16),
    /// A specific nuclide
    Nuclide(NuclideId),
}

impl Nucid {
    /// Interpret a 5-column NUCID field
    ///
    /// ```rust
    /// # use nscheme_ensdf::{Nucid, NuclideId};
    /// assert_eq!(Nucid::parse("152  "), Some(Nucid::Mass(152)));
    /// assert_eq!(
    ///     Nucid::parse("152EU"),
    ///     Some(Nucid::Nuclide(NuclideId::new(63, 89)))
    /// );
    /// assert_eq!(Nucid::parse("ABCDE"), None);
    /// ```
    pub fn parse(field: &str) -> Option<Self> {
        let (_, (mass, symbol)) = nucid_field(field).ok()?;
        if mass == 0 {
            return None;
        }

        match symbol {
            None => Some(Nucid::Mass(mass)),
            Some(symbol) => {
                let z = proton_number(symbol)?;
                NuclideId::from_za(z, mass).map(Nucid::Nuclide)
            }
        }
    }

    /// Mass number of either variant
    pub fn mass(&self) -> u16 {
        match self {
            Nucid::Mass(a) => *a,
            Nucid::Nuclide(id) => id.a(),
        }
    }

    /// The nuclide, if this is not a mass chain identifier
    pub fn nuclide(&self) -> Option<NuclideId> {
        match self {
            Nucid::Nuclide(id) => Some(*id),
            Nucid::Mass(_) => None,
        }
    }
}

impl std::fmt::Display for Nucid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Nucid::Mass(a) => write!(f, "A={a}"),
            Nucid::Nuclide(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn nucid_round_trip() {
        for z in 0..=118u16 {
            for n in [0u16, 1, 7, 60, 170] {
                let id = NuclideId::new(z, n);
                if !id.is_valid() || id.a() > 999 {
                    continue;
                }
                assert_eq!(NuclideId::from_nucid(&id.nucid()), Some(id), "{id:?}");
            }
        }
    }

    #[test]
    fn mass_number_saturates() {
        let id = NuclideId::new(u16::MAX, 10);
        assert_eq!(id.a(), u16::MAX);
        assert!(id.is_valid());
    }

    #[test]
    fn fixed_width() {
        assert_eq!(NuclideId::new(1, 2).nucid(), "  3H ");
        assert_eq!(NuclideId::new(0, 1).nucid(), "  1NN");
        assert_eq!(NuclideId::new(104, 157).nucid(), "26104");
        assert_eq!(NuclideId::new(64, 88).nucid().len(), 5);
    }

    #[test]
    fn ordering() {
        let mut ids = vec![
            NuclideId::new(64, 88),
            NuclideId::new(62, 90),
            NuclideId::new(63, 88),
        ];
        ids.sort();
        assert_eq!(ids[0], NuclideId::new(63, 88));
        assert_eq!(ids[1], NuclideId::new(64, 88));
        assert_eq!(ids[2], NuclideId::new(62, 90));
    }

    #[test]
    fn free_form() {
        let cobalt = NuclideId::new(27, 33);
        for name in ["Co60", "co-60", "60Co", "60-CO", " 60CO"] {
            assert_eq!(NuclideId::from_str(name).unwrap(), cobalt);
        }
        assert!(NuclideId::from_str("Xx60").is_err());
        assert!(NuclideId::from_str("60").is_err());
    }

    #[test]
    fn names() {
        let id = NuclideId::new(63, 89);
        assert_eq!(id.symbol(), "Eu");
        assert_eq!(id.element(), "Europium");
        assert_eq!(Nucid::Nuclide(id).to_string(), "152Eu");
        assert_eq!(Nucid::Mass(152).to_string(), "A=152");

        // the free neutron is not nitrogen
        assert_eq!(NuclideId::new(0, 1).to_string(), "1n");
        assert_eq!(NuclideId::new(7, 7).to_string(), "14N");
    }
}
