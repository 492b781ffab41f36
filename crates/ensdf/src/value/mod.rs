//! Physical quantities decoded from ENSDF fields
//!
//! Everything numeric in the data model is an [UncertainValue], wrapped in a
//! type for what it measures.

mod energy;
mod halflife;
mod moment;
mod spin;
mod uncertain;

pub use energy::Energy;
pub use halflife::HalfLife;
pub use moment::Moment;
pub use spin::{Parity, Spin, SpinParity};
pub use uncertain::{SignInfo, UncertainValue, UncertaintyKind};

use serde::Serialize;

/// Reliability of a field as marked by the evaluator
///
/// ENSDF wraps tentative assignments in `()` and theoretical ones in `[]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Quality {
    /// Measured or firmly assigned
    #[default]
    Known,
    /// Tentative assignment, `(...)`
    Tentative,
    /// From theory or systematics, `[...]`
    Theoretical,
}

impl Quality {
    /// Remove the `()`/`[]` wrapping from a field and report what it meant
    ///
    /// A trailing `?` also marks a tentative value.
    ///
    /// ```rust
    /// # use nscheme_ensdf::Quality;
    /// assert_eq!(Quality::strip("(1.5)"), ("1.5", Quality::Tentative));
    /// assert_eq!(Quality::strip("[2]"), ("2", Quality::Theoretical));
    /// assert_eq!(Quality::strip("121.8?"), ("121.8", Quality::Tentative));
    /// assert_eq!(Quality::strip(" 3 "), ("3", Quality::Known));
    /// ```
    pub fn strip(text: &str) -> (&str, Quality) {
        let text = text.trim();

        if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            (inner.trim(), Quality::Tentative)
        } else if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            (inner.trim(), Quality::Theoretical)
        } else if let Some(inner) = text.strip_suffix('?') {
            (inner.trim(), Quality::Tentative)
        } else {
            (text, Quality::Known)
        }
    }
}
