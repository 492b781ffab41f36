//! Assembled level schemes
//!
//! Levels and transitions are stored in maps inside their [Nuclide], keyed
//! by energy. Everything here is built fresh for each request.

mod level;
mod nuclide;
mod scheme;
mod transition;

pub use level::Level;
pub use nuclide::Nuclide;
pub use scheme::{DecayScheme, Normalization, NormalizationSource, SchemeInfo};
pub use transition::{Transition, TransitionKey};

// standard library
use std::collections::BTreeMap;

// external crates
use serde::{Serialize, Serializer};

/// Serialise a map as the sequence of its values
///
/// Energy keys are not strings, and each value carries its key anyway.
pub(crate) fn values<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    serializer.collect_seq(map.values())
}
