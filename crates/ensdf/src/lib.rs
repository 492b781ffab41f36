//! Read nuclear decay schemes from ENSDF mass chain files
//!
//! The Evaluated Nuclear Structure Data File is a fixed-column, 80 character
//! text format split into one file per mass number (`ensdf.152` etc.). This
//! crate turns those files into level schemes: nuclides with their energy
//! levels and the transitions between them, every number carrying its
//! uncertainty.
//!
//! Reading is deliberately permissive. Fields that can not be decoded become
//! undefined values, records that do not fit are skipped, and anything that
//! was recovered from is reported as a [Diagnostic] rather than an error.
//!
//! ## Implementation
//!
//! A file is handled in a few stages:
//!
//! - Split into datasets at blank lines and classify each one from its
//!   identification record ([BlockKind])
//! - Decode the records of a dataset on request ([Record])
//! - Index the adopted levels of the daughter by the dataset's cross-reference
//!   symbol ([AdoptedLevels])
//! - Walk the decay or reaction dataset, completing levels and gammas from the
//!   adopted data, and normalise intensities ([DecayScheme])
//!
//! A single file is read with an [EnsdfParser]. A whole directory of files is
//! best used through an [EnsdfSource], which caches parsers as they are
//! needed.
//!
//! ```rust, no_run
//! # use nscheme_ensdf::{EnsdfSource, NuclideId};
//! let source = EnsdfSource::new("path/to/ensdf").unwrap();
//! let gd152: NuclideId = "152Gd".parse().unwrap();
//!
//! let scheme = source.decay(gd152, "152EU B- DECAY (13.517 Y)").unwrap();
//! println!("{scheme}");
//! ```
//!
//! gives a summary of the assembled scheme
//!
//! ```text
//! Decay scheme
//!   Name             152EU B- DECAY (13.517 Y)
//!   Parent           152Eu
//!   Daughter         152Gd
//!   Mode             β-
//!   Half life        13.517(14) y
//!   Ground state     1.08(8)e14 y
//!   Levels           27
//!   Transitions      60
//!   Decay factor     0.2792
//!   Gamma factor     0.2792
//!   Diagnostics      3
//! ```
//!
//! Everything in the model serialises with `serde`, and
//! [DecayScheme::to_json] gives the whole scheme as pretty JSON.

// Modules
mod adopted;
mod assemble;
mod block;
mod diagnostics;
mod error;
mod model;
mod nuclide;
mod options;
mod parser;
mod parsers;
mod source;
mod value;

pub mod record;

// Re-exports of anything important with in-lined documentation for simplicity
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use diagnostics::{Diagnostic, Diagnostics, Severity};

#[doc(inline)]
pub use value::{
    Energy, HalfLife, Moment, Parity, Quality, SignInfo, Spin, SpinParity, UncertainValue,
    UncertaintyKind,
};

#[doc(inline)]
pub use parsers::{decode_value_uncertainty, decode_with_quality};

#[doc(inline)]
pub use nuclide::{element_name, element_symbol, proton_number, Nucid, NuclideId};

#[doc(inline)]
pub use record::{ContinuationFields, Record};

#[doc(inline)]
pub use block::{
    read_blocks, segment, Block, BlockKind, DecayInfo, DecayMode, Reaction, ReactionInfo,
};

#[doc(inline)]
pub use adopted::{AdoptedLevel, AdoptedLevels};

#[doc(inline)]
pub use model::{
    DecayScheme, Level, Normalization, NormalizationSource, Nuclide, SchemeInfo, Transition,
    TransitionKey,
};

#[doc(inline)]
pub use options::{SchemeOptions, SourceConfig};

#[doc(inline)]
pub use parser::EnsdfParser;

#[doc(inline)]
pub use source::{list_masses, EnsdfSource};
