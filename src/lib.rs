//! `nscheme` is a small toolkit of fast and permissive readers for evaluated
//! nuclear decay schemes
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use nscheme_utils as utils;

#[cfg(feature = "ensdf")]
#[cfg_attr(docsrs, doc(cfg(feature = "ensdf")))]
#[doc(inline)]
pub use nscheme_ensdf as ensdf;
