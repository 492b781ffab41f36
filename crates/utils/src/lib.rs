//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, optional fields in summaries, prettier formatting for
//! scientific numbers, or finding the closest key in an ordered map are
//! useful everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod nearest_ext;
mod option_ext;
mod value_ext;

// Flatten
pub use nearest_ext::NearestExt;
pub use option_ext::OptionExt;
pub use value_ext::ValueExt;
