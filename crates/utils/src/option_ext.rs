use crate::f;

/// Extends Option for summary tables
pub trait OptionExt {
    /// The contained value, or "none"
    ///
    /// ```rust
    /// # use nscheme_utils::OptionExt;
    /// assert_eq!(Some(2).display(), "2");
    /// assert_eq!(None::<u32>.display(), "none");
    /// ```
    fn display(&self) -> String;

    /// The contained value followed by a unit, or just "none"
    ///
    /// ```rust
    /// # use nscheme_utils::OptionExt;
    /// assert_eq!(Some(12.5).display_unit("%"), "12.5 %");
    /// assert_eq!(None::<f64>.display_unit("%"), "none");
    /// ```
    fn display_unit(&self, unit: &str) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display(&self) -> String {
        self.display_unit("")
    }

    fn display_unit(&self, unit: &str) -> String {
        match (self, unit.is_empty()) {
            (Some(value), true) => f!("{value}"),
            (Some(value), false) => f!("{value} {unit}"),
            (None, _) => "none".to_string(),
        }
    }
}
