//! Result and Error types for the ENSDF module

/// Type alias for `Result<T, ensdf::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `nscheme-ensdf`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure to (de)serialise JSON
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Text that can not be interpreted as a nuclide identifier
    #[error("failed to infer a nuclide from \"{0}\"")]
    InvalidNucid(String),

    /// No `ensdf.<AAA>` file for the requested mass number
    #[error("no ENSDF data for mass number {0}")]
    MassNotAvailable(u16),

    /// The named dataset is not listed for the nuclide
    #[error("dataset \"{name}\" not found for {nuclide}")]
    DatasetNotFound { nuclide: String, name: String },

    /// Matching tolerances must be finite and non-negative percentages
    #[error("invalid tolerance {0}%")]
    InvalidTolerance(f64),
}
