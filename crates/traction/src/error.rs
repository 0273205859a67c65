//! Error types for the traction engine.

use thiserror::Error;

/// Errors returned by the engine.
///
/// Every physics computation is total over validated inputs, so the only
/// failure the engine can report is an out-of-domain configuration value.
/// When it is returned, the previously accepted parameters and the kinematic
/// state are left untouched.
///
/// # Example
///
/// ```rust
/// use traction::{Error, Parameters};
///
/// let err = Parameters::new(0.0, 0.2, 10.0, 1.0).unwrap_err();
/// assert!(matches!(err, Error::InvalidParameter { name: "mass", .. }));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A physical parameter is outside its domain.
    ///
    /// Mass must be strictly positive; friction coefficient, applied force
    /// and force duration must be non-negative. All values must be finite.
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// A plot series name could not be parsed.
    #[error("unknown series: {0} (expected one of v, a, x, fnet)")]
    UnknownSeries(String),
}

/// A specialized [`Result`](std::result::Result) type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
