use core::{error, fmt};

/// Errors raised by the numeric helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Argument passed into a function was invalid.
    InvalidArg {
        /// The invalid arg
        arg: String,
        /// Explaining why arg is invalid.
        reason: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
        }
    }
}

impl error::Error for Error {}

/// Result alias for numeric helpers.
pub type Result<T> = core::result::Result<T, Error>;
