use core::{error, fmt};

use crate::kernel::{ConfigError, ExecInvariantViolation};

/// Errors raised whilst running physoce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A config was rejected at construction time.
    Config(ConfigError),
    /// Execution was attempted with a violated kernel invariant.
    Exec(ExecInvariantViolation),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(err) => write!(f, "Invalid configuration: {err}"),
            Error::Exec(err) => write!(f, "Execution invariant violation: {err}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::Exec(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        Error::Config(value)
    }
}

impl From<ExecInvariantViolation> for Error {
    fn from(value: ExecInvariantViolation) -> Self {
        match value {
            ExecInvariantViolation::Config(err) => Error::Config(err),
            other => Error::Exec(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn exec_config_errors_flatten() {
        let err: Error = ExecInvariantViolation::Config(ConfigError::EmptyInput { arg: "x" }).into();
        assert_eq!(err, Error::Config(ConfigError::EmptyInput { arg: "x" }));
        assert!(err.source().is_some());
    }

    #[test]
    fn display_wraps_inner_message() {
        let err = Error::from(ConfigError::InvalidScaling { got: "psd".into() });
        assert!(err.to_string().contains("`psd`"));
    }
}
