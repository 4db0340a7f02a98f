use core::fmt;

/// Validation errors raised at kernel construction or adapter binding time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required input or configuration field is empty.
    EmptyInput {
        /// Name of the argument that is empty.
        arg: &'static str,
    },
    /// A configuration argument value is invalid.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
    /// A contiguous 1D slice view could not be obtained.
    NonContiguous {
        /// Name of the argument that is non-contiguous.
        arg: &'static str,
    },
    /// Output/input lengths did not match required shape.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// Periodogram scaling was neither `classical` nor `density`.
    InvalidScaling {
        /// The rejected scaling name.
        got: String,
    },
    /// Window name not known to the window provider.
    UnknownWindow {
        /// The rejected window name.
        name: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyInput { arg } => write!(f, "Input `{arg}` was empty."),
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            ConfigError::NonContiguous { arg } => {
                write!(f, "Argument `{arg}` is not contiguous in memory.")
            }
            ConfigError::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            ConfigError::InvalidScaling { got } => write!(
                f,
                "Scaling argument `{got}` not understood. Acceptable options are classical or density."
            ),
            ConfigError::UnknownWindow { name } => write!(f, "Unknown window `{name}`."),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime execution invariant violations for checked kernel entrypoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecInvariantViolation {
    /// An execution precondition was violated.
    InvalidState {
        /// Human readable reason.
        reason: &'static str,
    },
    /// Output length mismatched the expected runtime shape.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// Adapter binding/configuration failure.
    Config(ConfigError),
}

impl From<ConfigError> for ExecInvariantViolation {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl fmt::Display for ExecInvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecInvariantViolation::InvalidState { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
            ExecInvariantViolation::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Execution length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            ExecInvariantViolation::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ExecInvariantViolation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecInvariantViolation::Config(err) => Some(err),
            _ => None,
        }
    }
}

/// Ensure a caller-provided output buffer has the runtime length.
pub(crate) fn check_len(
    arg: &'static str,
    expected: usize,
    got: usize,
) -> Result<(), ExecInvariantViolation> {
    if expected != got {
        return Err(ExecInvariantViolation::LengthMismatch { arg, expected, got });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_scaling_message_names_the_options() {
        let err = ConfigError::InvalidScaling {
            got: "bogus".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bogus"));
        assert!(msg.contains("classical"));
        assert!(msg.contains("density"));
    }

    #[test]
    fn config_errors_surface_as_exec_source() {
        use std::error::Error;

        let err = ExecInvariantViolation::from(ConfigError::NonContiguous { arg: "x" });
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Argument `x` is not contiguous in memory.");
    }

    #[test]
    fn check_len_reports_expected_and_got() {
        assert!(check_len("pxx", 4, 4).is_ok());
        assert_eq!(
            check_len("pxx", 4, 3),
            Err(ExecInvariantViolation::LengthMismatch {
                arg: "pxx",
                expected: 4,
                got: 3,
            })
        );
    }
}
