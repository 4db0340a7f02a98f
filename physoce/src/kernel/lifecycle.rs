use super::ConfigError;

/// Constructor validation lifecycle shared by kernel structs.
pub trait KernelLifecycle: Sized {
    /// Kernel config type.
    type Config;

    /// Construct a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}

/// Reject a parameter that must be finite and strictly positive.
pub(crate) fn require_positive(arg: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidArgument {
            arg,
            reason: "must be finite and > 0",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_values_pass() {
        assert!(require_positive("ofac", 4.0).is_ok());
        assert!(require_positive("hifac", 1e-6).is_ok());
    }

    #[test]
    fn zero_negative_and_non_finite_fail() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                require_positive("ofac", bad),
                Err(ConfigError::InvalidArgument {
                    arg: "ofac",
                    reason: "must be finite and > 0",
                })
            );
        }
    }
}
