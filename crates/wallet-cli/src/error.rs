use thiserror::Error;

/// Startup configuration errors. All of them are fatal: without a valid
/// identity no further stage is meaningful.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("{var} is malformed: {reason}")]
    Malformed { var: &'static str, reason: String },

    #[error("invalid keypair in PRIVATE_KEY: {0}")]
    InvalidKeypair(#[from] chain_sol::SolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing() {
        let err = ConfigError::Missing("PRIVATE_KEY");
        assert_eq!(err.to_string(), "environment variable PRIVATE_KEY is not set");
    }

    #[test]
    fn display_malformed() {
        let err = ConfigError::Malformed {
            var: "TRANSFER_AMOUNT_SOL",
            reason: "not a number".into(),
        };
        assert_eq!(err.to_string(), "TRANSFER_AMOUNT_SOL is malformed: not a number");
    }
}
