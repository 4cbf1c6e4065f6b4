//! Error types for partition refinement.

use tpart_config::ConfigError;

/// Errors detected while setting up or verifying a refinement run.
///
/// Refinement itself has no recoverable failures: an illegal candidate move
/// is simply excluded, and a pass always completes.
#[derive(Debug, thiserror::Error)]
pub enum RefineError {
    /// The configuration failed graph-independent validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configuration does not fit the hypergraph it is applied to.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The incremental state disagrees with a recount from the partition.
    #[error("inconsistent refinement state: {0}")]
    InconsistentState(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_configuration() {
        let err = RefineError::InvalidConfiguration("2 hyperedge factors".into());
        assert_eq!(format!("{err}"), "invalid configuration: 2 hyperedge factors");
    }

    #[test]
    fn config_error_is_transparent() {
        let err: RefineError = ConfigError::ValidationError("bad".into()).into();
        assert_eq!(format!("{err}"), "validation error: bad");
    }
}
