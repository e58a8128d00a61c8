use cograph_core::ErrorCode;

/// Failures of the centrality engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CentralityError {
    /// Power iteration did not settle within the iteration bound.
    #[error(
        "eigenvector centrality failed to converge in {max_iter} iterations ({node_count} nodes)"
    )]
    NonConvergence { node_count: usize, max_iter: usize },

    /// Power-iteration bounds that cannot produce a result.
    #[error("invalid eigenvector settings: {0}")]
    InvalidSettings(String),
}

impl CentralityError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NonConvergence { .. } => ErrorCode::NonConvergence,
            Self::InvalidSettings(_) => ErrorCode::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_convergence_reports_bounds() {
        let err = CentralityError::NonConvergence {
            node_count: 4,
            max_iter: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("1 iterations"));
        assert!(msg.contains("4 nodes"));
        assert_eq!(err.code().code(), "E3001");
    }

    #[test]
    fn invalid_settings_is_invalid_argument() {
        let err = CentralityError::InvalidSettings("max_iter must be > 0".into());
        assert_eq!(err.code().code(), "E1002");
    }
}
