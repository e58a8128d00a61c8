use std::fmt;
use std::io;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidArgument,
    MissingColumn,
    UnsupportedFormat,
    InvalidLabel,
    RecognizerFailed,
    NonConvergence,
    IoFailure,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidArgument => "E1002",
            Self::MissingColumn => "E1003",
            Self::UnsupportedFormat => "E1004",
            Self::InvalidLabel => "E1005",
            Self::RecognizerFailed => "E2001",
            Self::NonConvergence => "E3001",
            Self::IoFailure => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidArgument => "Invalid argument",
            Self::MissingColumn => "Required column missing from input",
            Self::UnsupportedFormat => "Unsupported input format",
            Self::InvalidLabel => "Invalid entity label",
            Self::RecognizerFailed => "Entity recognizer failed",
            Self::NonConvergence => "Eigenvector centrality did not converge",
            Self::IoFailure => "I/O failure",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in cograph.toml and retry."),
            Self::InvalidArgument => {
                Some("Thresholds must be >= 0, eigenvector bounds > 0, edge weights > 0.")
            }
            Self::MissingColumn => Some("Pass --column with the header that holds the text."),
            Self::UnsupportedFormat => {
                Some("Provide a .csv or .txt file (or a directory of them).")
            }
            Self::InvalidLabel => Some("Use a category label such as PERSON, ORG or DATE."),
            Self::RecognizerFailed => None,
            Self::NonConvergence => {
                Some("Raise eigenvector.max_iter or loosen eigenvector.tolerance in cograph.toml.")
            }
            Self::IoFailure => Some("Check that the path exists and is readable/writable."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by the aggregation pipeline and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller broke an input contract (negative threshold, malformed edge record).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The declared text/edge column is absent from the input header.
    #[error("column `{column}` not found in {source_name} (available: {available})")]
    MissingColumn {
        column: String,
        source_name: String,
        available: String,
    },

    /// Input file extension is neither `.csv` nor `.txt`.
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Entity category label is empty or not textual.
    #[error("invalid entity label: {0:?}")]
    InvalidLabel(String),

    /// The entity recognizer could not process a document.
    #[error("entity recognizer failed: {0}")]
    Recognizer(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Map this error onto its stable [`ErrorCode`].
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::MissingColumn { .. } => ErrorCode::MissingColumn,
            Self::UnsupportedFormat(_) => ErrorCode::UnsupportedFormat,
            Self::InvalidLabel(_) => ErrorCode::InvalidLabel,
            Self::Recognizer(_) => ErrorCode::RecognizerFailed,
            Self::Io(_) | Self::Csv(_) => ErrorCode::IoFailure,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::InvalidArgument,
            ErrorCode::MissingColumn,
            ErrorCode::UnsupportedFormat,
            ErrorCode::InvalidLabel,
            ErrorCode::RecognizerFailed,
            ErrorCode::NonConvergence,
            ErrorCode::IoFailure,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::MissingColumn.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn errors_map_to_codes() {
        assert_eq!(
            Error::invalid("threshold -1").code(),
            ErrorCode::InvalidArgument
        );
        let missing = Error::MissingColumn {
            column: "text".into(),
            source_name: "data.csv".into(),
            available: "id, body".into(),
        };
        assert_eq!(missing.code(), ErrorCode::MissingColumn);
        assert!(missing.to_string().contains("`text`"));
    }
}
