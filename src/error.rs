/// Error taxonomy for the transformation pipelines
///
/// Every failure is returned to the caller as soon as it is detected;
/// no step hands a partially transformed table downstream.
use std::fmt;

/// Broad class of an error, used when presenting it to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required column is absent or a rename would collide
    InputShape,
    /// A user-supplied option names something that does not exist
    Configuration,
    /// The greedy elimination loop cannot make progress
    Unreducible,
    /// Reading or writing files failed
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::InputShape => "input shape error",
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Unreducible => "unreducible table",
            ErrorKind::Io => "i/o error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("required column '{name}' is missing")]
    MissingColumn { name: String },

    #[error("column name '{name}' would appear more than once")]
    DuplicateColumn { name: String },

    #[error("column '{name}' has {found} rows but the table has {expected}")]
    RaggedTable { name: String, expected: usize, found: usize },

    #[error("{option} refers to column '{name}', which does not exist")]
    UnknownColumn { option: &'static str, name: String },

    #[error("no value for {0}: pass it on the command line or in the settings file")]
    MissingSetting(&'static str),

    #[error("invalid value for {option}: {reason}")]
    InvalidSetting { option: &'static str, reason: String },

    #[error("no further reduction possible: {remaining_rows} row(s) remain but no product column covers any of them")]
    Unreducible { remaining_rows: usize },

    #[error("failed to read settings file {path}: {reason}")]
    Settings { path: String, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingColumn { .. } | Error::DuplicateColumn { .. } | Error::RaggedTable { .. } => {
                ErrorKind::InputShape
            }
            Error::UnknownColumn { .. }
            | Error::MissingSetting(_)
            | Error::InvalidSetting { .. }
            | Error::Settings { .. } => ErrorKind::Configuration,
            Error::Unreducible { .. } => ErrorKind::Unreducible,
            Error::Csv(_) | Error::Io(_) | Error::Json(_) => ErrorKind::Io,
        }
    }

    /// Re-tag a missing column as a bad user option
    ///
    /// Table lookups report `MissingColumn`; when the name came from the user
    /// the failure is a configuration problem instead.
    pub fn for_option(self, option: &'static str) -> Self {
        match self {
            Error::MissingColumn { name } => Error::UnknownColumn { option, name },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_grouping() {
        assert_eq!(Error::MissingColumn { name: "Conn".into() }.kind(), ErrorKind::InputShape);
        assert_eq!(Error::DuplicateColumn { name: "A**".into() }.kind(), ErrorKind::InputShape);
        assert_eq!(Error::Unreducible { remaining_rows: 2 }.kind(), ErrorKind::Unreducible);
        assert_eq!(Error::MissingSetting("--symbol").kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_for_option_retags_missing_column() {
        let err = Error::MissingColumn { name: "Branch".into() }.for_option("--branch-column");
        match err {
            Error::UnknownColumn { option, name } => {
                assert_eq!(option, "--branch-column");
                assert_eq!(name, "Branch");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_for_option_keeps_other_errors() {
        let err = Error::Unreducible { remaining_rows: 1 }.for_option("--branch-column");
        assert_eq!(err.kind(), ErrorKind::Unreducible);
    }

    #[test]
    fn test_unreducible_message() {
        let msg = Error::Unreducible { remaining_rows: 3 }.to_string();
        assert!(msg.starts_with("no further reduction possible"));
        assert!(msg.contains("3 row(s)"));
    }
}
