//! Error types shared by every serverless command

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ServerlessError>;

#[derive(Debug, Error)]
pub enum ServerlessError {
    /// Wrong number of positional arguments
    #[error("command is missing required arguments (expected {expected}, got {got})")]
    MissingArguments { expected: usize, got: usize },

    /// Language keyword matched no alias, or the host does not offer its runtime
    #[error("{0} is not a supported language")]
    UnsupportedLanguage(String),

    /// Target directory exists, is not empty, and overwrite was not requested
    #[error("{} already exists; use '--overwrite' to replace", .0.display())]
    PathConflict(PathBuf),

    /// A logic defect: something that construction guarantees was not there
    #[error("{0} (internal error)")]
    Internal(String),

    /// Failure reported by (or while running) the backend
    #[error("{0}")]
    Backend(String),

    /// Directory create, file write or file read failure
    #[error("{}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid project file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request to host failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid API host '{0}'")]
    InvalidHost(String),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl ServerlessError {
    /// Wrap an io error with the path it happened on
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Fail unless exactly one positional argument was given
pub fn ensure_one_arg(args: &[String]) -> Result<&str> {
    match args {
        [only] => Ok(only.as_str()),
        _ => Err(ServerlessError::MissingArguments {
            expected: 1,
            got: args.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_one_arg() {
        assert_eq!(ensure_one_arg(&["proj".to_string()]).unwrap(), "proj");
        assert!(matches!(
            ensure_one_arg(&[]),
            Err(ServerlessError::MissingArguments { expected: 1, got: 0 })
        ));
        assert!(matches!(
            ensure_one_arg(&["a".to_string(), "b".to_string()]),
            Err(ServerlessError::MissingArguments { got: 2, .. })
        ));
    }

    #[test]
    fn test_path_conflict_message_names_flag() {
        let err = ServerlessError::PathConflict(PathBuf::from("proj"));
        assert_eq!(err.to_string(), "proj already exists; use '--overwrite' to replace");
    }
}
