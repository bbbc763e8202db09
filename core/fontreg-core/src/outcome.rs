//! Per-font outcomes and failures (made by FontLab https://www.fontlab.com/)

use std::fmt;
use std::io;

use thiserror::Error;

/// Why a single install or uninstall failed. Never fatal to a batch.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("could not copy {file} into the fonts directory: {source}")]
    Copy {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("could not delete {file}: {source}")]
    Delete {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("access denied while deleting {file}: {source}")]
    AccessDenied {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("could not register '{display_name}': {reason:#}")]
    Register {
        display_name: String,
        reason: anyhow::Error,
    },

    #[error("could not remove registration records for {file}: {reason:#}")]
    Unregister { file: String, reason: anyhow::Error },
}

impl FontError {
    /// Split a delete failure into the access-denied case and everything else.
    pub fn from_delete(file: &str, source: io::Error) -> Self {
        let file = file.to_string();
        if source.kind() == io::ErrorKind::PermissionDenied {
            FontError::AccessDenied { file, source }
        } else {
            FontError::Delete { file, source }
        }
    }
}

/// Result of one install or uninstall attempt.
#[derive(Debug)]
pub enum Outcome {
    Installed { display_name: String },
    Uninstalled { removed_records: usize },
    SkippedAlreadyExists,
    SkippedNotFound,
    SkippedMalformedPath,
    Failed(FontError),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Outcome::SkippedAlreadyExists | Outcome::SkippedNotFound | Outcome::SkippedMalformedPath
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Installed { display_name } => write!(f, "installed as '{display_name}'"),
            Outcome::Uninstalled { removed_records } => {
                write!(f, "uninstalled ({removed_records} record(s) removed)")
            }
            Outcome::SkippedAlreadyExists => f.write_str("skipped, already installed"),
            Outcome::SkippedNotFound => f.write_str("skipped, file not found"),
            Outcome::SkippedMalformedPath => f.write_str("skipped, malformed path"),
            Outcome::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}
