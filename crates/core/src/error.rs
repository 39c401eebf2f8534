use crate::OsId;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, XcsimError>;

#[derive(Debug, thiserror::Error)]
pub enum XcsimError {
    /// Descriptor missing, unreadable or without a `DefaultDevices` dictionary.
    #[error("simulator device set not found at {}: {reason}", .path.display())]
    ConfigNotFound { path: PathBuf, reason: String },

    #[error("invalid pattern '{pattern}': expected '<os>', '<device>' or '<os>, <device>'")]
    InvalidPattern { pattern: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("unknown OS '{name}'")]
    OsNotFound { name: String },

    #[error("unknown device '{name}' for {os}")]
    DeviceNotFound { os: OsId, name: String },

    #[error("no bundle matching '{bundle_id}' installed on {device} ({os})")]
    BundleNotFound {
        os: OsId,
        device: String,
        bundle_id: String,
    },

    #[error("multiple bundles matching '{bundle_id}' on {device}: {}", .matches.join(", "))]
    AmbiguousBundleId {
        device: String,
        bundle_id: String,
        matches: Vec<String>,
    },

    /// More than one container on disk claims the same bundle identifier.
    #[error(
        "multiple directories claim bundle '{bundle_id}' on {device}: {}",
        display_paths(.directories)
    )]
    AmbiguousBundleData {
        device: String,
        bundle_id: String,
        directories: Vec<PathBuf>,
    },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode metadata {}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: plist::Error,
    },
}

impl XcsimError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::OsNotFound { .. } | Self::DeviceNotFound { .. } | Self::BundleNotFound { .. } => 1,
            Self::InvalidPattern { .. } | Self::InvalidArgument { .. } => 2,
            Self::AmbiguousBundleId { .. } | Self::AmbiguousBundleData { .. } => 3,
            Self::ConfigNotFound { .. } | Self::Io { .. } | Self::Metadata { .. } => 4,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
