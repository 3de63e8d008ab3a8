use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("No stored match with id {id}")]
    NotFound { id: String },

    #[error("Invalid match id: {id:?}")]
    InvalidId { id: String },
}

impl SaveError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        SaveError::Io { path: path.display().to_string(), source }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            SaveError::Io { .. } => true,
            SaveError::FileNotFound { .. } => true,
            SaveError::NotFound { .. } => true,
            SaveError::InvalidId { .. } => false,
            SaveError::Serialization(_) => false,
            SaveError::VersionMismatch { .. } => false,
        }
    }
}
