#![deny(unsafe_code)]

use std::path::PathBuf;

use harmonize_model::HarmonizeError;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("duplicate vocabulary in manifest: {vocabulary}")]
    DuplicateVocabulary { vocabulary: String },

    #[error("invalid sha256 for {path}: {message}")]
    InvalidSha256 { path: PathBuf, message: String },

    #[error("invalid manifest path {path}: {message}")]
    InvalidPath { path: PathBuf, message: String },

    #[error("missing file listed in manifest: {path}")]
    MissingFile { path: PathBuf },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("the {name} vocabulary is not supported. Supported vocabularies are: {}", .supported.join(", "))]
    UnsupportedVocabulary { name: String, supported: Vec<String> },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: &csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: source.to_string(),
        }
    }
}

impl From<StandardsError> for HarmonizeError {
    fn from(error: StandardsError) -> Self {
        match error {
            StandardsError::UnsupportedVocabulary { name, supported } => {
                HarmonizeError::UnsupportedVocabulary { name, supported }
            }
            other => HarmonizeError::Standards {
                source: Box::new(other),
            },
        }
    }
}
