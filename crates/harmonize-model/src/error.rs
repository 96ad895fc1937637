use std::error::Error as StdError;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors raised while building or applying a harmonization plan.
#[derive(Debug, Error)]
pub enum HarmonizeError {
    /// A column or value matching method name is not registered.
    #[error("the {name} {kind} method is not supported. Supported methods are: {}", .supported.join(", "))]
    UnsupportedMethod {
        kind: &'static str,
        name: String,
        supported: Vec<String>,
    },

    /// A reference vocabulary identifier is not known.
    #[error("the {name} vocabulary is not supported. Supported vocabularies are: {}", .supported.join(", "))]
    UnsupportedVocabulary { name: String, supported: Vec<String> },

    /// A mapping record lacks `source` or `target`.
    #[error("invalid mapping specification: {message}")]
    InvalidMappingSpecification { message: String },

    /// The same `(source, target)` pair appears twice in one input list.
    #[error("duplicate mapping for source: {source_column}, target: {target_column}")]
    DuplicateMapping {
        source_column: String,
        target_column: String,
    },

    /// Mapper input matches none of the accepted shapes.
    #[error("failed to create a value mapper for given input: {input}")]
    UnresolvableMapper { input: String },

    /// A tuple-form match entry is not a pair of strings.
    #[error("match entries must be (source_value, target_value) string pairs, got: {entry}")]
    InvalidMatchEntry { entry: String },

    /// A plan references a column the input table does not have.
    #[error("source column not found in input table: {column}")]
    MissingSourceColumn { column: String },

    /// A pluggable matching strategy failed.
    #[error("{method} strategy failed: {source}")]
    Strategy {
        method: String,
        #[source]
        source: BoxError,
    },

    /// Reference data could not be read or verified.
    #[error("standards error: {source}")]
    Standards {
        #[source]
        source: BoxError,
    },

    /// The tabular engine rejected an operation.
    #[error("table error: {source}")]
    Frame {
        #[source]
        source: BoxError,
    },
}

impl HarmonizeError {
    pub fn strategy(method: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Strategy {
            method: method.into(),
            source: source.into(),
        }
    }

    pub fn frame(source: impl Into<BoxError>) -> Self {
        Self::Frame {
            source: source.into(),
        }
    }

    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidMappingSpecification {
            message: message.into(),
        }
    }

    pub fn duplicate(source_column: &str, target_column: &str) -> Self {
        Self::DuplicateMapping {
            source_column: source_column.to_string(),
            target_column: target_column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarmonizeError>;
