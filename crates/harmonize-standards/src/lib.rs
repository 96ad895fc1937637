#![deny(unsafe_code)]

pub mod error;
pub mod hash;
pub mod loader;
pub mod manifest;
pub mod paths;
pub mod registry;

pub use crate::error::StandardsError;
pub use crate::loader::load_vocabulary_csv;
pub use crate::paths::{STANDARDS_ENV_VAR, default_standards_root};
pub use crate::registry::{
    BuiltinVocabulary, VerifySummary, VocabularyRegistry, load_vocabulary, load_vocabulary_from,
};
