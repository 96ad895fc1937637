#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use harmonize_model::Vocabulary;

use crate::error::StandardsError;
use crate::hash::sha256_hex;
use crate::loader::load_vocabulary_csv;
use crate::manifest::{MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION, Manifest, ManifestFile};
use crate::paths::default_standards_root;

const ALLOWED_KINDS: &[&str] = &["csv"];

/// Vocabularies shipped with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinVocabulary {
    Gdc,
}

impl BuiltinVocabulary {
    pub const ALL: &'static [BuiltinVocabulary] = &[BuiltinVocabulary::Gdc];

    pub fn id(self) -> &'static str {
        match self {
            BuiltinVocabulary::Gdc => "gdc",
        }
    }

    pub fn supported_ids() -> Vec<String> {
        Self::ALL.iter().map(|v| v.id().to_string()).collect()
    }

    /// Case-sensitive lookup by identifier.
    pub fn from_id(id: &str) -> Result<Self, StandardsError> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.id() == id)
            .ok_or_else(|| StandardsError::UnsupportedVocabulary {
                name: id.to_string(),
                supported: Self::supported_ids(),
            })
    }
}

impl fmt::Display for BuiltinVocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifySummary {
    pub standards_dir: PathBuf,
    pub file_count: usize,
    pub vocabulary_count: usize,
    pub column_count: usize,
    pub value_count: usize,
}

/// All vocabularies listed in a verified standards directory.
#[derive(Debug, Clone)]
pub struct VocabularyRegistry {
    pub manifest: Manifest,
    pub vocabularies: BTreeMap<String, Vocabulary>,
}

impl VocabularyRegistry {
    pub fn verify_and_load(standards_dir: &Path) -> Result<(Self, VerifySummary), StandardsError> {
        let manifest = load_manifest(&standards_dir.join("manifest.toml"))?;
        validate_manifest(&manifest, standards_dir)?;

        let mut files = manifest.files.clone();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let mut vocabularies = BTreeMap::new();
        for file in &files {
            verify_file(standards_dir, file)?;
            let vocabulary = load_file(standards_dir, file)?;
            vocabularies.insert(file.vocabulary.clone(), vocabulary);
        }

        let summary = VerifySummary {
            standards_dir: standards_dir.to_path_buf(),
            file_count: files.len(),
            vocabulary_count: vocabularies.len(),
            column_count: vocabularies.values().map(|v| v.columns().len()).sum(),
            value_count: vocabularies
                .values()
                .flat_map(|v| v.columns())
                .map(|c| c.values.len())
                .sum(),
        };

        Ok((
            Self {
                manifest,
                vocabularies,
            },
            summary,
        ))
    }

    pub fn get(&self, id: &str) -> Option<&Vocabulary> {
        self.vocabularies.get(id)
    }
}

/// Load a built-in vocabulary from the default standards root.
pub fn load_vocabulary(id: &str) -> Result<Vocabulary, StandardsError> {
    load_vocabulary_from(&default_standards_root(), id)
}

/// Load a built-in vocabulary from `standards_dir`, verifying its checksum.
pub fn load_vocabulary_from(standards_dir: &Path, id: &str) -> Result<Vocabulary, StandardsError> {
    let builtin = BuiltinVocabulary::from_id(id)?;

    let manifest = load_manifest(&standards_dir.join("manifest.toml"))?;
    validate_manifest(&manifest, standards_dir)?;

    let file = manifest
        .file_for(builtin.id())
        .ok_or_else(|| StandardsError::InvalidManifest {
            message: format!("no file listed for vocabulary '{builtin}'"),
        })?;
    verify_file(standards_dir, file)?;
    load_file(standards_dir, file)
}

fn load_file(standards_dir: &Path, file: &ManifestFile) -> Result<Vocabulary, StandardsError> {
    load_vocabulary_csv(
        &standards_dir.join(&file.path),
        &file.vocabulary,
        &file.label,
        file.version.clone(),
    )
}

fn load_manifest(path: &Path) -> Result<Manifest, StandardsError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| StandardsError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest, standards_dir: &Path) -> Result<(), StandardsError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(StandardsError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(StandardsError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut manifest_paths: BTreeSet<PathBuf> = BTreeSet::new();

    for file in &manifest.files {
        if !seen.insert(file.vocabulary.as_str()) {
            return Err(StandardsError::DuplicateVocabulary {
                vocabulary: file.vocabulary.clone(),
            });
        }

        if !ALLOWED_KINDS.contains(&file.kind.as_str()) {
            return Err(StandardsError::InvalidManifest {
                message: format!("unsupported kind '{}' for {}", file.kind, file.path),
            });
        }

        validate_sha(&file.sha256, &file.path)?;
        manifest_paths.insert(normalize_path(&validate_path(&file.path)?));
    }

    for path in &manifest_paths {
        if !standards_dir.join(path).is_file() {
            return Err(StandardsError::MissingFile {
                path: standards_dir.join(path),
            });
        }
    }

    Ok(())
}

fn verify_file(standards_dir: &Path, file: &ManifestFile) -> Result<(), StandardsError> {
    let full_path = standards_dir.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StandardsError::MissingFile {
                path: full_path.clone(),
            }
        } else {
            StandardsError::io(full_path.clone(), e)
        }
    })?;

    let actual = sha256_hex(&bytes);
    let expected = file.sha256.to_ascii_lowercase();
    if actual != expected {
        return Err(StandardsError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(())
}

fn validate_sha(sha: &str, path: &str) -> Result<(), StandardsError> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StandardsError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "sha256 must be 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<PathBuf, StandardsError> {
    if path.contains('\\') {
        return Err(StandardsError::InvalidPath {
            path: PathBuf::from(path),
            message: "manifest path must use '/' separators".to_string(),
        });
    }
    let p = PathBuf::from(path);
    if p.is_absolute() {
        return Err(StandardsError::InvalidPath {
            path: p,
            message: "manifest path must be relative".to_string(),
        });
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(StandardsError::InvalidPath {
            path: p,
            message: "manifest path must not traverse out of standards/".to_string(),
        });
    }
    Ok(p)
}

fn normalize_path(p: &Path) -> PathBuf {
    p.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gdc_is_the_only_builtin() {
        assert_eq!(BuiltinVocabulary::from_id("gdc").unwrap(), BuiltinVocabulary::Gdc);
        let err = BuiltinVocabulary::from_id("cadsr").unwrap_err();
        assert_eq!(
            err.to_string(),
            "the cadsr vocabulary is not supported. Supported vocabularies are: gdc"
        );
    }

    #[test]
    fn rejects_traversing_paths() {
        assert!(validate_path("../secrets.csv").is_err());
        assert!(validate_path("gdc\\values.csv").is_err());
        assert!(validate_path("gdc/gdc_values.csv").is_ok());
    }

    #[test]
    fn normalize_drops_current_dir() {
        assert_eq!(
            normalize_path(Path::new("./gdc/gdc_values.csv")),
            PathBuf::from("gdc/gdc_values.csv")
        );
    }
}
