//! Tests for manifest verification and vocabulary loading.

use std::fs;
use std::path::{Path, PathBuf};

use harmonize_model::HarmonizeError;
use harmonize_standards::hash::sha256_hex;
use harmonize_standards::{
    StandardsError, VocabularyRegistry, default_standards_root, load_vocabulary,
    load_vocabulary_from,
};

const VALUES_CSV: &str = "\u{feff}Column,Description,Value\n\
gender,Gender,male\n\
gender,Gender,female\n\
gender,Gender,male\n\
age_at_diagnosis,Age in days,\n";

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("harmonize_standards_{label}_{stamp}"));
    fs::create_dir_all(dir.join("gdc")).expect("create temp dir");
    dir
}

fn write_fixture(dir: &Path, csv: &str, sha: &str) {
    fs::write(dir.join("gdc/gdc_values.csv"), csv).expect("write csv");
    let manifest = format!(
        "[manifest]\n\
         schema = \"harmonize.standards-manifest\"\n\
         schema_version = 1\n\n\
         [[files]]\n\
         path = \"gdc/gdc_values.csv\"\n\
         sha256 = \"{sha}\"\n\
         kind = \"csv\"\n\
         vocabulary = \"gdc\"\n\
         label = \"GDC\"\n"
    );
    fs::write(dir.join("manifest.toml"), manifest).expect("write manifest");
}

#[test]
fn loads_fixture_vocabulary() {
    let dir = temp_dir("load");
    write_fixture(&dir, VALUES_CSV, &sha256_hex(VALUES_CSV.as_bytes()));

    let vocabulary = load_vocabulary_from(&dir, "gdc").expect("load vocabulary");
    assert_eq!(vocabulary.id, "gdc");
    assert_eq!(vocabulary.column_names(), vec!["gender", "age_at_diagnosis"]);
    assert_eq!(vocabulary.domain("gender").map(<[String]>::len), Some(2));
    assert!(vocabulary.domain("age_at_diagnosis").is_none());
    assert_eq!(vocabulary.source.as_deref(), Some("gdc_values.csv"));
}

#[test]
fn checksum_mismatch_is_rejected() {
    let dir = temp_dir("mismatch");
    write_fixture(&dir, VALUES_CSV, &"0".repeat(64));

    let err = load_vocabulary_from(&dir, "gdc").unwrap_err();
    assert!(matches!(err, StandardsError::Sha256Mismatch { .. }));
}

#[test]
fn unknown_vocabulary_maps_to_harmonize_error() {
    let err: HarmonizeError = load_vocabulary("cadsr").unwrap_err().into();
    match err {
        HarmonizeError::UnsupportedVocabulary { name, supported } => {
            assert_eq!(name, "cadsr");
            assert_eq!(supported, vec!["gdc".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bundled_standards_verify() {
    let (registry, summary) =
        VocabularyRegistry::verify_and_load(&default_standards_root()).expect("verify bundled");
    assert_eq!(summary.vocabulary_count, 1);
    let gdc = registry.get("gdc").expect("gdc vocabulary");
    let gender = gdc.domain("gender").expect("gender domain");
    assert!(gender.iter().any(|v| v == "male"));
    assert!(gender.iter().any(|v| v == "female"));
    assert!(gdc.domain("age_at_diagnosis").is_none());
}

#[test]
fn fixture_columns_snapshot() {
    let dir = temp_dir("snapshot");
    write_fixture(&dir, VALUES_CSV, &sha256_hex(VALUES_CSV.as_bytes()));

    let vocabulary = load_vocabulary_from(&dir, "gdc").expect("load vocabulary");
    insta::assert_json_snapshot!(vocabulary.columns(), @r#"
    [
      {
        "name": "gender",
        "description": "Gender",
        "values": [
          "male",
          "female"
        ]
      },
      {
        "name": "age_at_diagnosis",
        "description": "Age in days",
        "values": []
      }
    ]
    "#);
}
