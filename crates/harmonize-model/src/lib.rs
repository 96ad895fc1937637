#![deny(unsafe_code)]

pub mod error;
pub mod matching;
pub mod options;
pub mod vocabulary;

pub use error::{HarmonizeError, Result};
pub use matching::{
    ColumnMapping, PreviewRow, ValueMappingPreview, ValueMatch, ValueMatchingResult, mapping_key,
    preview_value_mappings,
};
pub use options::{DEFAULT_MAX_UNIQUE_VALUES, DuplicatePolicy, MatchingOptions};
pub use vocabulary::{Vocabulary, VocabularyColumn};

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn unsupported_method_lists_names() {
        let error = HarmonizeError::UnsupportedMethod {
            kind: "value matching",
            name: "tfidf".to_string(),
            supported: vec!["edit_distance".to_string(), "exact".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "the tfidf value matching method is not supported. \
             Supported methods are: edit_distance, exact"
        );
    }

    #[test]
    fn duplicate_error_names_pair() {
        let error = HarmonizeError::duplicate("age", "age_at_diagnosis");
        assert_eq!(
            error.to_string(),
            "duplicate mapping for source: age, target: age_at_diagnosis"
        );
    }

    #[test]
    fn result_deserializes_with_derived_fields() {
        let json = r#"{
            "source": "sex",
            "target": "gender",
            "matches": [{"current_value": "Male", "target_value": "male", "similarity": 1.0}],
            "coverage": 0.1,
            "unique_values": ["Male", "M"],
            "unmatch_values": []
        }"#;
        let result: ValueMatchingResult = serde_json::from_str(json).expect("deserialize");
        assert_eq!(result.coverage(), 0.5);
        let expected: BTreeSet<String> = ["M".to_string()].into_iter().collect();
        assert_eq!(result.unmatch_values(), &expected);
    }
}
