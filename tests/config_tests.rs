#[cfg(test)]
mod tests {
    use just_nutrition::config::NormalizerConfig;
    use just_nutrition::errors::AppError;
    use just_nutrition::normalization_tables::{
        load_normalization_tables_from, FallbackTarget, NameFallback, NormalizationTables,
    };
    use just_nutrition::normalizer::IngredientNormalizer;
    use just_nutrition::unit_conversion::Unit;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tables(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_shipped_tables_match_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/normalization_tables.json");
        let tables = load_normalization_tables_from(path).unwrap();
        assert_eq!(tables, NormalizationTables::default());
    }

    #[test]
    fn test_load_custom_tables() {
        let mut tables = NormalizationTables::default();
        tables.adjective_stoplist.push("roasted".to_string());
        tables.name_fallbacks.insert(
            0,
            NameFallback {
                contains: "mixed herbs".to_string(),
                whole_word: false,
                target: FallbackTarget::FanOut(vec!["thyme".to_string(), "oregano".to_string()]),
            },
        );
        let file = write_tables(&serde_json::to_string_pretty(&tables).unwrap());

        let loaded = load_normalization_tables_from(file.path()).unwrap();
        assert_eq!(loaded, tables);

        let normalizer = IngredientNormalizer::new(&loaded, NormalizerConfig::default())
            .unwrap()
            .with_metrics(false);
        let records =
            normalizer.normalize_ingredients(&["1 tsp dried mixed herbs", "1 cup roasted peppers"]);
        let lines: Vec<String> = records.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec!["1 teaspoon thyme", "1 teaspoon oregano", "1 cup peppers"]
        );
    }

    #[test]
    fn test_minimal_tables_file() {
        let file = write_tables(
            r#"{
                "unit_synonyms": [
                    { "canonical": "g", "spellings": ["g", "gr"] },
                    { "canonical": "pinch", "spellings": ["pinch", "dash"] }
                ],
                "adjective_stoplist": [],
                "name_fallbacks": [],
                "liquid_keywords": []
            }"#,
        );
        let tables = load_normalization_tables_from(file.path()).unwrap();
        let normalizer = IngredientNormalizer::new(&tables, NormalizerConfig::default())
            .unwrap()
            .with_metrics(false);

        let records = normalizer.normalize_ingredients(&["2 dash Fresh salt", "100ml water"]);
        assert_eq!(records[0].unit, Some(Unit::Gram));
        assert_eq!(records[0].quantity, 0.6);
        assert_eq!(records[0].name, "fresh salt");

        // "ml" is not in this table; glued to the number it passes through as an unknown unit
        assert_eq!(records[1].unit, Some(Unit::Other("ml".to_string())));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let file = write_tables("{ not json");
        match load_normalization_tables_from(file.path()) {
            Err(AppError::Parse(msg)) => assert!(msg.contains("failed to parse")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_tables_are_a_config_error() {
        let file = write_tables(
            r#"{
                "unit_synonyms": [ { "canonical": "bushel", "spellings": ["bu"] } ],
                "adjective_stoplist": [],
                "name_fallbacks": [],
                "liquid_keywords": []
            }"#,
        );
        assert!(matches!(
            load_normalization_tables_from(file.path()),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(matches!(
            load_normalization_tables_from(&path),
            Err(AppError::FileSystem(_))
        ));
    }
}
