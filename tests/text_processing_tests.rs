#[cfg(test)]
mod tests {
    use just_nutrition::normalization_tables::NormalizationTables;
    use just_nutrition::text_processing::{IngredientParser, ParseFailure};

    fn create_parser() -> IngredientParser {
        IngredientParser::new(&NormalizationTables::default())
    }

    #[test]
    fn test_basic_line_parsing() {
        let parser = create_parser();

        let parsed = parser.parse("2 tbsp balsamic glaze").unwrap();
        assert_eq!(parsed.quantity, 2.0);
        assert_eq!(parsed.unit_token, "tbsp");
        assert_eq!(parsed.name_text, "balsamic glaze");

        let parsed = parser.parse("1 pinch salt and pepper").unwrap();
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit_token, "pinch");
        assert_eq!(parsed.name_text, "salt and pepper");
    }

    #[test]
    fn test_every_unit_spelling_is_recognised() {
        let parser = create_parser();
        let tables = NormalizationTables::default();

        for entry in &tables.unit_synonyms {
            for spelling in &entry.spellings {
                let line = format!("3 {} rice", spelling.to_uppercase());
                let parsed = parser.parse(&line).unwrap();
                assert_eq!(&parsed.unit_token, spelling, "line: {}", line);
                assert_eq!(parsed.name_text, "rice");
            }
        }
    }

    #[test]
    fn test_count_items_have_no_unit() {
        let parser = create_parser();

        let parsed = parser.parse("6 eggs").unwrap();
        assert_eq!(parsed.quantity, 6.0);
        assert!(parsed.unit_token.is_empty());
        assert_eq!(parsed.name_text, "eggs");

        // "g" at the start of a word is not a unit
        let parsed = parser.parse("2 garlic cloves").unwrap();
        assert!(parsed.unit_token.is_empty());
        assert_eq!(parsed.name_text, "garlic cloves");
    }

    #[test]
    fn test_quantity_forms() {
        let parser = create_parser();

        let cases = [
            ("1/2 cup oats", 0.5),
            ("1 1/2 cups oats", 1.5),
            ("½ cup oats", 0.5),
            ("1 ½ cups oats", 1.5),
            ("2½ cups oats", 2.5),
            ("0.25 cup oats", 0.25),
            ("1,5 cups oats", 1.5),
            ("0 cups oats", 0.0),
        ];

        for (line, expected) in cases {
            let parsed = parser.parse(line).unwrap();
            assert!(
                (parsed.quantity - expected).abs() < 1e-9,
                "line '{}' parsed as {}",
                line,
                parsed.quantity
            );
            assert_eq!(parsed.unit_token.trim_end_matches('s'), "cup");
            assert_eq!(parsed.name_text, "oats");
        }
    }

    #[test]
    fn test_surrounding_whitespace_and_markers() {
        let parser = create_parser();

        let parsed = parser.parse("   100 ML Soy Milk   ").unwrap();
        assert_eq!(parsed.unit_token, "ml");
        assert_eq!(parsed.name_text, "Soy Milk");

        let parsed = parser.parse("• 2 tsp cumin").unwrap();
        assert_eq!(parsed.quantity, 2.0);
        assert_eq!(parsed.unit_token, "tsp");
    }

    #[test]
    fn test_unparsable_lines() {
        let parser = create_parser();

        assert_eq!(parser.parse(""), Err(ParseFailure::Empty));
        assert_eq!(parser.parse("-"), Err(ParseFailure::Empty));
        assert_eq!(parser.parse("Salt to taste"), Err(ParseFailure::NoQuantity));
        assert_eq!(parser.parse("cups 2 flour"), Err(ParseFailure::NoQuantity));
        assert_eq!(parser.parse("3 tbsp"), Err(ParseFailure::MissingName));
        assert_eq!(parser.parse("3"), Err(ParseFailure::MissingName));
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(ParseFailure::NoQuantity.to_string(), "no leading quantity");
        assert_eq!(
            ParseFailure::InvalidQuantity("1/0".to_string()).to_string(),
            "invalid quantity '1/0'"
        );
    }
}
