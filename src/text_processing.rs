//! # Text Processing Module
//!
//! Parses a raw ingredient line into its quantity, unit token and name text.
//!
//! ## Supported line shapes
//!
//! - `"2 tbsp balsamic glaze"` → quantity `2`, unit `tbsp`, name `balsamic glaze`
//! - `"100ml soy milk"` → unit glued to the number
//! - `"6 eggs"` → quantity-only, no unit token
//! - `"1/2 cup oats"`, `"1 1/2 cups oats"`, `"½ cup oats"`, `"2½ cups oats"` → fractions
//! - `"1,5 l water"` → comma decimals
//!
//! A separate word after the quantity is only taken as the unit token when it is a
//! known unit spelling; `"2 large eggs"` keeps `large eggs` as the name. A word glued
//! to the number is always the unit token, known or not, so unknown units such as
//! `"2oz"` still reach the unit canonicalizer.

use crate::normalization_tables::NormalizationTables;
use crate::validation::parse_quantity;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, trace};

lazy_static! {
    // Alternatives are tried left to right: mixed numbers, digits + vulgar
    // fraction ("2½", "1 ½"), ASCII fractions, decimals, lone vulgar fractions.
    static ref QUANTITY_PATTERN: Regex = Regex::new(
        r"^(?P<quantity>\d+\s+\d+/\d+|\d+\s*[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞]|\d+/\d+|\d*[.,]?\d+|[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])(?P<glued>[^\W\d_]+\.?)?(?:\s+|$)(?P<rest>.*)$"
    )
    .expect("Quantity pattern should be valid");

    // A marker must be followed by whitespace, so "-2" keeps its sign
    static ref LIST_MARKER: Regex =
        Regex::new(r"^[-*•·](?:\s+|$)").expect("List marker pattern should be valid");
}

/// A raw line split into quantity, unit token and name text
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIngredient {
    /// Non-negative quantity parsed from the leading numeric token
    pub quantity: f64,
    /// Raw unit text, lower-cased; empty when the line has no unit
    pub unit_token: String,
    /// Remaining free text after quantity and unit
    pub name_text: String,
}

/// Why a line could not be parsed as a quantified ingredient
#[derive(Debug, Clone, PartialEq)]
pub enum ParseFailure {
    /// Blank line
    Empty,
    /// No recognisable leading quantity ("salt", "a handful of basil")
    NoQuantity,
    /// Quantity token that does not evaluate to a finite non-negative number ("1/0")
    InvalidQuantity(String),
    /// Quantity (and unit) but no name ("200 g")
    MissingName,
}

impl ParseFailure {
    /// Diagnostic reason code for this failure
    pub fn reason(&self) -> &'static str {
        match self {
            ParseFailure::Empty => "empty",
            ParseFailure::NoQuantity | ParseFailure::InvalidQuantity(_) => "unparsed",
            ParseFailure::MissingName => "no_name",
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::Empty => write!(f, "line is empty"),
            ParseFailure::NoQuantity => write!(f, "no leading quantity"),
            ParseFailure::InvalidQuantity(q) => write!(f, "invalid quantity '{}'", q),
            ParseFailure::MissingName => write!(f, "no ingredient name after quantity"),
        }
    }
}

impl std::error::Error for ParseFailure {}

/// Parser for single ingredient lines
#[derive(Debug, Clone)]
pub struct IngredientParser {
    /// Lower-cased unit spellings recognised as a separate unit word
    known_units: HashSet<String>,
}

impl IngredientParser {
    pub fn new(tables: &NormalizationTables) -> Self {
        let known_units = tables
            .unit_synonyms
            .iter()
            .flat_map(|entry| entry.spellings.iter())
            .map(|spelling| spelling.trim().to_lowercase())
            .collect();
        Self { known_units }
    }

    fn is_known_unit(&self, word: &str) -> bool {
        self.known_units.contains(&word.to_lowercase())
    }

    /// Parse one raw ingredient line
    ///
    /// # Examples
    ///
    /// ```rust
    /// use just_nutrition::normalization_tables::NormalizationTables;
    /// use just_nutrition::text_processing::{IngredientParser, ParseFailure};
    ///
    /// let parser = IngredientParser::new(&NormalizationTables::default());
    ///
    /// let parsed = parser.parse("2 tbsp balsamic glaze").unwrap();
    /// assert_eq!(parsed.quantity, 2.0);
    /// assert_eq!(parsed.unit_token, "tbsp");
    /// assert_eq!(parsed.name_text, "balsamic glaze");
    ///
    /// assert_eq!(parser.parse("salt"), Err(ParseFailure::NoQuantity));
    /// ```
    pub fn parse(&self, raw: &str) -> Result<ParsedIngredient, ParseFailure> {
        let line = raw.trim();
        let line = LIST_MARKER
            .find(line)
            .map_or(line, |marker| &line[marker.end()..]);
        if line.is_empty() {
            return Err(ParseFailure::Empty);
        }

        let captures = QUANTITY_PATTERN.captures(line).ok_or_else(|| {
            trace!(line, "No leading quantity");
            ParseFailure::NoQuantity
        })?;

        let quantity_text = captures.name("quantity").map(|m| m.as_str()).unwrap_or("");
        let quantity = parse_quantity(quantity_text)
            .ok_or_else(|| ParseFailure::InvalidQuantity(quantity_text.to_string()))?;

        let rest = captures.name("rest").map(|m| m.as_str().trim()).unwrap_or("");

        let (unit_token, name_text) = match captures.name("glued") {
            Some(glued) => (normalize_unit_token(glued.as_str()), rest.to_string()),
            None => self.split_unit_word(rest),
        };

        if name_text.is_empty() {
            return Err(ParseFailure::MissingName);
        }

        debug!(
            quantity,
            unit_token = %unit_token,
            name_text = %name_text,
            "Parsed ingredient line"
        );

        Ok(ParsedIngredient {
            quantity,
            unit_token,
            name_text,
        })
    }

    /// Take the first word of `rest` as the unit token when it is a known unit
    fn split_unit_word(&self, rest: &str) -> (String, String) {
        let mut words = rest.splitn(2, char::is_whitespace);
        let first = words.next().unwrap_or("");
        let candidate = normalize_unit_token(first);

        if !candidate.is_empty() && self.is_known_unit(&candidate) {
            let name = words.next().unwrap_or("").trim().to_string();
            (candidate, name)
        } else {
            (String::new(), rest.to_string())
        }
    }
}

fn normalize_unit_token(token: &str) -> String {
    token.trim().trim_end_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> IngredientParser {
        IngredientParser::new(&NormalizationTables::default())
    }

    #[test]
    fn test_quantity_unit_and_name() {
        let parsed = parser().parse("100 ml Soy milk").unwrap();
        assert_eq!(parsed.quantity, 100.0);
        assert_eq!(parsed.unit_token, "ml");
        assert_eq!(parsed.name_text, "Soy milk");
    }

    #[test]
    fn test_glued_unit() {
        let parsed = parser().parse("100ml soy milk").unwrap();
        assert_eq!(parsed.unit_token, "ml");
        assert_eq!(parsed.name_text, "soy milk");

        let parsed = parser().parse("2oz dark chocolate").unwrap();
        assert_eq!(parsed.unit_token, "oz");
        assert_eq!(parsed.name_text, "dark chocolate");
    }

    #[test]
    fn test_unit_with_trailing_period_and_uppercase() {
        let parsed = parser().parse("2 TBSP. soy sauce").unwrap();
        assert_eq!(parsed.unit_token, "tbsp");
        assert_eq!(parsed.name_text, "soy sauce");
    }

    #[test]
    fn test_missing_unit() {
        let parsed = parser().parse("2 large eggs").unwrap();
        assert_eq!(parsed.quantity, 2.0);
        assert_eq!(parsed.unit_token, "");
        assert_eq!(parsed.name_text, "large eggs");
    }

    #[test]
    fn test_fractions_and_decimals() {
        let p = parser();
        assert_eq!(p.parse("1/2 cup oats").unwrap().quantity, 0.5);
        assert_eq!(p.parse("1 1/2 cups oats").unwrap().quantity, 1.5);
        assert_eq!(p.parse("½ cup oats").unwrap().quantity, 0.5);
        assert_eq!(p.parse("2½ cups oats").unwrap().quantity, 2.5);
        assert_eq!(p.parse("1.5 tsp cumin").unwrap().quantity, 1.5);
        assert_eq!(p.parse("1,5 tsp cumin").unwrap().quantity, 1.5);
        assert_eq!(p.parse(".5 tsp cumin").unwrap().quantity, 0.5);
    }

    #[test]
    fn test_list_markers_are_ignored() {
        let parsed = parser().parse("- 1 tsp salt").unwrap();
        assert_eq!(parsed.unit_token, "tsp");
        assert_eq!(parsed.name_text, "salt");

        let parsed = parser().parse("*\t2 cups rice").unwrap();
        assert_eq!(parsed.quantity, 2.0);
    }

    #[test]
    fn test_negative_quantity_is_not_a_list_marker() {
        assert_eq!(parser().parse("-2 cups flour"), Err(ParseFailure::NoQuantity));
        assert_eq!(parser().parse("- -2 cups flour"), Err(ParseFailure::NoQuantity));
    }

    #[test]
    fn test_failures() {
        let p = parser();
        assert_eq!(p.parse("   "), Err(ParseFailure::Empty));
        assert_eq!(p.parse("salt"), Err(ParseFailure::NoQuantity));
        assert_eq!(p.parse("a pinch of salt"), Err(ParseFailure::NoQuantity));
        assert_eq!(p.parse("200 g"), Err(ParseFailure::MissingName));
        assert_eq!(p.parse("200g"), Err(ParseFailure::MissingName));
        assert_eq!(
            p.parse("1/0 cup sugar"),
            Err(ParseFailure::InvalidQuantity("1/0".to_string()))
        );
    }

    #[test]
    fn test_failure_reasons() {
        assert_eq!(ParseFailure::Empty.reason(), "empty");
        assert_eq!(ParseFailure::NoQuantity.reason(), "unparsed");
        assert_eq!(ParseFailure::MissingName.reason(), "no_name");
    }
}
