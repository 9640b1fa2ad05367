//! # Normalization Tables
//!
//! Read-only lookup tables consumed by the normalization pipeline: unit
//! spellings, the adjective stoplist, the ordered name fallback table and the
//! liquid keywords used for density conversion.
//!
//! Tables are plain values. They are built once (from the built-in defaults or
//! from `config/normalization_tables.json`) and handed to
//! [`IngredientNormalizer`](crate::normalizer::IngredientNormalizer) at
//! construction; nothing in the pipeline mutates them afterwards.

use crate::errors::{AppError, AppResult};
use crate::unit_conversion::Unit;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// All spellings that canonicalize to one unit
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UnitSynonyms {
    /// Canonical unit name (`tablespoon`, `teaspoon`, `g`, `ml`, `cup`, `pinch`, `handful`)
    pub canonical: String,
    /// Raw spellings, matched case-insensitively
    pub spellings: Vec<String>,
}

/// Replacement produced by a name fallback entry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FallbackTarget {
    /// Collapse the name to one canonical name
    Single(String),
    /// Fan the name out into several ingredients
    FanOut(Vec<String>),
}

/// One row of the ordered name fallback table
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NameFallback {
    /// Substring looked up in the cleaned name
    pub contains: String,
    /// Only match `contains` as a whole word (used for short abbreviations like "acv")
    #[serde(default)]
    pub whole_word: bool,
    /// What the name becomes when this row matches
    pub target: FallbackTarget,
}

impl NameFallback {
    fn single(contains: &str, target: &str) -> Self {
        Self {
            contains: contains.to_string(),
            whole_word: false,
            target: FallbackTarget::Single(target.to_string()),
        }
    }
}

/// Lookup tables for the normalization pipeline
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NormalizationTables {
    pub unit_synonyms: Vec<UnitSynonyms>,
    pub adjective_stoplist: Vec<String>,
    /// Checked in order, first match wins
    pub name_fallbacks: Vec<NameFallback>,
    pub liquid_keywords: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for NormalizationTables {
    fn default() -> Self {
        let unit = |canonical: &str, spellings: &[&str]| UnitSynonyms {
            canonical: canonical.to_string(),
            spellings: strings(spellings),
        };

        Self {
            unit_synonyms: vec![
                unit(
                    "tablespoon",
                    &["tbsp", "tbs", "tbspn", "tablespoon", "tablespoons"],
                ),
                unit("teaspoon", &["tsp", "tsps", "teaspoon", "teaspoons"]),
                unit("g", &["g", "gram", "grams"]),
                unit(
                    "ml",
                    &["ml", "milliliter", "milliliters", "millilitre", "millilitres"],
                ),
                unit("cup", &["cup", "cups"]),
                unit("pinch", &["pinch", "pinches"]),
                unit("handful", &["handful", "handfuls"]),
            ],
            adjective_stoplist: strings(&[
                "fresh",
                "raw",
                "organic",
                "smoked",
                "thick",
                "thin",
                "large",
                "small",
                "extra virgin",
                "extra",
                "virgin",
                "plain",
                "unsweetened",
                "chopped",
                "sliced",
                "diced",
                "minced",
                "shredded",
                "grated",
            ]),
            name_fallbacks: vec![
                NameFallback::single("soy milk", "soy milk"),
                NameFallback::single("apple cider vinegar", "vinegar"),
                NameFallback {
                    contains: "acv".to_string(),
                    whole_word: true,
                    target: FallbackTarget::Single("vinegar".to_string()),
                },
                NameFallback::single("balsamic glaze", "balsamic vinegar"),
                NameFallback::single("balsamic", "balsamic vinegar"),
                NameFallback::single("smoked tofu", "tofu"),
                NameFallback::single("olive oil extra virgin", "olive oil"),
                NameFallback::single("extra virgin olive oil", "olive oil"),
                NameFallback::single("nutritional yeast", "nutritional yeast"),
                NameFallback::single("brussels sprouts", "brussels sprouts"),
                NameFallback {
                    contains: "salt and pepper".to_string(),
                    whole_word: false,
                    target: FallbackTarget::FanOut(strings(&["salt", "pepper"])),
                },
            ],
            liquid_keywords: strings(&["milk", "soy milk", "vinegar", "oil", "sauce", "water"]),
        }
    }
}

impl NormalizationTables {
    /// Validate the tables before they are compiled into a normalizer
    pub fn validate(&self) -> AppResult<()> {
        if self.unit_synonyms.is_empty() {
            return Err(AppError::Config("unit_synonyms cannot be empty".to_string()));
        }

        let mut seen_spellings = HashSet::new();
        for (i, entry) in self.unit_synonyms.iter().enumerate() {
            if Unit::from_canonical(&entry.canonical).is_none() {
                return Err(AppError::Config(format!(
                    "unit_synonyms[{}] has unknown canonical unit '{}'",
                    i, entry.canonical
                )));
            }
            if entry.spellings.is_empty() {
                return Err(AppError::Config(format!(
                    "unit_synonyms[{}] ('{}') has no spellings",
                    i, entry.canonical
                )));
            }
            for spelling in &entry.spellings {
                validate_entry(spelling, "unit_synonyms.spellings", i)?;
                if spelling.split_whitespace().count() != 1 {
                    return Err(AppError::Config(format!(
                        "unit spelling '{}' must be a single word",
                        spelling
                    )));
                }
                if !seen_spellings.insert(spelling.to_lowercase()) {
                    return Err(AppError::Config(format!(
                        "unit spelling '{}' is mapped more than once",
                        spelling
                    )));
                }
            }
        }

        for (i, adjective) in self.adjective_stoplist.iter().enumerate() {
            validate_entry(adjective, "adjective_stoplist", i)?;
        }

        for (i, fallback) in self.name_fallbacks.iter().enumerate() {
            validate_entry(&fallback.contains, "name_fallbacks.contains", i)?;
            match &fallback.target {
                FallbackTarget::Single(name) => {
                    validate_entry(name, "name_fallbacks.target", i)?;
                }
                FallbackTarget::FanOut(names) => {
                    if names.is_empty() {
                        return Err(AppError::Config(format!(
                            "name_fallbacks[{}] fan-out target cannot be empty",
                            i
                        )));
                    }
                    for name in names {
                        validate_entry(name, "name_fallbacks.target", i)?;
                    }
                }
            }
        }

        for (i, keyword) in self.liquid_keywords.iter().enumerate() {
            validate_entry(keyword, "liquid_keywords", i)?;
        }

        Ok(())
    }
}

fn validate_entry(value: &str, category: &str, index: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Config(format!(
            "{}[{}] cannot be empty",
            category, index
        )));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(AppError::Config(format!(
            "{}[{}] '{}' contains control characters",
            category, index, value
        )));
    }
    Ok(())
}

/// Load and validate tables from an explicit JSON file
pub fn load_normalization_tables_from(path: impl AsRef<Path>) -> AppResult<NormalizationTables> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::FileSystem(format!("failed to read '{}': {}", path.display(), e))
    })?;
    let tables: NormalizationTables = serde_json::from_str(&content).map_err(|e| {
        AppError::Parse(format!("failed to parse '{}': {}", path.display(), e))
    })?;
    tables.validate()?;
    Ok(tables)
}

/// Load normalization tables from the environment or the usual config paths
///
/// Looks at `NORMALIZATION_TABLES_PATH` first, then the Docker, local and test
/// locations of `config/normalization_tables.json`. Falls back to the built-in
/// defaults when no usable file is found.
pub fn load_normalization_tables() -> NormalizationTables {
    if let Ok(config_path) = std::env::var("NORMALIZATION_TABLES_PATH") {
        info!(
            "Loading normalization tables from environment variable: {}",
            config_path
        );
        match load_normalization_tables_from(&config_path) {
            Ok(tables) => return tables,
            Err(e) => {
                warn!(
                    "Failed to load normalization tables from '{}': {}. Falling back to default paths.",
                    config_path, e
                );
            }
        }
    }

    let possible_paths = [
        "/app/config/normalization_tables.json", // Docker path
        "config/normalization_tables.json",      // Local development path
        "../config/normalization_tables.json",   // Test path
    ];

    for config_path in &possible_paths {
        if !Path::new(config_path).exists() {
            continue;
        }
        match load_normalization_tables_from(config_path) {
            Ok(tables) => {
                info!(
                    "Successfully loaded normalization tables from fallback path: {}",
                    config_path
                );
                return tables;
            }
            Err(e) => {
                warn!(
                    "Failed to load normalization tables at '{}': {}. Trying next path.",
                    config_path, e
                );
            }
        }
    }

    warn!("No normalization tables file found in any expected location. Using built-in tables.");
    NormalizationTables::default()
}
