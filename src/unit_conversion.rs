//! # Unit Conversion Module
//!
//! Maps raw unit spellings onto the canonical unit vocabulary and applies the
//! unit-specific quantity conversions used for nutrition estimation:
//!
//! - `pinch` is resolved to grams (`grams_per_pinch`, 0.3 g by default)
//! - `ml` of a recognised liquid is resolved to grams (`grams_per_ml`, 1 ml ≈ 1 g)
//!
//! Both factors are approximations for nutrition lookups, not physical
//! constants, and are configured through [`NormalizerConfig`].

use crate::config::NormalizerConfig;
use crate::errors::{AppError, AppResult};
use crate::normalization_tables::NormalizationTables;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

/// A measurement unit after canonicalization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    Tablespoon,
    Teaspoon,
    Gram,
    Milliliter,
    Cup,
    /// Only seen before conversion; pinches always leave the pipeline as grams
    Pinch,
    Handful,
    /// Unrecognised unit, kept verbatim (lower-cased)
    Other(String),
}

impl Unit {
    /// Resolve a canonical unit name (`"tablespoon"`, `"g"`, ...)
    pub fn from_canonical(name: &str) -> Option<Self> {
        match name {
            "tablespoon" => Some(Unit::Tablespoon),
            "teaspoon" => Some(Unit::Teaspoon),
            "g" => Some(Unit::Gram),
            "ml" => Some(Unit::Milliliter),
            "cup" => Some(Unit::Cup),
            "pinch" => Some(Unit::Pinch),
            "handful" => Some(Unit::Handful),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Unit::Tablespoon => "tablespoon",
            Unit::Teaspoon => "teaspoon",
            Unit::Gram => "g",
            Unit::Milliliter => "ml",
            Unit::Cup => "cup",
            Unit::Pinch => "pinch",
            Unit::Handful => "handful",
            Unit::Other(raw) => raw,
        }
    }

    /// Whether this unit belongs to the output vocabulary
    pub fn is_canonical(&self) -> bool {
        !matches!(self, Unit::Pinch | Unit::Other(_))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Unit {
    fn from(value: String) -> Self {
        Unit::from_canonical(&value).unwrap_or(Unit::Other(value))
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.as_str().to_string()
    }
}

/// Quantity and unit after canonicalization
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalQuantity {
    pub quantity: f64,
    pub unit: Option<Unit>,
}

/// Round a converted quantity to 3 decimal places
///
/// Quantities too large to scale are returned unchanged.
pub fn round_quantity(quantity: f64) -> f64 {
    let scaled = quantity * 1000.0;
    if !scaled.is_finite() {
        return quantity;
    }
    scaled.round() / 1000.0
}

/// Canonicalizes unit spellings and converts quantities
#[derive(Debug, Clone)]
pub struct UnitCanonicalizer {
    /// Lower-cased spelling -> canonical unit
    spellings: HashMap<String, Unit>,
    liquid_keywords: Vec<String>,
    grams_per_pinch: f64,
    grams_per_ml: f64,
}

impl UnitCanonicalizer {
    pub fn new(tables: &NormalizationTables, config: &NormalizerConfig) -> AppResult<Self> {
        let mut spellings = HashMap::new();
        for entry in &tables.unit_synonyms {
            let unit = Unit::from_canonical(&entry.canonical).ok_or_else(|| {
                AppError::Config(format!("unknown canonical unit '{}'", entry.canonical))
            })?;
            for spelling in &entry.spellings {
                spellings.insert(spelling.trim().to_lowercase(), unit.clone());
            }
        }

        debug!(
            spellings = spellings.len(),
            liquid_keywords = tables.liquid_keywords.len(),
            grams_per_pinch = config.grams_per_pinch,
            grams_per_ml = config.grams_per_ml,
            "Built unit canonicalizer"
        );

        Ok(Self {
            spellings,
            liquid_keywords: tables
                .liquid_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .collect(),
            grams_per_pinch: config.grams_per_pinch,
            grams_per_ml: config.grams_per_ml,
        })
    }

    /// Map a raw unit token to a unit; unknown tokens come back as [`Unit::Other`]
    pub fn lookup(&self, token: &str) -> Option<Unit> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return None;
        }
        Some(
            self.spellings
                .get(&token)
                .cloned()
                .unwrap_or(Unit::Other(token)),
        )
    }

    /// Whether the ingredient name names a liquid for density conversion
    pub fn is_liquid(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.liquid_keywords
            .iter()
            .any(|keyword| name.contains(keyword.as_str()))
    }

    /// Canonicalize a unit token and convert the quantity where needed
    ///
    /// - `pinch` becomes `g` at `grams_per_pinch` grams per pinch
    /// - `ml` becomes `g` at `grams_per_ml` only when `name` contains a liquid
    ///   keyword; other `ml` quantities keep their unit
    /// - unknown units pass through verbatim
    ///
    /// # Examples
    ///
    /// ```rust
    /// use just_nutrition::config::NormalizerConfig;
    /// use just_nutrition::normalization_tables::NormalizationTables;
    /// use just_nutrition::unit_conversion::{Unit, UnitCanonicalizer};
    ///
    /// let canonicalizer =
    ///     UnitCanonicalizer::new(&NormalizationTables::default(), &NormalizerConfig::default())?;
    ///
    /// let pinch = canonicalizer.canonicalize("pinch", 1.0, "salt");
    /// assert_eq!(pinch.unit, Some(Unit::Gram));
    /// assert_eq!(pinch.quantity, 0.3);
    ///
    /// let milk = canonicalizer.canonicalize("ML", 100.0, "soy milk");
    /// assert_eq!(milk.unit, Some(Unit::Gram));
    /// assert_eq!(milk.quantity, 100.0);
    /// # Ok::<(), just_nutrition::errors::AppError>(())
    /// ```
    pub fn canonicalize(&self, unit_token: &str, quantity: f64, name: &str) -> CanonicalQuantity {
        let unit = self.lookup(unit_token);

        let (unit, quantity) = match unit {
            Some(Unit::Pinch) => {
                trace!(quantity, "Converting pinch to grams");
                (Some(Unit::Gram), quantity * self.grams_per_pinch)
            }
            Some(Unit::Milliliter) if self.is_liquid(name) => {
                trace!(quantity, ingredient = %name, "Converting liquid ml to grams");
                (Some(Unit::Gram), quantity * self.grams_per_ml)
            }
            other => (other, quantity),
        };

        CanonicalQuantity {
            quantity: round_quantity(quantity),
            unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonicalizer() -> UnitCanonicalizer {
        UnitCanonicalizer::new(&NormalizationTables::default(), &NormalizerConfig::default())
            .unwrap()
    }

    #[test]
    fn test_synonym_lookup_is_case_insensitive() {
        let c = canonicalizer();
        assert_eq!(c.lookup("TBSP"), Some(Unit::Tablespoon));
        assert_eq!(c.lookup("tbspn"), Some(Unit::Tablespoon));
        assert_eq!(c.lookup("Tsps"), Some(Unit::Teaspoon));
        assert_eq!(c.lookup("grams"), Some(Unit::Gram));
        assert_eq!(c.lookup("Milliliters"), Some(Unit::Milliliter));
        assert_eq!(c.lookup("cups"), Some(Unit::Cup));
        assert_eq!(c.lookup("handful"), Some(Unit::Handful));
        assert_eq!(c.lookup(""), None);
    }

    #[test]
    fn test_unknown_unit_passes_through() {
        let c = canonicalizer();
        let result = c.canonicalize("OZ", 2.0, "flour");
        assert_eq!(result.unit, Some(Unit::Other("oz".to_string())));
        assert_eq!(result.quantity, 2.0);
    }

    #[test]
    fn test_pinch_scales_with_count() {
        let c = canonicalizer();
        let result = c.canonicalize("pinches", 2.0, "salt");
        assert_eq!(result.unit, Some(Unit::Gram));
        assert_eq!(result.quantity, 0.6);
    }

    #[test]
    fn test_non_liquid_ml_keeps_unit() {
        let c = canonicalizer();
        let result = c.canonicalize("ml", 50.0, "maple syrup");
        assert_eq!(result.unit, Some(Unit::Milliliter));
        assert_eq!(result.quantity, 50.0);
    }

    #[test]
    fn test_custom_factors() {
        let config = NormalizerConfig {
            grams_per_pinch: 0.5,
            grams_per_ml: 0.92,
            ..Default::default()
        };
        let c = UnitCanonicalizer::new(&NormalizationTables::default(), &config).unwrap();
        assert_eq!(c.canonicalize("pinch", 1.0, "salt").quantity, 0.5);
        assert_eq!(c.canonicalize("ml", 10.0, "olive oil").quantity, 9.2);
    }

    #[test]
    fn test_unit_serializes_as_canonical_string() {
        assert_eq!(serde_json::to_string(&Unit::Gram).unwrap(), "\"g\"");
        assert_eq!(
            serde_json::to_string(&Unit::Other("oz".to_string())).unwrap(),
            "\"oz\""
        );
        let unit: Unit = serde_json::from_str("\"tablespoon\"").unwrap();
        assert_eq!(unit, Unit::Tablespoon);
        assert!(unit.is_canonical());
        assert!(!Unit::Pinch.is_canonical());
    }

    #[test]
    fn test_round_quantity_keeps_huge_values_finite() {
        assert_eq!(round_quantity(0.30000000000000004), 0.3);
        assert_eq!(round_quantity(f64::MAX), f64::MAX);
        assert!(round_quantity(1e306).is_finite());
    }
}
