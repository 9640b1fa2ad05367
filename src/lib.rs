//! # JustNutrition Ingredient Normalizer
//!
//! Turns free-text recipe ingredient lines ("1 pinch salt and pepper",
//! "100 ML Soy Milk") into canonical `(quantity, unit, name)` records suitable
//! for a nutrition-analysis lookup.

pub mod composite_splitting;
pub mod config;
pub mod deduplication;
pub mod errors;
pub mod name_cleaning;
pub mod normalization_tables;
pub mod normalizer;
pub mod observability;
pub mod observability_config;
pub mod text_processing;
pub mod unit_conversion;
pub mod validation;

// Re-export types for easier access
pub use normalizer::{
    normalize_ingredients, CanonicalIngredient, Diagnostic, DiagnosticReason,
    IngredientNormalizer, NormalizationReport, NutritionRequest, RecipeReport,
};
pub use unit_conversion::Unit;
