//! # Unified Application Configuration
//!
//! This module consolidates all settings into a single configuration object:
//! conversion factors and limits for the normalizer, observability settings and
//! the normalization tables. It supports loading from environment variables and
//! validation.

use crate::errors::{AppError, AppResult};
use crate::normalization_tables::{load_normalization_tables, NormalizationTables};
use crate::observability_config::ObservabilityConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Normalizer settings: conversion factors and input limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Grams per pinch (nutritional heuristic)
    pub grams_per_pinch: f64,
    /// Grams per millilitre for recognised liquids (density approximation)
    pub grams_per_ml: f64,
    /// Raw lines longer than this (in characters) are skipped
    pub max_line_length: usize,
    /// Serving count used when the caller does not supply one
    pub default_servings: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            grams_per_pinch: 0.3,
            grams_per_ml: 1.0,
            max_line_length: 500,
            default_servings: 1,
        }
    }
}

impl NormalizerConfig {
    /// Load normalizer settings from environment variables, defaulting unset ones
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            grams_per_pinch: env_or("GRAMS_PER_PINCH", defaults.grams_per_pinch)?,
            grams_per_ml: env_or("GRAMS_PER_ML", defaults.grams_per_ml)?,
            max_line_length: env_or("MAX_LINE_LENGTH", defaults.max_line_length)?,
            default_servings: env_or("DEFAULT_SERVINGS", defaults.default_servings)?,
        })
    }

    /// Validate normalizer configuration
    pub fn validate(&self) -> AppResult<()> {
        if !self.grams_per_pinch.is_finite() || self.grams_per_pinch <= 0.0 {
            return Err(AppError::Config(format!(
                "grams_per_pinch must be a positive number, got {}",
                self.grams_per_pinch
            )));
        }

        if !self.grams_per_ml.is_finite() || self.grams_per_ml <= 0.0 {
            return Err(AppError::Config(format!(
                "grams_per_ml must be a positive number, got {}",
                self.grams_per_ml
            )));
        }

        if self.max_line_length == 0 {
            return Err(AppError::Config(
                "max_line_length must be greater than 0".to_string(),
            ));
        }

        if self.default_servings == 0 {
            return Err(AppError::Config(
                "default_servings must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number", key))),
        Err(_) => Ok(default),
    }
}

/// Unified application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Normalizer configuration
    pub normalizer: NormalizerConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
    /// Normalization lookup tables
    pub tables: NormalizationTables,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            normalizer: NormalizerConfig::from_env()?,
            observability: ObservabilityConfig::from_env(),
            tables: load_normalization_tables(),
        })
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.normalizer.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        self.tables.validate()?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: grams_per_pinch={}, grams_per_ml={}, max_line_length={}, unit_spellings={}, stoplist={}, fallbacks={}, environment={}",
            self.normalizer.grams_per_pinch,
            self.normalizer.grams_per_ml,
            self.normalizer.max_line_length,
            self.tables
                .unit_synonyms
                .iter()
                .map(|u| u.spellings.len())
                .sum::<usize>(),
            self.tables.adjective_stoplist.len(),
            self.tables.name_fallbacks.len(),
            self.observability.environment
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            observability: ObservabilityConfig::default(),
            tables: NormalizationTables::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_normalizer_config_validation() {
        let mut config = NormalizerConfig::default();
        assert!(config.validate().is_ok());

        // Invalid: zero pinch weight
        config.grams_per_pinch = 0.0;
        assert!(config.validate().is_err());
        config.grams_per_pinch = 0.3;

        // Invalid: non-finite density
        config.grams_per_ml = f64::NAN;
        assert!(config.validate().is_err());
        config.grams_per_ml = 1.0;

        // Invalid: zero line length
        config.max_line_length = 0;
        assert!(config.validate().is_err());
        config.max_line_length = 500;

        // Invalid: zero servings
        config.default_servings = 0;
        assert!(config.validate().is_err());
        config.default_servings = 1;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_summary_mentions_factors() {
        let summary = AppConfig::default().summary();
        assert!(summary.contains("grams_per_pinch=0.3"));
        assert!(summary.contains("grams_per_ml=1"));
    }
}
