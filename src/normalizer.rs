//! # Ingredient Normalizer
//!
//! Runs raw ingredient lines through the normalization pipeline:
//!
//! ```text
//! raw line ─► parse ─► canonicalize unit ─► split composite ─► clean each name ─► dedup
//! ```
//!
//! The normalizer owns its compiled tables and holds no mutable state, so one
//! instance can be shared between threads and reused for any number of batches.
//! Normalization never fails: lines that cannot be used are skipped and reported
//! as [`Diagnostic`]s.

use crate::composite_splitting;
use crate::config::NormalizerConfig;
use crate::deduplication::IngredientDeduplicator;
use crate::errors::{error_logging, AppResult};
use crate::name_cleaning::{CleanedName, NameCleaner};
use crate::normalization_tables::NormalizationTables;
use crate::observability::{normalization_span, record_diagnostic, record_normalization_metrics};
use crate::text_processing::{IngredientParser, ParseFailure, ParsedIngredient};
use crate::unit_conversion::{CanonicalQuantity, Unit, UnitCanonicalizer};
use crate::validation::{validate_line, validate_servings};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

lazy_static! {
    static ref DEFAULT_NORMALIZER: IngredientNormalizer =
        IngredientNormalizer::new(&NormalizationTables::default(), NormalizerConfig::default())
            .expect("Built-in normalization tables should be valid");
}

/// A normalized ingredient, ready for a nutrition lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalIngredient {
    /// Quantity expressed in `unit`
    pub quantity: f64,
    /// Canonical unit; `None` for counted items ("2 eggs")
    pub unit: Option<Unit>,
    /// Lower-case, adjective-free, synonym-resolved name
    pub name: String,
}

impl fmt::Display for CanonicalIngredient {
    /// Query line form: `"100 g soy milk"`, `"2 eggs"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} {} {}", self.quantity, unit, self.name),
            None => write!(f, "{} {}", self.quantity, self.name),
        }
    }
}

/// Why a line was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticReason {
    /// No usable leading quantity; the line was skipped
    Unparsed,
    /// Blank line; skipped
    Empty,
    /// Nothing left of the name after cleaning; skipped
    NoName,
    /// Longer than `max_line_length`; skipped
    TooLong,
    /// Unit not in the unit table; kept verbatim and the record emitted
    UnknownUnit,
    /// Record identical to an earlier one in the batch; dropped
    Duplicate,
}

impl DiagnosticReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticReason::Unparsed => "unparsed",
            DiagnosticReason::Empty => "empty",
            DiagnosticReason::NoName => "no_name",
            DiagnosticReason::TooLong => "too_long",
            DiagnosticReason::UnknownUnit => "unknown_unit",
            DiagnosticReason::Duplicate => "duplicate",
        }
    }
}

impl From<&ParseFailure> for DiagnosticReason {
    fn from(failure: &ParseFailure) -> Self {
        match failure {
            ParseFailure::Empty => DiagnosticReason::Empty,
            ParseFailure::NoQuantity | ParseFailure::InvalidQuantity(_) => {
                DiagnosticReason::Unparsed
            }
            ParseFailure::MissingName => DiagnosticReason::NoName,
        }
    }
}

/// A note about one input line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The raw input line
    pub original: String,
    /// Query lines of the records the line produced (empty when skipped)
    pub normalized: Vec<String>,
    pub reason: DiagnosticReason,
}

/// Records and diagnostics for one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationReport {
    pub ingredients: Vec<CanonicalIngredient>,
    pub diagnostics: Vec<Diagnostic>,
}

/// What the nutrition client sends to the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRequest {
    pub servings: u32,
    pub ingredients: Vec<CanonicalIngredient>,
}

impl NutritionRequest {
    /// Ingredient query lines in provider form (`"100 g soy milk"`)
    pub fn query_lines(&self) -> Vec<String> {
        self.ingredients.iter().map(ToString::to_string).collect()
    }
}

/// A recipe ready for lookup plus the notes gathered while normalizing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeReport {
    pub request: NutritionRequest,
    pub diagnostics: Vec<Diagnostic>,
}

/// The ingredient normalization pipeline
#[derive(Debug, Clone)]
pub struct IngredientNormalizer {
    config: NormalizerConfig,
    parser: IngredientParser,
    canonicalizer: UnitCanonicalizer,
    cleaner: NameCleaner,
    record_metrics: bool,
}

impl IngredientNormalizer {
    /// Build a normalizer from validated tables and configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use just_nutrition::config::NormalizerConfig;
    /// use just_nutrition::normalization_tables::NormalizationTables;
    /// use just_nutrition::normalizer::IngredientNormalizer;
    ///
    /// let normalizer =
    ///     IngredientNormalizer::new(&NormalizationTables::default(), NormalizerConfig::default())?;
    /// let records = normalizer.normalize_ingredients(&["1 pinch salt and pepper"]);
    ///
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(records[0].to_string(), "0.3 g salt");
    /// assert_eq!(records[1].to_string(), "0.3 g pepper");
    /// # Ok::<(), just_nutrition::errors::AppError>(())
    /// ```
    pub fn new(tables: &NormalizationTables, config: NormalizerConfig) -> AppResult<Self> {
        tables.validate()?;
        config.validate()?;

        info!(
            unit_spellings = tables.unit_synonyms.iter().map(|u| u.spellings.len()).sum::<usize>(),
            stoplist = tables.adjective_stoplist.len(),
            fallbacks = tables.name_fallbacks.len(),
            "Creating IngredientNormalizer"
        );

        Ok(Self {
            parser: IngredientParser::new(tables),
            canonicalizer: UnitCanonicalizer::new(tables, &config)?,
            cleaner: NameCleaner::new(tables)?,
            config,
            record_metrics: true,
        })
    }

    /// Enable or disable metrics recording for this normalizer
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.record_metrics = enabled;
        self
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Parse one raw line (pipeline stage 1)
    pub fn parse(&self, raw: &str) -> Result<ParsedIngredient, ParseFailure> {
        self.parser.parse(raw)
    }

    /// Canonicalize a unit token and convert the quantity (pipeline stage 2)
    pub fn canonicalize(&self, unit_token: &str, quantity: f64, name: &str) -> CanonicalQuantity {
        self.canonicalizer.canonicalize(unit_token, quantity, name)
    }

    /// Clean one ingredient name (pipeline stage 3)
    pub fn clean_name(&self, name: &str) -> CleanedName {
        self.cleaner.clean_name(name)
    }

    /// Normalize a batch of raw lines, dropping unusable lines and duplicates
    pub fn normalize_ingredients<S: AsRef<str>>(&self, raw_lines: &[S]) -> Vec<CanonicalIngredient> {
        self.normalize_with_diagnostics(raw_lines).ingredients
    }

    /// Normalize a batch of raw lines and report what happened to each line
    pub fn normalize_with_diagnostics<S: AsRef<str>>(&self, raw_lines: &[S]) -> NormalizationReport {
        let span = normalization_span("normalize_ingredients", raw_lines.len());
        let _guard = span.enter();
        let start_time = std::time::Instant::now();

        let mut report = NormalizationReport::default();
        let mut deduplicator = IngredientDeduplicator::new();

        for raw in raw_lines {
            let raw = raw.as_ref();

            let records = match self.normalize_line(raw) {
                Ok(records) => records,
                Err(reason) => {
                    self.push_diagnostic(&mut report, raw, Vec::new(), reason);
                    continue;
                }
            };

            if let Some(Unit::Other(unit)) = records.first().and_then(|r| r.unit.as_ref()) {
                warn!(unit = %unit, "Unknown unit kept verbatim in '{}'", raw);
                let normalized = records.iter().map(ToString::to_string).collect();
                self.push_diagnostic(&mut report, raw, normalized, DiagnosticReason::UnknownUnit);
            }

            for record in records {
                if deduplicator.is_duplicate(&record) {
                    debug!("Dropping duplicate ingredient '{}'", record);
                    self.push_diagnostic(
                        &mut report,
                        raw,
                        vec![record.to_string()],
                        DiagnosticReason::Duplicate,
                    );
                } else {
                    report.ingredients.push(record);
                }
            }
        }

        let duration = start_time.elapsed();
        if self.record_metrics {
            record_normalization_metrics(
                "normalize_ingredients",
                duration,
                raw_lines.len(),
                report.ingredients.len(),
                report.diagnostics.len(),
            );
        }

        info!(
            lines = raw_lines.len(),
            records = report.ingredients.len(),
            diagnostics = report.diagnostics.len(),
            duplicates = deduplicator.stats().duplicates_dropped,
            "Normalized ingredient batch"
        );
        report
    }

    /// Normalize a recipe for a nutrition lookup
    ///
    /// `servings` falls back to the configured default when `None`; it must be
    /// between 1 and 1000.
    pub fn normalize_recipe<S: AsRef<str>>(
        &self,
        raw_lines: &[S],
        servings: Option<u32>,
    ) -> AppResult<RecipeReport> {
        let requested = servings.unwrap_or(self.config.default_servings);
        let servings = validate_servings(requested).map_err(|e| {
            error_logging::log_validation_error(
                &e,
                "normalize_recipe",
                "servings",
                Some(&requested.to_string()),
            );
            e
        })?;
        let report = self.normalize_with_diagnostics(raw_lines);
        Ok(RecipeReport {
            request: NutritionRequest {
                servings,
                ingredients: report.ingredients,
            },
            diagnostics: report.diagnostics,
        })
    }

    /// Run one line through parse, canonicalize, split and clean
    fn normalize_line(&self, raw: &str) -> Result<Vec<CanonicalIngredient>, DiagnosticReason> {
        match validate_line(raw, self.config.max_line_length) {
            Ok(()) => {}
            Err("too_long") => return Err(DiagnosticReason::TooLong),
            Err(_) => return Err(DiagnosticReason::Empty),
        }

        let parsed = self.parser.parse(raw).map_err(|failure| {
            debug!("Skipping line '{}': {}", raw, failure);
            DiagnosticReason::from(&failure)
        })?;

        let canonical =
            self.canonicalizer
                .canonicalize(&parsed.unit_token, parsed.quantity, &parsed.name_text);

        if !canonical.quantity.is_finite() {
            debug!(
                quantity = parsed.quantity,
                "Skipping line '{}': converted quantity is not finite", raw
            );
            return Err(DiagnosticReason::Unparsed);
        }

        let records = composite_splitting::split(
            canonical.quantity,
            canonical.unit.as_ref(),
            &parsed.name_text,
            &self.cleaner,
        );

        if records.is_empty() {
            debug!("Skipping line '{}': no name left after cleaning", raw);
            return Err(DiagnosticReason::NoName);
        }

        Ok(records)
    }

    fn push_diagnostic(
        &self,
        report: &mut NormalizationReport,
        raw: &str,
        normalized: Vec<String>,
        reason: DiagnosticReason,
    ) {
        if self.record_metrics {
            record_diagnostic(reason.as_str());
        }
        report.diagnostics.push(Diagnostic {
            original: raw.to_string(),
            normalized,
            reason,
        });
    }
}

/// Normalize a batch with the built-in tables and default configuration
///
/// # Examples
///
/// ```rust
/// use just_nutrition::normalizer::normalize_ingredients;
/// use just_nutrition::unit_conversion::Unit;
///
/// let records = normalize_ingredients(&["100 ml Soy milk", "100 ML Soy Milk "]);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].quantity, 100.0);
/// assert_eq!(records[0].unit, Some(Unit::Gram));
/// assert_eq!(records[0].name, "soy milk");
/// ```
pub fn normalize_ingredients<S: AsRef<str>>(raw_lines: &[S]) -> Vec<CanonicalIngredient> {
    DEFAULT_NORMALIZER.normalize_ingredients(raw_lines)
}
