//! # Ingredient Deduplication Module
//!
//! Removes repeated canonical records from a normalized batch. Two records are
//! duplicates when their `"{quantity} {unit} {name}"` forms are equal ignoring
//! case; the first occurrence wins and the order of the rest is preserved.

use crate::normalizer::CanonicalIngredient;
use std::collections::HashSet;

/// Case-insensitive identity key of a canonical record
pub fn dedup_key(record: &CanonicalIngredient) -> String {
    record.to_string().to_lowercase()
}

/// Tracks which records a batch has already produced
#[derive(Debug, Default)]
pub struct IngredientDeduplicator {
    seen: HashSet<String>,
    duplicates: usize,
}

impl IngredientDeduplicator {
    /// Create an empty deduplicator for one batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a record is a duplicate
    ///
    /// Returns true if an equal record was already seen and this one should be
    /// dropped, false if it is new (it is remembered from now on).
    pub fn is_duplicate(&mut self, record: &CanonicalIngredient) -> bool {
        if self.seen.insert(dedup_key(record)) {
            false
        } else {
            self.duplicates += 1;
            true
        }
    }

    /// Get statistics about the deduplicator
    pub fn stats(&self) -> DeduplicationStats {
        DeduplicationStats {
            unique_records: self.seen.len(),
            duplicates_dropped: self.duplicates,
        }
    }
}

/// Statistics about one deduplicated batch
#[derive(Debug, Clone, PartialEq)]
pub struct DeduplicationStats {
    /// Number of distinct records kept
    pub unique_records: usize,
    /// Number of records dropped as duplicates
    pub duplicates_dropped: usize,
}
