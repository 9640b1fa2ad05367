//! # Name Cleaning Module
//!
//! Turns free-text ingredient names into canonical names for nutrition lookups.
//!
//! Steps, in order:
//!
//! 1. lower-case and trim
//! 2. remove every stoplist adjective as a whole word ("extra" is removed from
//!    "extra virgin olive oil" but not from "extraordinary squash")
//! 3. drop empty brackets, collapse whitespace, trim stray punctuation
//! 4. look the result up in the ordered fallback table, first match wins
//! 5. otherwise keep the cleaned text
//!
//! The whole stoplist is compiled into a single alternation pattern when the
//! cleaner is built, longest entries first so "extra virgin" wins over "extra".

use crate::errors::AppResult;
use crate::normalization_tables::{FallbackTarget, NormalizationTables};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{trace, warn};

lazy_static! {
    static ref EMPTY_BRACKETS: Regex =
        Regex::new(r"\(\s*\)|\[\s*\]").expect("Empty bracket pattern should be valid");
}

/// Characters trimmed from both ends of a cleaned name
const EDGE_PUNCTUATION: &[char] = &[',', ';', ':', '.', '-'];

/// Result of cleaning one name
#[derive(Debug, Clone, PartialEq)]
pub enum CleanedName {
    /// One canonical name (may be empty when nothing but adjectives was left)
    Single(String),
    /// The name stands for several ingredients ("salt and pepper")
    FanOut(Vec<String>),
}

impl CleanedName {
    /// Flatten into the list of names, dropping empty ones
    pub fn into_names(self) -> Vec<String> {
        match self {
            CleanedName::Single(name) => {
                if name.is_empty() {
                    Vec::new()
                } else {
                    vec![name]
                }
            }
            CleanedName::FanOut(names) => names.into_iter().filter(|n| !n.is_empty()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
enum FallbackMatcher {
    Substring(String),
    WholeWord(Regex),
}

impl FallbackMatcher {
    fn matches(&self, name: &str) -> bool {
        match self {
            FallbackMatcher::Substring(needle) => name.contains(needle.as_str()),
            FallbackMatcher::WholeWord(pattern) => pattern.is_match(name),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledFallback {
    matcher: FallbackMatcher,
    target: CleanedName,
}

/// Adjective stripping and synonym resolution for ingredient names
#[derive(Debug, Clone)]
pub struct NameCleaner {
    /// `None` when the stoplist is empty
    stoplist: Option<Regex>,
    fallbacks: Vec<CompiledFallback>,
}

impl NameCleaner {
    pub fn new(tables: &NormalizationTables) -> AppResult<Self> {
        let stoplist = build_stoplist_pattern(&tables.adjective_stoplist)?;

        let mut cleaner = Self {
            stoplist,
            fallbacks: Vec::with_capacity(tables.name_fallbacks.len()),
        };

        for fallback in &tables.name_fallbacks {
            // Needles are matched against stripped text, so strip them the same way
            let needle = cleaner.strip_adjectives(&fallback.contains);
            if needle.is_empty() {
                warn!(
                    "Name fallback '{}' holds only stoplist words and can never match; skipping",
                    fallback.contains
                );
                continue;
            }
            let matcher = if fallback.whole_word {
                FallbackMatcher::WholeWord(Regex::new(&format!(
                    r"\b{}\b",
                    regex::escape(&needle)
                ))?)
            } else {
                FallbackMatcher::Substring(needle)
            };

            // Targets go through the same stripping so outputs are always clean
            let target = match &fallback.target {
                FallbackTarget::Single(name) => CleanedName::Single(cleaner.strip_adjectives(name)),
                FallbackTarget::FanOut(names) => CleanedName::FanOut(
                    names.iter().map(|n| cleaner.strip_adjectives(n)).collect(),
                ),
            };

            cleaner.fallbacks.push(CompiledFallback { matcher, target });
        }

        Ok(cleaner)
    }

    /// Steps 1-3: lower-case, remove stoplist adjectives, tidy whitespace and punctuation
    pub fn strip_adjectives(&self, name: &str) -> String {
        let mut text = name.trim().to_lowercase();

        if let Some(stoplist) = &self.stoplist {
            text = stoplist.replace_all(&text, " ").into_owned();
        }

        while EMPTY_BRACKETS.is_match(&text) {
            text = EMPTY_BRACKETS.replace_all(&text, " ").into_owned();
        }

        let collapsed = text.split_whitespace().collect::<Vec<&str>>().join(" ");
        collapsed
            .trim_matches(|c: char| c.is_whitespace() || EDGE_PUNCTUATION.contains(&c))
            .to_string()
    }

    /// Clean an ingredient name, resolving synonyms and fan-outs
    ///
    /// # Examples
    ///
    /// ```rust
    /// use just_nutrition::name_cleaning::{CleanedName, NameCleaner};
    /// use just_nutrition::normalization_tables::NormalizationTables;
    ///
    /// let cleaner = NameCleaner::new(&NormalizationTables::default())?;
    ///
    /// assert_eq!(
    ///     cleaner.clean_name("  Fresh Organic Spinach "),
    ///     CleanedName::Single("spinach".to_string())
    /// );
    /// assert_eq!(
    ///     cleaner.clean_name("Apple Cider Vinegar"),
    ///     CleanedName::Single("vinegar".to_string())
    /// );
    /// assert_eq!(
    ///     cleaner.clean_name("salt and pepper"),
    ///     CleanedName::FanOut(vec!["salt".to_string(), "pepper".to_string()])
    /// );
    /// # Ok::<(), just_nutrition::errors::AppError>(())
    /// ```
    pub fn clean_name(&self, name: &str) -> CleanedName {
        let cleaned = self.strip_adjectives(name);

        for fallback in &self.fallbacks {
            if fallback.matcher.matches(&cleaned) {
                trace!(
                    "Name fallback matched: '{}' -> {:?}",
                    cleaned,
                    fallback.target
                );
                return fallback.target.clone();
            }
        }

        trace!("Cleaned ingredient name: '{}' -> '{}'", name, cleaned);
        CleanedName::Single(cleaned)
    }
}

/// Compile the stoplist into one case-insensitive whole-word alternation
fn build_stoplist_pattern(adjectives: &[String]) -> AppResult<Option<Regex>> {
    let mut entries: Vec<String> = adjectives
        .iter()
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect();

    if entries.is_empty() {
        return Ok(None);
    }

    // Longest first so multi-word entries win, then alphabetical for stability
    entries.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    entries.dedup();

    let alternation = entries
        .iter()
        .map(|entry| {
            entry
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<String>>()
                .join(r"\s+")
        })
        .collect::<Vec<String>>()
        .join("|");

    Ok(Some(Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))?))
}
