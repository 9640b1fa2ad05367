//! # Composite Splitting Module
//!
//! Expands composite ingredient lines ("1 pinch salt and pepper") into one
//! record per ingredient.
//!
//! Every part inherits the quantity and unit of the original line unchanged.
//! Each part is then run through the [`NameCleaner`], so a part that the
//! fallback table fans out expands further with the same quantity and unit.

use crate::name_cleaning::NameCleaner;
use crate::normalizer::CanonicalIngredient;
use crate::unit_conversion::Unit;
use tracing::debug;

/// Literal separator between the ingredients of a composite line (case-sensitive)
pub const COMPOSITE_SEPARATOR: &str = " and ";

/// Split name text on the composite separator
///
/// Returns the trimmed, non-empty parts; a name without the separator comes back
/// as a single part.
///
/// # Examples
///
/// ```rust
/// use just_nutrition::composite_splitting::split_name_parts;
///
/// assert_eq!(split_name_parts("salt and pepper"), vec!["salt", "pepper"]);
/// assert_eq!(split_name_parts("Salt AND Pepper"), vec!["Salt AND Pepper"]);
/// assert_eq!(split_name_parts("sandwich bread"), vec!["sandwich bread"]);
/// ```
pub fn split_name_parts(name: &str) -> Vec<&str> {
    name.split(COMPOSITE_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Expand one canonicalized line into its final records
///
/// Parts whose cleaned name ends up empty are dropped; the returned list is
/// empty only when no part has a usable name.
pub fn split(
    quantity: f64,
    unit: Option<&Unit>,
    name: &str,
    cleaner: &NameCleaner,
) -> Vec<CanonicalIngredient> {
    let parts = split_name_parts(name);
    if parts.len() > 1 {
        debug!(
            parts = parts.len(),
            "Splitting composite ingredient '{}'", name
        );
    }

    parts
        .into_iter()
        .flat_map(|part| cleaner.clean_name(part).into_names())
        .map(|cleaned| CanonicalIngredient {
            quantity,
            unit: unit.cloned(),
            name: cleaned,
        })
        .collect()
}
