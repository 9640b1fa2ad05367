//! Validation module for common validation patterns
//!
//! This module provides reusable validation functions for:
//!
//! - Quantity strings (decimals, fractions, mixed numbers)
//! - Serving counts
//! - Basic input constraints on raw ingredient lines

use crate::errors::{AppError, AppResult};

/// Numeric value of a Unicode vulgar fraction character
pub fn vulgar_fraction_value(c: char) -> Option<f64> {
    let value = match c {
        '½' => 1.0 / 2.0,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '¼' => 1.0 / 4.0,
        '¾' => 3.0 / 4.0,
        '⅕' => 1.0 / 5.0,
        '⅖' => 2.0 / 5.0,
        '⅗' => 3.0 / 5.0,
        '⅘' => 4.0 / 5.0,
        '⅙' => 1.0 / 6.0,
        '⅚' => 5.0 / 6.0,
        '⅛' => 1.0 / 8.0,
        '⅜' => 3.0 / 8.0,
        '⅝' => 5.0 / 8.0,
        '⅞' => 7.0 / 8.0,
        _ => return None,
    };
    Some(value)
}

/// Parse quantity string to f64 (handles fractions and decimals)
///
/// # Arguments
/// * `quantity_str` - The quantity string to parse
///
/// # Returns
/// * `Some(f64)` - The parsed quantity value
/// * `None` - Failed to parse the quantity, or it is negative/non-finite
///
/// # Examples
/// ```
/// use just_nutrition::validation::parse_quantity;
///
/// assert_eq!(parse_quantity("2"), Some(2.0));
/// assert_eq!(parse_quantity("1/2"), Some(0.5));
/// assert_eq!(parse_quantity("1 1/2"), Some(1.5));
/// assert_eq!(parse_quantity("2.5"), Some(2.5));
/// assert_eq!(parse_quantity("2,5"), Some(2.5));
/// assert_eq!(parse_quantity("½"), Some(0.5));
/// assert_eq!(parse_quantity("2½"), Some(2.5));
/// assert_eq!(parse_quantity("1/0"), None);
/// assert_eq!(parse_quantity("invalid"), None);
/// ```
pub fn parse_quantity(quantity_str: &str) -> Option<f64> {
    let trimmed = quantity_str.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Mixed number: "1 1/2"
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    if parts.len() == 2 {
        let whole = parse_simple_quantity(parts[0])?;
        let fraction = parse_simple_quantity(parts[1])?;
        let is_fraction = parts[1].contains('/')
            || (parts[1].chars().count() == 1
                && parts[1].chars().all(|c| vulgar_fraction_value(c).is_some()));
        if !is_fraction {
            return None;
        }
        return finite_non_negative(whole + fraction);
    }
    if parts.len() > 2 {
        return None;
    }

    parse_simple_quantity(trimmed).and_then(finite_non_negative)
}

fn parse_simple_quantity(quantity_str: &str) -> Option<f64> {
    // Trailing vulgar fraction: "½" or "2½"
    if let Some(last) = quantity_str.chars().last() {
        if let Some(fraction) = vulgar_fraction_value(last) {
            let whole_part = &quantity_str[..quantity_str.len() - last.len_utf8()];
            let whole = if whole_part.is_empty() {
                0.0
            } else {
                whole_part.parse::<u32>().ok()? as f64
            };
            return Some(whole + fraction);
        }
    }

    if quantity_str.contains('/') {
        // Handle fractions like "1/2"
        let parts: Vec<&str> = quantity_str.split('/').collect();
        if parts.len() != 2 {
            return None;
        }
        let numerator = parts[0].parse::<f64>().ok()?;
        let denominator = parts[1].parse::<f64>().ok()?;
        if denominator == 0.0 {
            return None;
        }
        Some(numerator / denominator)
    } else {
        // Handle regular numbers, replace comma with dot for European format
        quantity_str.replace(',', ".").parse::<f64>().ok()
    }
}

fn finite_non_negative(value: f64) -> Option<f64> {
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Validate a serving count
///
/// # Examples
/// ```
/// use just_nutrition::validation::validate_servings;
///
/// assert!(validate_servings(4).is_ok());
/// assert!(validate_servings(0).is_err());
/// ```
pub fn validate_servings(servings: u32) -> AppResult<u32> {
    if servings == 0 {
        return Err(AppError::Validation(
            "servings must be at least 1".to_string(),
        ));
    }
    if servings > 1000 {
        return Err(AppError::Validation(format!(
            "servings {} is unreasonably large (max 1000)",
            servings
        )));
    }
    Ok(servings)
}

/// Validate basic input constraints on a raw ingredient line
///
/// # Returns
/// * `Ok(())` - Input is within limits
/// * `Err(&str)` - Error type: "empty" or "too_long"
///
/// # Examples
/// ```
/// use just_nutrition::validation::validate_line;
///
/// assert!(validate_line("2 tbsp balsamic glaze", 500).is_ok());
/// assert_eq!(validate_line("   ", 500), Err("empty"));
/// assert_eq!(validate_line(&"a".repeat(501), 500), Err("too_long"));
/// ```
pub fn validate_line(line: &str, max_length: usize) -> Result<(), &'static str> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err("empty");
    }
    if trimmed.chars().count() > max_length {
        return Err("too_long");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_rejects_malformed_values() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("1/2/3"), None);
        assert_eq!(parse_quantity("1 2"), None);
        assert_eq!(parse_quantity("1 1/2 3"), None);
        assert_eq!(parse_quantity("-2"), None);
        assert_eq!(parse_quantity("a½"), None);
    }

    #[test]
    fn test_parse_quantity_fractions() {
        assert_eq!(parse_quantity("3/4"), Some(0.75));
        assert_eq!(parse_quantity("2 1/4"), Some(2.25));
        assert_eq!(parse_quantity("¾"), Some(0.75));
        assert_eq!(parse_quantity("1¼"), Some(1.25));
    }

    #[test]
    fn test_validate_servings_bounds() {
        assert_eq!(validate_servings(1), Ok(1));
        assert_eq!(validate_servings(1000), Ok(1000));
        assert!(validate_servings(1001).is_err());
    }
}
