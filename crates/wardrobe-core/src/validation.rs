//! # Validation Module
//!
//! Input validation for the action surface.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Mobile UI (TypeScript)                                       │
//! │  ├── Steppers never go below zero                                      │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Actions (Rust)                                               │
//! │  ├── THIS MODULE: names, counts, prices                                │
//! │  └── Failure → ActionReport::Ignored, wardrobe unchanged               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Transitions                                                  │
//! │  └── Clamp whatever slips through (never fail)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Category;
use crate::{DEFAULT_EMOJI, MAX_CATEGORY_ITEMS, MAX_CATEGORY_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a category name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_CATEGORY_NAME_LEN` characters
///
/// ## Example
/// ```rust
/// use wardrobe_core::validation::validate_category_name;
///
/// assert_eq!(validate_category_name("  Socks ").unwrap(), "Socks");
/// assert!(validate_category_name("   ").is_err());
/// ```
pub fn validate_category_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_CATEGORY_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Rejects a name already used by another category (case-insensitive).
///
/// Names are the join key for the bag and batch contents, so "socks" and
/// "Socks" must not coexist.
pub fn validate_unique_name(categories: &[Category], name: &str) -> ValidationResult<()> {
    let lowered = name.to_lowercase();
    if categories.iter().any(|c| c.name.to_lowercase() == lowered) {
        return Err(ValidationError::Duplicate {
            field: "category".to_string(),
            value: name.to_string(),
        });
    }
    Ok(())
}

/// Falls back to the default glyph when none was given.
pub fn normalize_emoji(emoji: &str) -> String {
    let emoji = emoji.trim();
    if emoji.is_empty() {
        DEFAULT_EMOJI.to_string()
    } else {
        emoji.to_string()
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an event count (toss, acquire, retire, stage).
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `MAX_CATEGORY_ITEMS`
pub fn validate_count(count: i64) -> ValidationResult<()> {
    if count <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "count".to_string(),
        });
    }

    if count > MAX_CATEGORY_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "count".to_string(),
            min: 1,
            max: MAX_CATEGORY_ITEMS,
        });
    }

    Ok(())
}

/// Validates the starting stock of a new category. Zero is allowed.
pub fn validate_initial_count(count: i64) -> ValidationResult<()> {
    if !(0..=MAX_CATEGORY_ITEMS).contains(&count) {
        return Err(ValidationError::OutOfRange {
            field: "initial count".to_string(),
            min: 0,
            max: MAX_CATEGORY_ITEMS,
        });
    }
    Ok(())
}

/// Validates that buying `count` more items keeps `owned` within
/// `MAX_CATEGORY_ITEMS`.
pub fn validate_owned_after_purchase(owned: i64, count: i64) -> ValidationResult<()> {
    let room = MAX_CATEGORY_ITEMS.saturating_sub(owned.max(0)).max(0);
    if count > room {
        return Err(ValidationError::OutOfRange {
            field: "count".to_string(),
            min: 1,
            max: room,
        });
    }
    Ok(())
}

/// Validates a purchase price. Free items (zero) are allowed.
pub fn validate_price(price: Option<Money>) -> ValidationResult<()> {
    match price {
        Some(p) if p.cents() < 0 => Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_category_name() {
        assert_eq!(validate_category_name("Socks").unwrap(), "Socks");
        assert_eq!(validate_category_name("  T-Shirts  ").unwrap(), "T-Shirts");
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name(&"A".repeat(41)).is_err());
        assert!(validate_category_name(&"A".repeat(40)).is_ok());
    }

    #[test]
    fn test_validate_unique_name_ignores_case() {
        let categories = vec![Category::new("Socks", "🧦", 4)];
        assert!(validate_unique_name(&categories, "socks").is_err());
        assert!(validate_unique_name(&categories, "Shirts").is_ok());
    }

    #[test]
    fn test_normalize_emoji() {
        assert_eq!(normalize_emoji(""), DEFAULT_EMOJI);
        assert_eq!(normalize_emoji(" 🧦 "), "🧦");
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count(1).is_ok());
        assert!(validate_count(999).is_ok());
        assert!(validate_count(0).is_err());
        assert!(validate_count(-3).is_err());
        assert!(validate_count(1000).is_err());
    }

    #[test]
    fn test_validate_initial_count() {
        assert!(validate_initial_count(0).is_ok());
        assert!(validate_initial_count(-1).is_err());
        assert!(validate_initial_count(1000).is_err());
    }

    #[test]
    fn test_validate_owned_after_purchase() {
        assert!(validate_owned_after_purchase(990, 9).is_ok());
        assert!(validate_owned_after_purchase(990, 10).is_err());
        assert!(validate_owned_after_purchase(0, 999).is_ok());
        assert!(validate_owned_after_purchase(i64::MAX, 1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(None).is_ok());
        assert!(validate_price(Some(Money::zero())).is_ok());
        assert!(validate_price(Some(Money::from_cents(-1))).is_err());
    }
}
