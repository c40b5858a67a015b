//! # Validation Module
//!
//! Input validation utilities for Vitrine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  ├── Argument parsing (types, required flags)                          │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Stores (Rust)                                                │
//! │  └── THIS MODULE: reject bad input before a request is sent            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  ├── Duplicate email, unknown category                                 │
//! │  └── Returned as `{detail}` and mapped to ClientError::Validation      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vitrine_core::validation::{validate_email, validate_quantity};
//!
//! validate_email("ana@example.com").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{NewCategory, NewProduct, ProductUpdate};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// Account Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@`, with something on both sides
/// - No whitespace
///
/// ## Example
/// ```rust
/// use vitrine_core::validation::validate_email;
///
/// assert!(validate_email("ana@example.com").is_ok());
/// assert!(validate_email("ana@").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid("must contain a single @"));
    };

    if local.is_empty() || domain.is_empty() {
        return Err(invalid("must look like name@domain"));
    }

    Ok(())
}

/// Validates a password typed at login.
///
/// Login only requires a non-empty value; the server decides the rest.
pub fn validate_login_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    Ok(())
}

/// Validates a password chosen at registration.
///
/// ## Rules
/// - Must not be empty
/// - At least [`MIN_PASSWORD_LEN`] characters
pub fn validate_new_password(password: &str) -> ValidationResult<()> {
    validate_login_password(password)?;

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a person's display name.
pub fn validate_person_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 100)
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use vitrine_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Caneca 300ml").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 200)
}

/// Validates a category name.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_text("category name", name, 100)
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates the body of a product creation.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_price_cents(product.price.cents())?;
    Ok(())
}

/// Validates the body of a product update.
///
/// An update must change at least one field.
pub fn validate_product_update(update: &ProductUpdate) -> ValidationResult<()> {
    if update.is_empty() {
        return Err(ValidationError::Required {
            field: "update".to_string(),
        });
    }

    if let Some(name) = &update.name {
        validate_product_name(name)?;
    }

    if let Some(price) = update.price {
        validate_price_cents(price.cents())?;
    }

    Ok(())
}

/// Validates the body of a category creation.
pub fn validate_new_category(category: &NewCategory) -> ValidationResult<()> {
    validate_category_name(&category.name)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  User enters quantity: 5                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty == 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → Stock check in Cart::add_item                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::CategoryId;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("  ana.b+shop@mail.example.org ").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("ana").is_err());
        assert!(validate_email("ana@").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@@example.com").is_err());
        assert!(validate_email("ana@localhost").is_ok());
        assert!(validate_email("a na@example.com").is_err());
    }

    #[test]
    fn test_validate_passwords() {
        assert!(validate_login_password("x").is_ok());
        assert!(validate_login_password("").is_err());

        assert!(validate_new_password("secret").is_ok());
        assert_eq!(
            validate_new_password("abc"),
            Err(ValidationError::TooShort {
                field: "password".to_string(),
                min: MIN_PASSWORD_LEN,
            })
        );
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_person_name("Ana").is_ok());
        assert!(validate_person_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
        assert!(validate_category_name("Bebidas").is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  mug ").unwrap(), "mug");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_product_payloads() {
        let product = NewProduct {
            name: "Mug".to_string(),
            price: Money::from_cents(1000),
            description: String::new(),
            stock: 1,
            image_url: String::new(),
            category_id: CategoryId(1),
        };
        assert!(validate_new_product(&product).is_ok());

        let negative = NewProduct {
            price: Money::from_cents(-1),
            ..product
        };
        assert!(validate_new_product(&negative).is_err());

        assert!(validate_product_update(&ProductUpdate::default()).is_err());
        assert!(validate_product_update(&ProductUpdate::stock(0)).is_ok());
    }
}
