//! # Domain Types
//!
//! Core domain types used throughout Vitrine, shaped like the storefront
//! REST API that produces them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Category     │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (opaque)    │       │
//! │  │  name, price    │   │  name           │   │  name, email    │       │
//! │  │  stock (u32)    │   └─────────────────┘   │  role           │       │
//! │  │  category_id    │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Request payloads: NewProduct, ProductUpdate, NewCategory,             │
//! │                    CheckoutLine                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Server Is the Source of Truth
//! Every product held here is a copy of the server's record. Stock in
//! particular may go stale; see [`crate::catalog`] for how local patches are
//! reconciled.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Server-assigned product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque user identifier.
///
/// Some backends send numeric ids, others strings; both decode here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => UserId(s),
            Raw::Number(n) => UserId(n.to_string()),
        })
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product listed by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Long-form description.
    #[serde(default)]
    pub description: String,

    /// Units available, as last reported by the server (or patched locally).
    pub stock: u32,

    /// Image URL shown on product cards.
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,

    /// Category this product is listed under.
    pub category_id: CategoryId,
}

impl Product {
    /// Builds a product with empty description and image.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        stock: u32,
        category_id: CategoryId,
    ) -> Self {
        Product {
            id,
            name: name.into(),
            price,
            description: String::new(),
            stock,
            image_url: String::new(),
            category_id,
        }
    }

    /// Checks if `quantity` units can be held against the known stock.
    #[inline]
    pub fn can_sell(&self, quantity: u32) -> bool {
        quantity <= self.stock
    }

    /// Checks if the product has any stock left.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

// =============================================================================
// User
// =============================================================================

/// Role granted to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages products and categories.
    Admin,
    /// Browses and buys.
    #[default]
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

/// An authenticated account as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Checks if this account may use admin operations.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// Request Payloads
// =============================================================================

/// Body of `POST /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub description: String,
    pub stock: u32,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub category_id: CategoryId,
}

/// Body of `PUT /products/{id}`.
///
/// Only the fields being changed are sent; `None` fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl ProductUpdate {
    /// An update that only changes stock (the admin edit screen's use).
    pub fn stock(stock: u32) -> Self {
        ProductUpdate {
            stock: Some(stock),
            ..Default::default()
        }
    }

    /// Checks if no field would change.
    pub fn is_empty(&self) -> bool {
        self == &ProductUpdate::default()
    }
}

/// Body of `POST /categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

/// One line of `POST /orders/checkout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_wire_shape() {
        let json = r#"{
            "id": 7,
            "name": "Caneca",
            "price": 10.5,
            "description": "Ceramic mug",
            "stock": 3,
            "imageUrl": "https://img.example/mug.png",
            "category_id": 2
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId(7));
        assert_eq!(product.price, Money::from_cents(1050));
        assert_eq!(product.stock, 3);
        assert_eq!(product.image_url, "https://img.example/mug.png");
        assert_eq!(product.category_id, CategoryId(2));
    }

    #[test]
    fn test_product_rejects_negative_stock() {
        let json = r#"{"id":1,"name":"x","price":1,"stock":-1,"category_id":1}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_user_id_accepts_string_or_number() {
        let a: User =
            serde_json::from_str(r#"{"id":"u-1","name":"Ana","email":"ana@x.io","role":"admin"}"#)
                .unwrap();
        let b: User = serde_json::from_str(r#"{"id":12,"name":"Bia","email":"bia@x.io"}"#).unwrap();

        assert_eq!(a.id, UserId("u-1".to_string()));
        assert!(a.is_admin());
        assert_eq!(b.id, UserId("12".to_string()));
        assert_eq!(b.role, Role::User);
    }

    #[test]
    fn test_product_update_omits_unset_fields() {
        let json = serde_json::to_value(ProductUpdate::stock(4)).unwrap();
        assert_eq!(json, serde_json::json!({ "stock": 4 }));
        assert!(ProductUpdate::default().is_empty());
    }

    #[test]
    fn test_checkout_line_uses_camel_case() {
        let line = CheckoutLine {
            product_id: ProductId(3),
            quantity: 2,
        };
        assert_eq!(
            serde_json::to_value(line).unwrap(),
            serde_json::json!({ "productId": 3, "quantity": 2 })
        );
    }
}
