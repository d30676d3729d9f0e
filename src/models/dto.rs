//pour les réponses structurées de l'API

use serde::Serialize;
use rust_decimal::Decimal;

use super::{cart_items, contact_messages, products, users, wishlist_items};

/// Projection non sensible d'un utilisateur (jamais le hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<&users::Model> for UserResponse {
    fn from(user: &users::Model) -> Self {
        UserResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub details: String,
    pub price: f64,
    pub rating: f64,
    pub image: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<chrono::NaiveDateTime>,
}

impl From<products::Model> for ProductResponse {
    fn from(p: products::Model) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            details: p.details,
            price: decimal_to_f64(p.price),
            rating: p.rating,
            image: p.image,
            created_at: p.created_at,
        }
    }
}

/// Ligne de panier avec le produit "populé".
/// product est None si le produit a été supprimé du catalogue.
#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub product: Option<ProductResponse>,
    pub qty: i32,
}

impl From<(cart_items::Model, Option<products::Model>)> for CartItemResponse {
    fn from((item, product): (cart_items::Model, Option<products::Model>)) -> Self {
        CartItemResponse {
            product: product.map(ProductResponse::from),
            qty: item.qty,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WishlistItemResponse {
    pub product: Option<ProductResponse>,
}

impl From<(wishlist_items::Model, Option<products::Model>)> for WishlistItemResponse {
    fn from((_item, product): (wishlist_items::Model, Option<products::Model>)) -> Self {
        WishlistItemResponse {
            product: product.map(ProductResponse::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub email: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<chrono::NaiveDateTime>,
}

impl From<contact_messages::Model> for ContactResponse {
    fn from(m: contact_messages::Model) -> Self {
        ContactResponse {
            id: m.id,
            name: m.name,
            email: m.email,
            message: m.message,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub time: chrono::DateTime<chrono::Utc>,
}

// Les prix sont stockés en Decimal mais exposés en nombre JSON
pub fn decimal_to_f64(decimal: Decimal) -> f64 {
    decimal.to_string().parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_decimal_to_f64() {
        assert_eq!(decimal_to_f64(Decimal::from_str("19.99").unwrap()), 19.99);
        assert_eq!(decimal_to_f64(Decimal::ZERO), 0.0);
    }

    #[test]
    fn test_user_response_never_contains_hash() {
        let user = users::Model {
            id: 1,
            name: "Ann".to_string(),
            email: "ann.x@mail.com".to_string(),
            password_hash: "pbkdf2:sha256:260000$x$y".to_string(),
            created_at: None,
        };
        let json = serde_json::to_string(&UserResponse::from(&user)).unwrap();
        assert!(!json.contains("pbkdf2"));
        assert!(json.contains("ann.x@mail.com"));
    }
}
