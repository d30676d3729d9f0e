pub mod auth;
pub mod cart;
pub mod contact;
pub mod health;
pub mod products;
pub mod subscriptions;
pub mod wishlist;

use actix_web::{web, HttpResponse};

/// Réponse 500 unique: le détail part dans les logs, jamais au client
pub(crate) fn server_error(context: &str, err: &dyn std::fmt::Display) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "message": "Server error."
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::index).service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(products::product_routes)
            .configure(cart::cart_routes)
            .configure(wishlist::wishlist_routes)
            .configure(subscriptions::subscription_routes)
            .configure(contact::contact_routes),
    );
}
