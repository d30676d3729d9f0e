use actix_web::{delete, get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Deserialize;

use crate::middleware::AuthUser;
use crate::models::dto::WishlistItemResponse;
use crate::models::products::Entity as Products;
use crate::routes::server_error;
use crate::services::wishlist_service::WishlistService;

// DTO pour l'ajout à la wishlist
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistRequest {
    pub product_id: Option<i32>,
}

/// GET /api/wishlist - Wishlist de l'utilisateur authentifié (PROTÉGÉE)
#[get("")]
pub async fn get_wishlist(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match WishlistService::get_items(db.get_ref(), auth_user.user_id).await {
        Ok(items) => {
            let items: Vec<WishlistItemResponse> =
                items.into_iter().map(WishlistItemResponse::from).collect();
            HttpResponse::Ok().json(serde_json::json!({ "items": items }))
        }
        Err(e) => server_error("get_wishlist: query failed", &e),
    }
}

/// POST /api/wishlist - Ajouter un produit (PROTÉGÉE)
/// Re-ajouter un produit déjà présent est un no-op.
#[post("")]
pub async fn add_to_wishlist(
    auth_user: AuthUser,
    body: web::Json<AddToWishlistRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let Some(product_id) = body.product_id else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Invalid productId"
        }));
    };

    match Products::find_by_id(product_id).one(db.get_ref()).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Product not found"
            }));
        }
        Err(e) => return server_error("add_to_wishlist: product lookup failed", &e),
    }

    match WishlistService::add_item(db.get_ref(), auth_user.user_id, product_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Added to wishlist"
        })),
        Err(e) => server_error("add_to_wishlist: upsert failed", &e),
    }
}

/// DELETE /api/wishlist/item/{productId} - Retirer un produit (PROTÉGÉE, idempotent)
#[delete("/item/{product_id}")]
pub async fn remove_from_wishlist(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let product_id = path.into_inner();

    match WishlistService::remove_item(db.get_ref(), auth_user.user_id, product_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Removed from wishlist"
        })),
        Err(e) => server_error("remove_from_wishlist: delete failed", &e),
    }
}

/// DELETE /api/wishlist/clear - Vider la wishlist (PROTÉGÉE, idempotent)
#[delete("/clear")]
pub async fn clear_wishlist(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match WishlistService::clear(db.get_ref(), auth_user.user_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Wishlist cleared"
        })),
        Err(e) => server_error("clear_wishlist: clear failed", &e),
    }
}

pub fn wishlist_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wishlist")
            .service(get_wishlist)
            .service(add_to_wishlist)
            .service(clear_wishlist)
            .service(remove_from_wishlist),
    );
}
