use actix_web::{delete, get, patch, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Deserialize;

use crate::middleware::AuthUser;
use crate::models::dto::CartItemResponse;
use crate::models::products::Entity as Products;
use crate::routes::server_error;
use crate::services::cart_service::{CartService, SetQtyOutcome};

// DTO pour l'ajout au panier
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Option<i32>,
    pub qty: Option<i32>,
}

// DTO pour le changement de quantité
#[derive(Deserialize)]
pub struct UpdateQtyRequest {
    pub qty: Option<i32>,
}

/// GET /api/cart - Contenu du panier de l'utilisateur authentifié (PROTÉGÉE)
#[get("")]
pub async fn get_cart(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    // Panier jamais créé == panier vide
    match CartService::get_items(db.get_ref(), auth_user.user_id).await {
        Ok(items) => {
            let items: Vec<CartItemResponse> =
                items.into_iter().map(CartItemResponse::from).collect();
            HttpResponse::Ok().json(serde_json::json!({ "items": items }))
        }
        Err(e) => server_error("get_cart: query failed", &e),
    }
}

/// POST /api/cart - Ajouter un produit au panier (PROTÉGÉE)
/// Si le produit est déjà présent, la quantité est incrémentée.
#[post("")]
pub async fn add_to_cart(
    auth_user: AuthUser,
    body: web::Json<AddToCartRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let Some(product_id) = body.product_id else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Invalid productId"
        }));
    };

    let qty = body.qty.unwrap_or(1);
    if qty < 1 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "qty must be >= 1"
        }));
    }

    // Le produit doit exister dans le catalogue
    match Products::find_by_id(product_id).one(db.get_ref()).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Product not found"
            }));
        }
        Err(e) => return server_error("add_to_cart: product lookup failed", &e),
    }

    match CartService::add_item(db.get_ref(), auth_user.user_id, product_id, qty).await {
        Ok(()) => HttpResponse::Created().json(serde_json::json!({
            "message": "Added to cart"
        })),
        Err(e) => server_error("add_to_cart: upsert failed", &e),
    }
}

/// PATCH /api/cart/item/{productId} - Remplacer la quantité d'une ligne (PROTÉGÉE)
#[patch("/item/{product_id}")]
pub async fn update_cart_qty(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateQtyRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let product_id = path.into_inner();

    let qty = body.qty.unwrap_or(0);
    if qty < 1 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "qty must be >= 1"
        }));
    }

    match CartService::set_qty(db.get_ref(), auth_user.user_id, product_id, qty).await {
        Ok(SetQtyOutcome::Updated) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Quantity updated"
        })),
        Ok(SetQtyOutcome::CartNotFound) => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Cart not found"
        })),
        Ok(SetQtyOutcome::ItemNotFound) => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Item not in cart"
        })),
        Err(e) => server_error("update_cart_qty: update failed", &e),
    }
}

/// DELETE /api/cart/item/{productId} - Retirer une ligne (PROTÉGÉE, idempotent)
#[delete("/item/{product_id}")]
pub async fn remove_from_cart(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let product_id = path.into_inner();

    match CartService::remove_item(db.get_ref(), auth_user.user_id, product_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Removed from cart"
        })),
        Err(e) => server_error("remove_from_cart: delete failed", &e),
    }
}

/// DELETE /api/cart/clear - Vider le panier (PROTÉGÉE, idempotent)
#[delete("/clear")]
pub async fn clear_cart(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match CartService::clear(db.get_ref(), auth_user.user_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Cart cleared"
        })),
        Err(e) => server_error("clear_cart: clear failed", &e),
    }
}

pub fn cart_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart")
            .service(get_cart)
            .service(add_to_cart)
            .service(update_cart_qty)
            .service(clear_cart)
            .service(remove_from_cart),
    );
}
