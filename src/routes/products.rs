use actix_web::{delete, get, post, put, web, HttpResponse};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::models::dto::ProductResponse;
use crate::models::products::{
    ActiveModel as ProductActiveModel, Column as ProductColumn, Entity as Products,
};
use crate::routes::server_error;

// DTO pour la création d'un produit
#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub details: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub image: Option<String>,
}

// DTO pour la mise à jour: seuls les champs fournis sont validés et modifiés
#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub details: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub image: Option<String>,
}

fn product_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "message": "Product not found"
    }))
}

/// POST /api/products - Ajouter un produit au catalogue (PUBLIC)
#[post("")]
pub async fn create_product(
    body: web::Json<CreateProductRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let name = body.name.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "name is required"
        }));
    }

    let details = body.details.as_deref().map(str::trim).unwrap_or("");
    if details.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "details is required"
        }));
    }

    let price = body.price.unwrap_or(0.0);
    if !(price > 0.0) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "price must be positive"
        }));
    }

    let rating = body.rating.unwrap_or(0.0);
    if !(0.0..=5.0).contains(&rating) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "rating must be between 0-5"
        }));
    }

    let price_decimal = match Decimal::from_f64_retain(price) {
        Some(d) => d,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "price must be positive"
            }));
        }
    };

    let new_product = ProductActiveModel {
        name: Set(name.to_string()),
        details: Set(details.to_string()),
        price: Set(price_decimal),
        rating: Set(rating),
        image: Set(body.image.clone().unwrap_or_default()),
        ..Default::default()
    };

    match new_product.insert(db.get_ref()).await {
        Ok(product) => HttpResponse::Created().json(serde_json::json!({
            "message": "Product created",
            "product": ProductResponse::from(product),
        })),
        Err(e) => server_error("create_product: insert failed", &e),
    }
}

/// GET /api/products - Lister le catalogue, le plus récent en premier (PUBLIC)
#[get("")]
pub async fn list_products(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let products = Products::find()
        .order_by_desc(ProductColumn::CreatedAt)
        .order_by_desc(ProductColumn::Id)
        .all(db.get_ref())
        .await;

    match products {
        Ok(products) => {
            let items: Vec<ProductResponse> =
                products.into_iter().map(ProductResponse::from).collect();
            HttpResponse::Ok().json(serde_json::json!({ "items": items }))
        }
        Err(e) => server_error("list_products: query failed", &e),
    }
}

/// GET /api/products/{id} - Détail d'un produit (PUBLIC)
#[get("/{id}")]
pub async fn get_product_by_id(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let id = path.into_inner();

    match Products::find_by_id(id).one(db.get_ref()).await {
        Ok(Some(product)) => HttpResponse::Ok().json(serde_json::json!({
            "product": ProductResponse::from(product)
        })),
        Ok(None) => product_not_found(),
        Err(e) => server_error("get_product_by_id: query failed", &e),
    }
}

/// PUT /api/products/{id} - Mise à jour (validation uniquement sur les champs fournis)
#[put("/{id}")]
pub async fn update_product(
    path: web::Path<i32>,
    body: web::Json<UpdateProductRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let id = path.into_inner();

    // Validations de base (uniquement si le champ est présent)
    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "name cannot be empty"
            }));
        }
    }
    if let Some(details) = &body.details {
        if details.trim().is_empty() {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "details cannot be empty"
            }));
        }
    }
    if let Some(price) = body.price {
        if !(price > 0.0) || Decimal::from_f64_retain(price).is_none() {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "price must be positive"
            }));
        }
    }
    if let Some(rating) = body.rating {
        if !(0.0..=5.0).contains(&rating) {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "rating must be between 0-5"
            }));
        }
    }

    let product = match Products::find_by_id(id).one(db.get_ref()).await {
        Ok(Some(product)) => product,
        Ok(None) => return product_not_found(),
        Err(e) => return server_error("update_product: lookup failed", &e),
    };

    let mut active_model: ProductActiveModel = product.into();
    if let Some(name) = &body.name {
        active_model.name = Set(name.trim().to_string());
    }
    if let Some(details) = &body.details {
        active_model.details = Set(details.trim().to_string());
    }
    if let Some(price) = body.price {
        // from_f64_retain validé plus haut
        if let Some(d) = Decimal::from_f64_retain(price) {
            active_model.price = Set(d);
        }
    }
    if let Some(rating) = body.rating {
        active_model.rating = Set(rating);
    }
    if let Some(image) = &body.image {
        active_model.image = Set(image.trim().to_string());
    }

    match active_model.update(db.get_ref()).await {
        Ok(product) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Product updated",
            "product": ProductResponse::from(product),
        })),
        Err(e) => server_error("update_product: update failed", &e),
    }
}

/// DELETE /api/products/{id} - Retirer un produit du catalogue (PUBLIC)
#[delete("/{id}")]
pub async fn delete_product(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let id = path.into_inner();

    let product = match Products::find_by_id(id).one(db.get_ref()).await {
        Ok(Some(product)) => product,
        Ok(None) => return product_not_found(),
        Err(e) => return server_error("delete_product: lookup failed", &e),
    };

    match product.delete(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Product deleted"
        })),
        Err(e) => server_error("delete_product: delete failed", &e),
    }
}

pub fn product_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .service(create_product)
            .service(list_products)
            .service(get_product_by_id)
            .service(update_product)
            .service(delete_product),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use sea_orm::DatabaseConnection;

    // La validation rejette avant toute requête BD: une connexion
    // Disconnected suffit pour exercer les branches 400.
    async fn send(
        req: test::TestRequest,
    ) -> (u16, serde_json::Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(DatabaseConnection::Disconnected))
                .configure(product_routes),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status().as_u16();
        let body: serde_json::Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_create_requires_name() {
        let req = test::TestRequest::post().uri("/products").set_json(serde_json::json!({
            "details": "d", "price": 10.0
        }));
        let (status, body) = send(req).await;
        assert_eq!(status, 400);
        assert_eq!(body["message"], "name is required");

        // un nom composé d'espaces ne passe pas non plus
        let req = test::TestRequest::post().uri("/products").set_json(serde_json::json!({
            "name": "   ", "details": "d", "price": 10.0
        }));
        let (status, _) = send(req).await;
        assert_eq!(status, 400);
    }

    #[actix_web::test]
    async fn test_create_requires_details() {
        let req = test::TestRequest::post().uri("/products").set_json(serde_json::json!({
            "name": "Chair", "price": 10.0
        }));
        let (status, body) = send(req).await;
        assert_eq!(status, 400);
        assert_eq!(body["message"], "details is required");
    }

    #[actix_web::test]
    async fn test_create_rejects_non_positive_price() {
        for price in [0.0, -5.0] {
            let req = test::TestRequest::post().uri("/products").set_json(serde_json::json!({
                "name": "Chair", "details": "d", "price": price
            }));
            let (status, body) = send(req).await;
            assert_eq!(status, 400);
            assert_eq!(body["message"], "price must be positive");
        }
    }

    #[actix_web::test]
    async fn test_create_rejects_out_of_range_rating() {
        for rating in [-0.5, 5.5] {
            let req = test::TestRequest::post().uri("/products").set_json(serde_json::json!({
                "name": "Chair", "details": "d", "price": 10.0, "rating": rating
            }));
            let (status, body) = send(req).await;
            assert_eq!(status, 400);
            assert_eq!(body["message"], "rating must be between 0-5");
        }
    }

    #[actix_web::test]
    async fn test_update_validates_only_supplied_fields() {
        // champ fourni mais vide -> 400
        let req = test::TestRequest::put().uri("/products/1").set_json(serde_json::json!({
            "name": "  "
        }));
        let (status, body) = send(req).await;
        assert_eq!(status, 400);
        assert_eq!(body["message"], "name cannot be empty");

        let req = test::TestRequest::put().uri("/products/1").set_json(serde_json::json!({
            "details": ""
        }));
        let (status, body) = send(req).await;
        assert_eq!(status, 400);
        assert_eq!(body["message"], "details cannot be empty");

        let req = test::TestRequest::put().uri("/products/1").set_json(serde_json::json!({
            "price": -1.0
        }));
        let (status, body) = send(req).await;
        assert_eq!(status, 400);
        assert_eq!(body["message"], "price must be positive");

        let req = test::TestRequest::put().uri("/products/1").set_json(serde_json::json!({
            "rating": 9.0
        }));
        let (status, body) = send(req).await;
        assert_eq!(status, 400);
        assert_eq!(body["message"], "rating must be between 0-5");
    }

    #[actix_web::test]
    async fn test_non_numeric_id_rejected_before_query() {
        let req = test::TestRequest::get().uri("/products/not-an-id");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(DatabaseConnection::Disconnected))
                .configure(product_routes),
        )
        .await;
        let resp = test::call_service(&app, req.to_request()).await;
        assert!(resp.status().is_client_error());
    }
}
