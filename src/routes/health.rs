use actix_web::{get, HttpResponse};
use chrono::Utc;

use crate::models::dto::HealthResponse;

#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("API is running...")
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        time: Utc::now(),
    };

    HttpResponse::Ok().json(response)
}
