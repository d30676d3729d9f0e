use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::middleware::MaybeAuthUser;
use crate::models::dto::SubscriptionResponse;
use crate::routes::server_error;
use crate::services::subscription_service::SubscriptionService;
use crate::utils::email;

// DTO pour subscribe / unsubscribe
#[derive(Deserialize)]
pub struct SubscriptionRequest {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub email: Option<String>,
}

/// POST /api/subscriptions - S'abonner à la newsletter (PUBLIC)
/// L'authentification est best-effort: un token valide attache le compte
/// à l'abonnement, son absence n'empêche pas de s'abonner.
#[post("")]
pub async fn subscribe(
    maybe_user: MaybeAuthUser,
    body: web::Json<SubscriptionRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let clean_email = email::normalize_email(body.email.as_deref().unwrap_or(""));
    if clean_email.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email is required."
        }));
    }
    if !email::is_valid_email(&clean_email) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Please provide a valid email."
        }));
    }

    match SubscriptionService::subscribe(db.get_ref(), &clean_email, maybe_user.user_id).await {
        Ok(sub) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Subscribed successfully.",
            "subscription": SubscriptionResponse {
                email: sub.email,
                status: sub.status,
            },
        })),
        Err(e) => server_error("subscribe: upsert failed", &e),
    }
}

/// POST /api/subscriptions/unsubscribe - Se désabonner (PUBLIC)
/// Répond toujours 200 pour ne pas révéler quels emails existent.
#[post("/unsubscribe")]
pub async fn unsubscribe(
    body: web::Json<SubscriptionRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let clean_email = email::normalize_email(body.email.as_deref().unwrap_or(""));
    if clean_email.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email is required."
        }));
    }

    match SubscriptionService::unsubscribe(db.get_ref(), &clean_email).await {
        Ok(Some(sub)) => HttpResponse::Ok().json(serde_json::json!({
            "message": "You have been unsubscribed (if the email existed).",
            "subscription": SubscriptionResponse {
                email: sub.email,
                status: sub.status,
            },
        })),
        Ok(None) => HttpResponse::Ok().json(serde_json::json!({
            "message": "You have been unsubscribed (if the email existed).",
        })),
        Err(e) => server_error("unsubscribe: update failed", &e),
    }
}

/// GET /api/subscriptions/status?email=... - État d'un abonnement (PUBLIC)
#[get("/status")]
pub async fn status(
    query: web::Query<StatusQuery>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let clean_email = email::normalize_email(query.email.as_deref().unwrap_or(""));
    if clean_email.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email is required."
        }));
    }

    match SubscriptionService::find_by_email(db.get_ref(), &clean_email).await {
        Ok(Some(sub)) => HttpResponse::Ok().json(SubscriptionResponse {
            email: sub.email,
            status: sub.status,
        }),
        Ok(None) => HttpResponse::Ok().json(SubscriptionResponse {
            email: clean_email,
            status: "none".to_string(),
        }),
        Err(e) => server_error("status: query failed", &e),
    }
}

pub fn subscription_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscriptions")
            .service(subscribe)
            .service(unsubscribe)
            .service(status),
    );
}
