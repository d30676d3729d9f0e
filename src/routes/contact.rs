use actix_web::{get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set, ActiveModelTrait};
use serde::Deserialize;

use crate::models::contact_messages::{
    ActiveModel as ContactActiveModel, Column as ContactColumn, Entity as ContactMessages,
    STATUS_NEW,
};
use crate::models::dto::ContactResponse;
use crate::routes::server_error;

// DTO pour un message de contact
#[derive(Deserialize)]
pub struct CreateContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// POST /api/contact - Enregistrer un message de contact (PUBLIC)
#[post("")]
pub async fn create_contact_message(
    body: web::Json<CreateContactRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let name = body.name.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Name is required"
        }));
    }

    let email = body.email.as_deref().map(str::trim).unwrap_or("");
    if email.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email is required"
        }));
    }

    let message = body.message.as_deref().map(str::trim).unwrap_or("");
    if message.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Message is required"
        }));
    }

    let new_message = ContactActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        message: Set(message.to_string()),
        status: Set(STATUS_NEW.to_string()),
        ..Default::default()
    };

    match new_message.insert(db.get_ref()).await {
        Ok(doc) => HttpResponse::Created().json(serde_json::json!({
            "message": "Message stored successfully",
            "contact": ContactResponse::from(doc),
        })),
        Err(e) => server_error("create_contact_message: insert failed", &e),
    }
}

/// GET /api/contact - Lister les messages, le plus récent en premier (admin)
#[get("")]
pub async fn list_contact_messages(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let messages = ContactMessages::find()
        .order_by_desc(ContactColumn::CreatedAt)
        .order_by_desc(ContactColumn::Id)
        .all(db.get_ref())
        .await;

    match messages {
        Ok(messages) => {
            let items: Vec<ContactResponse> =
                messages.into_iter().map(ContactResponse::from).collect();
            HttpResponse::Ok().json(serde_json::json!({ "items": items }))
        }
        Err(e) => server_error("list_contact_messages: query failed", &e),
    }
}

pub fn contact_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contact")
            .service(create_contact_message)
            .service(list_contact_messages),
    );
}
