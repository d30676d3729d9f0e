use actix_web::{post, get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, Set, ActiveModelTrait};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::db::is_unique_violation;
use crate::middleware::AuthUser;
use crate::models::dto::UserResponse;
use crate::models::users::{Entity as Users, Column as UserColumn, ActiveModel as UserActiveModel};
use crate::routes::server_error;
use crate::utils::{email, jwt, password};

const MIN_PASSWORD_LENGTH: usize = 6;

// DTO pour l'inscription
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// DTO pour le reset direct du mot de passe
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Même réponse pour "email inconnu" et "mauvais mot de passe":
/// l'existence d'un compte ne doit pas être observable.
fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({
        "message": "Invalid credentials."
    }))
}

/// POST /api/auth/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    // 1. Validation des champs
    let name = body.name.as_deref().map(str::trim).unwrap_or("");
    let raw_email = body.email.as_deref().unwrap_or("");
    let pass = body.password.as_deref().unwrap_or("");

    if name.is_empty() || raw_email.trim().is_empty() || pass.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Name, email and password are required."
        }));
    }
    if pass.len() < MIN_PASSWORD_LENGTH {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Password must be at least 6 characters."
        }));
    }

    let clean_email = email::normalize_email(raw_email);
    if !email::is_valid_email(&clean_email) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Please provide a valid email."
        }));
    }

    // 2. Vérification explicite d'existence
    // (la contrainte UNIQUE en BD reste le filet de sécurité en cas de race)
    match Users::find()
        .filter(UserColumn::Email.eq(&clean_email))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "message": "An account with this email already exists."
            }));
        }
        Err(e) => return server_error("register: user lookup failed", &e),
        _ => {}
    }

    // 3. Hash du mot de passe
    let password_hash = match password::hash_password(pass) {
        Ok(hash) => hash,
        Err(e) => return server_error("register: password hash failed", &e),
    };

    // 4. Création de l'utilisateur
    let new_user = UserActiveModel {
        name: Set(name.to_string()),
        email: Set(clean_email),
        password_hash: Set(password_hash),
        ..Default::default()
    };

    let user = match new_user.insert(db.get_ref()).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            // double insert concurrent: même issue que la vérification explicite
            return HttpResponse::Conflict().json(serde_json::json!({
                "message": "Email already registered."
            }));
        }
        Err(e) => return server_error("register: insert failed", &e),
    };

    // 5. Génération du JWT
    let token = match jwt::generate_token(
        user.id,
        &user.email,
        &user.name,
        &config.jwt_secret,
        config.jwt_expiry_days,
    ) {
        Ok(token) => token,
        Err(e) => return server_error("register: token generation failed", &e),
    };

    HttpResponse::Created().json(serde_json::json!({
        "message": "Registration successful.",
        "user": UserResponse::from(&user),
        "token": token,
    }))
}

/// POST /api/auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    let clean_email = email::normalize_email(body.email.as_deref().unwrap_or(""));
    let pass = body.password.as_deref().unwrap_or("");

    // 1. Trouver l'utilisateur
    let user = match Users::find()
        .filter(UserColumn::Email.eq(&clean_email))
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return invalid_credentials(),
        Err(e) => return server_error("login: user lookup failed", &e),
    };

    // 2. Vérifier le mot de passe (comparaison en temps constant des hashs)
    let is_valid = match password::verify_password(pass, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => return server_error("login: password verification failed", &e),
    };

    if !is_valid {
        return invalid_credentials();
    }

    // 3. Générer le JWT
    let token = match jwt::generate_token(
        user.id,
        &user.email,
        &user.name,
        &config.jwt_secret,
        config.jwt_expiry_days,
    ) {
        Ok(token) => token,
        Err(e) => return server_error("login: token generation failed", &e),
    };

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Login successful.",
        "user": UserResponse::from(&user),
        "token": token,
    }))
}

/// GET /api/auth/me - Identité courante (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    // Le compte peut avoir disparu après l'émission du token: 404, pas 401
    match Users::find_by_id(auth_user.user_id).one(db.get_ref()).await {
        Ok(Some(user)) => HttpResponse::Ok().json(serde_json::json!({
            "user": UserResponse::from(&user)
        })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "message": "User not found."
        })),
        Err(e) => server_error("me: user lookup failed", &e),
    }
}

/// POST /api/auth/reset-password-direct - Reset direct du mot de passe (PUBLIC)
#[post("/reset-password-direct")]
pub async fn reset_password_direct(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let raw_email = body.email.as_deref().unwrap_or("");
    let new_password = body.new_password.as_deref().unwrap_or("");
    let confirm_password = body.confirm_password.as_deref().unwrap_or("");

    if raw_email.trim().is_empty() || new_password.is_empty() || confirm_password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email, new password and confirm password are required."
        }));
    }
    if new_password != confirm_password {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Passwords do not match."
        }));
    }
    if new_password.len() < MIN_PASSWORD_LENGTH {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Password must be at least 6 characters."
        }));
    }

    let clean_email = email::normalize_email(raw_email);

    let user = match Users::find()
        .filter(UserColumn::Email.eq(&clean_email))
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            // Réponse succès générique: ne pas révéler quels emails existent
            return HttpResponse::Ok().json(serde_json::json!({
                "message": "If that email exists, the password has been reset."
            }));
        }
        Err(e) => return server_error("reset-password: user lookup failed", &e),
    };

    let password_hash = match password::hash_password(new_password) {
        Ok(hash) => hash,
        Err(e) => return server_error("reset-password: hash failed", &e),
    };

    let mut active_model: UserActiveModel = user.into();
    active_model.password_hash = Set(password_hash);

    match active_model.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Password reset successful. You can now log in."
        })),
        Err(e) => server_error("reset-password: update failed", &e),
    }
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(me)
            .service(reset_password_direct),
    );
}
