use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::utils::jwt;

/// Message unique pour TOUS les échecs d'authentification.
/// Un token absent, malformé ou expiré produit exactement la même
/// réponse: un appelant ne peut pas distinguer les trois cas.
const UNAUTHENTICATED_MESSAGE: &str = "Invalid or missing token.";

/// Structure qui contient l'identité de l'utilisateur authentifié.
/// Utilisée comme extracteur dans les routes protégées (cart, wishlist, /me):
/// les requêtes BD sont toujours filtrées par user_id, jamais par un id client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub name: String,
}

/// Variante best-effort: récupère l'identité si un token valide est présent,
/// mais ne rejette JAMAIS la requête. Utilisée sur la création d'abonnement,
/// où un appelant anonyme reste autorisé.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser {
    pub user_id: Option<i32>,
}

fn unauthenticated() -> Error {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "message": UNAUTHENTICATED_MESSAGE
    }));
    actix_web::error::InternalError::from_response("", response).into()
}

/// Extrait le token du header Authorization (format: "Bearer <token>")
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Vérifie le token de la requête et retourne les claims.
/// Toute absence ou tout échec de vérification retourne None.
fn verified_claims(req: &HttpRequest) -> Option<jwt::Claims> {
    let config = req.app_data::<web::Data<AppConfig>>()?;
    let token = bearer_token(req)?;
    jwt::verify_token(token, &config.jwt_secret).ok()
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match verified_claims(req) {
            Some(claims) => ready(Ok(AuthUser {
                user_id: claims.sub,
                email: claims.email,
                name: claims.name,
            })),
            None => ready(Err(unauthenticated())),
        }
    }
}

impl FromRequest for MaybeAuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeAuthUser {
            user_id: verified_claims(req).map(|claims| claims.sub),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{get, test, App};
    use crate::utils::jwt::generate_token;

    #[get("/protected")]
    async fn protected(auth_user: AuthUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "userId": auth_user.user_id }))
    }

    #[get("/optional")]
    async fn optional(maybe: MaybeAuthUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "userId": maybe.user_id }))
    }

    fn test_config() -> web::Data<AppConfig> {
        web::Data::new(AppConfig::for_tests("test-secret"))
    }

    #[actix_web::test]
    async fn test_valid_token_binds_identity() {
        let app = test::init_service(
            App::new().app_data(test_config()).service(protected),
        )
        .await;

        let token = generate_token(42, "ann.x@mail.com", "Ann", "test-secret", 7).unwrap();
        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["userId"], 42);
    }

    #[actix_web::test]
    async fn test_missing_expired_and_garbage_tokens_are_indistinguishable() {
        let app = test::init_service(
            App::new().app_data(test_config()).service(protected),
        )
        .await;

        // Token signé avec un autre secret == token invalide
        let forged = generate_token(42, "a@b.co", "A", "other-secret", 7).unwrap();

        // Token correctement signé mais expiré
        let now = chrono::Utc::now().timestamp();
        let expired_claims = jwt::Claims {
            sub: 42,
            email: "a@b.co".to_string(),
            name: "A".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let expired = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &expired_claims,
            &jsonwebtoken::EncodingKey::from_secret("test-secret".as_ref()),
        )
        .unwrap();

        let missing = test::TestRequest::get().uri("/protected").to_request();
        let garbage = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .to_request();
        let bad_scheme = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", "Basic abc"))
            .to_request();
        let invalid = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", forged)))
            .to_request();
        let elapsed = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", expired)))
            .to_request();

        let mut bodies = Vec::new();
        for req in [missing, garbage, bad_scheme, invalid, elapsed] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 401);
            bodies.push(test::read_body(resp).await);
        }

        // Toutes les réponses sont byte-for-byte identiques
        assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    }

    #[actix_web::test]
    async fn test_maybe_auth_never_rejects() {
        let app = test::init_service(
            App::new().app_data(test_config()).service(optional),
        )
        .await;

        let anonymous = test::TestRequest::get().uri("/optional").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, anonymous).await;
        assert_eq!(body["userId"], serde_json::Value::Null);

        let garbage = test::TestRequest::get()
            .uri("/optional")
            .insert_header(("Authorization", "Bearer nope"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, garbage).await;
        assert_eq!(body["userId"], serde_json::Value::Null);

        let token = generate_token(7, "a@b.co", "A", "test-secret", 7).unwrap();
        let authed = test::TestRequest::get()
            .uri("/optional")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, authed).await;
        assert_eq!(body["userId"], 7);
    }
}
