use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

/// Claims du token: identité complète de l'utilisateur.
/// `sub` est l'id utilisé pour scoper le panier / la wishlist.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user id
    pub email: String,
    pub name: String,
    pub iat: i64,        // issued-at timestamp
    pub exp: i64,        // expiration timestamp
}

/// Génère un JWT signé pour un utilisateur.
/// Fonction pure de ses entrées + horloge (aucun état, aucune BD).
pub fn generate_token(
    user_id: i32,
    email: &str,
    name: &str,
    secret: &str,
    expiry_days: i64,
) -> Result<String, String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::days(expiry_days))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        name: name.to_string(),
        iat: now.timestamp(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un JWT.
/// Échoue si la signature est invalide, le payload malformé,
/// ou l'expiration dépassée (validée par défaut par jsonwebtoken).
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_generate_and_verify_token() {
        let token = generate_token(123, "ann.x@mail.com", "Ann", SECRET, 7).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, 123);
        assert_eq!(claims.email, "ann.x@mail.com");
        assert_eq!(claims.name, "Ann");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid.token.here", SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = generate_token(1, "a@b.co", "A", SECRET, 7).unwrap();
        assert!(verify_token(&token, "another-secret").is_err());
    }

    #[test]
    fn test_expired_token() {
        // Token signé avec le bon secret mais déjà expiré
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "a@b.co".to_string(),
            name: "A".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token, SECRET).is_err());
    }
}
