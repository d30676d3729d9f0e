// Configuration de l'application (lue UNE fois au démarrage)

use std::env;

/// Configuration process-wide, construite dans main() puis partagée
/// via web::Data. Aucun composant ne relit les variables d'environnement.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file");

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not found in .env, using default (INSECURE)");
            "default-insecure-key-change-this".to_string()
        });

        let jwt_expiry_days = env::var("JWT_EXPIRES_IN_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(7);

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(4001);

        AppConfig {
            database_url,
            jwt_secret,
            jwt_expiry_days,
            port,
        }
    }
}

#[cfg(test)]
impl AppConfig {
    /// Configuration de test (pas de variables d'environnement)
    pub fn for_tests(secret: &str) -> Self {
        AppConfig {
            database_url: String::new(),
            jwt_secret: secret.to_string(),
            jwt_expiry_days: 7,
            port: 0,
        }
    }
}
