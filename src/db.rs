// connexion BD

use sea_orm::{Database, DatabaseConnection, DbErr, SqlErr};

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Détecte une violation de contrainte UNIQUE (duplicate key).
/// Permet de traduire la race "double insert" en 409 ou en retry
/// au lieu de laisser remonter un 500 générique.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
