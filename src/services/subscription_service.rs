use sea_orm::*;

use crate::db::is_unique_violation;
use crate::models::subscriptions::{self, STATUS_SUBSCRIBED, STATUS_UNSUBSCRIBED};

pub struct SubscriptionService;

impl SubscriptionService {
    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<subscriptions::Model>, DbErr> {
        subscriptions::Entity::find()
            .filter(subscriptions::Column::Email.eq(email))
            .one(db)
            .await
    }

    /// Upsert par email: une ligne existante repasse à 'subscribed'
    /// (et récupère le user_id de l'appelant si elle n'en avait pas),
    /// sinon insertion. `email` doit déjà être normalisé.
    pub async fn subscribe(
        db: &DatabaseConnection,
        email: &str,
        user_id: Option<i32>,
    ) -> Result<subscriptions::Model, DbErr> {
        if let Some(sub) = Self::find_by_email(db, email).await? {
            return Self::mark_subscribed(db, sub, user_id).await;
        }

        let new_sub = subscriptions::ActiveModel {
            email: Set(email.to_string()),
            user_id: Set(user_id),
            status: Set(STATUS_SUBSCRIBED.to_string()),
            ..Default::default()
        };

        match new_sub.insert(db).await {
            Ok(sub) => Ok(sub),
            Err(e) if is_unique_violation(&e) => {
                // race sur l'index unique: un insert concurrent a gagné,
                // on retente en update
                let existing = Self::find_by_email(db, email).await?.ok_or_else(|| {
                    DbErr::Custom("Subscription missing after duplicate key".to_string())
                })?;
                Self::mark_subscribed(db, existing, user_id).await
            }
            Err(e) => Err(e),
        }
    }

    async fn mark_subscribed(
        db: &DatabaseConnection,
        sub: subscriptions::Model,
        user_id: Option<i32>,
    ) -> Result<subscriptions::Model, DbErr> {
        let attach_user = sub.user_id.is_none() && user_id.is_some();

        let mut active: subscriptions::ActiveModel = sub.into();
        active.status = Set(STATUS_SUBSCRIBED.to_string());
        if attach_user {
            active.user_id = Set(user_id);
        }

        active.update(db).await
    }

    /// Passe la ligne à 'unsubscribed' si elle existe.
    /// Retourne None sans erreur sinon (pas d'énumération d'emails).
    pub async fn unsubscribe(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<subscriptions::Model>, DbErr> {
        let Some(sub) = Self::find_by_email(db, email).await? else {
            return Ok(None);
        };

        let mut active: subscriptions::ActiveModel = sub.into();
        active.status = Set(STATUS_UNSUBSCRIBED.to_string());

        active.update(db).await.map(Some)
    }
}
