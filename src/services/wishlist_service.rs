use sea_orm::*;

use crate::db::is_unique_violation;
use crate::models::{products, wishlist_items, wishlists};

pub struct WishlistService;

impl WishlistService {
    pub async fn find_wishlist(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Option<wishlists::Model>, DbErr> {
        wishlists::Entity::find()
            .filter(wishlists::Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    /// Création paresseuse, même tolérance à la race que le panier
    pub async fn get_or_create_wishlist(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<wishlists::Model, DbErr> {
        if let Some(wl) = Self::find_wishlist(db, user_id).await? {
            return Ok(wl);
        }

        let new_wishlist = wishlists::ActiveModel {
            user_id: Set(user_id),
            ..Default::default()
        };

        match new_wishlist.insert(db).await {
            Ok(wl) => Ok(wl),
            Err(e) if is_unique_violation(&e) => Self::find_wishlist(db, user_id)
                .await?
                .ok_or_else(|| DbErr::Custom("Wishlist missing after duplicate key".to_string())),
            Err(e) => Err(e),
        }
    }

    pub async fn get_items(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<(wishlist_items::Model, Option<products::Model>)>, DbErr> {
        let Some(wl) = Self::find_wishlist(db, user_id).await? else {
            return Ok(Vec::new());
        };

        wishlist_items::Entity::find()
            .filter(wishlist_items::Column::WishlistId.eq(wl.id))
            .find_also_related(products::Entity)
            .order_by_asc(wishlist_items::Column::Id)
            .all(db)
            .await
    }

    /// No-op si le produit est déjà dans la wishlist (y compris quand
    /// un ajout concurrent gagne la course sur l'index unique).
    pub async fn add_item(
        db: &DatabaseConnection,
        user_id: i32,
        product_id: i32,
    ) -> Result<(), DbErr> {
        let wl = Self::get_or_create_wishlist(db, user_id).await?;

        let already_present = wishlist_items::Entity::find()
            .filter(wishlist_items::Column::WishlistId.eq(wl.id))
            .filter(wishlist_items::Column::ProductId.eq(product_id))
            .one(db)
            .await?
            .is_some();

        if already_present {
            return Ok(());
        }

        let new_item = wishlist_items::ActiveModel {
            wishlist_id: Set(wl.id),
            product_id: Set(product_id),
            ..Default::default()
        };

        match new_item.insert(db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Idempotent
    pub async fn remove_item(
        db: &DatabaseConnection,
        user_id: i32,
        product_id: i32,
    ) -> Result<(), DbErr> {
        let Some(wl) = Self::find_wishlist(db, user_id).await? else {
            return Ok(());
        };

        wishlist_items::Entity::delete_many()
            .filter(wishlist_items::Column::WishlistId.eq(wl.id))
            .filter(wishlist_items::Column::ProductId.eq(product_id))
            .exec(db)
            .await?;

        Ok(())
    }

    /// Idempotent: laisse une wishlist vide même si elle n'existait pas
    pub async fn clear(db: &DatabaseConnection, user_id: i32) -> Result<(), DbErr> {
        let wl = Self::get_or_create_wishlist(db, user_id).await?;

        wishlist_items::Entity::delete_many()
            .filter(wishlist_items::Column::WishlistId.eq(wl.id))
            .exec(db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_add_present_product_is_noop() {
        // La wishlist existe et contient déjà le produit:
        // re-ajouter ne doit émettre aucun INSERT.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![wishlists::Model {
                id: 1,
                user_id: 7,
                created_at: None,
            }]])
            .append_query_results([vec![wishlist_items::Model {
                id: 5,
                wishlist_id: 1,
                product_id: 3,
                added_at: None,
            }]])
            .into_connection();

        WishlistService::add_item(&db, 7, 3).await.unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2); // deux SELECT, rien d'autre
        assert!(!format!("{:?}", log).contains("INSERT"));
    }
}
