use sea_orm::*;

use crate::db::is_unique_violation;
use crate::models::{cart_items, carts, products};

pub struct CartService;

/// Résultat d'un PATCH de quantité: les deux cas "absent" restent
/// distincts pour que la route renvoie le bon message 404.
#[derive(Debug, PartialEq)]
pub enum SetQtyOutcome {
    Updated,
    CartNotFound,
    ItemNotFound,
}

impl CartService {
    pub async fn find_cart(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Option<carts::Model>, DbErr> {
        carts::Entity::find()
            .filter(carts::Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    /// Création paresseuse du panier au premier ajout.
    /// La contrainte UNIQUE sur user_id est l'autorité en cas de race:
    /// un duplicate key se résout en relisant la ligne gagnante.
    pub async fn get_or_create_cart(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<carts::Model, DbErr> {
        if let Some(cart) = Self::find_cart(db, user_id).await? {
            return Ok(cart);
        }

        let new_cart = carts::ActiveModel {
            user_id: Set(user_id),
            ..Default::default()
        };

        match new_cart.insert(db).await {
            Ok(cart) => Ok(cart),
            Err(e) if is_unique_violation(&e) => Self::find_cart(db, user_id)
                .await?
                .ok_or_else(|| DbErr::Custom("Cart missing after duplicate key".to_string())),
            Err(e) => Err(e),
        }
    }

    /// Lignes du panier avec leur produit. Panier inexistant == panier vide.
    pub async fn get_items(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<(cart_items::Model, Option<products::Model>)>, DbErr> {
        let Some(cart) = Self::find_cart(db, user_id).await? else {
            return Ok(Vec::new());
        };

        cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .find_also_related(products::Entity)
            .order_by_asc(cart_items::Column::Id)
            .all(db)
            .await
    }

    /// Upsert d'une ligne: incrémente la quantité si le produit est déjà
    /// présent, sinon insère. Un duplicate key sur (cart_id, product_id)
    /// signifie qu'un ajout concurrent a gagné: on retombe sur l'incrément.
    pub async fn add_item(
        db: &DatabaseConnection,
        user_id: i32,
        product_id: i32,
        qty: i32,
    ) -> Result<(), DbErr> {
        let cart = Self::get_or_create_cart(db, user_id).await?;

        if Self::increment_qty(db, cart.id, product_id, qty).await? {
            return Ok(());
        }

        let new_item = cart_items::ActiveModel {
            cart_id: Set(cart.id),
            product_id: Set(product_id),
            qty: Set(qty),
            ..Default::default()
        };

        match new_item.insert(db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => {
                Self::increment_qty(db, cart.id, product_id, qty).await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn increment_qty(
        db: &DatabaseConnection,
        cart_id: i32,
        product_id: i32,
        by: i32,
    ) -> Result<bool, DbErr> {
        let existing = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .one(db)
            .await?;

        match existing {
            Some(item) => {
                let qty = item.qty + by;
                let mut active: cart_items::ActiveModel = item.into();
                active.qty = Set(qty);
                active.update(db).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remplace la quantité d'une ligne existante (PATCH)
    pub async fn set_qty(
        db: &DatabaseConnection,
        user_id: i32,
        product_id: i32,
        qty: i32,
    ) -> Result<SetQtyOutcome, DbErr> {
        let Some(cart) = Self::find_cart(db, user_id).await? else {
            return Ok(SetQtyOutcome::CartNotFound);
        };

        let existing = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .one(db)
            .await?;

        match existing {
            Some(item) => {
                let mut active: cart_items::ActiveModel = item.into();
                active.qty = Set(qty);
                active.update(db).await?;
                Ok(SetQtyOutcome::Updated)
            }
            None => Ok(SetQtyOutcome::ItemNotFound),
        }
    }

    /// Idempotent: supprimer une ligne absente (ou d'un panier absent) réussit
    pub async fn remove_item(
        db: &DatabaseConnection,
        user_id: i32,
        product_id: i32,
    ) -> Result<(), DbErr> {
        let Some(cart) = Self::find_cart(db, user_id).await? else {
            return Ok(());
        };

        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .exec(db)
            .await?;

        Ok(())
    }

    /// Idempotent: upsert du panier puis suppression de toutes les lignes.
    /// Vider un panier qui n'existe pas encore laisse une ligne carts vide.
    pub async fn clear(db: &DatabaseConnection, user_id: i32) -> Result<(), DbErr> {
        let cart = Self::get_or_create_cart(db, user_id).await?;

        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn cart(id: i32, user_id: i32) -> carts::Model {
        carts::Model {
            id,
            user_id,
            created_at: None,
        }
    }

    fn item(id: i32, cart_id: i32, product_id: i32, qty: i32) -> cart_items::Model {
        cart_items::Model {
            id,
            cart_id,
            product_id,
            qty,
            added_at: None,
        }
    }

    #[tokio::test]
    async fn test_add_existing_product_increments_qty() {
        // Le panier existe et contient déjà le produit avec qty=2:
        // ajouter 3 doit produire un UPDATE avec qty=5, pas un INSERT.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cart(1, 7)]])
            .append_query_results([vec![item(10, 1, 3, 2)]])
            .append_query_results([vec![item(10, 1, 3, 5)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        CartService::add_item(&db, 7, 3, 3).await.unwrap();

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE"));
        assert!(!log.contains("INSERT"));
        assert!(log.contains("Int(Some(5))")); // 2 + 3
    }

    #[tokio::test]
    async fn test_clear_missing_cart_creates_empty_record() {
        // Aucun panier pour cet utilisateur: clear doit en créer un
        // puis supprimer ses lignes (il en ressort vide, sans erreur).
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<carts::Model>::new()])
            .append_query_results([vec![cart(1, 7)]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        CartService::clear(&db, 7).await.unwrap();

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("INSERT"));
        assert!(log.contains("DELETE"));
    }
}
