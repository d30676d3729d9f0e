use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

pub const STATUS_NEW: &str = "new";

// Append-only: aucune route d'update ou de delete n'est exposée.
// status suit le workflow admin: 'new' -> 'seen' -> 'resolved'.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: String,
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
