use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

pub const STATUS_SUBSCRIBED: &str = "subscribed";
pub const STATUS_UNSUBSCRIBED: &str = "unsubscribed";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)] // une seule ligne par email normalisé
    pub email: String,
    pub user_id: Option<i32>, // lien souple vers users, NULL si abonné anonyme
    pub status: String,       // 'subscribed' ou 'unsubscribed'
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
