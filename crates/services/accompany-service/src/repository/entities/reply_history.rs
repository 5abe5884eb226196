use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accompany_reply_histories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reply_id: Uuid,
    pub accompany_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub depth: i32,
    pub reply_order: i32,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub action: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
