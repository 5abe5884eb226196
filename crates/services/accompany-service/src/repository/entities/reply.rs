//! Reply entity.

use sea_orm::entity::prelude::*;

use domain::Reply;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accompany_replies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub accompany_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub depth: i32,
    pub reply_order: i32,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Reply {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            accompany_id: model.accompany_id,
            user_id: model.user_id,
            parent_id: model.parent_id,
            depth: model.depth,
            reply_order: model.reply_order,
            content: model.content,
            like_count: model.like_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
