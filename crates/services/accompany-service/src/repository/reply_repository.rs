//! Reply persistence.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::entities::reply::{self, ActiveModel, Entity as ReplyEntity};
use super::entities::{reply_history, reply_like};
use common::{AppError, AppResult};
use domain::{HistoryAction, Reply};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fields of a reply about to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReply {
    pub accompany_id: Uuid,
    pub user_id: Uuid,
    pub parent: Option<ParentReply>,
    pub content: String,
}

/// Position of the reply being answered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentReply {
    pub id: Uuid,
    pub reply_order: i32,
    pub child_depth: i32,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReplyRepository: Send + Sync {
    /// Root replies go to the end of the post; answers share their parent's order
    async fn create(&self, reply: NewReply) -> AppResult<Reply>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reply>>;

    async fn update_content(&self, id: Uuid, content: String) -> AppResult<Reply>;

    async fn soft_delete(&self, id: Uuid) -> AppResult<()>;

    async fn list_by_accompany(&self, accompany_id: Uuid) -> AppResult<Vec<Reply>>;

    async fn add_like(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;
}

pub struct ReplyStore {
    db: DatabaseConnection,
}

impl ReplyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn find_live<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<reply::Model>> {
    Ok(ReplyEntity::find_by_id(id)
        .filter(reply::Column::DeletedAt.is_null())
        .one(conn)
        .await?)
}

async fn next_root_order<C: ConnectionTrait>(conn: &C, accompany_id: Uuid) -> AppResult<i32> {
    let last = ReplyEntity::find()
        .filter(reply::Column::AccompanyId.eq(accompany_id))
        .order_by_desc(reply::Column::ReplyOrder)
        .limit(1)
        .one(conn)
        .await?;
    Ok(last.map_or(0, |r| r.reply_order + 1))
}

async fn record_history<C: ConnectionTrait>(
    conn: &C,
    reply: &reply::Model,
    action: HistoryAction,
) -> AppResult<()> {
    reply_history::ActiveModel {
        id: Set(Uuid::new_v4()),
        reply_id: Set(reply.id),
        accompany_id: Set(reply.accompany_id),
        user_id: Set(reply.user_id),
        parent_id: Set(reply.parent_id),
        depth: Set(reply.depth),
        reply_order: Set(reply.reply_order),
        content: Set(reply.content.clone()),
        action: Set(action.as_str().to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await?;
    Ok(())
}

async fn adjust_like_count<C: ConnectionTrait>(conn: &C, id: Uuid, delta: i64) -> AppResult<()> {
    ReplyEntity::update_many()
        .col_expr(
            reply::Column::LikeCount,
            Expr::col(reply::Column::LikeCount).add(delta),
        )
        .filter(reply::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl ReplyRepository for ReplyStore {
    async fn create(&self, new_reply: NewReply) -> AppResult<Reply> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let (parent_id, depth, reply_order) = match new_reply.parent {
            Some(parent) => (Some(parent.id), parent.child_depth, parent.reply_order),
            None => (None, 0, next_root_order(&txn, new_reply.accompany_id).await?),
        };

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            accompany_id: Set(new_reply.accompany_id),
            user_id: Set(new_reply.user_id),
            parent_id: Set(parent_id),
            depth: Set(depth),
            reply_order: Set(reply_order),
            content: Set(new_reply.content),
            like_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await?;

        record_history(&txn, &model, HistoryAction::Create).await?;
        txn.commit().await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reply>> {
        Ok(find_live(&self.db, id).await?.map(Reply::from))
    }

    async fn update_content(&self, id: Uuid, content: String) -> AppResult<Reply> {
        let txn = self.db.begin().await?;
        let mut active: ActiveModel = find_live(&txn, id).await?.ok_or(AppError::NotFound)?.into();

        active.content = Set(content);
        active.updated_at = Set(Utc::now());
        let model = active.update(&txn).await?;

        record_history(&txn, &model, HistoryAction::Update).await?;
        txn.commit().await?;
        Ok(model.into())
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let mut active: ActiveModel = find_live(&txn, id).await?.ok_or(AppError::NotFound)?.into();

        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        let model = active.update(&txn).await?;

        record_history(&txn, &model, HistoryAction::Delete).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn list_by_accompany(&self, accompany_id: Uuid) -> AppResult<Vec<Reply>> {
        let replies = ReplyEntity::find()
            .filter(reply::Column::AccompanyId.eq(accompany_id))
            .filter(reply::Column::DeletedAt.is_null())
            .order_by_asc(reply::Column::ReplyOrder)
            .order_by_asc(reply::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(replies.into_iter().map(Reply::from).collect())
    }

    async fn add_like(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let txn = self.db.begin().await?;
        find_live(&txn, id).await?.ok_or(AppError::NotFound)?;

        let inserted = reply_like::ActiveModel {
            reply_id: Set(id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await;

        match inserted {
            Ok(_) => {
                adjust_like_count(&txn, id, 1).await?;
                txn.commit().await?;
                Ok(true)
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                txn.rollback().await?;
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let txn = self.db.begin().await?;
        find_live(&txn, id).await?.ok_or(AppError::NotFound)?;

        let deleted = reply_like::Entity::delete_many()
            .filter(reply_like::Column::ReplyId.eq(id))
            .filter(reply_like::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        if deleted.rows_affected == 0 {
            return Ok(false);
        }
        adjust_like_count(&txn, id, -1).await?;
        txn.commit().await?;
        Ok(true)
    }
}
