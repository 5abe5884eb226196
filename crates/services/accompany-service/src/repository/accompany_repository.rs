//! Accompany post persistence.
//!
//! Every write that changes a post also appends a history snapshot in the
//! same transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::entities::accompany::{self, ActiveModel, Entity as AccompanyEntity};
use super::entities::{accompany_history, accompany_like, accompany_tag};
use common::{AppError, AppResult, PaginationParams};
use domain::{
    Accompany, AccompanyDraft, AccompanyFilter, AccompanySort, AccompanyStatus, HistoryAction,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccompanyRepository: Send + Sync {
    /// Insert a recruiting post with its tags
    async fn create(&self, user_id: Uuid, draft: AccompanyDraft) -> AppResult<Accompany>;

    /// Live (not deleted) post
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Accompany>>;

    /// Replace every editable field and the tag list
    async fn update(&self, id: Uuid, actor_id: Uuid, draft: AccompanyDraft)
        -> AppResult<Accompany>;

    async fn update_status(
        &self,
        id: Uuid,
        actor_id: Uuid,
        status: AccompanyStatus,
    ) -> AppResult<Accompany>;

    async fn soft_delete(&self, id: Uuid, actor_id: Uuid) -> AppResult<()>;

    async fn increment_view_count(&self, id: Uuid) -> AppResult<()>;

    /// One page of live posts and the total match count
    async fn list(
        &self,
        filter: AccompanyFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Accompany>, u64)>;

    /// Returns false when the like already existed
    async fn add_like(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Returns false when there was no like to remove
    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;
}

/// SeaORM-backed implementation of [`AccompanyRepository`]
pub struct AccompanyStore {
    db: DatabaseConnection,
}

impl AccompanyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn find_live<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<accompany::Model>> {
    Ok(AccompanyEntity::find_by_id(id)
        .filter(accompany::Column::DeletedAt.is_null())
        .one(conn)
        .await?)
}

async fn load_tags<C: ConnectionTrait>(
    conn: &C,
    ids: &[Uuid],
) -> AppResult<HashMap<Uuid, Vec<String>>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = accompany_tag::Entity::find()
        .filter(accompany_tag::Column::AccompanyId.is_in(ids.iter().copied()))
        .order_by_asc(accompany_tag::Column::Position)
        .all(conn)
        .await?;

    let mut tags: HashMap<Uuid, Vec<String>> = HashMap::new();
    for row in rows {
        tags.entry(row.accompany_id).or_default().push(row.name);
    }
    Ok(tags)
}

async fn replace_tags<C: ConnectionTrait>(
    conn: &C,
    accompany_id: Uuid,
    tags: &[String],
) -> AppResult<()> {
    accompany_tag::Entity::delete_many()
        .filter(accompany_tag::Column::AccompanyId.eq(accompany_id))
        .exec(conn)
        .await?;

    if tags.is_empty() {
        return Ok(());
    }

    let rows = tags.iter().enumerate().map(|(position, name)| accompany_tag::ActiveModel {
        id: Set(Uuid::new_v4()),
        accompany_id: Set(accompany_id),
        name: Set(name.clone()),
        position: Set(position as i32),
    });
    accompany_tag::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

async fn record_history<C: ConnectionTrait>(
    conn: &C,
    post: &accompany::Model,
    tags: &[String],
    actor_id: Uuid,
    action: HistoryAction,
) -> AppResult<()> {
    let tags = serde_json::to_value(tags)
        .map_err(|e| AppError::internal(format!("Serialization error: {}", e)))?;

    accompany_history::ActiveModel {
        id: Set(Uuid::new_v4()),
        accompany_id: Set(post.id),
        user_id: Set(actor_id),
        action: Set(action.as_str().to_string()),
        title: Set(post.title.clone()),
        content: Set(post.content.clone()),
        status: Set(post.status.clone()),
        start_trip_date: Set(post.start_trip_date),
        end_trip_date: Set(post.end_trip_date),
        headcount: Set(post.headcount),
        tags: Set(tags),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await?;
    Ok(())
}

async fn adjust_like_count<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    delta: i64,
) -> AppResult<()> {
    AccompanyEntity::update_many()
        .col_expr(
            accompany::Column::LikeCount,
            Expr::col(accompany::Column::LikeCount).add(delta),
        )
        .filter(accompany::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl AccompanyRepository for AccompanyStore {
    async fn create(&self, user_id: Uuid, draft: AccompanyDraft) -> AppResult<Accompany> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let post = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            title: Set(draft.title),
            content: Set(draft.content),
            status: Set(AccompanyStatus::Recruiting.as_str().to_string()),
            continent: Set(draft.destination.continent.as_str().to_string()),
            country: Set(draft.destination.country),
            city: Set(draft.destination.city),
            start_trip_date: Set(draft.start_trip_date),
            end_trip_date: Set(draft.end_trip_date),
            banner_image_url: Set(draft.banner_image_url),
            headcount: Set(draft.headcount),
            view_count: Set(0),
            like_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await?;

        replace_tags(&txn, post.id, &draft.tags).await?;
        record_history(&txn, &post, &draft.tags, user_id, HistoryAction::Create).await?;
        txn.commit().await?;

        post.into_accompany(draft.tags)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Accompany>> {
        let Some(post) = find_live(&self.db, id).await? else {
            return Ok(None);
        };
        let tags = load_tags(&self.db, &[id]).await?.remove(&id).unwrap_or_default();
        post.into_accompany(tags).map(Some)
    }

    async fn update(
        &self,
        id: Uuid,
        actor_id: Uuid,
        draft: AccompanyDraft,
    ) -> AppResult<Accompany> {
        let txn = self.db.begin().await?;
        let mut active: ActiveModel = find_live(&txn, id).await?.ok_or(AppError::NotFound)?.into();

        active.title = Set(draft.title);
        active.content = Set(draft.content);
        active.continent = Set(draft.destination.continent.as_str().to_string());
        active.country = Set(draft.destination.country);
        active.city = Set(draft.destination.city);
        active.start_trip_date = Set(draft.start_trip_date);
        active.end_trip_date = Set(draft.end_trip_date);
        active.banner_image_url = Set(draft.banner_image_url);
        active.headcount = Set(draft.headcount);
        active.updated_at = Set(Utc::now());
        let post = active.update(&txn).await?;

        replace_tags(&txn, id, &draft.tags).await?;
        record_history(&txn, &post, &draft.tags, actor_id, HistoryAction::Update).await?;
        txn.commit().await?;

        post.into_accompany(draft.tags)
    }

    async fn update_status(
        &self,
        id: Uuid,
        actor_id: Uuid,
        status: AccompanyStatus,
    ) -> AppResult<Accompany> {
        let txn = self.db.begin().await?;
        let mut active: ActiveModel = find_live(&txn, id).await?.ok_or(AppError::NotFound)?.into();

        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());
        let post = active.update(&txn).await?;

        let tags = load_tags(&txn, &[id]).await?.remove(&id).unwrap_or_default();
        record_history(&txn, &post, &tags, actor_id, HistoryAction::Update).await?;
        txn.commit().await?;

        post.into_accompany(tags)
    }

    async fn soft_delete(&self, id: Uuid, actor_id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let mut active: ActiveModel = find_live(&txn, id).await?.ok_or(AppError::NotFound)?.into();

        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        let post = active.update(&txn).await?;

        let tags = load_tags(&txn, &[id]).await?.remove(&id).unwrap_or_default();
        record_history(&txn, &post, &tags, actor_id, HistoryAction::Delete).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn increment_view_count(&self, id: Uuid) -> AppResult<()> {
        let result = AccompanyEntity::update_many()
            .col_expr(
                accompany::Column::ViewCount,
                Expr::col(accompany::Column::ViewCount).add(1),
            )
            .filter(accompany::Column::Id.eq(id))
            .filter(accompany::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: AccompanyFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Accompany>, u64)> {
        let mut query = AccompanyEntity::find().filter(accompany::Column::DeletedAt.is_null());
        if let Some(from) = filter.from {
            query = query.filter(accompany::Column::EndTripDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(accompany::Column::StartTripDate.lte(to));
        }

        let total = query.clone().count(&self.db).await?;

        query = match filter.sort {
            AccompanySort::Recent => query,
            AccompanySort::Views => query.order_by_desc(accompany::Column::ViewCount),
            AccompanySort::Likes => query.order_by_desc(accompany::Column::LikeCount),
        };
        let posts = query
            .order_by_desc(accompany::Column::CreatedAt)
            .order_by_asc(accompany::Column::Id)
            .offset(pagination.offset())
            .limit(pagination.limit())
            .all(&self.db)
            .await?;

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut tags = load_tags(&self.db, &ids).await?;

        let items = posts
            .into_iter()
            .map(|post| {
                let post_tags = tags.remove(&post.id).unwrap_or_default();
                post.into_accompany(post_tags)
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok((items, total))
    }

    async fn add_like(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let txn = self.db.begin().await?;
        find_live(&txn, id).await?.ok_or(AppError::NotFound)?;

        let inserted = accompany_like::ActiveModel {
            accompany_id: Set(id),
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

        let deleted = accompany_like::Entity::delete_many()
            .filter(accompany_like::Column::AccompanyId.eq(id))
            .filter(accompany_like::Column::UserId.eq(user_id))
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
