//! Accompany service - posts, their lifecycle and likes.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt, Paginated, PaginationParams};
use domain::{Accompany, AccompanyDraft, AccompanyFilter, AccompanyStatus};

use crate::repository::AccompanyRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccompanyService: Send + Sync {
    async fn create(&self, user_id: Uuid, draft: AccompanyDraft) -> AppResult<Accompany>;

    /// Author-only full replacement of the editable fields
    async fn update(&self, id: Uuid, user_id: Uuid, draft: AccompanyDraft) -> AppResult<Accompany>;

    /// Author-only; stops recruiting
    async fn close(&self, id: Uuid, user_id: Uuid) -> AppResult<Accompany>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<()>;

    /// Fetch a post and count the view
    async fn detail(&self, id: Uuid) -> AppResult<Accompany>;

    async fn list(
        &self,
        filter: AccompanyFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<Accompany>>;

    async fn like(&self, id: Uuid, user_id: Uuid) -> AppResult<()>;

    async fn unlike(&self, id: Uuid, user_id: Uuid) -> AppResult<()>;
}

pub struct AccompanyManager {
    repo: Arc<dyn AccompanyRepository>,
}

impl AccompanyManager {
    pub fn new(repo: Arc<dyn AccompanyRepository>) -> Self {
        Self { repo }
    }

    async fn owned_post(&self, id: Uuid, user_id: Uuid) -> AppResult<Accompany> {
        let post = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        if !post.is_owned_by(user_id) {
            tracing::warn!(accompany_id = %id, user_id = %user_id, "Rejected change by non-author");
            return Err(AppError::AccessDenied);
        }
        Ok(post)
    }
}

#[async_trait]
impl AccompanyService for AccompanyManager {
    async fn create(&self, user_id: Uuid, draft: AccompanyDraft) -> AppResult<Accompany> {
        let draft = draft.normalized()?;
        let post = self.repo.create(user_id, draft).await?;

        tracing::info!(accompany_id = %post.id, user_id = %user_id, "Accompany post created");
        Ok(post)
    }

    async fn update(&self, id: Uuid, user_id: Uuid, draft: AccompanyDraft) -> AppResult<Accompany> {
        let draft = draft.normalized()?;
        self.owned_post(id, user_id).await?;
        self.repo.update(id, user_id, draft).await
    }

    async fn close(&self, id: Uuid, user_id: Uuid) -> AppResult<Accompany> {
        let post = self.owned_post(id, user_id).await?;
        if post.status == AccompanyStatus::Closed {
            return Ok(post);
        }

        self.repo
            .update_status(id, user_id, AccompanyStatus::Closed)
            .await
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.owned_post(id, user_id).await?;
        self.repo.soft_delete(id, user_id).await?;

        tracing::info!(accompany_id = %id, "Accompany post deleted");
        Ok(())
    }

    async fn detail(&self, id: Uuid) -> AppResult<Accompany> {
        let mut post = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        self.repo.increment_view_count(id).await?;
        post.view_count += 1;
        Ok(post)
    }

    async fn list(
        &self,
        filter: AccompanyFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<Accompany>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(AppError::invalid_argument(
                    "'from' must not be after 'to'",
                ));
            }
        }

        let (items, total) = self.repo.list(filter, pagination).await?;
        Ok(Paginated::new(items, pagination, total))
    }

    async fn like(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        if self.repo.add_like(id, user_id).await? {
            tracing::debug!(accompany_id = %id, user_id = %user_id, "Post liked");
        }
        Ok(())
    }

    async fn unlike(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        if self.repo.remove_like(id, user_id).await? {
            tracing::debug!(accompany_id = %id, user_id = %user_id, "Post like removed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockAccompanyRepository;
    use chrono::{NaiveDate, Utc};
    use domain::{Continent, Destination};

    fn draft() -> AccompanyDraft {
        AccompanyDraft {
            title: "Kyoto in autumn".to_string(),
            content: "Temple hopping, two more people".to_string(),
            destination: Destination {
                continent: Continent::Asia,
                country: Some("Japan".to_string()),
                city: Some("Kyoto".to_string()),
            },
            start_trip_date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            end_trip_date: NaiveDate::from_ymd_opt(2026, 11, 6).unwrap(),
            banner_image_url: None,
            headcount: 3,
            tags: vec!["temples".to_string()],
        }
    }

    fn post(owner: Uuid) -> Accompany {
        let draft = draft();
        Accompany {
            id: Uuid::new_v4(),
            user_id: owner,
            title: draft.title,
            content: draft.content,
            status: AccompanyStatus::Recruiting,
            destination: draft.destination,
            start_trip_date: draft.start_trip_date,
            end_trip_date: draft.end_trip_date,
            banner_image_url: None,
            headcount: draft.headcount,
            view_count: 4,
            like_count: 0,
            tags: draft.tags,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft_before_storage() {
        let mut repo = MockAccompanyRepository::new();
        repo.expect_create().never();

        let mut invalid = draft();
        invalid.headcount = 0;
        let service = AccompanyManager::new(Arc::new(repo));
        let result = service.create(Uuid::new_v4(), invalid).await;

        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_update_by_non_author_is_denied() {
        let owner = Uuid::new_v4();
        let existing = post(owner);
        let mut repo = MockAccompanyRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update().never();

        let service = AccompanyManager::new(Arc::new(repo));
        let result = service.update(Uuid::new_v4(), Uuid::new_v4(), draft()).await;

        assert!(matches!(result, Err(AppError::AccessDenied)));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let mut repo = MockAccompanyRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_soft_delete().never();

        let service = AccompanyManager::new(Arc::new(repo));
        let result = service.delete(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_close_by_author_updates_status() {
        let owner = Uuid::new_v4();
        let existing = post(owner);
        let id = existing.id;
        let mut closed = existing.clone();
        closed.status = AccompanyStatus::Closed;

        let mut repo = MockAccompanyRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update_status()
            .withf(move |post_id, actor, status| {
                *post_id == id && *actor == owner && *status == AccompanyStatus::Closed
            })
            .times(1)
            .returning(move |_, _, _| Ok(closed.clone()));

        let service = AccompanyManager::new(Arc::new(repo));
        let result = service.close(id, owner).await.unwrap();

        assert_eq!(result.status, AccompanyStatus::Closed);
    }

    #[tokio::test]
    async fn test_detail_counts_the_view() {
        let existing = post(Uuid::new_v4());
        let id = existing.id;
        let mut repo = MockAccompanyRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_increment_view_count().times(1).returning(|_| Ok(()));

        let service = AccompanyManager::new(Arc::new(repo));
        let result = service.detail(id).await.unwrap();

        assert_eq!(result.view_count, 5);
    }

    #[tokio::test]
    async fn test_list_rejects_reversed_window() {
        let mut repo = MockAccompanyRepository::new();
        repo.expect_list().never();

        let filter = AccompanyFilter {
            from: NaiveDate::from_ymd_opt(2026, 12, 1),
            to: NaiveDate::from_ymd_opt(2026, 11, 1),
            ..Default::default()
        };
        let service = AccompanyManager::new(Arc::new(repo));
        let result = service.list(filter, PaginationParams::default()).await;

        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_list_wraps_page_metadata() {
        let items = vec![post(Uuid::new_v4())];
        let mut repo = MockAccompanyRepository::new();
        repo.expect_list()
            .returning(move |_, _| Ok((items.clone(), 41)));

        let service = AccompanyManager::new(Arc::new(repo));
        let page = service
            .list(AccompanyFilter::default(), PaginationParams::new(2, 20))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.meta.total, 41);
        assert_eq!(page.meta.total_pages, 3);
    }
}
