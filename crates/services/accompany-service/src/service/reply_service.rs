//! Reply service - replies on posts, one level of answers, likes.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{validate_reply_content, Reply};

use crate::repository::{AccompanyRepository, NewReply, ParentReply, ReplyRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReplyService: Send + Sync {
    /// Reply to a post, or answer an existing root reply when `parent_id` is set
    async fn create(
        &self,
        accompany_id: Uuid,
        user_id: Uuid,
        parent_id: Option<Uuid>,
        content: String,
    ) -> AppResult<Reply>;

    async fn update(&self, id: Uuid, user_id: Uuid, content: String) -> AppResult<Reply>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<()>;

    async fn list_by_accompany(&self, accompany_id: Uuid) -> AppResult<Vec<Reply>>;

    async fn like(&self, id: Uuid, user_id: Uuid) -> AppResult<()>;

    async fn unlike(&self, id: Uuid, user_id: Uuid) -> AppResult<()>;
}

pub struct ReplyManager {
    replies: Arc<dyn ReplyRepository>,
    accompanies: Arc<dyn AccompanyRepository>,
}

impl ReplyManager {
    pub fn new(replies: Arc<dyn ReplyRepository>, accompanies: Arc<dyn AccompanyRepository>) -> Self {
        Self {
            replies,
            accompanies,
        }
    }

    async fn owned_reply(&self, id: Uuid, user_id: Uuid) -> AppResult<Reply> {
        let reply = self.replies.find_by_id(id).await?.ok_or_not_found()?;
        if !reply.is_owned_by(user_id) {
            return Err(AppError::AccessDenied);
        }
        Ok(reply)
    }
}

#[async_trait]
impl ReplyService for ReplyManager {
    async fn create(
        &self,
        accompany_id: Uuid,
        user_id: Uuid,
        parent_id: Option<Uuid>,
        content: String,
    ) -> AppResult<Reply> {
        validate_reply_content(&content)?;
        self.accompanies
            .find_by_id(accompany_id)
            .await?
            .ok_or_not_found()?;

        let parent = match parent_id {
            Some(parent_id) => {
                let parent = self.replies.find_by_id(parent_id).await?.ok_or_not_found()?;
                if parent.accompany_id != accompany_id {
                    return Err(AppError::invalid_argument(
                        "Parent reply belongs to another post",
                    ));
                }
                Some(ParentReply {
                    id: parent.id,
                    reply_order: parent.reply_order,
                    child_depth: parent.child_depth()?,
                })
            }
            None => None,
        };

        let reply = self
            .replies
            .create(NewReply {
                accompany_id,
                user_id,
                parent,
                content,
            })
            .await?;

        tracing::info!(
            reply_id = %reply.id,
            accompany_id = %accompany_id,
            depth = reply.depth,
            "Reply created"
        );
        Ok(reply)
    }

    async fn update(&self, id: Uuid, user_id: Uuid, content: String) -> AppResult<Reply> {
        validate_reply_content(&content)?;
        self.owned_reply(id, user_id).await?;
        self.replies.update_content(id, content).await
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.owned_reply(id, user_id).await?;
        self.replies.soft_delete(id).await
    }

    async fn list_by_accompany(&self, accompany_id: Uuid) -> AppResult<Vec<Reply>> {
        self.accompanies
            .find_by_id(accompany_id)
            .await?
            .ok_or_not_found()?;
        self.replies.list_by_accompany(accompany_id).await
    }

    async fn like(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.replies.add_like(id, user_id).await?;
        Ok(())
    }

    async fn unlike(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.replies.remove_like(id, user_id).await?;
        Ok(())
    }
}
