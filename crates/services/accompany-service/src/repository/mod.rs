//! Repository layer for posts and replies.

mod accompany_repository;
pub mod entities;
mod reply_repository;

pub use accompany_repository::{AccompanyRepository, AccompanyStore};
pub use reply_repository::{NewReply, ParentReply, ReplyRepository, ReplyStore};

#[cfg(any(test, feature = "test-utils"))]
pub use accompany_repository::MockAccompanyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use reply_repository::MockReplyRepository;
