//! Service layer - Business logic.

mod accompany_service;
mod reply_service;

pub use accompany_service::{AccompanyManager, AccompanyService};
pub use reply_service::{ReplyManager, ReplyService};

#[cfg(any(test, feature = "test-utils"))]
pub use accompany_service::MockAccompanyService;
#[cfg(any(test, feature = "test-utils"))]
pub use reply_service::MockReplyService;
