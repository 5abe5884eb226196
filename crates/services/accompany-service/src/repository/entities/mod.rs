//! SeaORM entities for posts, replies and their side tables.

pub mod accompany;
pub mod accompany_history;
pub mod accompany_like;
pub mod accompany_tag;
pub mod reply;
pub mod reply_history;
pub mod reply_like;
