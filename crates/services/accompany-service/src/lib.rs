//! Accompany Service Library
//!
//! Trip-companion posts, their replies, likes and the append-only
//! history kept for both.

pub mod repository;
pub mod service;

pub use crate::repository::{
    AccompanyRepository, AccompanyStore, NewReply, ParentReply, ReplyRepository, ReplyStore,
};
pub use crate::service::{AccompanyManager, AccompanyService, ReplyManager, ReplyService};
