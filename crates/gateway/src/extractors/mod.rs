//! Request extractors whose rejections go through [`AppError`](common::AppError).

mod rejecting;
mod validated_json;

pub use rejecting::{Json, Path, Query};
pub use validated_json::ValidatedJson;
