//! Accompany (trip-companion) posts and their replies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_ACCOMPANY_TAGS, MAX_REPLY_DEPTH, MAX_TAG_LENGTH};
use crate::error::{DomainError, DomainResult};
use crate::macros::string_enum;

string_enum! {
    pub enum AccompanyStatus {
        Recruiting => "RECRUITING",
        Closed => "CLOSED",
    }
}

string_enum! {
    pub enum Continent {
        Asia => "ASIA",
        Europe => "EUROPE",
        NorthAmerica => "NORTH_AMERICA",
        SouthAmerica => "SOUTH_AMERICA",
        Africa => "AFRICA",
        Oceania => "OCEANIA",
    }
}

string_enum! {
    /// Action recorded on a history row
    pub enum HistoryAction {
        Create => "CREATE",
        Update => "UPDATE",
        Delete => "DELETE",
    }
}

string_enum! {
    pub enum AccompanySort {
        Recent => "RECENT",
        Views => "VIEWS",
        Likes => "LIKES",
    }
}

impl Default for AccompanySort {
    fn default() -> Self {
        AccompanySort::Recent
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Destination {
    pub continent: Continent,
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Trip-companion post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Accompany {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub status: AccompanyStatus,
    pub destination: Destination,
    pub start_trip_date: NaiveDate,
    pub end_trip_date: NaiveDate,
    pub banner_image_url: Option<String>,
    pub headcount: i32,
    pub view_count: i64,
    pub like_count: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Accompany {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Editable fields of a post, used for both creation and full update
#[derive(Debug, Clone, PartialEq)]
pub struct AccompanyDraft {
    pub title: String,
    pub content: String,
    pub destination: Destination,
    pub start_trip_date: NaiveDate,
    pub end_trip_date: NaiveDate,
    pub banner_image_url: Option<String>,
    pub headcount: i32,
    pub tags: Vec<String>,
}

impl AccompanyDraft {
    /// Check business rules and normalize tags.
    pub fn normalized(mut self) -> DomainResult<Self> {
        if self.title.trim().is_empty() {
            return Err(DomainError::invalid_argument("Title must not be blank"));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::invalid_argument("Content must not be blank"));
        }
        if self.end_trip_date < self.start_trip_date {
            return Err(DomainError::invalid_argument(
                "Trip end date must not be before its start date",
            ));
        }
        if self.headcount < 1 {
            return Err(DomainError::invalid_argument(
                "Headcount must be at least 1",
            ));
        }
        self.tags = normalize_tags(self.tags)?;
        Ok(self)
    }
}

/// Trim, drop blanks and duplicates, and cap the tag list.
pub fn normalize_tags(tags: Vec<String>) -> DomainResult<Vec<String>> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || normalized.iter().any(|t| t == tag) {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            return Err(DomainError::invalid_argument(format!(
                "Tag '{}' is longer than {} characters",
                tag, MAX_TAG_LENGTH
            )));
        }
        normalized.push(tag.to_string());
    }

    if normalized.len() > MAX_ACCOMPANY_TAGS {
        return Err(DomainError::invalid_argument(format!(
            "At most {} tags are allowed",
            MAX_ACCOMPANY_TAGS
        )));
    }
    Ok(normalized)
}

/// Listing filter. A post matches when its trip overlaps `[from, to]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccompanyFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: AccompanySort,
}

// =============================================================================
// Replies
// =============================================================================

/// Reply on an accompany post. Root replies have depth 0, answers depth 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Reply {
    pub id: Uuid,
    pub accompany_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub depth: i32,
    pub reply_order: i32,
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reply {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Depth of an answer to this reply, if nesting allows one
    pub fn child_depth(&self) -> DomainResult<i32> {
        let depth = self.depth + 1;
        if depth > MAX_REPLY_DEPTH {
            return Err(DomainError::invalid_argument(
                "Replies can only be nested one level deep",
            ));
        }
        Ok(depth)
    }
}

/// Reply content must carry text.
pub fn validate_reply_content(content: &str) -> DomainResult<()> {
    if content.trim().is_empty() {
        return Err(DomainError::invalid_argument("Reply content must not be blank"));
    }
    Ok(())
}
