//! Accompany post entity. Destination columns live on the post row.

use sea_orm::entity::prelude::*;

use common::{AppError, AppResult};
use domain::{Accompany, Destination};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accompanies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub status: String,
    pub continent: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub start_trip_date: Date,
    pub end_trip_date: Date,
    pub banner_image_url: Option<String>,
    pub headcount: i32,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Build the domain post from this row and its ordered tag names.
    pub fn into_accompany(self, tags: Vec<String>) -> AppResult<Accompany> {
        Ok(Accompany {
            status: self
                .status
                .parse()
                .map_err(|_| AppError::corrupt("accompanies.status", &self.status))?,
            destination: Destination {
                continent: self
                    .continent
                    .parse()
                    .map_err(|_| AppError::corrupt("accompanies.continent", &self.continent))?,
                country: self.country,
                city: self.city,
            },
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            start_trip_date: self.start_trip_date,
            end_trip_date: self.end_trip_date,
            banner_image_url: self.banner_image_url,
            headcount: self.headcount,
            view_count: self.view_count,
            like_count: self.like_count,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
