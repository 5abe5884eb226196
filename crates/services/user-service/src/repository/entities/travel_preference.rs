//! Travel preference entity. One optional row per user, keyed by user id.

use sea_orm::entity::prelude::*;
use serde::de::DeserializeOwned;

use common::{AppError, AppResult};
use domain::TravelPreference;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "travel_preferences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub mbti: Json,
    pub prefer_travel_type: Option<String>,
    pub prefer_travel_themes: Json,
    pub consume_style: Option<String>,
    pub food_restrictions: Json,
    pub smoking_type: Option<String>,
    pub drinking_type: Option<String>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn set_column<T: DeserializeOwned>(column: &str, value: Json) -> AppResult<Vec<T>> {
    serde_json::from_value(value.clone()).map_err(|_| AppError::corrupt(column, value))
}

fn optional_column<T>(column: &str, value: Option<String>) -> AppResult<Option<T>>
where
    T: std::str::FromStr,
{
    value
        .map(|raw| raw.parse().map_err(|_| AppError::corrupt(column, &raw)))
        .transpose()
}

impl TryFrom<Model> for TravelPreference {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(TravelPreference {
            user_id: model.user_id,
            mbti: set_column("travel_preferences.mbti", model.mbti)?,
            prefer_travel_type: optional_column(
                "travel_preferences.prefer_travel_type",
                model.prefer_travel_type,
            )?,
            prefer_travel_themes: set_column(
                "travel_preferences.prefer_travel_themes",
                model.prefer_travel_themes,
            )?,
            consume_style: optional_column("travel_preferences.consume_style", model.consume_style)?,
            food_restrictions: set_column(
                "travel_preferences.food_restrictions",
                model.food_restrictions,
            )?,
            smoking_type: optional_column("travel_preferences.smoking_type", model.smoking_type)?,
            drinking_type: optional_column("travel_preferences.drinking_type", model.drinking_type)?,
            updated_at: model.updated_at,
        })
    }
}
