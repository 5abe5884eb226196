//! Travel preference sub-record of a user.
//!
//! The record is optional: a user has none until the first update creates it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::macros::string_enum;

string_enum! {
    pub enum Mbti {
        Istj => "ISTJ",
        Isfj => "ISFJ",
        Infj => "INFJ",
        Intj => "INTJ",
        Istp => "ISTP",
        Isfp => "ISFP",
        Infp => "INFP",
        Intp => "INTP",
        Estp => "ESTP",
        Esfp => "ESFP",
        Enfp => "ENFP",
        Entp => "ENTP",
        Estj => "ESTJ",
        Esfj => "ESFJ",
        Enfj => "ENFJ",
        Entj => "ENTJ",
    }
}

string_enum! {
    pub enum TravelType {
        Planned => "PLANNED",
        Spontaneous => "SPONTANEOUS",
    }
}

string_enum! {
    pub enum TravelTheme {
        Food => "FOOD",
        Nature => "NATURE",
        Culture => "CULTURE",
        Shopping => "SHOPPING",
        Activity => "ACTIVITY",
        Relaxation => "RELAXATION",
        Photo => "PHOTO",
    }
}

string_enum! {
    pub enum ConsumeStyle {
        Saving => "SAVING",
        Moderate => "MODERATE",
        Flex => "FLEX",
    }
}

string_enum! {
    pub enum FoodRestriction {
        Vegetarian => "VEGETARIAN",
        Vegan => "VEGAN",
        Halal => "HALAL",
        NoSeafood => "NO_SEAFOOD",
        NoPork => "NO_PORK",
        NoBeef => "NO_BEEF",
    }
}

string_enum! {
    pub enum SmokingType {
        NonSmoker => "NON_SMOKER",
        Smoker => "SMOKER",
        Electronic => "ELECTRONIC",
    }
}

string_enum! {
    pub enum DrinkingType {
        Never => "NEVER",
        Sometimes => "SOMETIMES",
        Often => "OFTEN",
    }
}

/// Stored travel preference of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TravelPreference {
    pub user_id: Uuid,
    pub mbti: Vec<Mbti>,
    pub prefer_travel_type: Option<TravelType>,
    pub prefer_travel_themes: Vec<TravelTheme>,
    pub consume_style: Option<ConsumeStyle>,
    pub food_restrictions: Vec<FoodRestriction>,
    pub smoking_type: Option<SmokingType>,
    pub drinking_type: Option<DrinkingType>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of the travel preference record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TravelPreferenceInput {
    #[serde(default)]
    pub mbti: Vec<Mbti>,
    pub prefer_travel_type: Option<TravelType>,
    #[serde(default)]
    pub prefer_travel_themes: Vec<TravelTheme>,
    pub consume_style: Option<ConsumeStyle>,
    #[serde(default)]
    pub food_restrictions: Vec<FoodRestriction>,
    pub smoking_type: Option<SmokingType>,
    pub drinking_type: Option<DrinkingType>,
}

impl TravelPreferenceInput {
    /// Collapse repeated entries in the set-valued fields, keeping first occurrence order.
    pub fn normalized(mut self) -> Self {
        dedup_in_order(&mut self.mbti);
        dedup_in_order(&mut self.prefer_travel_themes);
        dedup_in_order(&mut self.food_restrictions);
        self
    }
}

fn dedup_in_order<T: PartialEq + Copy>(values: &mut Vec<T>) {
    let mut seen: Vec<T> = Vec::with_capacity(values.len());
    values.retain(|value| {
        if seen.contains(value) {
            false
        } else {
            seen.push(*value);
            true
        }
    });
}
