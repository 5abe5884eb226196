use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TravelPreferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TravelPreferences::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TravelPreferences::Mbti).json().not_null())
                    .col(ColumnDef::new(TravelPreferences::PreferTravelType).string().null())
                    .col(
                        ColumnDef::new(TravelPreferences::PreferTravelThemes)
                            .json()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TravelPreferences::ConsumeStyle).string().null())
                    .col(
                        ColumnDef::new(TravelPreferences::FoodRestrictions)
                            .json()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TravelPreferences::SmokingType).string().null())
                    .col(ColumnDef::new(TravelPreferences::DrinkingType).string().null())
                    .col(
                        ColumnDef::new(TravelPreferences::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_travel_preferences_user")
                            .from(TravelPreferences::Table, TravelPreferences::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TravelPreferences::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TravelPreferences {
    Table,
    UserId,
    Mbti,
    PreferTravelType,
    PreferTravelThemes,
    ConsumeStyle,
    FoodRestrictions,
    SmokingType,
    DrinkingType,
    UpdatedAt,
}
