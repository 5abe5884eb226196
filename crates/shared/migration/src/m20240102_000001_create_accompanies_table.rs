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
                    .table(Accompanies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accompanies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accompanies::UserId).uuid().not_null())
                    .col(ColumnDef::new(Accompanies::Title).string().not_null())
                    .col(ColumnDef::new(Accompanies::Content).text().not_null())
                    .col(ColumnDef::new(Accompanies::Status).string().not_null())
                    .col(ColumnDef::new(Accompanies::Continent).string().not_null())
                    .col(ColumnDef::new(Accompanies::Country).string().null())
                    .col(ColumnDef::new(Accompanies::City).string().null())
                    .col(ColumnDef::new(Accompanies::StartTripDate).date().not_null())
                    .col(ColumnDef::new(Accompanies::EndTripDate).date().not_null())
                    .col(ColumnDef::new(Accompanies::BannerImageUrl).string().null())
                    .col(ColumnDef::new(Accompanies::Headcount).integer().not_null())
                    .col(
                        ColumnDef::new(Accompanies::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accompanies::LikeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accompanies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accompanies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accompanies::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accompanies_user")
                            .from(Accompanies::Table, Accompanies::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accompanies_deleted_at")
                    .table(Accompanies::Table)
                    .col(Accompanies::DeletedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccompanyTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccompanyTags::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AccompanyTags::AccompanyId).uuid().not_null())
                    .col(ColumnDef::new(AccompanyTags::Name).string().not_null())
                    .col(ColumnDef::new(AccompanyTags::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accompany_tags_accompany")
                            .from(AccompanyTags::Table, AccompanyTags::AccompanyId)
                            .to(Accompanies::Table, Accompanies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccompanyHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccompanyHistories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccompanyHistories::AccompanyId).uuid().not_null())
                    .col(ColumnDef::new(AccompanyHistories::UserId).uuid().not_null())
                    .col(ColumnDef::new(AccompanyHistories::Action).string().not_null())
                    .col(ColumnDef::new(AccompanyHistories::Title).string().not_null())
                    .col(ColumnDef::new(AccompanyHistories::Content).text().not_null())
                    .col(ColumnDef::new(AccompanyHistories::Status).string().not_null())
                    .col(ColumnDef::new(AccompanyHistories::StartTripDate).date().not_null())
                    .col(ColumnDef::new(AccompanyHistories::EndTripDate).date().not_null())
                    .col(ColumnDef::new(AccompanyHistories::Headcount).integer().not_null())
                    .col(ColumnDef::new(AccompanyHistories::Tags).json().not_null())
                    .col(
                        ColumnDef::new(AccompanyHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccompanyLikes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccompanyLikes::AccompanyId).uuid().not_null())
                    .col(ColumnDef::new(AccompanyLikes::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(AccompanyLikes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(AccompanyLikes::AccompanyId)
                            .col(AccompanyLikes::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accompany_likes_accompany")
                            .from(AccompanyLikes::Table, AccompanyLikes::AccompanyId)
                            .to(Accompanies::Table, Accompanies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccompanyLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccompanyHistories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccompanyTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accompanies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Accompanies {
    Table,
    Id,
    UserId,
    Title,
    Content,
    Status,
    Continent,
    Country,
    City,
    StartTripDate,
    EndTripDate,
    BannerImageUrl,
    Headcount,
    ViewCount,
    LikeCount,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum AccompanyTags {
    Table,
    Id,
    AccompanyId,
    Name,
    Position,
}

#[derive(DeriveIden)]
enum AccompanyHistories {
    Table,
    Id,
    AccompanyId,
    UserId,
    Action,
    Title,
    Content,
    Status,
    StartTripDate,
    EndTripDate,
    Headcount,
    Tags,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AccompanyLikes {
    Table,
    AccompanyId,
    UserId,
    CreatedAt,
}
