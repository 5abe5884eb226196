use sea_orm_migration::prelude::*;

use super::m20240102_000001_create_accompanies_table::Accompanies;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccompanyReplies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccompanyReplies::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccompanyReplies::AccompanyId).uuid().not_null())
                    .col(ColumnDef::new(AccompanyReplies::UserId).uuid().not_null())
                    .col(ColumnDef::new(AccompanyReplies::ParentId).uuid().null())
                    .col(ColumnDef::new(AccompanyReplies::Depth).integer().not_null())
                    .col(ColumnDef::new(AccompanyReplies::ReplyOrder).integer().not_null())
                    .col(ColumnDef::new(AccompanyReplies::Content).text().not_null())
                    .col(
                        ColumnDef::new(AccompanyReplies::LikeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AccompanyReplies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccompanyReplies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccompanyReplies::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accompany_replies_accompany")
                            .from(AccompanyReplies::Table, AccompanyReplies::AccompanyId)
                            .to(Accompanies::Table, Accompanies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accompany_replies_accompany_order")
                    .table(AccompanyReplies::Table)
                    .col(AccompanyReplies::AccompanyId)
                    .col(AccompanyReplies::ReplyOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccompanyReplyHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccompanyReplyHistories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccompanyReplyHistories::ReplyId).uuid().not_null())
                    .col(
                        ColumnDef::new(AccompanyReplyHistories::AccompanyId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AccompanyReplyHistories::UserId).uuid().not_null())
                    .col(ColumnDef::new(AccompanyReplyHistories::ParentId).uuid().null())
                    .col(ColumnDef::new(AccompanyReplyHistories::Depth).integer().not_null())
                    .col(
                        ColumnDef::new(AccompanyReplyHistories::ReplyOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AccompanyReplyHistories::Content).text().not_null())
                    .col(
                        ColumnDef::new(AccompanyReplyHistories::Action)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccompanyReplyHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccompanyReplyLikes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccompanyReplyLikes::ReplyId).uuid().not_null())
                    .col(ColumnDef::new(AccompanyReplyLikes::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(AccompanyReplyLikes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(AccompanyReplyLikes::ReplyId)
                            .col(AccompanyReplyLikes::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accompany_reply_likes_reply")
                            .from(AccompanyReplyLikes::Table, AccompanyReplyLikes::ReplyId)
                            .to(AccompanyReplies::Table, AccompanyReplies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccompanyReplyLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccompanyReplyHistories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccompanyReplies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AccompanyReplies {
    Table,
    Id,
    AccompanyId,
    UserId,
    ParentId,
    Depth,
    ReplyOrder,
    Content,
    LikeCount,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum AccompanyReplyHistories {
    Table,
    Id,
    ReplyId,
    AccompanyId,
    UserId,
    ParentId,
    Depth,
    ReplyOrder,
    Content,
    Action,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AccompanyReplyLikes {
    Table,
    ReplyId,
    UserId,
    CreatedAt,
}
