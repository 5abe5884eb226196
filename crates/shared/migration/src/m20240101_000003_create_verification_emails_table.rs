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
                    .table(VerificationEmails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VerificationEmails::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VerificationEmails::Email).string().not_null())
                    .col(ColumnDef::new(VerificationEmails::UserId).uuid().not_null())
                    .col(ColumnDef::new(VerificationEmails::Code).string().not_null())
                    .col(
                        ColumnDef::new(VerificationEmails::VerificationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VerificationEmails::Status).string().not_null())
                    .col(
                        ColumnDef::new(VerificationEmails::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_verification_emails_user")
                            .from(VerificationEmails::Table, VerificationEmails::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The dispatcher polls by status on every tick
        manager
            .create_index(
                Index::create()
                    .name("idx_verification_emails_status")
                    .table(VerificationEmails::Table)
                    .col(VerificationEmails::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_verification_emails_email_code")
                    .table(VerificationEmails::Table)
                    .col(VerificationEmails::Email)
                    .col(VerificationEmails::Code)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VerificationEmails::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VerificationEmails {
    Table,
    Id,
    Email,
    UserId,
    Code,
    VerificationType,
    Status,
    CreatedAt,
}
