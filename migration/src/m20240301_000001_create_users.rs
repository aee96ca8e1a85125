use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Mobile, 32).not_null().unique_key())
                    .col(string_len(User::PasswordHash, 255).not_null())
                    .col(string_len_null(User::Name, 100))
                    .col(string_len_null(User::Gender, 32))
                    .col(date_null(User::Dob))
                    .col(text_null(User::Bio))
                    .col(string_len_null(User::Location, 255))
                    .col(text_null(User::ProfilePic))
                    .col(text_null(User::GovtId))
                    .col(boolean(User::IsVerified).not_null().default(false))
                    // Stored as plain text so the schema also runs on SQLite
                    .col(string_len(User::Role, 16).not_null().default("USER"))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    Mobile,
    PasswordHash,
    Name,
    Gender,
    Dob,
    Bio,
    Location,
    ProfilePic,
    GovtId,
    IsVerified,
    Role,
    CreatedAt,
}
