use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(uuid(Event::Id).primary_key())
                    .col(uuid(Event::HostId).not_null())
                    .col(string_len(Event::Name, 255).not_null())
                    .col(text(Event::Details).not_null())
                    .col(integer(Event::Capacity).not_null())
                    .col(double(Event::Price).not_null())
                    .col(string_len(Event::Location, 255).not_null())
                    .col(json_binary(Event::Photos).not_null())
                    .col(boolean(Event::AutoApprove).not_null().default(true))
                    .col(timestamp_with_time_zone(Event::Date).not_null())
                    .col(
                        timestamp_with_time_zone(Event::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_host")
                            .from(Event::Table, Event::HostId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_host_date")
                    .table(Event::Table)
                    .col(Event::HostId)
                    .col(Event::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Event {
    Table,
    Id,
    HostId,
    Name,
    Details,
    Capacity,
    Price,
    Location,
    Photos,
    AutoApprove,
    Date,
    CreatedAt,
}
