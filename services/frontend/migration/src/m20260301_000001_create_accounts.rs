use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::Email).string().not_null())
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::PasswordHash).string())
                    .col(ColumnDef::new(Accounts::Phone).string())
                    .col(
                        ColumnDef::new(Accounts::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Accounts::CompanyId).uuid())
                    .col(
                        ColumnDef::new(Accounts::IsEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Accounts::IsConfirmed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Accounts::EmailCode).string())
                    .col(ColumnDef::new(Accounts::EmailSentAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Accounts::PendingPhone).string())
                    .col(ColumnDef::new(Accounts::SmsCode).string())
                    .col(ColumnDef::new(Accounts::SmsSentAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Accounts::Table)
                    .col(Accounts::Email)
                    .unique()
                    .name("uq_accounts_email")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Accounts::Table)
                    .col(Accounts::EmailCode)
                    .name("idx_accounts_email_code")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Accounts::Table)
                    .col(Accounts::CompanyId)
                    .name("idx_accounts_company_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    Phone,
    IsAdmin,
    CompanyId,
    IsEnabled,
    IsConfirmed,
    EmailCode,
    EmailSentAt,
    PendingPhone,
    SmsCode,
    SmsSentAt,
    CreatedAt,
    UpdatedAt,
}
