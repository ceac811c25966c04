use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EntityRevisions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EntityRevisions::EntityId).uuid().not_null())
                    .col(ColumnDef::new(EntityRevisions::Rev).integer().not_null())
                    .col(ColumnDef::new(EntityRevisions::Latest).boolean().not_null())
                    .col(ColumnDef::new(EntityRevisions::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(EntityRevisions::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(EntityRevisions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EntityRevisions::EntityType).string().not_null())
                    .col(ColumnDef::new(EntityRevisions::CommonName).string().not_null())
                    .col(
                        ColumnDef::new(EntityRevisions::Links)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntityRevisions::Attributes)
                            .json_binary()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(EntityRevisions::EntityId)
                            .col(EntityRevisions::Rev),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(EntityRevisions::Table)
                    .col(EntityRevisions::EntityId)
                    .col(EntityRevisions::Latest)
                    .name("idx_entity_revisions_entity_latest")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(EntityRevisions::Table)
                    .col(EntityRevisions::CompanyId)
                    .col(EntityRevisions::Latest)
                    .name("idx_entity_revisions_company_latest")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EntityRevisions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EntityRevisions {
    Table,
    EntityId,
    Rev,
    Latest,
    CompanyId,
    CreatedBy,
    CreatedAt,
    EntityType,
    CommonName,
    Links,
    Attributes,
}
