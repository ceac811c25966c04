use sea_orm::entity::prelude::*;

/// One physical revision of a logical entity.
///
/// `(entity_id, rev)` is the primary key, so two successors of the same revision
/// can never both be inserted. Exactly one row per `entity_id` has `latest = true`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "entity_revisions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub entity_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub rev: i32,
    pub latest: bool,
    pub company_id: Uuid,
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub entity_type: String,
    pub common_name: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub links: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub attributes: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
