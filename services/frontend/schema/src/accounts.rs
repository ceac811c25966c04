use sea_orm::entity::prelude::*;

/// Registered account, including its pending verification codes.
///
/// Never physically deleted: `is_enabled = false` is the soft-delete marker.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    /// Argon2 PHC string; `None` until email confirmation completes.
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub is_admin: bool,
    pub company_id: Option<Uuid>,
    pub is_enabled: bool,
    pub is_confirmed: bool,
    pub email_code: Option<String>,
    pub email_sent_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Phone the onboarding SMS code was sent to; becomes `phone` on confirmation.
    pub pending_phone: Option<String>,
    pub sms_code: Option<String>,
    pub sms_sent_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
