use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::Expr,
};

use firmq_core::sea_ext::is_unique_violation;
use firmq_domain::access::TenantScope;
use firmq_domain::id::{AccountId, CompanyId, EntityId};
use firmq_frontend_schema::{accounts, entity_revisions};

use crate::domain::repository::{AccountRepository, EntityRepository};
use crate::domain::types::{Account, AccountChanges, EntityBody, EntityRevision};
use crate::error::FrontendError;

// ── Account repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, FrontendError> {
        let model = accounts::Entity::find_by_id(id.as_uuid())
            .one(&self.db)
            .await
            .context("find account by id")?;
        Ok(model.map(account_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, FrontendError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find account by email")?;
        Ok(model.map(account_from_model))
    }

    async fn find_by_email_code(&self, code: &str) -> Result<Option<Account>, FrontendError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::EmailCode.eq(code))
            .one(&self.db)
            .await
            .context("find account by email code")?;
        Ok(model.map(account_from_model))
    }

    async fn list_active(&self) -> Result<Vec<Account>, FrontendError> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::IsEnabled.eq(true))
            .filter(accounts::Column::IsConfirmed.eq(true))
            .order_by_asc(accounts::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list active accounts")?;
        Ok(models.into_iter().map(account_from_model).collect())
    }

    async fn list_by_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Account>, FrontendError> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id.as_uuid()))
            .filter(accounts::Column::IsEnabled.eq(true))
            .order_by_asc(accounts::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list company accounts")?;
        Ok(models.into_iter().map(account_from_model).collect())
    }

    async fn create(&self, account: &Account) -> Result<(), FrontendError> {
        let model = accounts::ActiveModel {
            id: Set(account.id.as_uuid()),
            email: Set(account.email.clone()),
            name: Set(account.name.clone()),
            password_hash: Set(account.password_hash.clone()),
            phone: Set(account.phone.clone()),
            is_admin: Set(account.is_admin),
            company_id: Set(account.company_id.map(|c| c.as_uuid())),
            is_enabled: Set(account.is_enabled),
            is_confirmed: Set(account.is_confirmed),
            email_code: Set(account.email_code.clone()),
            email_sent_at: Set(account.email_sent_at),
            pending_phone: Set(account.pending_phone.clone()),
            sms_code: Set(account.sms_code.clone()),
            sms_sent_at: Set(account.sms_sent_at),
            created_at: Set(account.created_at),
            updated_at: Set(account.updated_at),
        };
        accounts::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| duplicate_email_or(e, "insert account"))?;
        Ok(())
    }

    async fn set_sms_code(
        &self,
        id: AccountId,
        code: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<(), FrontendError> {
        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::SmsCode, Expr::value(code))
            .col_expr(accounts::Column::SmsSentAt, Expr::value(sent_at))
            .filter(accounts::Column::Id.eq(id.as_uuid()))
            .exec(&self.db)
            .await
            .context("set sms code")?;
        if result.rows_affected == 0 {
            return Err(FrontendError::AccountNotFound);
        }
        Ok(())
    }

    async fn start_phone_confirmation(
        &self,
        id: AccountId,
        phone: &str,
        code: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<(), FrontendError> {
        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::PendingPhone, Expr::value(phone))
            .col_expr(accounts::Column::SmsCode, Expr::value(code))
            .col_expr(accounts::Column::SmsSentAt, Expr::value(sent_at))
            .filter(accounts::Column::Id.eq(id.as_uuid()))
            .exec(&self.db)
            .await
            .context("start phone confirmation")?;
        if result.rows_affected == 0 {
            return Err(FrontendError::AccountNotFound);
        }
        Ok(())
    }

    async fn consume_sms_code(
        &self,
        id: AccountId,
        expected: &str,
    ) -> Result<bool, FrontendError> {
        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::SmsCode, Expr::value(None::<String>))
            .col_expr(accounts::Column::SmsSentAt, Expr::value(None::<DateTime<Utc>>))
            .filter(accounts::Column::Id.eq(id.as_uuid()))
            .filter(accounts::Column::SmsCode.eq(expected))
            .exec(&self.db)
            .await
            .context("consume sms code")?;
        Ok(result.rows_affected > 0)
    }

    async fn complete_confirmation(
        &self,
        id: AccountId,
        expected_sms_code: &str,
        password_hash: &str,
        phone: &str,
    ) -> Result<bool, FrontendError> {
        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::EmailCode, Expr::value(None::<String>))
            .col_expr(accounts::Column::EmailSentAt, Expr::value(None::<DateTime<Utc>>))
            .col_expr(accounts::Column::PendingPhone, Expr::value(None::<String>))
            .col_expr(accounts::Column::SmsCode, Expr::value(None::<String>))
            .col_expr(accounts::Column::SmsSentAt, Expr::value(None::<DateTime<Utc>>))
            .col_expr(accounts::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(accounts::Column::Phone, Expr::value(phone))
            .col_expr(accounts::Column::IsConfirmed, Expr::value(true))
            .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(accounts::Column::Id.eq(id.as_uuid()))
            .filter(accounts::Column::SmsCode.eq(expected_sms_code))
            .exec(&self.db)
            .await
            .context("complete account confirmation")?;
        Ok(result.rows_affected > 0)
    }

    async fn apply_changes(
        &self,
        id: AccountId,
        changes: &AccountChanges,
        expected_sms_code: Option<&str>,
    ) -> Result<bool, FrontendError> {
        let mut update = accounts::Entity::update_many()
            .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(accounts::Column::Id.eq(id.as_uuid()));
        if let Some(ref email) = changes.email {
            update = update.col_expr(accounts::Column::Email, Expr::value(email.clone()));
        }
        if let Some(ref name) = changes.name {
            update = update.col_expr(accounts::Column::Name, Expr::value(name.clone()));
        }
        if let Some(ref hash) = changes.password_hash {
            update = update.col_expr(accounts::Column::PasswordHash, Expr::value(hash.clone()));
        }
        if let Some(ref phone) = changes.phone {
            update = update.col_expr(accounts::Column::Phone, Expr::value(phone.clone()));
        }
        if let Some(is_admin) = changes.is_admin {
            update = update.col_expr(accounts::Column::IsAdmin, Expr::value(is_admin));
        }
        if let Some(company_id) = changes.company_id {
            update = update.col_expr(accounts::Column::CompanyId, Expr::value(company_id.as_uuid()));
        }
        if let Some(expected) = expected_sms_code {
            update = update
                .col_expr(accounts::Column::SmsCode, Expr::value(None::<String>))
                .col_expr(accounts::Column::SmsSentAt, Expr::value(None::<DateTime<Utc>>))
                .filter(accounts::Column::SmsCode.eq(expected));
        }
        let result = update
            .exec(&self.db)
            .await
            .map_err(|e| duplicate_email_or(e, "update account"))?;
        Ok(result.rows_affected > 0)
    }

    async fn disable(&self, id: AccountId) -> Result<bool, FrontendError> {
        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::IsEnabled, Expr::value(false))
            .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(accounts::Column::Id.eq(id.as_uuid()))
            .exec(&self.db)
            .await
            .context("disable account")?;
        Ok(result.rows_affected > 0)
    }
}

fn duplicate_email_or(err: DbErr, context: &'static str) -> FrontendError {
    if is_unique_violation(&err) {
        FrontendError::AccountAlreadyExists
    } else {
        FrontendError::Internal(anyhow::Error::new(err).context(context))
    }
}

fn account_from_model(model: accounts::Model) -> Account {
    Account {
        id: AccountId::from(model.id),
        email: model.email,
        name: model.name,
        password_hash: model.password_hash,
        phone: model.phone,
        is_admin: model.is_admin,
        company_id: model.company_id.map(CompanyId::from),
        is_enabled: model.is_enabled,
        is_confirmed: model.is_confirmed,
        email_code: model.email_code,
        email_sent_at: model.email_sent_at,
        pending_phone: model.pending_phone,
        sms_code: model.sms_code,
        sms_sent_at: model.sms_sent_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Entity revision repository ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEntityRepository {
    pub db: DatabaseConnection,
}

fn scoped(
    query: sea_orm::Select<entity_revisions::Entity>,
    scope: TenantScope,
) -> sea_orm::Select<entity_revisions::Entity> {
    match scope.company() {
        Some(company_id) => {
            query.filter(entity_revisions::Column::CompanyId.eq(company_id.as_uuid()))
        }
        None => query,
    }
}

impl EntityRepository for DbEntityRepository {
    async fn insert_first(&self, revision: &EntityRevision) -> Result<(), FrontendError> {
        entity_revisions::Entity::insert(revision_to_active(revision)?)
            .exec_without_returning(&self.db)
            .await
            .context("insert entity revision")?;
        Ok(())
    }

    async fn find_latest(
        &self,
        id: EntityId,
        scope: TenantScope,
    ) -> Result<Option<EntityRevision>, FrontendError> {
        let query = entity_revisions::Entity::find()
            .filter(entity_revisions::Column::EntityId.eq(id.as_uuid()))
            .filter(entity_revisions::Column::Latest.eq(true))
            .order_by_desc(entity_revisions::Column::Rev);
        let model = scoped(query, scope)
            .one(&self.db)
            .await
            .context("find latest entity revision")?;
        model.map(revision_from_model).transpose()
    }

    async fn append_successor(
        &self,
        previous: &EntityRevision,
        next: &EntityRevision,
    ) -> Result<(), FrontendError> {
        let txn = self.db.begin().await.context("begin revision transaction")?;

        // Insert before retiring the previous revision.
        match entity_revisions::Entity::insert(revision_to_active(next)?)
            .exec_without_returning(&txn)
            .await
        {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                txn.rollback().await.context("rollback revision insert")?;
                return Err(FrontendError::RevisionConflict);
            }
            Err(e) => return Err(anyhow::Error::new(e).context("insert entity revision").into()),
        }

        let retired = entity_revisions::Entity::update_many()
            .col_expr(entity_revisions::Column::Latest, Expr::value(false))
            .filter(entity_revisions::Column::EntityId.eq(previous.entity_id.as_uuid()))
            .filter(entity_revisions::Column::CreatedAt.eq(previous.created_at))
            .filter(entity_revisions::Column::Latest.eq(true))
            .filter(entity_revisions::Column::Rev.ne(next.rev))
            .exec(&txn)
            .await
            .context("retire previous revision")?;
        if retired.rows_affected == 0 {
            txn.rollback().await.context("rollback revision insert")?;
            return Err(FrontendError::RevisionConflict);
        }

        txn.commit().await.context("commit entity revision")?;
        Ok(())
    }

    async fn history(
        &self,
        id: EntityId,
        scope: TenantScope,
    ) -> Result<Vec<EntityRevision>, FrontendError> {
        let query = entity_revisions::Entity::find()
            .filter(entity_revisions::Column::EntityId.eq(id.as_uuid()))
            .order_by_desc(entity_revisions::Column::Rev);
        let models = scoped(query, scope)
            .all(&self.db)
            .await
            .context("list entity revisions")?;
        models.into_iter().map(revision_from_model).collect()
    }

    async fn list_latest(
        &self,
        scope: TenantScope,
        entity_type: Option<&str>,
    ) -> Result<Vec<EntityRevision>, FrontendError> {
        let mut query = entity_revisions::Entity::find()
            .filter(entity_revisions::Column::Latest.eq(true))
            .order_by_asc(entity_revisions::Column::CreatedAt);
        if let Some(entity_type) = entity_type {
            query = query.filter(entity_revisions::Column::EntityType.eq(entity_type));
        }
        let models = scoped(query, scope)
            .all(&self.db)
            .await
            .context("list latest entity revisions")?;
        models.into_iter().map(revision_from_model).collect()
    }
}

fn revision_to_active(
    revision: &EntityRevision,
) -> Result<entity_revisions::ActiveModel, FrontendError> {
    let links = serde_json::to_value(&revision.body.links).context("encode entity links")?;
    Ok(entity_revisions::ActiveModel {
        entity_id: Set(revision.entity_id.as_uuid()),
        rev: Set(revision.rev),
        latest: Set(revision.latest),
        company_id: Set(revision.company_id.as_uuid()),
        created_by: Set(revision.created_by.as_uuid()),
        created_at: Set(revision.created_at),
        entity_type: Set(revision.body.entity_type.clone()),
        common_name: Set(revision.body.common_name.clone()),
        links: Set(links),
        attributes: Set(revision.body.attributes.clone()),
    })
}

fn revision_from_model(model: entity_revisions::Model) -> Result<EntityRevision, FrontendError> {
    let links = serde_json::from_value(model.links).context("decode entity links")?;
    Ok(EntityRevision {
        entity_id: EntityId::from(model.entity_id),
        rev: model.rev,
        latest: model.latest,
        company_id: CompanyId::from(model.company_id),
        created_by: AccountId::from(model.created_by),
        created_at: model.created_at,
        body: EntityBody {
            entity_type: model.entity_type,
            common_name: model.common_name,
            links,
            attributes: model.attributes,
        },
    })
}
