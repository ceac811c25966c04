#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use firmq_domain::access::TenantScope;
use firmq_domain::id::{AccountId, CompanyId, EntityId};

use crate::domain::types::{Account, AccountChanges, EntityRevision};
use crate::error::FrontendError;

/// Sole mutator of account records.
///
/// Code-consuming writes are compare-and-swap on the expected current SMS code and
/// report `false` when the stored code no longer matches.
pub trait AccountRepository: Send + Sync {
    /// Lookup by id, including disabled accounts.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, FrontendError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, FrontendError>;
    async fn find_by_email_code(&self, code: &str) -> Result<Option<Account>, FrontendError>;
    /// Enabled and confirmed accounts.
    async fn list_active(&self) -> Result<Vec<Account>, FrontendError>;
    /// Enabled accounts of one company, confirmed or not.
    async fn list_by_company(&self, company_id: CompanyId)
    -> Result<Vec<Account>, FrontendError>;

    /// Insert a new account. A taken email is `AccountAlreadyExists`.
    async fn create(&self, account: &Account) -> Result<(), FrontendError>;

    /// Store a fresh SMS code, replacing any previous one.
    async fn set_sms_code(
        &self,
        id: AccountId,
        code: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<(), FrontendError>;

    /// Store a fresh onboarding SMS code together with the phone it was sent to.
    async fn start_phone_confirmation(
        &self,
        id: AccountId,
        phone: &str,
        code: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<(), FrontendError>;

    /// Clear the SMS code if it still equals `expected`.
    async fn consume_sms_code(&self, id: AccountId, expected: &str)
    -> Result<bool, FrontendError>;

    /// Finish onboarding: clear both codes and the pending phone, store credentials,
    /// mark confirmed.
    async fn complete_confirmation(
        &self,
        id: AccountId,
        expected_sms_code: &str,
        password_hash: &str,
        phone: &str,
    ) -> Result<bool, FrontendError>;

    /// Apply field changes. With `expected_sms_code`, the write is conditional on it
    /// and also clears the code.
    async fn apply_changes(
        &self,
        id: AccountId,
        changes: &AccountChanges,
        expected_sms_code: Option<&str>,
    ) -> Result<bool, FrontendError>;

    /// Soft delete. Returns `false` if no account has this id.
    async fn disable(&self, id: AccountId) -> Result<bool, FrontendError>;
}

/// Sole mutator of entity revision records.
pub trait EntityRepository: Send + Sync {
    /// Insert the first revision of a new entity.
    async fn insert_first(&self, revision: &EntityRevision) -> Result<(), FrontendError>;

    async fn find_latest(
        &self,
        id: EntityId,
        scope: TenantScope,
    ) -> Result<Option<EntityRevision>, FrontendError>;

    /// Insert `next` and retire `previous` atomically.
    ///
    /// `RevisionConflict` if `previous` is no longer the latest revision or a
    /// successor with the same rev already exists.
    async fn append_successor(
        &self,
        previous: &EntityRevision,
        next: &EntityRevision,
    ) -> Result<(), FrontendError>;

    /// Every revision, newest first.
    async fn history(
        &self,
        id: EntityId,
        scope: TenantScope,
    ) -> Result<Vec<EntityRevision>, FrontendError>;

    async fn list_latest(
        &self,
        scope: TenantScope,
        entity_type: Option<&str>,
    ) -> Result<Vec<EntityRevision>, FrontendError>;
}
