use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::mpsc::Receiver;

use firmq_domain::access::TenantScope;
use firmq_domain::id::{AccountId, CompanyId, EntityId};
use firmq_frontend::domain::repository::{AccountRepository, EntityRepository};
use firmq_frontend::domain::types::{
    Account, AccountChanges, EmailConfirmation, EntityBody, EntityLinks, EntityRevision,
    SmsChallenge,
};
use firmq_frontend::error::FrontendError;
use firmq_frontend::infra::notify::{EMAIL_CHANNEL, NotificationQueue, Notifier, SMS_CHANNEL};
use firmq_frontend::usecase::code::CodeTtl;
use firmq_frontend::usecase::password::hash_password;

pub const TEST_PASSWORD: &str = "correct horse battery staple";
pub const TEST_PHONE: &str = "9999";

pub fn ttl() -> CodeTtl {
    CodeTtl {
        email: TimeDelta::hours(24),
        sms: TimeDelta::minutes(5),
    }
}

// ── Notification capture ─────────────────────────────────────────────────────

/// Real queues; the test holds the receivers in place of the delivery workers.
pub struct Outbox {
    pub email: Receiver<EmailConfirmation>,
    pub sms: Receiver<SmsChallenge>,
}

impl Outbox {
    pub fn last_sms(&mut self) -> SmsChallenge {
        let mut last = None;
        while let Ok(msg) = self.sms.try_recv() {
            last = Some(msg);
        }
        last.expect("no sms queued")
    }

    pub fn last_email(&mut self) -> EmailConfirmation {
        let mut last = None;
        while let Ok(msg) = self.email.try_recv() {
            last = Some(msg);
        }
        last.expect("no email queued")
    }
}

pub fn notifier() -> (Notifier, Outbox) {
    let (email, email_rx) = NotificationQueue::bounded(EMAIL_CHANNEL, 16, Duration::from_millis(50));
    let (sms, sms_rx) = NotificationQueue::bounded(SMS_CHANNEL, 16, Duration::from_millis(50));
    (
        Notifier { email, sms },
        Outbox {
            email: email_rx,
            sms: sms_rx,
        },
    )
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn unconfirmed_account(email: &str, email_code: &str) -> Account {
    let now = Utc::now();
    Account {
        id: AccountId::new(),
        email: email.to_owned(),
        name: "Test User".to_owned(),
        password_hash: None,
        phone: None,
        is_admin: false,
        company_id: None,
        is_enabled: true,
        is_confirmed: false,
        email_code: Some(email_code.to_owned()),
        email_sent_at: Some(now),
        pending_phone: None,
        sms_code: None,
        sms_sent_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn active_account(email: &str, company_id: Option<CompanyId>) -> Account {
    let now = Utc::now();
    Account {
        id: AccountId::new(),
        email: email.to_owned(),
        name: "Test User".to_owned(),
        password_hash: Some(hash_password(TEST_PASSWORD).unwrap()),
        phone: Some(TEST_PHONE.to_owned()),
        is_admin: false,
        company_id,
        is_enabled: true,
        is_confirmed: true,
        email_code: None,
        email_sent_at: None,
        pending_phone: None,
        sms_code: None,
        sms_sent_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn body(entity_type: &str, name: &str) -> EntityBody {
    EntityBody {
        entity_type: entity_type.to_owned(),
        common_name: name.to_owned(),
        links: EntityLinks::default(),
        attributes: serde_json::json!({}),
    }
}

// ── MockAccountRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAccountRepo {
    pub accounts: Arc<Mutex<Vec<Account>>>,
    /// SMS code swapped in right before the next conditional write.
    pub racing_sms_code: Arc<Mutex<Option<String>>>,
}

impl MockAccountRepo {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Shared handle to the stored records for inspection and aging.
    pub fn accounts_handle(&self) -> Arc<Mutex<Vec<Account>>> {
        Arc::clone(&self.accounts)
    }

    pub fn get(&self, id: AccountId) -> Account {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .expect("account not stored")
    }

    pub fn edit(&self, id: AccountId, f: impl FnOnce(&mut Account)) {
        let mut accounts = self.accounts.lock().unwrap();
        f(accounts.iter_mut().find(|a| a.id == id).expect("account not stored"));
    }

    /// Move the stored SMS send time into the past.
    pub fn age_sms(&self, id: AccountId, by: TimeDelta) {
        self.edit(id, |a| a.sms_sent_at = a.sms_sent_at.map(|t| t - by));
    }

    pub fn age_email(&self, id: AccountId, by: TimeDelta) {
        self.edit(id, |a| a.email_sent_at = a.email_sent_at.map(|t| t - by));
    }

    /// Simulate a concurrent request regenerating the SMS code after the use case
    /// has read the account but before it writes.
    pub fn regenerate_sms_code_before_write(&self, code: &str) {
        *self.racing_sms_code.lock().unwrap() = Some(code.to_owned());
    }

    fn apply_racing_code(&self, accounts: &mut [Account], id: AccountId) {
        if let Some(code) = self.racing_sms_code.lock().unwrap().take() {
            if let Some(account) = accounts.iter_mut().find(|a| a.id == id) {
                account.sms_code = Some(code);
                account.sms_sent_at = Some(Utc::now());
            }
        }
    }
}

fn email_taken(accounts: &[Account], email: &str, except: Option<AccountId>) -> bool {
    accounts
        .iter()
        .any(|a| a.email == email && Some(a.id) != except)
}

impl AccountRepository for MockAccountRepo {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, FrontendError> {
        Ok(self.accounts.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, FrontendError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_email_code(&self, code: &str) -> Result<Option<Account>, FrontendError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email_code.as_deref() == Some(code))
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<Account>, FrontendError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_enabled && a.is_confirmed)
            .cloned()
            .collect())
    }

    async fn list_by_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Account>, FrontendError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_enabled && a.company_id == Some(company_id))
            .cloned()
            .collect())
    }

    async fn create(&self, account: &Account) -> Result<(), FrontendError> {
        let mut accounts = self.accounts.lock().unwrap();
        if email_taken(&accounts, &account.email, None) {
            return Err(FrontendError::AccountAlreadyExists);
        }
        accounts.push(account.clone());
        Ok(())
    }

    async fn set_sms_code(
        &self,
        id: AccountId,
        code: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<(), FrontendError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(FrontendError::AccountNotFound)?;
        account.sms_code = Some(code.to_owned());
        account.sms_sent_at = Some(sent_at);
        Ok(())
    }

    async fn start_phone_confirmation(
        &self,
        id: AccountId,
        phone: &str,
        code: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<(), FrontendError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(FrontendError::AccountNotFound)?;
        account.pending_phone = Some(phone.to_owned());
        account.sms_code = Some(code.to_owned());
        account.sms_sent_at = Some(sent_at);
        Ok(())
    }

    async fn consume_sms_code(
        &self,
        id: AccountId,
        expected: &str,
    ) -> Result<bool, FrontendError> {
        let mut accounts = self.accounts.lock().unwrap();
        self.apply_racing_code(&mut accounts, id);
        match accounts
            .iter_mut()
            .find(|a| a.id == id && a.sms_code.as_deref() == Some(expected))
        {
            Some(account) => {
                account.sms_code = None;
                account.sms_sent_at = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn complete_confirmation(
        &self,
        id: AccountId,
        expected_sms_code: &str,
        password_hash: &str,
        phone: &str,
    ) -> Result<bool, FrontendError> {
        let mut accounts = self.accounts.lock().unwrap();
        self.apply_racing_code(&mut accounts, id);
        match accounts
            .iter_mut()
            .find(|a| a.id == id && a.sms_code.as_deref() == Some(expected_sms_code))
        {
            Some(account) => {
                account.email_code = None;
                account.email_sent_at = None;
                account.pending_phone = None;
                account.sms_code = None;
                account.sms_sent_at = None;
                account.password_hash = Some(password_hash.to_owned());
                account.phone = Some(phone.to_owned());
                account.is_confirmed = true;
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn apply_changes(
        &self,
        id: AccountId,
        changes: &AccountChanges,
        expected_sms_code: Option<&str>,
    ) -> Result<bool, FrontendError> {
        let mut accounts = self.accounts.lock().unwrap();
        self.apply_racing_code(&mut accounts, id);
        if let Some(ref email) = changes.email {
            if email_taken(&accounts, email, Some(id)) {
                return Err(FrontendError::AccountAlreadyExists);
            }
        }
        let Some(account) = accounts.iter_mut().find(|a| {
            a.id == id && expected_sms_code.is_none_or(|c| a.sms_code.as_deref() == Some(c))
        }) else {
            return Ok(false);
        };
        if let Some(ref email) = changes.email {
            account.email = email.clone();
        }
        if let Some(ref name) = changes.name {
            account.name = name.clone();
        }
        if let Some(ref hash) = changes.password_hash {
            account.password_hash = Some(hash.clone());
        }
        if let Some(ref phone) = changes.phone {
            account.phone = Some(phone.clone());
        }
        if let Some(is_admin) = changes.is_admin {
            account.is_admin = is_admin;
        }
        if let Some(company_id) = changes.company_id {
            account.company_id = Some(company_id);
        }
        if expected_sms_code.is_some() {
            account.sms_code = None;
            account.sms_sent_at = None;
        }
        account.updated_at = Utc::now();
        Ok(true)
    }

    async fn disable(&self, id: AccountId) -> Result<bool, FrontendError> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.is_enabled = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockEntityRepo ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockEntityRepo {
    pub revisions: Arc<Mutex<Vec<EntityRevision>>>,
}

impl MockEntityRepo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn revisions_handle(&self) -> Arc<Mutex<Vec<EntityRevision>>> {
        Arc::clone(&self.revisions)
    }

    pub fn latest_count(&self, id: EntityId) -> usize {
        self.revisions
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.entity_id == id && r.latest)
            .count()
    }
}

impl EntityRepository for MockEntityRepo {
    async fn insert_first(&self, revision: &EntityRevision) -> Result<(), FrontendError> {
        self.revisions.lock().unwrap().push(revision.clone());
        Ok(())
    }

    async fn find_latest(
        &self,
        id: EntityId,
        scope: TenantScope,
    ) -> Result<Option<EntityRevision>, FrontendError> {
        Ok(self
            .revisions
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.entity_id == id && r.latest && scope.admits(r.company_id))
            .cloned())
    }

    async fn append_successor(
        &self,
        previous: &EntityRevision,
        next: &EntityRevision,
    ) -> Result<(), FrontendError> {
        let mut revisions = self.revisions.lock().unwrap();
        if revisions
            .iter()
            .any(|r| r.entity_id == next.entity_id && r.rev == next.rev)
        {
            return Err(FrontendError::RevisionConflict);
        }
        let Some(old) = revisions.iter_mut().find(|r| {
            r.entity_id == previous.entity_id && r.created_at == previous.created_at && r.latest
        }) else {
            return Err(FrontendError::RevisionConflict);
        };
        old.latest = false;
        revisions.push(next.clone());
        Ok(())
    }

    async fn history(
        &self,
        id: EntityId,
        scope: TenantScope,
    ) -> Result<Vec<EntityRevision>, FrontendError> {
        let mut history: Vec<_> = self
            .revisions
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.entity_id == id && scope.admits(r.company_id))
            .cloned()
            .collect();
        history.sort_by(|a, b| b.rev.cmp(&a.rev));
        Ok(history)
    }

    async fn list_latest(
        &self,
        scope: TenantScope,
        entity_type: Option<&str>,
    ) -> Result<Vec<EntityRevision>, FrontendError> {
        Ok(self
            .revisions
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.latest && scope.admits(r.company_id))
            .filter(|r| entity_type.is_none_or(|t| r.body.entity_type == t))
            .cloned()
            .collect())
    }
}
