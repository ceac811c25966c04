use tracing::{info, warn};

use firmq_domain::access::{
    Caller, require_admin, require_admin_or_company_member, require_self_or_admin,
};
use firmq_domain::id::{AccountId, CompanyId};

use crate::domain::repository::AccountRepository;
use crate::domain::types::{
    Account, AccountChanges, AccountProfile, Challenge, EmailConfirmation, Outcome, SmsChallenge,
};
use crate::error::FrontendError;
use crate::infra::notify::Notifier;
use crate::usecase::code::{self, CodeTtl, generate_email_code, generate_sms_code, is_expired};
use crate::usecase::password::hash_password;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn require_field(value: Option<String>, field: &str) -> Result<String, FrontendError> {
    non_empty(value).ok_or_else(|| FrontendError::InvalidInput(format!("{field} is required")))
}

async fn load_enabled<R: AccountRepository>(
    repo: &R,
    id: AccountId,
) -> Result<Account, FrontendError> {
    repo.find_by_id(id)
        .await?
        .filter(|a| a.is_enabled)
        .ok_or(FrontendError::AccountNotFound)
}

async fn send_sms_code<R: AccountRepository>(
    repo: &R,
    notifier: &Notifier,
    account_id: AccountId,
    phone: String,
) -> Result<(), FrontendError> {
    let sms_code = generate_sms_code();
    repo.set_sms_code(account_id, &sms_code, code::now()).await?;
    notifier
        .sms_challenge(SmsChallenge {
            phone,
            code: sms_code,
        })
        .await;
    Ok(())
}

// ── CreateAccount ────────────────────────────────────────────────────────────

pub struct CreateAccountInput {
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub company_id: Option<CompanyId>,
}

pub struct CreateAccountUseCase<R: AccountRepository> {
    pub repo: R,
    pub notifier: Notifier,
}

impl<R: AccountRepository> CreateAccountUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        input: CreateAccountInput,
    ) -> Result<AccountId, FrontendError> {
        require_admin(caller)?;
        let email = require_field(Some(input.email.trim().to_owned()), "email")?;

        let now = code::now();
        let email_code = generate_email_code();
        let account = Account {
            id: AccountId::new(),
            email,
            name: input.name,
            password_hash: None,
            phone: None,
            is_admin: input.is_admin,
            company_id: input.company_id,
            is_enabled: true,
            is_confirmed: false,
            email_code: Some(email_code.clone()),
            email_sent_at: Some(now),
            pending_phone: None,
            sms_code: None,
            sms_sent_at: None,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&account).await?;
        info!(account_id = %account.id, created_by = %caller.id, "account created");

        self.notifier
            .email_confirmation(EmailConfirmation {
                recipient: account.email,
                display_name: account.name,
                code: email_code,
            })
            .await;
        Ok(account.id)
    }
}

// ── ConfirmEmail ─────────────────────────────────────────────────────────────

pub struct ConfirmEmailInput {
    pub email_code: String,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub sms_code: Option<String>,
}

pub struct ConfirmEmailUseCase<R: AccountRepository> {
    pub repo: R,
    pub notifier: Notifier,
    pub ttl: CodeTtl,
}

impl<R: AccountRepository> ConfirmEmailUseCase<R> {
    /// Without an SMS code: send one to the supplied phone and ask for it.
    /// With one: verify it and finish onboarding with the phone it was sent to.
    pub async fn execute(
        &self,
        input: ConfirmEmailInput,
    ) -> Result<Outcome<AccountProfile>, FrontendError> {
        if input.email_code.is_empty() {
            return Err(FrontendError::AccountNotFound);
        }
        let account = self
            .repo
            .find_by_email_code(&input.email_code)
            .await?
            .filter(|a| a.is_enabled)
            .ok_or(FrontendError::AccountNotFound)?;

        let now = code::now();
        if is_expired(account.email_sent_at, self.ttl.email, now) {
            return Err(FrontendError::EmailCodeExpired);
        }

        let Some(sms_code) = non_empty(input.sms_code) else {
            let phone = require_field(input.phone, "phone")?;
            let sms_code = generate_sms_code();
            self.repo
                .start_phone_confirmation(account.id, &phone, &sms_code, now)
                .await?;
            self.notifier
                .sms_challenge(SmsChallenge {
                    phone,
                    code: sms_code,
                })
                .await;
            info!(account_id = %account.id, "email confirmed, sms challenge sent");
            return Ok(Outcome::NeedsMoreInput(Challenge::SmsCode));
        };

        if is_expired(account.sms_sent_at, self.ttl.sms, now) {
            return Err(FrontendError::SmsCodeExpired);
        }
        if !code::sms_code_matches(&account, &sms_code) {
            return Err(FrontendError::SmsConfirmationFailed);
        }
        // Only the number the code was sent to can be confirmed.
        let phone = account
            .pending_phone
            .clone()
            .ok_or(FrontendError::SmsConfirmationFailed)?;
        if non_empty(input.phone).is_some_and(|p| p != phone) {
            return Err(FrontendError::SmsConfirmationFailed);
        }
        let password_hash = hash_password(input.password.as_deref().unwrap_or_default())?;

        let completed = self
            .repo
            .complete_confirmation(account.id, &sms_code, &password_hash, &phone)
            .await?;
        if !completed {
            warn!(account_id = %account.id, "sms code replaced during confirmation");
            return Err(FrontendError::SmsConfirmationFailed);
        }
        info!(account_id = %account.id, "account confirmed");

        let account = load_enabled(&self.repo, account.id).await?;
        Ok(Outcome::Success(account.into()))
    }
}

// ── UpdateAccount ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateAccountInput {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub is_admin: Option<bool>,
    pub company_id: Option<CompanyId>,
    pub sms_code: Option<String>,
}

pub struct UpdateAccountUseCase<R: AccountRepository> {
    pub repo: R,
    pub notifier: Notifier,
    pub ttl: CodeTtl,
}

impl<R: AccountRepository> UpdateAccountUseCase<R> {
    /// A phone change is applied only after the SMS challenge sent to the phone
    /// currently on file is answered.
    pub async fn execute(
        &self,
        caller: &Caller,
        target: AccountId,
        input: UpdateAccountInput,
    ) -> Result<Outcome<AccountProfile>, FrontendError> {
        require_self_or_admin(caller, target)?;
        let account = load_enabled(&self.repo, target).await?;

        if !caller.is_admin {
            let admin_changed = input.is_admin.is_some_and(|v| v != account.is_admin);
            let company_changed = input
                .company_id
                .is_some_and(|c| Some(c) != account.company_id);
            if admin_changed || company_changed {
                return Err(FrontendError::Forbidden);
            }
        }

        let new_phone = non_empty(input.phone);
        let phone_changed = new_phone
            .as_deref()
            .is_some_and(|p| Some(p) != account.phone.as_deref());
        let sms_code = non_empty(input.sms_code);

        if phone_changed {
            let Some(ref supplied) = sms_code else {
                let destination = account.phone.clone().or(new_phone).unwrap_or_default();
                send_sms_code(&self.repo, &self.notifier, account.id, destination).await?;
                info!(account_id = %account.id, "phone change requested, sms challenge sent");
                return Ok(Outcome::NeedsMoreInput(Challenge::SmsCode));
            };
            if !code::sms_code_matches(&account, supplied) {
                return Err(FrontendError::SmsConfirmationFailed);
            }
            if is_expired(account.sms_sent_at, self.ttl.sms, code::now()) {
                return Err(FrontendError::SmsCodeExpired);
            }
        }

        if input.email.as_deref().is_some_and(|e| e.trim().is_empty()) {
            return Err(FrontendError::InvalidInput("email is required".into()));
        }
        let changes = AccountChanges {
            email: input.email.map(|e| e.trim().to_owned()),
            name: input.name,
            password_hash: input.password.as_deref().map(hash_password).transpose()?,
            phone: if phone_changed { new_phone } else { None },
            is_admin: input.is_admin,
            company_id: input.company_id,
        };

        let expected = if phone_changed { sms_code.as_deref() } else { None };
        let applied = self
            .repo
            .apply_changes(account.id, &changes, expected)
            .await?;
        if !applied {
            return Err(match expected {
                Some(_) => FrontendError::SmsConfirmationFailed,
                None => FrontendError::AccountNotFound,
            });
        }
        info!(account_id = %account.id, updated_by = %caller.id, phone_changed, "account updated");

        let account = load_enabled(&self.repo, account.id).await?;
        Ok(Outcome::Success(account.into()))
    }
}

// ── DeleteAccount ────────────────────────────────────────────────────────────

pub struct DeleteAccountUseCase<R: AccountRepository> {
    pub repo: R,
}

impl<R: AccountRepository> DeleteAccountUseCase<R> {
    /// Soft delete; repeating it on a disabled account succeeds.
    pub async fn execute(&self, caller: &Caller, target: AccountId) -> Result<(), FrontendError> {
        require_admin(caller)?;
        if !self.repo.disable(target).await? {
            return Err(FrontendError::AccountNotFound);
        }
        info!(account_id = %target, deleted_by = %caller.id, "account disabled");
        Ok(())
    }
}

// ── GetAccount / ListAccounts ────────────────────────────────────────────────

pub struct GetAccountUseCase<R: AccountRepository> {
    pub repo: R,
}

impl<R: AccountRepository> GetAccountUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        target: AccountId,
    ) -> Result<AccountProfile, FrontendError> {
        require_self_or_admin(caller, target)?;
        Ok(load_enabled(&self.repo, target).await?.into())
    }
}

pub struct ListAccountsUseCase<R: AccountRepository> {
    pub repo: R,
}

impl<R: AccountRepository> ListAccountsUseCase<R> {
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<AccountProfile>, FrontendError> {
        require_admin(caller)?;
        let accounts = self.repo.list_active().await?;
        Ok(accounts.into_iter().map(AccountProfile::from).collect())
    }
}

pub struct ListAccountsByCompanyUseCase<R: AccountRepository> {
    pub repo: R,
}

impl<R: AccountRepository> ListAccountsByCompanyUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        company_id: CompanyId,
    ) -> Result<Vec<AccountProfile>, FrontendError> {
        require_admin_or_company_member(caller, company_id)?;
        let accounts = self.repo.list_by_company(company_id).await?;
        Ok(accounts.into_iter().map(AccountProfile::from).collect())
    }
}

// ── BootstrapAdmin ───────────────────────────────────────────────────────────

pub struct BootstrapAdminInput {
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// Seeds the first admin so the admin-only account API is reachable.
pub struct BootstrapAdminUseCase<R: AccountRepository> {
    pub repo: R,
}

impl<R: AccountRepository> BootstrapAdminUseCase<R> {
    /// Returns `true` if an account was created. An existing account with the same
    /// email is left untouched.
    pub async fn execute(&self, input: BootstrapAdminInput) -> Result<bool, FrontendError> {
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Ok(false);
        }
        let now = code::now();
        let account = Account {
            id: AccountId::new(),
            name: input.email.clone(),
            email: input.email,
            password_hash: Some(hash_password(&input.password)?),
            phone: Some(input.phone),
            is_admin: true,
            company_id: None,
            is_enabled: true,
            is_confirmed: true,
            email_code: None,
            email_sent_at: None,
            pending_phone: None,
            sms_code: None,
            sms_sent_at: None,
            created_at: now,
            updated_at: now,
        };
        match self.repo.create(&account).await {
            Ok(()) => {
                info!(account_id = %account.id, "bootstrap admin created");
                Ok(true)
            }
            Err(FrontendError::AccountAlreadyExists) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
