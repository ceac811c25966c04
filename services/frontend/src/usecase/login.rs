use chrono::TimeDelta;
use tracing::{info, warn};

use firmq_auth_types::token::SessionKey;

use crate::domain::repository::AccountRepository;
use crate::domain::types::{AccountProfile, Challenge, Outcome, SmsChallenge};
use crate::error::FrontendError;
use crate::infra::notify::Notifier;
use crate::usecase::code::{self, generate_sms_code, is_expired};
use crate::usecase::password::verify_password;
use crate::usecase::session::{IssuedToken, issue_session_token};

pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub sms_code: Option<String>,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub token: IssuedToken,
    pub account: AccountProfile,
}

pub struct LoginUseCase<R: AccountRepository> {
    pub repo: R,
    pub notifier: Notifier,
    pub session_key: SessionKey,
    pub sms_ttl: TimeDelta,
}

impl<R: AccountRepository> LoginUseCase<R> {
    /// Password first, then an SMS code sent to the phone on file.
    ///
    /// The password is checked on both calls, so a code alone never yields a token.
    pub async fn execute(&self, input: LoginInput) -> Result<Outcome<LoginOutput>, FrontendError> {
        let account = self
            .repo
            .find_by_email(input.email.trim())
            .await?
            .filter(|a| a.is_active())
            .ok_or(FrontendError::InvalidCredentials)?;
        let hash = account
            .password_hash
            .as_deref()
            .ok_or(FrontendError::InvalidCredentials)?;
        if !verify_password(&input.password, hash)? {
            info!(account_id = %account.id, "login rejected");
            return Err(FrontendError::InvalidCredentials);
        }

        let Some(sms_code) = input.sms_code.filter(|c| !c.is_empty()) else {
            let phone = account
                .phone
                .clone()
                .ok_or_else(|| anyhow::anyhow!("confirmed account {} has no phone", account.id))?;
            let sms_code = generate_sms_code();
            self.repo
                .set_sms_code(account.id, &sms_code, code::now())
                .await?;
            self.notifier
                .sms_challenge(SmsChallenge {
                    phone,
                    code: sms_code,
                })
                .await;
            info!(account_id = %account.id, "password verified, sms challenge sent");
            return Ok(Outcome::NeedsMoreInput(Challenge::SmsCode));
        };

        if !code::sms_code_matches(&account, &sms_code) {
            return Err(FrontendError::SmsConfirmationFailed);
        }
        if is_expired(account.sms_sent_at, self.sms_ttl, code::now()) {
            return Err(FrontendError::SmsCodeExpired);
        }
        if !self.repo.consume_sms_code(account.id, &sms_code).await? {
            warn!(account_id = %account.id, "sms code replaced during login");
            return Err(FrontendError::SmsConfirmationFailed);
        }

        let token = issue_session_token(&account, &self.session_key)?;
        info!(account_id = %account.id, "login succeeded");
        Ok(Outcome::Success(LoginOutput {
            token,
            account: account.into(),
        }))
    }
}
