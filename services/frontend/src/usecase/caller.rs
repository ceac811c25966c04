use uuid::Uuid;

use firmq_domain::access::Caller;
use firmq_domain::id::AccountId;

use crate::domain::repository::AccountRepository;
use crate::error::FrontendError;

/// Turns a verified token subject into a [`Caller`] using the stored account, so
/// role and tenant always reflect the current record.
pub struct ResolveCallerUseCase<R: AccountRepository> {
    pub repo: R,
}

impl<R: AccountRepository> ResolveCallerUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Caller, FrontendError> {
        let account = self
            .repo
            .find_by_id(AccountId::from(user_id))
            .await?
            .filter(|a| a.is_enabled)
            .ok_or(FrontendError::Unauthenticated)?;
        Ok(account.caller())
    }
}
