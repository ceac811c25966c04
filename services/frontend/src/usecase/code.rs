use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::types::Account;

/// Digits in an SMS one-time code.
pub const SMS_CODE_LEN: usize = 6;

/// How long a sent code stays acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeTtl {
    pub email: TimeDelta,
    pub sms: TimeDelta,
}

pub fn generate_sms_code() -> String {
    let mut rng = rand::rng();
    (0..SMS_CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

pub fn generate_email_code() -> String {
    Uuid::new_v4().to_string()
}

/// Wall-clock expiry against the stored send time. A code with no send time is
/// treated as expired.
pub fn is_expired(sent_at: Option<DateTime<Utc>>, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
    match sent_at {
        Some(sent_at) => now > sent_at + ttl,
        None => true,
    }
}

/// Whether `supplied` is the account's current SMS code.
pub fn sms_code_matches(account: &Account, supplied: &str) -> bool {
    !supplied.is_empty() && account.sms_code.as_deref() == Some(supplied)
}

/// Current time at the store's timestamp precision, so values read back compare
/// equal to the ones written.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
