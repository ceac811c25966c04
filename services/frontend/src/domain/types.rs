use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use firmq_domain::access::Caller;
use firmq_domain::id::{AccountId, CompanyId, EntityId};

/// Account record as stored, including credentials and pending codes.
///
/// Never leaves the service: every outbound payload is an [`AccountProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub is_admin: bool,
    pub company_id: Option<CompanyId>,
    pub is_enabled: bool,
    pub is_confirmed: bool,
    pub email_code: Option<String>,
    pub email_sent_at: Option<DateTime<Utc>>,
    pub pending_phone: Option<String>,
    pub sms_code: Option<String>,
    pub sms_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Enabled and onboarded; the only accounts allowed to log in.
    pub fn is_active(&self) -> bool {
        self.is_enabled && self.is_confirmed
    }

    pub fn caller(&self) -> Caller {
        Caller {
            id: self.id,
            is_admin: self.is_admin,
            company_id: self.company_id,
        }
    }
}

/// Account without password hash or verification codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountProfile {
    pub id: AccountId,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub is_admin: bool,
    pub company_id: Option<CompanyId>,
    pub is_enabled: bool,
    pub is_confirmed: bool,
    #[serde(serialize_with = "firmq_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "firmq_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountProfile {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            email: a.email,
            name: a.name,
            phone: a.phone,
            is_admin: a.is_admin,
            company_id: a.company_id,
            is_enabled: a.is_enabled,
            is_confirmed: a.is_confirmed,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Field changes applied by an account update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub is_admin: Option<bool>,
    pub company_id: Option<CompanyId>,
}

// ── Two-phase results ────────────────────────────────────────────────────────

/// What a non-terminal step is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Challenge {
    /// A one-time code was sent by SMS; resubmit with it.
    SmsCode,
}

/// Result of an operation that may need another round trip.
///
/// Failures travel in the surrounding `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    NeedsMoreInput(Challenge),
    Success(T),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::NeedsMoreInput(c) => Outcome::NeedsMoreInput(c),
            Self::Success(v) => Outcome::Success(f(v)),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::NeedsMoreInput(_))
    }
}

// ── Entities ─────────────────────────────────────────────────────────────────

/// Reference from one entity to another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLink {
    #[serde(default)]
    pub entity_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityLinks {
    pub directors: EntityLink,
    pub proxyholders: EntityLink,
    pub trustees: EntityLink,
    pub shareholders: EntityLink,
}

/// Business fields of an entity; copied verbatim into every revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityBody {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub common_name: String,
    #[serde(default)]
    pub links: EntityLinks,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

/// One immutable revision in an entity's chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRevision {
    #[serde(rename = "id")]
    pub entity_id: EntityId,
    pub rev: i32,
    pub latest: bool,
    pub company_id: CompanyId,
    pub created_by: AccountId,
    #[serde(serialize_with = "firmq_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub body: EntityBody,
}

// ── Notifications ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfirmation {
    pub recipient: String,
    pub display_name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsChallenge {
    pub phone: String,
    pub code: String,
}
