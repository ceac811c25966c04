//! Authorization guard.
//!
//! Pure predicates over a resolved [`Caller`]. Every rejection is the same
//! [`AccessDenied`] value: a caller can't tell a missing admin flag from a wrong
//! tenant or a foreign resource.

use crate::id::{AccountId, CompanyId};

/// The authenticated identity behind a request, loaded from the account store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: AccountId,
    pub is_admin: bool,
    /// `None` when the account is not assigned to any company.
    pub company_id: Option<CompanyId>,
}

/// Uniform "insufficient permission" rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("insufficient permission")]
pub struct AccessDenied;

/// Which tenants a read may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Cross-tenant (admin callers).
    All,
    Company(CompanyId),
}

impl TenantScope {
    /// Whether a record owned by `company_id` is visible under this scope.
    pub fn admits(&self, company_id: CompanyId) -> bool {
        match self {
            Self::All => true,
            Self::Company(scope) => *scope == company_id,
        }
    }

    pub fn company(&self) -> Option<CompanyId> {
        match self {
            Self::All => None,
            Self::Company(id) => Some(*id),
        }
    }
}

impl Caller {
    /// Read scope: admins see every tenant, members see their own company.
    ///
    /// `None` for a non-admin with no company association.
    pub fn read_scope(&self) -> Option<TenantScope> {
        if self.is_admin {
            return Some(TenantScope::All);
        }
        self.company_id.map(TenantScope::Company)
    }
}

pub fn require_admin(caller: &Caller) -> Result<(), AccessDenied> {
    if caller.is_admin {
        Ok(())
    } else {
        Err(AccessDenied)
    }
}

pub fn require_admin_or_company_member(
    caller: &Caller,
    company_id: CompanyId,
) -> Result<(), AccessDenied> {
    if caller.is_admin || caller.company_id == Some(company_id) {
        Ok(())
    } else {
        Err(AccessDenied)
    }
}

pub fn require_self_or_admin(caller: &Caller, target: AccountId) -> Result<(), AccessDenied> {
    if caller.is_admin || caller.id == target {
        Ok(())
    } else {
        Err(AccessDenied)
    }
}
