//! Caller builders for use-case tests.

use firmq_domain::access::Caller;
use firmq_domain::id::{AccountId, CompanyId};

pub fn admin() -> Caller {
    Caller {
        id: AccountId::new(),
        is_admin: true,
        company_id: None,
    }
}

pub fn member(company_id: CompanyId) -> Caller {
    Caller {
        id: AccountId::new(),
        is_admin: false,
        company_id: Some(company_id),
    }
}

/// Non-admin with no company.
pub fn unassigned() -> Caller {
    Caller {
        id: AccountId::new(),
        is_admin: false,
        company_id: None,
    }
}
