//! sea-orm entity models owned by the frontend service.

pub mod accounts;
pub mod entity_revisions;
