//! Session-token types shared by FirmQ services.
//!
//! Provides session-token validation and the `BearerIdentity` extractor.

pub mod identity;
pub mod token;
