//! Test utilities for FirmQ services.
//!
//! Bearer-token minting and ready-made callers. Import from tests only.

pub mod auth;
pub mod caller;
