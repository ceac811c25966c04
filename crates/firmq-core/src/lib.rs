//! Service plumbing shared by FirmQ binaries: response envelope, config loading,
//! tracing setup, HTTP middleware and store helpers.

pub mod config;
pub mod envelope;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
