//! Domain types shared across FirmQ crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/`.

pub mod access;
pub mod id;
