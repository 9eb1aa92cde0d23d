//! Domain types shared across Fitcoach services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod identity;
pub mod intake;
pub mod role;
