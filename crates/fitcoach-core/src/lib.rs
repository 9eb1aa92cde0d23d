//! Service plumbing shared by every Fitcoach binary: tracing setup,
//! request-id middleware and health probes.

pub mod health;
pub mod middleware;
pub mod tracing;
