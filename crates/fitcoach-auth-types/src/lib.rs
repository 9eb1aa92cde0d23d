//! Session types shared across Fitcoach services.
//!
//! Provides the signed session-token codec and the session cookie builders.

pub mod cookie;
pub mod token;
