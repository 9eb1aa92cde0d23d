//! Signed-in identity.

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// The currently authenticated identity of a client context.
///
/// `id` is opaque and comes from whichever source authenticated the user
/// (local account table or external provider).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub role: Role,
}
