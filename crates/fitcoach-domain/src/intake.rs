//! Client intake submissions and published transformation stories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review state of an intake submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

/// A client-intake form as stored on disk.
///
/// Field names are camelCase on the wire to stay readable by the existing
/// dashboard and the `submissions.json` files it already produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSubmission {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub goals: String,
    pub experience: String,
    pub availability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_photo: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub status: SubmissionStatus,
}

/// A before/after success story shown on the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
    pub id: String,
    pub name: String,
    pub before_photo: String,
    pub after_photo: String,
    pub testimonial: String,
    pub rating: u8,
    pub transformation: String,
    pub timeframe: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
