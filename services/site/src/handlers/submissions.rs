use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use fitcoach_domain::intake::{ClientSubmission, SubmissionStatus};

use crate::error::SiteError;
use crate::handlers::body::JsonBody;
use crate::handlers::guard::{AdminUser, CurrentUser};
use crate::state::AppState;
use crate::usecase::intake::NewSubmission;

// ── GET /submissions ──────────────────────────────────────────────────────────

pub async fn list_submissions(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ClientSubmission>>, SiteError> {
    Ok(Json(state.intake_service().list().await?))
}

// ── POST /submissions ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub goals: String,
    pub experience: String,
    pub availability: String,
    #[serde(default)]
    pub before_photo: Option<String>,
    #[serde(default)]
    pub after_photo: Option<String>,
}

pub async fn create_submission(
    State(state): State<AppState>,
    CurrentUser(author): CurrentUser,
    JsonBody(body): JsonBody<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<ClientSubmission>), SiteError> {
    let input = NewSubmission {
        name: body.name,
        email: body.email,
        phone: body.phone,
        goals: body.goals,
        experience: body.experience,
        availability: body.availability,
        before_photo: body.before_photo,
        after_photo: body.after_photo,
    };
    let submission = state.intake_service().submit(&author, input).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

// ── PATCH /submissions/{id} ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateSubmissionRequest {
    pub status: SubmissionStatus,
}

pub async fn update_submission(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateSubmissionRequest>,
) -> Result<Json<ClientSubmission>, SiteError> {
    Ok(Json(
        state.intake_service().set_status(&id, body.status).await?,
    ))
}
