use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use fitcoach_domain::intake::Transformation;

use crate::error::SiteError;
use crate::handlers::body::JsonBody;
use crate::handlers::guard::AdminUser;
use crate::state::AppState;
use crate::usecase::intake::NewTransformation;

pub async fn list_transformations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transformation>>, SiteError> {
    Ok(Json(state.gallery_service().list().await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransformationRequest {
    pub name: String,
    pub before_photo: String,
    pub after_photo: String,
    pub testimonial: String,
    pub rating: u8,
    pub transformation: String,
    pub timeframe: String,
}

pub async fn create_transformation(
    State(state): State<AppState>,
    _admin: AdminUser,
    JsonBody(body): JsonBody<CreateTransformationRequest>,
) -> Result<(StatusCode, Json<Transformation>), SiteError> {
    let input = NewTransformation {
        name: body.name,
        before_photo: body.before_photo,
        after_photo: body.after_photo,
        testimonial: body.testimonial,
        rating: body.rating,
        transformation: body.transformation,
        timeframe: body.timeframe,
    };
    let transformation = state.gallery_service().publish(input).await?;
    Ok((StatusCode::CREATED, Json(transformation)))
}
