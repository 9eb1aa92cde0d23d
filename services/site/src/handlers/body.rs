use axum::extract::FromRequest;

use crate::error::SiteError;

/// `axum::Json` whose rejection (bad syntax, wrong field types, missing
/// content type) is reported as `SiteError::InvalidBody`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(SiteError))]
pub struct JsonBody<T>(pub T);
