use axum::{
    Router,
    routing::{get, patch, post},
};

use fitcoach_core::health::healthz;
use fitcoach_core::middleware::with_observability;

use crate::handlers::{
    health::readyz,
    otp::{send_passcode, verify_passcode},
    session::{get_session, login, passcode_sign_in, provider_sign_in, sign_out},
    submissions::{create_submission, list_submissions, update_submission},
    transformations::{create_transformation, list_transformations},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Passcodes
        .route("/otp/send", post(send_passcode))
        .route("/otp/verify", post(verify_passcode))
        // Sign-in
        .route("/auth/login", post(login))
        .route("/auth/provider", post(provider_sign_in))
        .route("/auth/passcode", post(passcode_sign_in))
        // Session
        .route("/auth/session", get(get_session).delete(sign_out))
        // Intake
        .route(
            "/submissions",
            get(list_submissions).post(create_submission),
        )
        .route("/submissions/{id}", patch(update_submission))
        // Gallery
        .route(
            "/transformations",
            get(list_transformations).post(create_transformation),
        )
        .with_state(state);
    with_observability(router)
}
