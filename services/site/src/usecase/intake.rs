use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use fitcoach_domain::identity::SessionIdentity;
use fitcoach_domain::intake::{ClientSubmission, SubmissionStatus, Transformation};

use crate::domain::repository::{SubmissionRepository, TransformationRepository};
use crate::error::SiteError;

/// Client-supplied part of an intake form. Server fields are assigned on submit.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub goals: String,
    pub experience: String,
    pub availability: String,
    pub before_photo: Option<String>,
    pub after_photo: Option<String>,
}

pub struct IntakeService<S: SubmissionRepository> {
    pub submissions: S,
}

impl<S: SubmissionRepository> IntakeService<S> {
    /// Append a pending submission owned by the signed-in `author`.
    pub async fn submit(
        &self,
        author: &SessionIdentity,
        input: NewSubmission,
    ) -> Result<ClientSubmission, SiteError> {
        let submission = ClientSubmission {
            id: Uuid::now_v7().to_string(),
            user_id: author.id.clone(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            goals: input.goals,
            experience: input.experience,
            availability: input.availability,
            before_photo: input.before_photo,
            after_photo: input.after_photo,
            created_at: Utc::now(),
            updated_at: None,
            status: SubmissionStatus::Pending,
        };
        self.submissions.append(&submission).await?;
        info!(submission_id = %submission.id, user_id = %submission.user_id, "intake submitted");
        Ok(submission)
    }

    pub async fn list(&self) -> Result<Vec<ClientSubmission>, SiteError> {
        self.submissions.list().await
    }

    pub async fn set_status(
        &self,
        id: &str,
        status: SubmissionStatus,
    ) -> Result<ClientSubmission, SiteError> {
        let updated = self
            .submissions
            .update_status(id, status, Utc::now())
            .await?
            .ok_or(SiteError::SubmissionNotFound)?;
        info!(submission_id = id, ?status, "submission reviewed");
        Ok(updated)
    }
}

/// Story fields supplied by an admin when publishing a transformation.
#[derive(Debug, Clone)]
pub struct NewTransformation {
    pub name: String,
    pub before_photo: String,
    pub after_photo: String,
    pub testimonial: String,
    pub rating: u8,
    pub transformation: String,
    pub timeframe: String,
}

pub struct GalleryService<T: TransformationRepository> {
    pub transformations: T,
}

impl<T: TransformationRepository> GalleryService<T> {
    pub async fn list(&self) -> Result<Vec<Transformation>, SiteError> {
        self.transformations.list().await
    }

    pub async fn publish(&self, input: NewTransformation) -> Result<Transformation, SiteError> {
        let transformation = Transformation {
            id: Uuid::now_v7().to_string(),
            name: input.name,
            before_photo: input.before_photo,
            after_photo: input.after_photo,
            testimonial: input.testimonial,
            rating: input.rating,
            transformation: input.transformation,
            timeframe: input.timeframe,
            created_at: Some(Utc::now()),
        };
        self.transformations.append(&transformation).await?;
        info!(transformation_id = %transformation.id, "transformation published");
        Ok(transformation)
    }
}
