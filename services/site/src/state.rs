use std::path::PathBuf;
use std::sync::Arc;

use fitcoach_domain::intake::{ClientSubmission, Transformation};

use crate::infra::credentials::StaticCredentialStore;
use crate::infra::files::{FileSubmissionRepository, FileTransformationRepository, JsonFileStore};
use crate::infra::google::GoogleIdentityProvider;
use crate::infra::mail::MailDelivery;
use crate::infra::memory::{InMemoryPasscodeStore, InMemorySessionRepository};
use crate::usecase::intake::{GalleryService, IntakeService};
use crate::usecase::passcode::PasscodeService;
use crate::usecase::role::AdminAllowList;
use crate::usecase::session::SessionManager;

/// Shared application state passed to every handler via axum `State`.
///
/// This is the composition root: each collaborator is built once in `main`
/// and handed out as a cheap clone per request.
#[derive(Clone)]
pub struct AppState {
    pub passcodes: InMemoryPasscodeStore,
    pub sessions: InMemorySessionRepository,
    pub mail: MailDelivery,
    pub provider: GoogleIdentityProvider,
    pub credentials: StaticCredentialStore,
    pub admins: Arc<AdminAllowList>,
    pub submissions: JsonFileStore<ClientSubmission>,
    pub transformations: JsonFileStore<Transformation>,
    pub session_secret: String,
    pub cookie_domain: Option<String>,
    pub data_dir: PathBuf,
}

impl AppState {
    pub fn passcode_service(&self) -> PasscodeService<InMemoryPasscodeStore, MailDelivery> {
        PasscodeService {
            store: self.passcodes.clone(),
            delivery: self.mail.clone(),
        }
    }

    pub fn session_manager(
        &self,
    ) -> SessionManager<InMemorySessionRepository, GoogleIdentityProvider, StaticCredentialStore>
    {
        SessionManager {
            sessions: self.sessions.clone(),
            provider: self.provider.clone(),
            credentials: self.credentials.clone(),
            admins: Arc::clone(&self.admins),
            secret: self.session_secret.clone(),
        }
    }

    pub fn intake_service(&self) -> IntakeService<FileSubmissionRepository> {
        IntakeService {
            submissions: FileSubmissionRepository {
                file: self.submissions.clone(),
            },
        }
    }

    pub fn gallery_service(&self) -> GalleryService<FileTransformationRepository> {
        GalleryService {
            transformations: FileTransformationRepository {
                file: self.transformations.clone(),
            },
        }
    }
}
