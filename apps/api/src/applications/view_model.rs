//! Application View-Model — the dashboard's state holder.
//!
//! Holds the signed-in user's records and a loading flag, and mediates every write to
//! the record store. Collaborators are injected at construction; there is no global
//! store. Every write is followed by a full reload rather than a client-side merge.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::applications::projection::{get_counts, project, StatusCounts, StatusFilter};
use crate::extraction::JobExtractor;
use crate::models::application::{ApplicationDraft, ApplicationRecord, ApplicationStatus};
use crate::session::{Session, SessionError, SessionProvider};
use crate::store::{RecordStore, StoreError};

const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this application?";

/// The presentation shell's blocking dialogs.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Shows a message the user must dismiss.
    fn alert(&self, message: &str);

    /// Asks a yes/no question; `true` means the user agreed.
    async fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Error)]
pub enum ViewModelError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No active session")]
    NoSession,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Default)]
struct ViewState {
    applications: Vec<ApplicationRecord>,
    is_loading: bool,
    is_extracting: bool,
}

pub struct ApplicationViewModel {
    store: Arc<dyn RecordStore>,
    session: Arc<dyn SessionProvider>,
    extractor: Arc<dyn JobExtractor>,
    prompter: Arc<dyn Prompter>,
    state: RwLock<ViewState>,
}

impl ApplicationViewModel {
    pub fn new(
        store: Arc<dyn RecordStore>,
        session: Arc<dyn SessionProvider>,
        extractor: Arc<dyn JobExtractor>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            store,
            session,
            extractor,
            prompter,
            state: RwLock::new(ViewState::default()),
        }
    }

    pub async fn applications(&self) -> Vec<ApplicationRecord> {
        self.state.read().await.applications.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn is_extracting(&self) -> bool {
        self.state.read().await.is_extracting
    }

    /// The visible list for the selected tab and search box.
    pub async fn filtered(&self, filter: StatusFilter, query: &str) -> Vec<ApplicationRecord> {
        let state = self.state.read().await;
        project(&state.applications, filter, query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn counts(&self) -> StatusCounts {
        get_counts(&self.state.read().await.applications)
    }

    /// Replaces the list with the owner's records, newest first.
    /// Failures are logged and leave the current list in place.
    pub async fn load(&self) {
        self.set_loading(true).await;

        match self.fetch().await {
            Ok(records) => {
                info!("Loaded {} applications", records.len());
                self.state.write().await.applications = records;
            }
            Err(e) => error!("Error fetching applications: {e}"),
        }

        self.set_loading(false).await;
    }

    pub async fn create(
        &self,
        draft: ApplicationDraft,
    ) -> Result<ApplicationRecord, ViewModelError> {
        draft.validate().map_err(ViewModelError::Validation)?;

        self.mutate("adding", async {
            let user_id = self.owner().await?;
            let record = self
                .store
                .insert(draft.into_new_application(user_id))
                .await?;
            Ok::<_, ViewModelError>(record)
        })
        .await
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), ViewModelError> {
        self.mutate("updating", async {
            let user_id = self.owner().await?;
            self.store.update_status(user_id, id, status).await?;
            Ok::<_, ViewModelError>(())
        })
        .await
    }

    /// Deletes after the user confirms. Returns `false` if they declined.
    pub async fn delete(&self, id: Uuid) -> Result<bool, ViewModelError> {
        if !self.prompter.confirm(DELETE_CONFIRMATION).await {
            info!("Delete of application {id} cancelled");
            return Ok(false);
        }

        self.mutate("deleting", async {
            let user_id = self.owner().await?;
            self.store.delete(user_id, id).await?;
            Ok::<_, ViewModelError>(())
        })
        .await
        .map(|()| true)
    }

    /// Runs a pasted description through the extractor and returns a prefilled form.
    /// On any failure the user gets a retry prompt and nothing is prefilled.
    pub async fn prefill_from_description(
        &self,
        job_description: &str,
    ) -> Option<ApplicationDraft> {
        self.state.write().await.is_extracting = true;

        let draft = match self.extractor.extract(job_description).await {
            Ok(result) => Some(ApplicationDraft::from(result)),
            Err(e) => {
                error!("Error parsing job description: {e}");
                self.prompter.alert(e.user_message());
                None
            }
        };

        self.state.write().await.is_extracting = false;
        draft
    }

    /// Reloads when a session starts; drops the list when it ends.
    pub async fn handle_session_change(&self, session: Option<&Session>) {
        match session {
            Some(s) => {
                info!("Session active for user {}, loading applications", s.user_id);
                self.load().await;
            }
            None => {
                info!("Session ended, clearing applications");
                self.state.write().await.applications.clear();
            }
        }
    }

    /// Tracks the session provider until it goes away.
    pub fn follow_session(self: Arc<Self>) -> JoinHandle<()> {
        let mut rx = self.session.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let session = rx.borrow_and_update().clone();
                self.handle_session_change(session.as_ref()).await;
            }
        })
    }

    pub async fn sign_out(&self) -> Result<(), ViewModelError> {
        self.session.sign_out().await?;
        self.state.write().await.applications.clear();
        Ok(())
    }

    /// Loading flag up, run the write, reload or alert, flag down.
    async fn mutate<T, F>(&self, action: &str, op: F) -> Result<T, ViewModelError>
    where
        F: Future<Output = Result<T, ViewModelError>>,
    {
        self.set_loading(true).await;

        let result = op.await;
        match &result {
            Ok(_) => self.load().await,
            Err(e) => {
                error!("Error {action} application: {e}");
                self.prompter.alert(&format!("Error {action} application"));
            }
        }

        self.set_loading(false).await;
        result
    }

    async fn fetch(&self) -> Result<Vec<ApplicationRecord>, ViewModelError> {
        let user_id = self.owner().await?;
        Ok(self.store.list(user_id).await?)
    }

    async fn owner(&self) -> Result<Uuid, ViewModelError> {
        match self.session.current_session().await? {
            Some(session) => Ok(session.user_id),
            None => {
                warn!("No active session");
                Err(ViewModelError::NoSession)
            }
        }
    }

    async fn set_loading(&self, loading: bool) {
        self.state.write().await.is_loading = loading;
    }
}
