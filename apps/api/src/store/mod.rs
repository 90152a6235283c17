//! Record Store — persistence for application records.
//!
//! `AppState` and the view-model carry an `Arc<dyn RecordStore>`. Every operation is
//! scoped by the owning `user_id`; a record is invisible to anyone else.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{
    ApplicationRecord, ApplicationStatus, NewApplication, UnknownStatus,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Application {0} not found")]
    NotFound(Uuid),

    #[error("Stored row is invalid: {0}")]
    InvalidStatus(#[from] UnknownStatus),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records owned by `user_id`, newest `created_at` first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<ApplicationRecord>, StoreError>;

    /// Inserts a record; the store assigns `id` and `created_at`.
    async fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, StoreError>;

    /// Writes only the `status` column.
    async fn update_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), StoreError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), StoreError>;
}
