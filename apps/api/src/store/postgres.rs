use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{
    ApplicationRecord, ApplicationRow, ApplicationStatus, NewApplication,
};
use crate::store::{RecordStore, StoreError};

/// `RecordStore` over the `applications` table.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<ApplicationRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| ApplicationRecord::try_from(row).map_err(StoreError::from))
            .collect()
    }

    async fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, StoreError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications
                (user_id, company, position, status, referral_name, url, application_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(application.user_id)
        .bind(&application.company)
        .bind(&application.position)
        .bind(application.status.as_str())
        .bind(&application.referral_name)
        .bind(&application.url)
        .bind(&application.application_id)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Inserted application {} for user {}",
            row.id, application.user_id
        );

        Ok(ApplicationRecord::try_from(row)?)
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE applications SET status = $1 WHERE id = $2 AND user_id = $3")
                .bind(status.as_str())
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        info!("Application {id} moved to {status}");
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        info!("Deleted application {id} for user {user_id}");
        Ok(())
    }
}
