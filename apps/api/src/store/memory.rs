use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::application::{ApplicationRecord, ApplicationStatus, NewApplication};
use crate::store::{RecordStore, StoreError};

/// In-memory `RecordStore` for tests. Can be told to fail reads or writes.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<ApplicationRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every stored record regardless of owner, in insertion order.
    pub async fn all(&self) -> Vec<ApplicationRecord> {
        self.records.lock().await.clone()
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<ApplicationRecord>, StoreError> {
        self.check(&self.fail_reads)?;

        // Reverse first so equal timestamps still list the later insert first.
        let mut owned: Vec<ApplicationRecord> = self
            .records
            .lock()
            .await
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, StoreError> {
        self.check(&self.fail_writes)?;

        let record = ApplicationRecord {
            id: Uuid::new_v4(),
            user_id: application.user_id,
            company: application.company,
            position: application.position,
            status: application.status,
            referral_name: application.referral_name,
            url: application.url,
            application_id: application.application_id,
            created_at: Utc::now(),
        };
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        self.check(&self.fail_writes)?;

        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id && r.user_id == user_id)
            .ok_or(StoreError::NotFound(id))?;
        record.status = status;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), StoreError> {
        self.check(&self.fail_writes)?;

        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|r| !(r.id == id && r.user_id == user_id));
        if records.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_app(user_id: Uuid, company: &str) -> NewApplication {
        NewApplication {
            user_id,
            company: company.to_string(),
            position: "Engineer".to_string(),
            status: ApplicationStatus::Applied,
            referral_name: None,
            url: None,
            application_id: None,
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_owner_scoped() {
        let store = MemoryRecordStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.insert(new_app(alice, "First")).await.unwrap();
        store.insert(new_app(bob, "Other")).await.unwrap();
        store.insert(new_app(alice, "Second")).await.unwrap();

        let listed = store.list(alice).await.unwrap();
        let companies: Vec<_> = listed.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(companies, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_update_status_of_foreign_record_is_not_found() {
        let store = MemoryRecordStore::new();
        let owner = Uuid::new_v4();
        let record = store.insert(new_app(owner, "Acme")).await.unwrap();

        let err = store
            .update_status(Uuid::new_v4(), record.id, ApplicationStatus::Rejected)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(id) if id == record.id));
        assert_eq!(store.all().await[0].status, ApplicationStatus::Applied);
    }

    #[tokio::test]
    async fn test_delete_removes_only_the_target() {
        let store = MemoryRecordStore::new();
        let owner = Uuid::new_v4();
        let keep = store.insert(new_app(owner, "Keep")).await.unwrap();
        let drop = store.insert(new_app(owner, "Drop")).await.unwrap();

        store.delete(owner, drop.id).await.unwrap();

        let remaining = store.list(owner).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
    }
}
