//! Domain record persistence abstraction

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::DomainRecord;

/// Domain record repository trait
///
/// Platform implementations:
/// - `InMemoryDomainRecordRepository` (this crate; tests and single-process embedding)
/// - `SqliteStore` (custom-domain-app, `SeaORM`)
///
/// Operations touching more than one record (`create`, `set_default`,
/// `delete_and_promote`) must be atomic with respect to each other.
#[async_trait]
pub trait DomainRecordRepository: Send + Sync {
    /// Insert a new record.
    ///
    /// # Errors
    /// * `DuplicateDomain` - `record.full_domain` already exists (any owner)
    /// * `QuotaExceeded` - the owner already has `quota` records
    async fn create(&self, record: &DomainRecord, quota: u32) -> CoreResult<()>;

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<DomainRecord>>;

    async fn find_by_full_domain(&self, full_domain: &str) -> CoreResult<Option<DomainRecord>>;

    /// All records of an owner, oldest first
    async fn list_by_owner(&self, owner_id: &str) -> CoreResult<Vec<DomainRecord>>;

    async fn count_by_owner(&self, owner_id: &str) -> CoreResult<u64>;

    /// Overwrite a single existing record (`DomainNotFound` if absent).
    ///
    /// `is_default` is not written; it only changes through `set_default`,
    /// `clear_default` and `delete_and_promote`.
    async fn update(&self, record: &DomainRecord) -> CoreResult<()>;

    async fn delete(&self, id: &str) -> CoreResult<()>;

    /// Make `domain_id` the owner's only default domain.
    ///
    /// Clears `is_default` on every other record of the owner in the same
    /// atomic step. Returns the updated target.
    async fn set_default(&self, owner_id: &str, domain_id: &str) -> CoreResult<DomainRecord>;

    /// Clear `is_default` on one record without promoting another.
    async fn clear_default(&self, owner_id: &str, domain_id: &str) -> CoreResult<DomainRecord>;

    /// Delete a record and, if it was the default, promote the oldest
    /// remaining default-eligible record of the owner.
    ///
    /// # Returns
    /// * `Some(id)` - the promoted record
    /// * `None` - nothing was promoted
    async fn delete_and_promote(&self, owner_id: &str, domain_id: &str)
        -> CoreResult<Option<String>>;
}

/// In-memory domain record repository
///
/// Every multi-record operation holds the write lock for its whole body.
#[derive(Clone, Default)]
pub struct InMemoryDomainRecordRepository {
    records: Arc<RwLock<HashMap<String, DomainRecord>>>,
}

impl InMemoryDomainRecordRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned_record<'a>(
    store: &'a mut HashMap<String, DomainRecord>,
    owner_id: &str,
    domain_id: &str,
) -> CoreResult<&'a mut DomainRecord> {
    store
        .get_mut(domain_id)
        .filter(|r| r.owner_id == owner_id)
        .ok_or_else(|| CoreError::DomainNotFound(domain_id.to_string()))
}

#[async_trait]
impl DomainRecordRepository for InMemoryDomainRecordRepository {
    async fn create(&self, record: &DomainRecord, quota: u32) -> CoreResult<()> {
        let mut store = self.records.write().await;

        if store.values().any(|r| r.full_domain == record.full_domain) {
            return Err(CoreError::DuplicateDomain(record.full_domain.clone()));
        }
        let owned = store
            .values()
            .filter(|r| r.owner_id == record.owner_id)
            .count();
        if owned >= quota as usize {
            return Err(CoreError::QuotaExceeded {
                owner_id: record.owner_id.clone(),
                limit: quota,
            });
        }

        store.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<DomainRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_by_full_domain(&self, full_domain: &str) -> CoreResult<Option<DomainRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|r| r.full_domain == full_domain)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> CoreResult<Vec<DomainRecord>> {
        let mut records: Vec<DomainRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn count_by_owner(&self, owner_id: &str) -> CoreResult<u64> {
        let count = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.owner_id == owner_id)
            .count();
        Ok(count as u64)
    }

    async fn update(&self, record: &DomainRecord) -> CoreResult<()> {
        let mut store = self.records.write().await;
        match store.get_mut(&record.id) {
            Some(existing) => {
                let is_default = existing.is_default;
                *existing = record.clone();
                existing.is_default = is_default;
                Ok(())
            }
            None => Err(CoreError::DomainNotFound(record.id.clone())),
        }
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        self.records
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CoreError::DomainNotFound(id.to_string()))
    }

    async fn set_default(&self, owner_id: &str, domain_id: &str) -> CoreResult<DomainRecord> {
        let mut store = self.records.write().await;
        owned_record(&mut store, owner_id, domain_id)?;

        let now = chrono::Utc::now();
        for record in store.values_mut().filter(|r| r.owner_id == owner_id) {
            let should_be_default = record.id == domain_id;
            if record.is_default != should_be_default {
                record.is_default = should_be_default;
                record.updated_at = now;
            }
        }

        owned_record(&mut store, owner_id, domain_id).map(|r| r.clone())
    }

    async fn clear_default(&self, owner_id: &str, domain_id: &str) -> CoreResult<DomainRecord> {
        let mut store = self.records.write().await;
        let record = owned_record(&mut store, owner_id, domain_id)?;
        if record.is_default {
            record.is_default = false;
            record.touch();
        }
        Ok(record.clone())
    }

    async fn delete_and_promote(
        &self,
        owner_id: &str,
        domain_id: &str,
    ) -> CoreResult<Option<String>> {
        let mut store = self.records.write().await;
        let was_default = owned_record(&mut store, owner_id, domain_id)?.is_default;
        store.remove(domain_id);

        if !was_default {
            return Ok(None);
        }

        let Some(candidate) = store
            .values_mut()
            .filter(|r| r.owner_id == owner_id && r.is_default_eligible())
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)))
        else {
            return Ok(None);
        };

        candidate.is_default = true;
        candidate.touch();
        Ok(Some(candidate.id.clone()))
    }
}
