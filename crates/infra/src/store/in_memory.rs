use std::collections::HashMap;
use std::sync::RwLock;

use skuflow_products::{NewSkuRecord, Sku, SkuChanges, SkuId};

use super::{SkuFilter, SkuOrder, SkuStore, StoreError};

/// In-memory SKU store.
///
/// Intended for tests/dev. Not optimized for performance: list queries scan
/// and sort every record.
#[derive(Debug, Default)]
pub struct InMemorySkuStore {
    records: RwLock<HashMap<SkuId, Sku>>,
}

impl InMemorySkuStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn code_taken(records: &HashMap<SkuId, Sku>, code: &str, except: Option<SkuId>) -> bool {
        records
            .values()
            .any(|r| r.sku == code && Some(r.id) != except)
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait::async_trait]
impl SkuStore for InMemorySkuStore {
    async fn create(&self, data: NewSkuRecord) -> Result<Sku, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;

        if Self::code_taken(&records, &data.sku, None) {
            return Err(StoreError::Duplicate(data.sku));
        }

        let sku = data.into_sku(SkuId::generate());
        records.insert(sku.id, sku.clone());
        Ok(sku)
    }

    async fn find_by_id(&self, id: SkuId) -> Result<Option<Sku>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(&id).cloned())
    }

    async fn find_many(
        &self,
        filter: &SkuFilter,
        offset: u64,
        limit: u64,
        order: SkuOrder,
    ) -> Result<Vec<Sku>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;

        let mut matching: Vec<&Sku> = records.values().filter(|r| filter.matches(r)).collect();
        match order {
            SkuOrder::NewestFirst => matching.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            }),
        }

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &SkuFilter) -> Result<u64, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.values().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn update_by_id(&self, id: SkuId, changes: SkuChanges) -> Result<Sku, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;

        if let Some(code) = &changes.sku {
            if Self::code_taken(&records, code, Some(id)) {
                return Err(StoreError::Duplicate(code.clone()));
            }
        }

        let record = records.get_mut(&id).ok_or(StoreError::Missing(id))?;
        record.apply(changes);
        Ok(record.clone())
    }

    async fn delete_by_id(&self, id: SkuId) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.remove(&id).map(|_| ()).ok_or(StoreError::Missing(id))
    }
}
