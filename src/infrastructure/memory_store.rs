//! 内存记录存储 - 基础设施层
//!
//! 以 HashMap 为底座的键值存储实现，供演示程序和测试使用

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::infrastructure::record_store::RecordStore;
use crate::models::{Record, RecordId};

/// 内存记录存储
///
/// 职责：
/// - 以 id 为键持有记录
/// - save 时为新记录（id == 0）分配单调递增的标识
/// - 内部同步，支持任意多工作单元并发读写
pub struct MemoryStore {
    records: RwLock<HashMap<RecordId, Record>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// 创建空的内存存储
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_ids(&self) -> Result<Vec<RecordId>, StoreError> {
        let records = self.records.read().await;
        Ok(records.keys().copied().collect())
    }

    async fn load(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn save(&self, mut record: Record) -> Result<Record, StoreError> {
        if record.id == 0 {
            record.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        }
        let mut records = self.records.write().await;
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_all(&self) -> Result<Vec<Record>, StoreError> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.remove(&id);
        Ok(())
    }
}
