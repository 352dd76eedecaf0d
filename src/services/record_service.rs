//! 记录服务 - 业务能力层
//!
//! 只负责单条记录的增删改查能力，不出现批量流程

use std::sync::Arc;

use tracing::debug;

use crate::error::StoreError;
use crate::infrastructure::RecordStore;
use crate::models::{Record, RecordId};

/// 记录服务
///
/// 职责：
/// - 对上层暴露单条记录的 CRUD 能力
/// - 直接委托给 RecordStore
/// - 不关心并发调度
pub struct RecordService<S: RecordStore> {
    store: Arc<S>,
}

impl<S: RecordStore> RecordService<S> {
    /// 创建新的记录服务
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// 查询所有记录
    pub async fn find_all(&self) -> Result<Vec<Record>, StoreError> {
        self.store.find_all().await
    }

    /// 按标识查询记录
    ///
    /// 记录不存在时返回 `Ok(None)`
    pub async fn find_by_id(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        self.store.load(id).await
    }

    /// 保存记录，返回存储后的规范形式
    pub async fn save(&self, record: Record) -> Result<Record, StoreError> {
        let saved = self.store.save(record).await?;
        debug!("记录已保存: id={}", saved.id);
        Ok(saved)
    }

    /// 按标识删除记录
    pub async fn delete_by_id(&self, id: RecordId) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        debug!("记录已删除: id={}", id);
        Ok(())
    }
}
