//! 记录存储契约 - 基础设施层
//!
//! 批处理器消费的外部协作者接口：按标识列举 / 加载 / 保存记录。
//! 处理器不关心存储引擎本身，只依赖这份契约

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Record, RecordId};

/// 记录存储
///
/// 职责：
/// - 持有所有持久化记录
/// - 暴露列举 / 加载 / 保存 / 删除能力
/// - 不认识批处理流程
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 列举当前所有记录的标识（调用时刻的快照，可能为空）
    async fn list_ids(&self) -> Result<Vec<RecordId>, StoreError>;

    /// 按标识加载记录
    ///
    /// 记录不存在时返回 `Ok(None)`，不视为错误
    async fn load(&self, id: RecordId) -> Result<Option<Record>, StoreError>;

    /// 保存记录，返回存储后的规范形式（新记录会被分配标识）
    async fn save(&self, record: Record) -> Result<Record, StoreError>;

    /// 加载所有记录
    async fn find_all(&self) -> Result<Vec<Record>, StoreError>;

    /// 按标识删除记录（记录不存在时静默成功）
    async fn delete(&self, id: RecordId) -> Result<(), StoreError>;
}
