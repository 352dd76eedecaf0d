//! 记录数据模型
//!
//! 定义持久化记录及其状态枚举

use serde::{Deserialize, Serialize};

/// 记录的唯一标识符
pub type RecordId = u64;

/// 记录状态
///
/// 处理器只做赋值和比较，不关心其他业务含义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// 待处理
    Pending,
    /// 已处理
    Processed,
}

/// 持久化记录
///
/// 由 RecordStore 持有，处理器在单个工作单元期间借用并通过 save 归还
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 唯一标识符（0 表示尚未入库，save 时由存储分配）
    pub id: RecordId,
    /// 记录名称
    pub name: String,
    /// 当前状态
    pub status: RecordStatus,
}

impl Record {
    /// 创建一条新的待处理记录（id 由存储在 save 时分配）
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            status: RecordStatus::Pending,
        }
    }
}
