//! 批处理结果模型

use serde::Serialize;

use crate::models::record::Record;

/// 单次批处理的最终结果
///
/// 不变量：`processed_count == records.len()`，
/// 且 records 中只包含成功处理的记录，不存在占位值
#[derive(Debug, Default, Serialize)]
pub struct ProcessingReport {
    /// 本次调用中成功处理并保存的记录
    pub records: Vec<Record>,
    /// 进度计数器的终值（每成功保存一条记录加一）
    pub processed_count: usize,
}

impl ProcessingReport {
    /// 结果是否为空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 成功处理的记录数量
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
