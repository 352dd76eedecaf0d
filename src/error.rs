use std::fmt;

use crate::models::{ProcessingReport, RecordId};

/// 持久层错误
///
/// 每个变体都携带出错记录的标识（列举操作除外），
/// 保证失败可以精确归因到具体记录
#[derive(Debug)]
pub enum StoreError {
    /// 列举记录ID失败
    ListFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 加载记录失败
    LoadFailed {
        id: RecordId,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 保存记录失败
    SaveFailed {
        id: RecordId,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ListFailed { source } => {
                write!(f, "列举记录ID失败: {}", source)
            }
            StoreError::LoadFailed { id, source } => {
                write!(f, "加载记录失败 (id: {}): {}", id, source)
            }
            StoreError::SaveFailed { id, source } => {
                write!(f, "保存记录失败 (id: {}): {}", id, source)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::ListFailed { source }
            | StoreError::LoadFailed { source, .. }
            | StoreError::SaveFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 工作单元错误
///
/// 区分持久层失败和任务本身的执行失败（panic / join 失败）
#[derive(Debug)]
pub enum WorkerError {
    /// 持久层操作失败
    Store(StoreError),
    /// 任务执行失败
    Task(String),
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::Store(e) => write!(f, "持久层错误: {}", e),
            WorkerError::Task(msg) => write!(f, "任务执行失败: {}", msg),
        }
    }
}

impl std::error::Error for WorkerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkerError::Store(e) => Some(e),
            WorkerError::Task(_) => None,
        }
    }
}

/// 单个工作单元的失败明细
#[derive(Debug)]
pub struct UnitFailure {
    /// 失败记录的标识
    pub id: RecordId,
    /// 失败原因
    pub cause: WorkerError,
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "记录 {}: {}", self.id, self.cause)
    }
}

/// 聚合错误
///
/// 同一次批处理中有一个或多个工作单元失败时返回。
/// 携带成功部分的结果（partial）和逐条失败明细（failures），
/// 调用方既能拿到部分结果，也能知道具体哪些记录因何失败
#[derive(Debug)]
pub struct AggregateError {
    /// 成功处理部分的结果
    pub partial: ProcessingReport,
    /// 失败的工作单元明细（至少一条）
    pub failures: Vec<UnitFailure>,
}

impl AggregateError {
    pub fn new(partial: ProcessingReport, failures: Vec<UnitFailure>) -> Self {
        Self { partial, failures }
    }

    /// 失败记录的标识列表
    pub fn failed_ids(&self) -> Vec<RecordId> {
        self.failures.iter().map(|f| f.id).collect()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "批处理部分失败: 成功 {}, 失败 {}",
            self.partial.len(),
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "; {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

// ========== 便捷构造函数 ==========

impl StoreError {
    /// 创建列举失败错误
    pub fn list_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::ListFailed {
            source: Box::new(source),
        }
    }

    /// 创建加载失败错误
    pub fn load_failed(id: RecordId, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::LoadFailed {
            id,
            source: Box::new(source),
        }
    }

    /// 创建保存失败错误
    pub fn save_failed(id: RecordId, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::SaveFailed {
            id,
            source: Box::new(source),
        }
    }

    /// 出错记录的标识（列举操作没有具体记录）
    pub fn id(&self) -> Option<RecordId> {
        match self {
            StoreError::ListFailed { .. } => None,
            StoreError::LoadFailed { id, .. } | StoreError::SaveFailed { id, .. } => Some(*id),
        }
    }
}
