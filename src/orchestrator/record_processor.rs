//! 单个工作单元处理器 - 编排层
//!
//! 核心职责：处理一条记录的完整流程
//!
//! 流程顺序：
//! 1. 按标识加载记录
//! 2. 状态置为 PROCESSED
//! 3. 保存回存储
//! 4. 追加到共享结果累加器并递增进度计数器

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::error::StoreError;
use crate::infrastructure::RecordStore;
use crate::models::{Record, RecordId, RecordStatus};

/// 工作单元的终态
#[derive(Debug)]
pub enum UnitOutcome {
    /// 处理成功（记录已保存并计入结果）
    Succeeded,
    /// 记录不存在（不是错误，静默排除在结果之外）
    NotFound,
    /// 加载或保存失败（错误被捕获并上交协调者，不跨任务边界抛出）
    Failed(StoreError),
}

/// 处理单条记录
///
/// # 参数
/// - `store`: 记录存储
/// - `id`: 记录标识
/// - `accumulator`: 本次批处理调用的共享结果累加器
/// - `counter`: 本次批处理调用的进度计数器
///
/// # 返回
/// 返回工作单元的终态，任何错误都以终态形式上交，绝不向外抛出
pub(crate) async fn process_record<S: RecordStore>(
    store: &S,
    id: RecordId,
    accumulator: &Mutex<Vec<Record>>,
    counter: &AtomicUsize,
) -> UnitOutcome {
    // 1. 加载记录
    let mut record = match store.load(id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!("记录 {} 不存在，跳过", id);
            return UnitOutcome::NotFound;
        }
        Err(e) => {
            error!("记录 {} 加载失败: {}", id, e);
            return UnitOutcome::Failed(e);
        }
    };

    // 2. 状态置为已处理
    record.status = RecordStatus::Processed;

    // 3. 保存并更新共享状态
    match store.save(record).await {
        Ok(saved) => {
            // 追加和递增之间没有挂起点，任务被放弃时不会出现只写了一半的状态
            accumulator.lock().await.push(saved);
            counter.fetch_add(1, Ordering::SeqCst);
            debug!("记录 {} 处理成功", id);
            UnitOutcome::Succeeded
        }
        Err(e) => {
            error!("记录 {} 保存失败: {}", id, e);
            UnitOutcome::Failed(e)
        }
    }
}
