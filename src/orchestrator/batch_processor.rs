//! 批量记录处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量记录的处理和并发协调。
//!
//! ## 核心功能
//!
//! 1. **快照标识**：从 RecordStore 获取调用时刻的全部记录标识
//! 2. **并发控制**：使用 Semaphore 限制并发数量
//! 3. **任务派发**：每个标识派发一个工作单元（tokio::spawn）
//! 4. **完成屏障**：join-all 等待所有工作单元到达终态后才返回
//! 5. **结果聚合**：汇总成功记录、进度计数和失败明细
//!
//! ## 设计特点
//!
//! - **按调用隔离**：累加器和计数器每次调用新建，互不干扰
//! - **错误不吞**：工作单元的失败逐条上交，聚合后带标识返回
//! - **向下委托**：委托 record_processor 处理单条记录

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use futures::future;
use tokio::sync::{Mutex, Semaphore};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AggregateError, UnitFailure, WorkerError};
use crate::infrastructure::RecordStore;
use crate::models::ProcessingReport;
use crate::orchestrator::record_processor::{self, UnitOutcome};

/// 批量记录处理器
pub struct BatchProcessor<S: RecordStore> {
    store: Arc<S>,
    config: Config,
    /// 工作池许可：随处理器长期存活，多次调用共用同一上限，
    /// 并发调用合计也不会超过配置的并发数
    limiter: Arc<Semaphore>,
}

impl<S: RecordStore + 'static> BatchProcessor<S> {
    /// 创建新的批量处理器
    pub fn new(store: Arc<S>, config: Config) -> Self {
        let limiter = Arc::new(Semaphore::new(config.max_concurrent_workers));
        Self {
            store,
            config,
            limiter,
        }
    }

    /// 处理当前存储中的所有记录
    ///
    /// 把每条 PENDING 记录置为 PROCESSED 并保存，全部工作单元到达终态后：
    /// - 无失败：返回完整的 ProcessingReport
    /// - 有失败：返回 AggregateError，其中携带成功部分的结果和逐条失败明细
    ///
    /// 记录不存在不算失败，静默排除在结果之外
    pub async fn process_all(&self) -> Result<ProcessingReport> {
        // 1. 快照所有记录标识
        let ids = self.store.list_ids().await?;

        if ids.is_empty() {
            info!("⚠️ 没有找到待处理的记录，直接返回空结果");
            return Ok(ProcessingReport::default());
        }

        let total = ids.len();
        log_batch_start(total, self.config.max_concurrent_workers);

        // 2. 本次调用专属的累加器和计数器（工作池许可是处理器级别的长期资源）
        let accumulator = Arc::new(Mutex::new(Vec::with_capacity(total)));
        let counter = Arc::new(AtomicUsize::new(0));

        // 3. 每个标识派发一个工作单元
        let mut handles = Vec::with_capacity(total);
        for id in ids {
            // 池满时在这里排队等待许可，不丢弃任务
            let permit = self.limiter.clone().acquire_owned().await?;

            let store = Arc::clone(&self.store);
            let accumulator = Arc::clone(&accumulator);
            let counter = Arc::clone(&counter);

            let handle = tokio::spawn(async move {
                let _permit = permit;
                record_processor::process_record(store.as_ref(), id, &accumulator, &counter).await
            });
            handles.push((id, handle));
        }

        // 4. join-all 屏障：所有工作单元到达终态之前绝不返回
        let outcomes = future::join_all(
            handles
                .into_iter()
                .map(|(id, handle)| async move { (id, handle.await) }),
        )
        .await;

        // 5. 汇总终态
        let mut failures: Vec<UnitFailure> = Vec::new();
        let mut not_found = 0usize;

        for (id, joined) in outcomes {
            match joined {
                Ok(UnitOutcome::Succeeded) => {}
                Ok(UnitOutcome::NotFound) => {
                    not_found += 1;
                }
                Ok(UnitOutcome::Failed(e)) => {
                    failures.push(UnitFailure {
                        id,
                        cause: WorkerError::Store(e),
                    });
                }
                Err(e) => {
                    error!("记录 {} 的任务执行失败: {}", id, e);
                    failures.push(UnitFailure {
                        id,
                        cause: WorkerError::Task(e.to_string()),
                    });
                }
            }
        }

        let records = std::mem::take(&mut *accumulator.lock().await);
        let processed_count = counter.load(Ordering::SeqCst);
        let report = ProcessingReport {
            records,
            processed_count,
        };

        // 6. 返回结果或聚合错误
        if failures.is_empty() {
            print_final_stats(&report, not_found, total);
            Ok(report)
        } else {
            warn!(
                "⚠️ 批处理存在失败: 成功 {}, 失败 {}, 未找到 {}",
                report.len(),
                failures.len(),
                not_found
            );
            if self.config.verbose_logging {
                for failure in &failures {
                    error!("  ❌ {}", failure);
                }
            }
            Err(AggregateError::new(report, failures).into())
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_batch_start(total: usize, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始批量处理记录");
    info!("✓ 找到 {} 条待处理的记录", total);
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

fn print_final_stats(report: &ProcessingReport, not_found: usize, total: usize) {
    info!("{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 成功: {}/{}", report.len(), total);
    info!("⏭️ 未找到: {}", not_found);
    info!("{}", "=".repeat(60));
}
