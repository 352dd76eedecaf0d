//! # Record Batch Processor
//!
//! 一个用于批量处理持久化记录的 Rust 应用程序：
//! 把存储中的 PENDING 记录并发地置为 PROCESSED，
//! 所有工作单元完成后返回完整的聚合结果或带标识的失败明细。
//!
//! ## 架构设计
//!
//! 本系统采用严格的三层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持久化协作者契约与实现
//! - `RecordStore` - 列举 / 加载 / 保存 / 删除记录的能力
//! - `MemoryStore` - 内存键值存储实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单条 Record
//! - `RecordService` - 单条记录的 CRUD 能力
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量记录处理器，管理并发和聚合
//! - `orchestrator/record_processor` - 单个工作单元处理器
//!
//! ## 并发模型
//!
//! 处理器持有一个长期存活的 Semaphore 作为工作池上限，所有
//! `process_all` 调用共用，并发调用合计不超过配置的并发数。
//! 每次调用：每个标识一个 tokio 任务 → join-all 屏障 → 聚合。
//! 累加器和进度计数器按调用新建，调用之间互不干扰。

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;

// 重新导出常用类型
pub use config::Config;
pub use error::{AggregateError, StoreError, UnitFailure, WorkerError};
pub use infrastructure::{MemoryStore, RecordStore};
pub use models::{ProcessingReport, Record, RecordId, RecordStatus};
pub use orchestrator::{BatchProcessor, UnitOutcome};
pub use services::RecordService;
