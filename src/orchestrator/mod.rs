//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和并发调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量记录处理器
//! - 快照所有记录标识
//! - 控制并发数量（Semaphore）
//! - join-all 完成屏障
//! - 聚合结果与失败明细
//!
//! ### `record_processor` - 单个工作单元处理器
//! - 加载单条记录
//! - 状态置为 PROCESSED 并保存
//! - 更新共享累加器和进度计数器
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<RecordId>)
//!     ↓
//! record_processor (处理单条 Record)
//!     ↓
//! infrastructure (基础设施：RecordStore)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，record_processor 管单条
//! 2. **按调用隔离**：累加器和计数器只属于一次 process_all 调用
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;
pub mod record_processor;

// 重新导出主要类型
pub use batch_processor::BatchProcessor;
pub use record_processor::UnitOutcome;
