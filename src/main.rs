use std::sync::Arc;

use anyhow::Result;
use record_batch_processor::{logger, BatchProcessor, Config, MemoryStore, Record, RecordStore};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();

    // 预置演示数据
    let store = Arc::new(MemoryStore::new());
    for i in 1..=config.demo_records {
        store.save(Record::new(format!("记录-{}", i))).await?;
    }

    // 批量处理
    let processor = BatchProcessor::new(Arc::clone(&store), config);
    let report = processor.process_all().await?;

    info!("处理结果:\n{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
