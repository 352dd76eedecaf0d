//! 批量处理集成测试
//!
//! 通过存储测试替身（注错 / 幽灵标识 / 慢速加载）验证
//! 并发协调、完成屏障和失败聚合的行为

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use record_batch_processor::{
    logger, AggregateError, BatchProcessor, Config, MemoryStore, Record, RecordId, RecordStatus,
    RecordStore, StoreError,
};
use tokio_test::assert_ok;

/// 注错存储：对指定标识的 save 注入持久层错误
struct FlakyStore {
    inner: MemoryStore,
    fail_save_ids: HashSet<RecordId>,
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn list_ids(&self) -> Result<Vec<RecordId>, StoreError> {
        self.inner.list_ids().await
    }

    async fn load(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        self.inner.load(id).await
    }

    async fn save(&self, record: Record) -> Result<Record, StoreError> {
        if self.fail_save_ids.contains(&record.id) {
            return Err(StoreError::save_failed(
                record.id,
                std::io::Error::other("磁盘写入失败"),
            ));
        }
        self.inner.save(record).await
    }

    async fn find_all(&self) -> Result<Vec<Record>, StoreError> {
        self.inner.find_all().await
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }
}

/// 幽灵存储：列举结果里包含一个实际不存在的标识
struct GhostStore {
    inner: MemoryStore,
    phantom_id: RecordId,
}

#[async_trait]
impl RecordStore for GhostStore {
    async fn list_ids(&self) -> Result<Vec<RecordId>, StoreError> {
        let mut ids = self.inner.list_ids().await?;
        ids.push(self.phantom_id);
        Ok(ids)
    }

    async fn load(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        self.inner.load(id).await
    }

    async fn save(&self, record: Record) -> Result<Record, StoreError> {
        self.inner.save(record).await
    }

    async fn find_all(&self) -> Result<Vec<Record>, StoreError> {
        self.inner.find_all().await
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }
}

/// 慢速存储：每次加载都挂起一段时间，用来暴露提前返回的问题
struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

#[async_trait]
impl RecordStore for SlowStore {
    async fn list_ids(&self) -> Result<Vec<RecordId>, StoreError> {
        self.inner.list_ids().await
    }

    async fn load(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.load(id).await
    }

    async fn save(&self, record: Record) -> Result<Record, StoreError> {
        self.inner.save(record).await
    }

    async fn find_all(&self) -> Result<Vec<Record>, StoreError> {
        self.inner.find_all().await
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }
}

/// 量规存储：统计同时在途的 load 数量及其峰值
struct GaugeStore {
    inner: MemoryStore,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[async_trait]
impl RecordStore for GaugeStore {
    async fn list_ids(&self) -> Result<Vec<RecordId>, StoreError> {
        self.inner.list_ids().await
    }

    async fn load(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // 制造重叠窗口，让并发上限的突破能被观测到
        tokio::time::sleep(Duration::from_millis(10)).await;
        let result = self.inner.load(id).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn save(&self, record: Record) -> Result<Record, StoreError> {
        self.inner.save(record).await
    }

    async fn find_all(&self) -> Result<Vec<Record>, StoreError> {
        self.inner.find_all().await
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }
}

/// 预置 n 条待处理记录（MemoryStore 会分配 1..=n 的标识）
async fn seed_pending(store: &MemoryStore, n: usize) {
    for i in 1..=n {
        store
            .save(Record::new(format!("记录-{}", i)))
            .await
            .expect("预置记录应该成功");
    }
}

#[tokio::test]
async fn test_all_pending_records_become_processed() {
    logger::init();

    let store = Arc::new(MemoryStore::new());
    seed_pending(&store, 3).await;

    let processor = BatchProcessor::new(Arc::clone(&store), Config::default());
    let report = assert_ok!(processor.process_all().await);

    assert_eq!(report.len(), 3, "三条记录都应该出现在结果中");
    assert_eq!(report.processed_count, 3, "进度计数应该等于结果数量");
    assert!(
        report
            .records
            .iter()
            .all(|r| r.status == RecordStatus::Processed),
        "结果中的记录都应该是 PROCESSED 状态"
    );

    // 存储中的规范形式也应该已经更新
    for record in store.find_all().await.expect("查询存储应该成功") {
        assert_eq!(record.status, RecordStatus::Processed);
    }
}

#[tokio::test]
async fn test_empty_store_returns_empty_report() {
    logger::init();

    let store = Arc::new(MemoryStore::new());
    let processor = BatchProcessor::new(store, Config::default());

    let report = assert_ok!(processor.process_all().await);

    assert!(report.is_empty(), "空标识集应该返回空结果");
    assert_eq!(report.processed_count, 0);
}

#[tokio::test]
async fn test_missing_records_are_silently_excluded() {
    logger::init();

    let inner = MemoryStore::new();
    seed_pending(&inner, 1).await;
    let store = Arc::new(GhostStore {
        inner,
        phantom_id: 99,
    });

    let processor = BatchProcessor::new(store, Config::default());
    let report = assert_ok!(processor.process_all().await);

    assert_eq!(report.len(), 1, "不存在的记录应该被静默排除，不算错误");
    assert_eq!(report.processed_count, 1);
    assert_eq!(report.records[0].id, 1);
    assert_eq!(report.records[0].status, RecordStatus::Processed);
}

#[tokio::test]
async fn test_save_failure_surfaces_aggregate_error_with_id() {
    logger::init();

    let inner = MemoryStore::new();
    seed_pending(&inner, 2).await;
    let store = Arc::new(FlakyStore {
        inner,
        fail_save_ids: HashSet::from([2]),
    });

    let processor = BatchProcessor::new(store, Config::default());
    let err = processor
        .process_all()
        .await
        .expect_err("有工作单元失败时必须返回错误，不能静默吞掉");

    let aggregate = err
        .downcast_ref::<AggregateError>()
        .expect("错误应该是 AggregateError");

    assert_eq!(aggregate.failed_ids(), vec![2], "失败明细应该指明记录 2");
    assert_eq!(aggregate.partial.len(), 1, "成功部分应该包含记录 1");
    assert_eq!(aggregate.partial.records[0].id, 1);
    assert_eq!(aggregate.partial.processed_count, 1);

    // 失败原因要能定位到保存失败
    let detail = aggregate.to_string();
    assert!(detail.contains("保存记录失败"), "错误信息应该说明失败原因: {}", detail);
}

#[tokio::test]
async fn test_returns_only_after_all_units_complete() {
    logger::init();

    let inner = MemoryStore::new();
    seed_pending(&inner, 30).await;
    let store = Arc::new(SlowStore {
        inner,
        delay: Duration::from_millis(20),
    });

    let config = Config {
        max_concurrent_workers: 5,
        ..Config::default()
    };
    let processor = BatchProcessor::new(store, config);
    let report = assert_ok!(processor.process_all().await);

    // 返回时所有工作单元必须已到达终态，结果不允许缺条
    assert_eq!(report.len(), 30);
    assert_eq!(report.processed_count, 30);
}

#[tokio::test]
async fn test_counter_matches_result_len_under_load() {
    logger::init();

    let store = Arc::new(MemoryStore::new());
    seed_pending(&store, 100).await;

    let processor = BatchProcessor::new(store, Config::default());
    let report = assert_ok!(processor.process_all().await);

    assert_eq!(report.len(), 100, "并发追加不允许丢失记录");
    assert_eq!(report.processed_count, 100, "并发递增不允许丢失计数");
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    logger::init();

    let store = Arc::new(MemoryStore::new());
    seed_pending(&store, 25).await;

    // 同一个处理器上的两次并发调用：计数器和累加器按调用新建，
    // 任何一次调用的计数都不允许把另一次的递增算进来
    let processor = BatchProcessor::new(Arc::clone(&store), Config::default());
    let (result_a, result_b) = tokio::join!(processor.process_all(), processor.process_all());

    let report_a = result_a.expect("调用 A 应该成功");
    let report_b = result_b.expect("调用 B 应该成功");

    assert_eq!(report_a.len(), 25, "调用 A 的结果只包含本次调用处理的记录");
    assert_eq!(report_b.len(), 25, "调用 B 的结果只包含本次调用处理的记录");
    assert_eq!(
        report_a.processed_count,
        report_a.len(),
        "调用 A 的计数只统计自己的递增"
    );
    assert_eq!(
        report_b.processed_count,
        report_b.len(),
        "调用 B 的计数只统计自己的递增"
    );
}

#[tokio::test]
async fn test_worker_pool_bound_is_shared_across_calls() {
    logger::init();

    let inner = MemoryStore::new();
    seed_pending(&inner, 40).await;
    let store = Arc::new(GaugeStore {
        inner,
        in_flight: AtomicUsize::new(0),
        max_in_flight: AtomicUsize::new(0),
    });

    let config = Config {
        max_concurrent_workers: 10,
        ..Config::default()
    };
    let processor = BatchProcessor::new(Arc::clone(&store), config);

    // 工作池许可随处理器长期存活，两次并发调用合计共用同一上限
    let (result_a, result_b) = tokio::join!(processor.process_all(), processor.process_all());
    result_a.expect("调用 A 应该成功");
    result_b.expect("调用 B 应该成功");

    let peak = store.max_in_flight.load(Ordering::SeqCst);
    assert!(
        peak <= 10,
        "两次并发调用合计不允许超过配置的并发上限 10，实际峰值 {}",
        peak
    );
}
