/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的记录数量（工作池并发上限）
    pub max_concurrent_workers: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 演示模式下预置的待处理记录数量
    pub demo_records: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_workers: 10,
            verbose_logging: false,
            demo_records: 12,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_workers: std::env::var("MAX_CONCURRENT_WORKERS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_workers),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            demo_records: std::env::var("DEMO_RECORDS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.demo_records),
        }
    }
}
