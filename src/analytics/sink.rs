use super::ScanDetail;

/// 扫码日志 Sink
#[async_trait::async_trait]
pub trait ScanSink: Send + Sync {
    /// 记录单条扫码
    async fn log_scan(&self, detail: ScanDetail) -> anyhow::Result<()>;
}
