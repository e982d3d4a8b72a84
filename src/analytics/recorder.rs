//! 扫码记录器
//!
//! 扫码写库在独立的 tokio 任务中完成，HTTP 响应不会等待它，
//! 写入失败只记录日志。

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::{ScanDetail, ScanSink};

#[derive(Clone)]
pub struct ScanRecorder {
    sink: Arc<dyn ScanSink>,
    enabled: bool,
    record_ip: bool,
}

impl ScanRecorder {
    pub fn new(sink: Arc<dyn ScanSink>, enabled: bool, record_ip: bool) -> Self {
        Self {
            sink,
            enabled,
            record_ip,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record_ip(&self) -> bool {
        self.record_ip
    }

    /// 异步记录一次扫码，立即返回
    ///
    /// 返回的 JoinHandle 仅供测试等待；调用方通常直接丢弃。
    pub fn record(&self, detail: ScanDetail) -> Option<JoinHandle<()>> {
        if !self.enabled {
            debug!("Scan logging disabled, skipping {}", detail.qr_code_id);
            return None;
        }

        let sink = self.sink.clone();
        Some(tokio::spawn(async move {
            let qr_code_id = detail.qr_code_id.clone();
            if let Err(e) = sink.log_scan(detail).await {
                error!("Scan log error for QR {}: {}", qr_code_id, e);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySink {
        scans: Mutex<Vec<ScanDetail>>,
    }

    #[async_trait::async_trait]
    impl ScanSink for MemorySink {
        async fn log_scan(&self, detail: ScanDetail) -> anyhow::Result<()> {
            self.scans.lock().unwrap().push(detail);
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait::async_trait]
    impl ScanSink for FailingSink {
        async fn log_scan(&self, _detail: ScanDetail) -> anyhow::Result<()> {
            anyhow::bail!("database is locked")
        }
    }

    fn detail() -> ScanDetail {
        ScanDetail {
            qr_code_id: "qr-1".into(),
            ip: "203.0.113.1".into(),
            user_agent: String::new(),
            device_type: "desktop".into(),
            os: "Unknown".into(),
            browser: "Unknown".into(),
            referrer: String::new(),
            scanned_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_record_writes_through_sink() {
        let sink = Arc::new(MemorySink::default());
        let recorder = ScanRecorder::new(sink.clone(), true, true);

        recorder.record(detail()).unwrap().await.unwrap();
        assert_eq!(sink.scans.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_recorder_does_nothing() {
        let sink = Arc::new(MemorySink::default());
        let recorder = ScanRecorder::new(sink.clone(), false, true);

        assert!(recorder.record(detail()).is_none());
        assert!(sink.scans.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let recorder = ScanRecorder::new(Arc::new(FailingSink), true, true);
        // 任务本身不会 panic
        recorder.record(detail()).unwrap().await.unwrap();
    }
}
