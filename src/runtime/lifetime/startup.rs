use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analytics::{ScanRecorder, ScanSink};
use crate::config::StaticConfig;
use crate::services::{AnalyticsService, QrService};
use crate::storage::{SeaOrmStorage, StorageFactory};

#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub recorder: ScanRecorder,
    pub qr_service: Arc<QrService>,
    pub analytics_service: Arc<AnalyticsService>,
}

impl StartupContext {
    /// 基于已有存储组装服务，测试中直接传入临时数据库
    pub fn with_storage(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Self {
        let sink: Arc<dyn ScanSink> = storage.clone();
        let recorder = ScanRecorder::new(
            sink,
            config.analytics.enable_scan_logging,
            config.analytics.enable_ip_logging,
        );

        Self {
            qr_service: Arc::new(QrService::new(storage.clone(), config.qr.clone())),
            analytics_service: Arc::new(AnalyticsService::new(storage.clone())),
            recorder,
            storage,
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、扫码记录器和业务服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let config = crate::config::get_config();
    let context = StartupContext::with_storage(storage, &config);

    if !config.analytics.enable_scan_logging {
        warn!("Scan logging is disabled in configuration");
    } else if !config.analytics.enable_ip_logging {
        info!("IP logging is disabled, scans will be stored with unknown IP");
    }

    check_component_enabled(&config);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(context)
}

fn check_component_enabled(config: &StaticConfig) {
    // 检查管理 API 是否启用
    if config.api.token.is_empty() {
        info!("Admin API is disabled (api.token not set)");
    } else {
        if config.api.token.len() < 8 {
            warn!("WARNING: API token is very short. Consider using a stronger token.");
        }
        info!("Admin API available at: {}", config.api.prefix);
    }

    info!(
        "QR redirects served at: {}/r/{{code}}",
        config.qr.app_url.trim_end_matches('/')
    );
}
