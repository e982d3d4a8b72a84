//! Shared test setup: temp SQLite database plus the full route table

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use tempfile::TempDir;

use qrlinker::api::services::AppStartTime;
use qrlinker::config::StaticConfig;
use qrlinker::runtime::lifetime::startup::StartupContext;
use qrlinker::runtime::modes::configure_app;
use qrlinker::storage::SeaOrmStorage;

pub const TOKEN: &str = "test-token-123";
pub const OWNER: &str = "owner-a";
pub const OTHER_OWNER: &str = "owner-b";

pub struct TestEnv {
    // 数据库文件随 TempDir 一起删除
    _dir: TempDir,
    pub ctx: StartupContext,
    pub config: StaticConfig,
}

impl TestEnv {
    pub fn storage(&self) -> &Arc<SeaOrmStorage> {
        &self.ctx.storage
    }

    /// 轮询直到扫码后台任务写入完成
    pub async fn wait_for_scans(&self, qr_id: &str, expected: u64) -> u64 {
        let mut count = 0;
        for _ in 0..50 {
            count = self.ctx.storage.count_scans(qr_id).await.unwrap();
            if count >= expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        count
    }
}

pub fn test_config() -> StaticConfig {
    let mut config = StaticConfig::default();
    config.api.token = TOKEN.to_string();
    config.qr.app_url = "https://qr.example.com/".to_string();
    config
}

pub async fn setup_with(config: StaticConfig) -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("qrlinker_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );

    TestEnv {
        _dir: dir,
        ctx: StartupContext::with_storage(storage, &config),
        config,
    }
}

pub async fn setup() -> TestEnv {
    setup_with(test_config()).await
}

/// 注册与生产相同的路由表：`App::new().configure(|cfg| common::configure(cfg, &env))`
pub fn configure(cfg: &mut web::ServiceConfig, env: &TestEnv) {
    let start = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };
    configure_app(cfg, &env.ctx, &env.config, start);
}
