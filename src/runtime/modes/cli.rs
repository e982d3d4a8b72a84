//! CLI mode
//!
//! This module contains the CLI mode startup logic.
//! It delegates to the actual CLI implementation.

use crate::cli::Commands;
use crate::interfaces::cli::{CliError, run_cli_command};

/// Run CLI mode
///
/// 安装 TLS provider 后交给具体命令处理。
pub async fn run_cli(cmd: Commands) -> Result<(), CliError> {
    // 重复安装只会返回 Err，忽略即可
    let _ = rustls::crypto::ring::default_provider().install_default();
    run_cli_command(cmd).await
}
