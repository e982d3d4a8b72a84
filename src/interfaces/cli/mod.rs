//! CLI interface module
//!
//! 命令直接访问数据库，不需要服务器在运行。

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::cli::{Commands, ConfigCommands};
use crate::services::QrService;
use crate::storage::StorageFactory;
use commands::{config_generate, create_qr, delete_qr, list_qr};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::QrlinkerError> for CliError {
    fn from(err: crate::errors::QrlinkerError) -> Self {
        use crate::errors::QrlinkerError;
        match err {
            QrlinkerError::Validation(msg) | QrlinkerError::DateParse(msg) => {
                CliError::ParseError(msg)
            }
            QrlinkerError::DatabaseConfig(msg)
            | QrlinkerError::DatabaseConnection(msg)
            | QrlinkerError::DatabaseOperation(msg) => CliError::StorageError(msg),
            other => CliError::CommandError(other.message().to_string()),
        }
    }
}

async fn qr_service() -> Result<QrService, CliError> {
    let storage = StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;
    let config = crate::config::get_config();
    Ok(QrService::new(storage, config.qr.clone()))
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // Generate doesn't need DB connection
    if let Commands::Config { action } = cmd {
        let ConfigCommands::Generate { output_path, force } = action;
        return config_generate(output_path, force).await;
    }

    let service = Arc::new(qr_service().await?);

    match cmd {
        Commands::List {
            owner,
            page,
            limit,
            search,
        } => list_qr(service, owner, page, limit, search).await,

        Commands::Create {
            owner,
            name,
            payload,
            qr_type,
            content_type,
            expire,
            safe_preview,
            utm_source,
            utm_medium,
            utm_campaign,
        } => {
            let mut req = crate::services::CreateQrRequest::new(name, qr_type, payload);
            req.content_type = content_type;
            req.expires_at = expire;
            req.safe_preview = safe_preview;
            req.utm_source = utm_source;
            req.utm_medium = utm_medium;
            req.utm_campaign = utm_campaign;
            create_qr(service, owner, req).await
        }

        Commands::Delete { owner, id } => delete_qr(service, owner, id).await,

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server mode".to_string(),
        )),

        Commands::Config { .. } => unreachable!("handled above"),
    }
}
