//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for qrlinker using clap's derive macros.

use clap::{Parser, Subcommand};

use crate::storage::{ContentType, QrType};

/// qrlinker - Multi-tenant QR code backend
#[derive(Parser)]
#[command(name = "qrlinker")]
#[command(version)]
#[command(about = "QR code backend with short-code redirects and scan analytics", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// List QR codes of an owner
    List {
        /// Owner id
        #[arg(long)]
        owner: String,

        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 20)]
        limit: u64,

        /// Case-insensitive search on name / short code
        #[arg(long)]
        search: Option<String>,
    },

    /// Create a QR code
    ///
    /// DYNAMIC: PAYLOAD is the destination URL
    /// STATIC: PAYLOAD is the encoded content
    Create {
        /// Owner id
        #[arg(long)]
        owner: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Destination URL (DYNAMIC) or static content (STATIC)
        payload: String,

        /// STATIC or DYNAMIC
        #[arg(long = "type", default_value = "DYNAMIC")]
        qr_type: QrType,

        /// URL, TEXT, EMAIL, PHONE, WIFI or VCARD
        #[arg(long, default_value = "URL")]
        content_type: ContentType,

        /// Expiration time (RFC3339 or relative like "1d", "2h")
        #[arg(long)]
        expire: Option<String>,

        /// Show an interstitial page before redirecting
        #[arg(long)]
        safe_preview: bool,

        #[arg(long)]
        utm_source: Option<String>,

        #[arg(long)]
        utm_medium: Option<String>,

        #[arg(long)]
        utm_campaign: Option<String>,
    },

    /// Delete a QR code and its scans
    Delete {
        /// Owner id
        #[arg(long)]
        owner: String,

        /// QR code id
        id: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
