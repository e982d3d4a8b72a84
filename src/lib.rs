//! qrlinker - Multi-tenant QR code backend
//!
//! Short-code redirects with UTM rewriting, safe-scan preview pages,
//! fire-and-forget scan logging and per-owner scan analytics.
//!
//! # Architecture
//! - `storage`: Sea-ORM storage for QR codes and scans
//! - `analytics`: Scan capture and asynchronous recording
//! - `services`: QR management, redirect resolution and analytics queries
//! - `api`: HTTP services and middleware
//! - `interfaces`: Command-line interface
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
