//! Mode routing
//!
//! - Server mode (HTTP server), the default when no subcommand is given
//! - CLI mode (QR management and config generation)

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::{configure_app, run_server};
