//! CLI command implementations

mod config_gen;
mod qr_management;

pub use config_gen::config_generate;
pub use qr_management::{create_qr, delete_qr, list_qr};
