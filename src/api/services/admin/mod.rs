//! Admin API 服务模块
//!
//! 该模块包含管理 API 的所有端点，包括：
//! - QR 码 CRUD 操作
//! - 扫码统计

pub mod analytics;
pub mod error_code;
mod helpers;
mod qr_crud;
pub mod routes;
mod types;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{
    OWNER_HEADER, OwnerId, api_result, error_from_qrlinker, error_response, success_response,
};

// 重新导出错误码
pub use error_code::ErrorCode;

// 重新导出端点
pub use analytics::get_analytics;
pub use qr_crud::{create_qr_code, delete_qr_code, get_qr_code, list_qr_codes, update_qr_code};
pub use routes::admin_routes;
