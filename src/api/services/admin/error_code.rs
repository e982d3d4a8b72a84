//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::QrlinkerError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: QR 码错误
/// - 6000-6099: 统计错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    MissingOwner = 1002,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidDateFormat = 1012,
    ServiceUnavailable = 1030,

    // QR 码错误 3000-3099
    QrNotFound = 3000,
    QrInvalidPayload = 3002,
    QrImmutable = 3003,
    QrDatabaseError = 3005,
    QrShortCodeExhausted = 3006,

    // Analytics 错误 6000-6099
    AnalyticsQueryFailed = 6000,
}

impl From<&QrlinkerError> for ErrorCode {
    fn from(err: &QrlinkerError) -> Self {
        match err {
            QrlinkerError::Validation(_) => ErrorCode::QrInvalidPayload,
            QrlinkerError::NotFound(_) => ErrorCode::QrNotFound,
            QrlinkerError::QrImmutable(_) => ErrorCode::QrImmutable,
            QrlinkerError::DateParse(_) => ErrorCode::InvalidDateFormat,
            QrlinkerError::ShortCodeExhausted(_) => ErrorCode::QrShortCodeExhausted,
            QrlinkerError::DatabaseOperation(_)
            | QrlinkerError::DatabaseConnection(_)
            | QrlinkerError::DatabaseConfig(_) => ErrorCode::QrDatabaseError,
            QrlinkerError::FileOperation(_) | QrlinkerError::Serialization(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}
