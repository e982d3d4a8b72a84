use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum QrlinkerError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    QrImmutable(String),
    Serialization(String),
    DateParse(String),
    ShortCodeExhausted(String),
}

impl QrlinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            QrlinkerError::DatabaseConfig(_) => "E001",
            QrlinkerError::DatabaseConnection(_) => "E002",
            QrlinkerError::DatabaseOperation(_) => "E003",
            QrlinkerError::FileOperation(_) => "E004",
            QrlinkerError::Validation(_) => "E005",
            QrlinkerError::NotFound(_) => "E006",
            QrlinkerError::QrImmutable(_) => "E007",
            QrlinkerError::Serialization(_) => "E008",
            QrlinkerError::DateParse(_) => "E009",
            QrlinkerError::ShortCodeExhausted(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            QrlinkerError::DatabaseConfig(_) => "Database Configuration Error",
            QrlinkerError::DatabaseConnection(_) => "Database Connection Error",
            QrlinkerError::DatabaseOperation(_) => "Database Operation Error",
            QrlinkerError::FileOperation(_) => "File Operation Error",
            QrlinkerError::Validation(_) => "Validation Error",
            QrlinkerError::NotFound(_) => "Resource Not Found",
            QrlinkerError::QrImmutable(_) => "QR Code Immutable",
            QrlinkerError::Serialization(_) => "Serialization Error",
            QrlinkerError::DateParse(_) => "Date Parse Error",
            QrlinkerError::ShortCodeExhausted(_) => "Short Code Generation Failed",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            QrlinkerError::DatabaseConfig(msg)
            | QrlinkerError::DatabaseConnection(msg)
            | QrlinkerError::DatabaseOperation(msg)
            | QrlinkerError::FileOperation(msg)
            | QrlinkerError::Validation(msg)
            | QrlinkerError::NotFound(msg)
            | QrlinkerError::QrImmutable(msg)
            | QrlinkerError::Serialization(msg)
            | QrlinkerError::DateParse(msg)
            | QrlinkerError::ShortCodeExhausted(msg) => msg,
        }
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            QrlinkerError::Validation(_)
            | QrlinkerError::QrImmutable(_)
            | QrlinkerError::DateParse(_) => StatusCode::BAD_REQUEST,
            QrlinkerError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否属于服务端内部错误（需要记录日志，不应把细节暴露给调用方）
    pub fn is_internal(&self) -> bool {
        self.http_status().is_server_error()
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for QrlinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for QrlinkerError {}

// 便捷的构造函数
impl QrlinkerError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        QrlinkerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        QrlinkerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        QrlinkerError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        QrlinkerError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        QrlinkerError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        QrlinkerError::NotFound(msg.into())
    }

    pub fn qr_immutable<T: Into<String>>(msg: T) -> Self {
        QrlinkerError::QrImmutable(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        QrlinkerError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        QrlinkerError::DateParse(msg.into())
    }

    pub fn short_code_exhausted<T: Into<String>>(msg: T) -> Self {
        QrlinkerError::ShortCodeExhausted(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for QrlinkerError {
    fn from(err: sea_orm::DbErr) -> Self {
        QrlinkerError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for QrlinkerError {
    fn from(err: std::io::Error) -> Self {
        QrlinkerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for QrlinkerError {
    fn from(err: serde_json::Error) -> Self {
        QrlinkerError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for QrlinkerError {
    fn from(err: chrono::ParseError) -> Self {
        QrlinkerError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QrlinkerError>;
