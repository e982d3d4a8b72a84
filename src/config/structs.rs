use serde::{Deserialize, Serialize};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 服务器地址、端口、CPU 数量
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - api: 管理 API 前缀、Bearer Token、CORS
/// - redirect: 扫码跳转的回退地址与页面品牌信息
/// - analytics: 扫码记录开关
/// - qr: 短码生成与对外地址
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub redirect: RedirectConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub qr: QrConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：QRL，分隔符：__
    /// 示例：QRL__SERVER__PORT=9999
    pub fn load(path: &str) -> Self {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix("QRL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> crate::errors::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::errors::QrlinkerError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    /// 连接超时（秒）
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// text | json
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 管理 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_prefix")]
    pub prefix: String,
    /// Bearer Token，为空时管理 API 整体返回 404
    #[serde(default)]
    pub token: String,
    /// 为空时不启用 CORS
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// 扫码跳转配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// 短码不存在时的跳转地址
    #[serde(default = "default_not_found_path")]
    pub not_found_path: String,
    /// 内部错误时的跳转地址
    #[serde(default = "default_error_path")]
    pub error_path: String,
    #[serde(default = "default_brand_name")]
    pub brand_name: String,
    /// 页面上 "Go Back" 指向的地址
    #[serde(default = "default_brand_url")]
    pub brand_url: String,
    /// 预览页 "Report" 链接，为空时不显示；会追加 ?code=<short_code>
    #[serde(default)]
    pub report_url: Option<String>,
}

/// 扫码记录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_true")]
    pub enable_scan_logging: bool,
    /// 关闭后 IP 一律记为 unknown
    #[serde(default = "default_true")]
    pub enable_ip_logging: bool,
}

/// QR 码配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrConfig {
    /// 对外访问地址，用于拼接 {app_url}/r/{code}
    #[serde(default = "default_app_url")]
    pub app_url: String,
    #[serde(default = "default_short_code_length")]
    pub short_code_length: usize,
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,
    /// 第三方 QR 图片渲染服务
    #[serde(default = "default_image_api_url")]
    pub image_api_url: String,
}

// ============================================================
// Default value functions
// ============================================================

fn default_true() -> bool {
    true
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "qrlinker.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_not_found_path() -> String {
    "/not-found".to_string()
}

fn default_error_path() -> String {
    "/".to_string()
}

fn default_brand_name() -> String {
    "QR Platform".to_string()
}

fn default_brand_url() -> String {
    "/".to_string()
}

fn default_app_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_short_code_length() -> usize {
    7
}

fn default_max_generation_attempts() -> u32 {
    10
}

fn default_image_api_url() -> String {
    "https://api.qrserver.com/v1/create-qr-code/".to_string()
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: default_api_prefix(),
            token: String::new(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            not_found_path: default_not_found_path(),
            error_path: default_error_path(),
            brand_name: default_brand_name(),
            brand_url: default_brand_url(),
            report_url: None,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enable_scan_logging: true,
            enable_ip_logging: true,
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            app_url: default_app_url(),
            short_code_length: default_short_code_length(),
            max_generation_attempts: default_max_generation_attempts(),
            image_api_url: default_image_api_url(),
        }
    }
}
