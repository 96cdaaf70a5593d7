use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

/// 运行环境
///
/// production 下隐藏上游错误细节，并在 panic 时直接退出进程。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AppEnvironment {
    #[default]
    Development,
    Production,
    Test,
}

impl AppEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for AppEnvironment {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(format!(
                "Invalid environment: '{}'. Valid: development, production, test",
                s
            )),
        }
    }
}

/// 静态配置（TOML + 环境变量，启动时加载一次）
///
/// - server: 监听地址、端口、运行环境
/// - provider: 短链服务商凭证与超时
/// - cors: 允许的来源
/// - rate_limit: 每 IP 限流阈值
/// - logging: 日志配置
/// - client: 终端客户端（后端地址、历史记录目录）
///
/// 加载后不可变，以 `Arc<StaticConfig>` 的形式显式传给各个服务。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: AppEnvironment,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 短链服务商配置
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    /// Short domain links are created on
    #[serde(default = "default_provider_domain")]
    pub default_domain: String,
    #[serde(default = "default_create_timeout_secs")]
    pub create_timeout_secs: u64,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

// api_key must never end up in logs
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("base_url", &self.base_url)
            .field("default_domain", &self.default_domain)
            .field("create_timeout_secs", &self.create_timeout_secs)
            .field("probe_timeout_secs", &self.probe_timeout_secs)
            .finish()
    }
}

fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        "<unset>".to_string()
    } else {
        let tail: String = secret
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{}", tail)
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 空列表 = 仅同源；`["*"]` = 任意来源
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

/// 每 IP 限流配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_window_ms")]
    pub window_ms: u64,
    #[serde(default = "default_rate_limit_max_requests")]
    pub max_requests: u32,
    /// 信任 X-Forwarded-For（部署在反向代理之后时开启）
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 终端客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of a running relay server
    #[serde(default = "default_client_api_base")]
    pub api_base: String,
    /// 历史记录目录，未设置时使用系统数据目录
    #[serde(default)]
    pub history_dir: Option<String>,
    #[serde(default = "default_client_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn resolved_history_dir(&self) -> std::path::PathBuf {
        match self.history_dir.as_deref().filter(|d| !d.is_empty()) {
            Some(dir) => std::path::PathBuf::from(dir),
            None => dirs::data_dir()
                .unwrap_or_else(|| std::path::PathBuf::from("."))
                .join("shortlink-relay"),
        }
    }
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_provider_base_url() -> String {
    "https://api.rebrandly.com/v1".to_string()
}

fn default_provider_domain() -> String {
    "rebrand.ly".to_string()
}

fn default_create_timeout_secs() -> u64 {
    10
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

fn default_cors_max_age() -> u64 {
    3600
}

fn default_rate_limit_window_ms() -> u64 {
    15 * 60 * 1000
}

fn default_rate_limit_max_requests() -> u32 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_client_api_base() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_client_timeout_secs() -> u64 {
    15
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            environment: AppEnvironment::default(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_provider_base_url(),
            default_domain: default_provider_domain(),
            create_timeout_secs: default_create_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            max_age: default_cors_max_age(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_rate_limit_window_ms(),
            max_requests: default_rate_limit_max_requests(),
            trust_forwarded_for: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_client_api_base(),
            history_dir: None,
            timeout_secs: default_client_timeout_secs(),
        }
    }
}
