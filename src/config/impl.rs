use std::collections::HashMap;
use std::path::Path;

use config::{Config, Environment, File};

use super::StaticConfig;
use crate::errors::{RelayError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，分隔符为 `__`，例如 `RELAY__SERVER__PORT=9999`
pub const ENV_PREFIX: &str = "RELAY";

/// Well-known variable names accepted in addition to the prefixed form.
/// Each maps to the config key it overrides.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("REBRANDLY_API_KEY", "provider.api_key"),
    ("PORT", "server.port"),
    ("APP_ENV", "server.environment"),
    ("RATE_LIMIT_WINDOW_MS", "rate_limit.window_ms"),
    ("RATE_LIMIT_MAX_REQUESTS", "rate_limit.max_requests"),
];

/// Comma-separated alias for `cors.allowed_origins`
const ALLOWED_ORIGINS_ALIAS: &str = "ALLOWED_ORIGINS";

impl StaticConfig {
    /// 从 TOML 文件和进程环境变量加载配置
    ///
    /// 优先级：别名环境变量 > RELAY__ 环境变量 > 配置文件 > 默认值
    pub fn load(path: Option<&str>) -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(path, env)
    }

    /// 使用显式给定的环境变量集合加载配置（测试时不触碰进程环境）
    ///
    /// 显式指定的 `path` 必须存在；未指定时 `config.toml` 可选。
    pub fn load_from(path: Option<&str>, env: HashMap<String, String>) -> Result<Self> {
        let (file_path, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let mut builder = Config::builder()
            .add_source(File::with_name(file_path).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .source(Some(env.clone())),
            );

        for (var, key) in ENV_ALIASES {
            let value = env.get(*var).filter(|v| !v.trim().is_empty()).cloned();
            builder = builder.set_override_option(*key, value)?;
        }

        if let Some(raw) = env.get(ALLOWED_ORIGINS_ALIAS) {
            let origins: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !origins.is_empty() {
                builder = builder.set_override("cors.allowed_origins", origins)?;
            }
        }

        let settings = builder.build()?;
        let config: StaticConfig = settings.try_deserialize()?;

        if Path::new(file_path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", file_path);
        }

        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("# Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RelayError::serialization(e.to_string()))?;

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
