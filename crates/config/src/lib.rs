//! mesa-config - 配置加载库

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 超级管理员引导凭证
///
/// 匹配该邮箱与密钥的登录不经过外部凭证服务（解析器第一优先级）
#[derive(Debug, Clone, Deserialize)]
pub struct SuperAdminConfig {
    pub email: String,
    pub secret: Secret<String>,
}

/// 密钥策略
#[derive(Debug, Clone, Deserialize)]
pub struct SecretPolicyConfig {
    #[serde(default = "default_min_secret_length")]
    pub min_length: usize,
    #[serde(default = "default_max_secret_length")]
    pub max_length: usize,
}

fn default_min_secret_length() -> usize {
    6
}

fn default_max_secret_length() -> usize {
    128
}

impl Default for SecretPolicyConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_secret_length(),
            max_length: default_max_secret_length(),
        }
    }
}

/// 托管文档存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: Secret<String>,
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    pub super_admin: SuperAdminConfig,
    #[serde(default)]
    pub secret_policy: SecretPolicyConfig,
    pub store: StoreConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config: Self = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("MESA_").split("_"))
            .extract()?;

        Ok(config)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}
