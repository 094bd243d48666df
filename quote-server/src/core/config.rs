use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use shared::models::KIND_PRICING;

/// Rule store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Embedded redb file under `DATA_DIR`
    Redb,
    /// Process memory; lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redb => f.write_str("redb"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3100 | HTTP 服务端口 |
/// | DATA_DIR | ./data | redb 数据目录 |
/// | STORE_BACKEND | redb | redb \| memory |
/// | STORE_TIMEOUT_MS | 5000 | 单次存储调用超时(毫秒) |
/// | DEFAULT_RULE_KIND | pricing | 查询未指定 kind 时使用 |
/// | LOG_LEVEL | info | 日志过滤指令 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | LOG_DIR | (未设置) | 按天滚动的日志目录 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// STORE_BACKEND=memory HTTP_PORT=8080 cargo run -p quote-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据目录，存放 redb 文件
    pub data_dir: String,
    pub store_backend: StoreBackend,
    /// 存储调用超时 (毫秒)
    pub store_timeout_ms: u64,
    /// 默认规则 kind
    pub default_rule_kind: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3100),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            store_backend: std::env::var("STORE_BACKEND")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(StoreBackend::Redb),
            store_timeout_ms: std::env::var("STORE_TIMEOUT_MS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(5000),
            default_rule_kind: std::env::var("DEFAULT_RULE_KIND")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| KIND_PRICING.into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        data_dir: impl Into<String>,
        http_port: u16,
        store_backend: StoreBackend,
    ) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config.store_backend = store_backend;
        config
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// redb 数据库文件路径
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("quotes.redb")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("redb".parse::<StoreBackend>(), Ok(StoreBackend::Redb));
        assert_eq!(" Memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("sqlite".parse::<StoreBackend>().is_err());
        assert_eq!(StoreBackend::Memory.to_string(), "memory");
    }

    #[test]
    fn test_overrides_and_paths() {
        let config = Config::with_overrides("/tmp/quotes", 0, StoreBackend::Memory);
        assert_eq!(config.http_port, 0);
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/quotes/quotes.redb"));
        assert_eq!(
            config.store_timeout(),
            Duration::from_millis(config.store_timeout_ms)
        );
    }
}
