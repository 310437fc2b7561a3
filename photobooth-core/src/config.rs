use crate::structs::DisplayMode;
use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 编译进二进制的默认配置
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../configs.toml");

/// 顶层应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
}

/// Web 服务器运行时配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub photos_dir: PathBuf,
    pub public_host: String,
    pub default_mode: DisplayMode,
}

/// 用于解析 TOML 的临时结构
#[derive(Deserialize)]
struct AppConfigFile {
    /// [server] 表
    server: ServerConfigToml,
}

#[derive(Deserialize)]
struct ServerConfigToml {
    bind_addr: String,
    photos_dir: String,
    public_host: String,
    #[serde(default)]
    default_mode: DisplayMode,
}

impl TryFrom<ServerConfigToml> for ServerConfig {
    type Error = Error;

    fn try_from(t: ServerConfigToml) -> Result<Self> {
        let bind_addr = SocketAddr::from_str(&t.bind_addr)
            .map_err(|e| Error::Config(format!("invalid bind_addr '{}': {}", t.bind_addr, e)))?;
        Ok(ServerConfig {
            bind_addr,
            photos_dir: PathBuf::from(t.photos_dir),
            public_host: t.public_host,
            default_mode: t.default_mode,
        })
    }
}

// ============= 配置加载函数 =============

/// 从 TOML 字符串加载应用配置
pub fn load_config_from_toml_str(s: &str) -> Result<AppConfig> {
    let parsed: AppConfigFile =
        toml::from_str(s).map_err(|e| Error::Config(format!("failed to parse TOML: {}", e)))?;

    Ok(AppConfig {
        server: ServerConfig::try_from(parsed.server)?,
    })
}

/// 从磁盘上的配置文件加载
pub fn load_config_from_file(path: impl AsRef<Path>) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path.as_ref())?;
    load_config_from_toml_str(&content)
}

/// 编译时嵌入的默认配置
pub fn default_config() -> Result<AppConfig> {
    load_config_from_toml_str(DEFAULT_CONFIG_TOML)
}
