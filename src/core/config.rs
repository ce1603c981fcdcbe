//! 配置管理系统 (Configuration Management)
//!
//! 负责 `config.toml` 的反序列化及其层级结构映射，支持默认值回退机制。

use std::collections::HashMap;
use std::path::Path;

use bon::Builder;
use config::{Config, File};
use serde::Deserialize;

use crate::core::error::{Result, SourceError};

/// 全局应用配置
#[derive(Debug, Deserialize, Builder, Clone, Default)]
pub struct AppConfig {
    /// 站点特定配置覆盖映射
    #[serde(default)]
    pub sites: HashMap<String, SiteConfig>,
}

/// 站点特定配置覆盖
#[derive(Debug, Deserialize, Builder, Clone, Default)]
pub struct SiteConfig {
    /// 自定义域名 (用于镜像站点)
    pub base_url: Option<String>,
    /// 站点账号；特权接口在未登录时按需触发一次登录
    pub username: Option<String>,
    pub password: Option<String>,
    /// 图片混淆密钥；随站点协议版本变化，视为配置而非算法常量
    pub image_key: Option<u8>,
}

impl SiteConfig {
    /// 可用凭据对；任一为空视为未配置
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }
}

impl AppConfig {
    /// 从文件系统中加载并解析配置
    pub fn load() -> Result<Self> {
        let config_path = Path::new("config.toml");
        let builder = Config::builder();

        let builder = if config_path.exists() {
            builder.add_source(File::from(config_path))
        } else {
            builder
        };

        let settings = builder.build().map_err(SourceError::Config)?;
        settings.try_deserialize().map_err(SourceError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_missing_credentials_are_unusable() {
        let cfg = SiteConfig::default();
        assert!(cfg.credentials().is_none());

        let cfg = SiteConfig::builder()
            .username("user".to_string())
            .password(String::new())
            .build();
        assert!(cfg.credentials().is_none());

        let cfg = SiteConfig::builder()
            .username("user".to_string())
            .password("pass".to_string())
            .build();
        assert_eq!(cfg.credentials(), Some(("user", "pass")));
    }
}
