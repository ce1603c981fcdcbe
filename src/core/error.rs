//! 错误处理体系 (Error Handling System)
//!
//! 定义领域相关的错误类型与全局 Result 别名。每个失败恰好落入
//! 一种分类，宿主据此渲染对应提示；日期解析与状态文本映射失败
//! 不走这里，静默退化为哨兵值。

use thiserror::Error;

/// 全局错误定义 (Source Domain Errors)
#[derive(Error, Debug)]
pub enum SourceError {
    /// 特权请求缺少可用凭据
    #[error("Not logged in")]
    NotAuthenticated,

    /// 登录协议已走完但被站点拒绝
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// 站点以带内公告替代了正常数据
    #[error("Service notice: {0}")]
    ServiceNotice(String),

    /// 站点未实现该能力
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// 响应结构不符合解析假设
    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// 全局 Result 别名
pub type Result<T> = std::result::Result<T, SourceError>;
