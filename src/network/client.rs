//! 面向站点的 HTTP 客户端封装
//!
//! 每个站点实例持有一个带站点默认 Header 的客户端。重定向全局关闭：
//! 表单登录依赖 302 状态码判定成败，自动跟随会吞掉该信号。
//! 超时属于传输层关注点，统一在此配置。

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use serde::Serialize;

use crate::core::error::Result;

#[derive(Clone)]
pub struct SiteClient {
    client: Client,
}

impl SiteClient {
    pub fn new(default_headers: HeaderMap) -> Self {
        let client = Client::builder()
            .default_headers(default_headers)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("CRITICAL: Failed to initialize network client");

        Self { client }
    }

    /// 执行通用 GET 请求
    pub async fn get(&self, url: &str) -> Result<Response> {
        Ok(self.client.get(url).send().await?)
    }

    /// GET 并附加请求级 Header（如阅读器接口要求的 Referer）
    pub async fn get_with_headers(&self, url: &str, headers: HeaderMap) -> Result<Response> {
        Ok(self.client.get(url).headers(headers).send().await?)
    }

    /// 获取文本内容
    pub async fn get_text(&self, url: &str) -> Result<String> {
        Ok(self.get(url).await?.text().await?)
    }

    pub async fn get_text_with_headers(&self, url: &str, headers: HeaderMap) -> Result<String> {
        Ok(self.get_with_headers(url, headers).await?.text().await?)
    }

    /// 获取二进制内容
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        Ok(self.get(url).await?.bytes().await?)
    }

    pub async fn get_bytes_with_headers(&self, url: &str, headers: HeaderMap) -> Result<Bytes> {
        Ok(self.get_with_headers(url, headers).await?.bytes().await?)
    }

    /// 提交表单 (application/x-www-form-urlencoded)
    pub async fn post_form<T: Serialize + ?Sized>(&self, url: &str, form: &T) -> Result<Response> {
        Ok(self.client.post(url).form(form).send().await?)
    }
}
