//! Batoto 站点实现
//!
//! 分页 HTML 列表 + CSS 选择器解析。章节列表被登录墙保护：
//! 表单登录，302 重定向即成功。目录、详情、章节、阅读器分别
//! 拆在子模块中。

mod catalog;
mod indexer;
mod reader;
mod selectors;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, REFERER};
use url::Url;

use crate::core::config::SiteConfig;
use crate::core::error::{Result, SourceError};
use crate::core::model::{Chapter, Filter, Manga, MangasPage, Page};
use crate::interfaces::Source;
use crate::network::client::SiteClient;
use crate::network::session::AuthSession;

pub use self::selectors::SiteSelectors;

pub const DEFAULT_BASE_URL: &str = "http://bato.to";

/// Batoto 站点实例
pub struct Batoto {
    config: SiteConfig,
    base: Url,
    client: SiteClient,
    session: AuthSession,
}

impl Batoto {
    pub fn new(config: SiteConfig) -> Self {
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base = Url::parse(base_url).expect("Invalid base URL");

        // 站点按该 Cookie 返回英文界面，所有请求固定携带
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("lang_option=English"));
        let client = SiteClient::new(headers);

        Self {
            config,
            base,
            client,
            session: AuthSession::new(),
        }
    }

    /// 规范化 URL
    #[inline]
    fn normalize(&self, path: &str) -> String {
        crate::utils::to_absolute_url(&self.base, path)
    }

    /// 阅读器接口要求的 Referer
    fn reader_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&format!("{}reader", self.base)) {
            headers.insert(REFERER, value);
        }
        headers
    }

    /// 特权调用前的登录闸门
    ///
    /// 未认证且无凭据直接拒绝；有凭据则登录一次，之后的拉取即是
    /// 对原调用的唯一一次重试。
    async fn ensure_authenticated(&self) -> Result<()> {
        if self.session.is_authenticated() {
            return Ok(());
        }

        let Some((username, password)) = self.config.credentials() else {
            return Err(SourceError::NotAuthenticated);
        };

        tracing::debug!("章节列表需要登录，使用配置凭据登录 batoto");
        if self.do_login(username, password).await? {
            Ok(())
        } else {
            Err(SourceError::AuthenticationFailed)
        }
    }
}

#[async_trait]
impl Source for Batoto {
    fn id(&self) -> &str {
        "batoto"
    }

    fn base_url(&self) -> &str {
        self.base.as_str()
    }

    async fn fetch_popular_page(&self, page: MangasPage) -> Result<MangasPage> {
        self.popular(page).await
    }

    async fn fetch_search_page(
        &self,
        page: MangasPage,
        query: &str,
        filters: &[Filter],
    ) -> Result<MangasPage> {
        self.search(page, query, filters).await
    }

    async fn fetch_details(&self, manga: Manga) -> Result<Manga> {
        self.details(manga).await
    }

    async fn fetch_chapter_list(&self, manga: &Manga) -> Result<Vec<Chapter>> {
        self.ensure_authenticated().await?;
        self.chapters(manga).await
    }

    async fn fetch_page_list(&self, chapter: &Chapter) -> Result<Vec<Page>> {
        self.pages(chapter).await
    }

    async fn resolve_image_url(&self, page: &Page) -> Result<String> {
        self.image_url(page).await
    }

    async fn fetch_image(&self, page: &Page) -> Result<Bytes> {
        self.image(page).await
    }

    async fn fetch_filter_list(&self) -> Result<Vec<Filter>> {
        self.filters().await
    }

    async fn login(&self, username: &str, password: &str) -> Result<bool> {
        self.do_login(username, password).await
    }

    fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}
