//! Crunchyroll 漫画 API 站点实现
//!
//! JSON REST 接口：`list_series` 一次返回全量目录（无分页、无搜索），
//! 页清单被令牌登录保护（握手取 session_id，再换 auth 签名），
//! 图片字节流经单字节异或混淆。

mod models;

use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::HeaderMap;
use url::Url;

use crate::core::config::SiteConfig;
use crate::core::error::{Result, SourceError};
use crate::core::model::{Chapter, Manga, MangasPage, Page};
use crate::interfaces::Source;
use crate::network::client::SiteClient;
use crate::network::session::AuthSession;
use crate::utils::image;

use self::models::{
    ChapterListResponse, LoginResponse, PageListResponse, Series, SessionResponse,
};

pub const DEFAULT_BASE_URL: &str = "http://api-manga.crunchyroll.com";

/// API 固定请求参数（设备指纹与协议版本）
const DEVICE_TYPE: &str = "com.crunchyroll.manga.android";
const API_VERSION: &str = "1.0";
const ACCESS_TOKEN: &str = "FLpcfZH4CbW4muO";

/// Crunchyroll 站点实例
pub struct Crunchyroll {
    config: SiteConfig,
    base: Url,
    client: SiteClient,
    session: AuthSession,
    /// 图片去混淆密钥（站点协议版本绑定，可由配置覆盖）
    image_key: u8,
}

impl Crunchyroll {
    pub fn new(config: SiteConfig) -> Self {
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base = Url::parse(base_url).expect("Invalid base URL");
        let image_key = config.image_key.unwrap_or(image::DEFAULT_IMAGE_KEY);

        Self {
            base,
            client: SiteClient::new(HeaderMap::new()),
            session: AuthSession::new(),
            image_key,
            config,
        }
    }

    /// 规范化 URL
    #[inline]
    fn normalize(&self, path: &str) -> String {
        crate::utils::to_absolute_url(&self.base, path)
    }

    /// 握手取会话标识；已有则直接复用
    async fn start_session(&self) -> Result<String> {
        if let Some(session_id) = self.session.session_id() {
            return Ok(session_id);
        }

        let form = [
            ("device_type", DEVICE_TYPE),
            ("api_ver", API_VERSION),
            ("device_id", "dummy"),
            ("access_token", ACCESS_TOKEN),
        ];
        let response = self
            .client
            .post_form(&self.normalize("/cr_start_session"), &form)
            .await?;
        let body: SessionResponse = serde_json::from_slice(&response.bytes().await?)?;

        self.session.set_session_id(body.data.session_id.clone());
        Ok(body.data.session_id)
    }

    /// 两步登录：先握手，再提交凭据换取 auth 签名
    async fn do_login(&self, username: &str, password: &str) -> Result<bool> {
        let _gate = self.session.lock_login().await;
        if self.session.is_authenticated() {
            return Ok(true);
        }

        let session_id = self.start_session().await?;
        let form = [
            ("device_type", DEVICE_TYPE),
            ("api_ver", API_VERSION),
            ("hash_id", "dummy"),
            ("session_id", session_id.as_str()),
            ("account", username),
            ("password", password),
        ];
        let response = self
            .client
            .post_form(&self.normalize("/cr_login"), &form)
            .await?;
        let body: LoginResponse = serde_json::from_slice(&response.bytes().await?)?;

        // 成功才写入令牌；拒绝时不触碰既有状态
        match (body.error, body.data) {
            (false, Some(data)) => {
                self.session.set_auth_token(data.auth);
                tracing::info!("crunchyroll 登录成功");
                Ok(true)
            }
            _ => {
                tracing::warn!("crunchyroll 登录被拒绝");
                Ok(false)
            }
        }
    }

    /// 特权调用前的登录闸门
    async fn ensure_authenticated(&self) -> Result<()> {
        if self.session.is_authenticated() {
            return Ok(());
        }

        let Some((username, password)) = self.config.credentials() else {
            return Err(SourceError::NotAuthenticated);
        };

        tracing::debug!("页清单需要登录，使用配置凭据登录 crunchyroll");
        if self.do_login(username, password).await? {
            Ok(())
        } else {
            Err(SourceError::AuthenticationFailed)
        }
    }

    /// 特权请求在定位符之后追加会话与签名参数
    fn authed_url(&self, locator: &str) -> Result<String> {
        let session_id = self.session.session_id().unwrap_or_default();
        let auth = self
            .session
            .auth_token()
            .ok_or(SourceError::NotAuthenticated)?;
        let auth = utf8_percent_encode(&auth, NON_ALPHANUMERIC);
        Ok(self.normalize(&format!(
            "{locator}&session_id={session_id}&auth={auth}"
        )))
    }

    fn chapter_locator(chapter_id: &str) -> String {
        format!(
            "/list_chapter?device_type={DEVICE_TYPE}&api_ver={API_VERSION}&chapter_id={chapter_id}"
        )
    }

    fn series_locator(series_id: &str) -> String {
        format!(
            "/list_chapters?device_type={DEVICE_TYPE}&api_ver={API_VERSION}&series_id={series_id}"
        )
    }
}

#[async_trait]
impl Source for Crunchyroll {
    fn id(&self) -> &str {
        "crunchyroll"
    }

    fn base_url(&self) -> &str {
        self.base.as_str()
    }

    async fn fetch_popular_page(&self, mut page: MangasPage) -> Result<MangasPage> {
        if page.url.is_empty() {
            page.url = self.normalize(&format!(
                "/list_series?device_type={DEVICE_TYPE}&api_ver={API_VERSION}"
            ));
        }

        let body = self.client.get_bytes(&page.url).await?;
        let series: Vec<Series> = serde_json::from_slice(&body)?;

        for entry in series {
            let Some(locale) = entry.locale else {
                continue;
            };
            let details = locale.en_us;
            page.mangas.push(Manga {
                url: Self::series_locator(&entry.series_id),
                title: details.name,
                description: details.description,
                thumbnail_url: details.thumb_url,
                artist: entry.authors.clone(),
                author: entry.authors,
                // 列表响应已含全量详情
                initialized: true,
                ..Default::default()
            });
        }

        // 列表接口一次返回全量，没有下一页
        page.next_page_url = None;
        Ok(page)
    }

    /// 列表阶段已填满详情，原样返回、不发请求
    async fn fetch_details(&self, manga: Manga) -> Result<Manga> {
        Ok(manga)
    }

    async fn fetch_chapter_list(&self, manga: &Manga) -> Result<Vec<Chapter>> {
        let body = self.client.get_bytes(&self.normalize(&manga.url)).await?;
        let parsed: ChapterListResponse = serde_json::from_slice(&body)?;

        let mut chapters: Vec<Chapter> = parsed
            .chapters
            .into_iter()
            .map(|data| Chapter {
                url: Self::chapter_locator(&data.chapter_id),
                name: data.locale.en_us.name,
                chapter_number: data.number.parse().ok(),
                date_upload: 0,
            })
            .collect();

        // API 返回旧在前，统一为最新在前
        chapters.reverse();
        Ok(chapters)
    }

    async fn fetch_page_list(&self, chapter: &Chapter) -> Result<Vec<Page>> {
        self.ensure_authenticated().await?;

        let url = self.authed_url(&chapter.url)?;
        let body = self.client.get_bytes(&url).await?;
        let parsed: PageListResponse = serde_json::from_slice(&body)?;

        Ok(parsed
            .pages
            .into_iter()
            .enumerate()
            .map(|(index, data)| Page::with_image(index, data.image_url))
            .collect())
    }

    async fn resolve_image_url(&self, page: &Page) -> Result<String> {
        // 页清单直接内联图片地址，无需二次解析
        page.image_url
            .clone()
            .ok_or_else(|| SourceError::Parse("Page carries no image url".into()))
    }

    /// 取原始响应体并恰好解码一次
    async fn fetch_image(&self, page: &Page) -> Result<Bytes> {
        let url = page
            .image_url
            .as_deref()
            .ok_or_else(|| SourceError::Parse("Page carries no image url".into()))?;
        let raw = self.client.get_bytes(url).await?;
        Ok(Bytes::from(image::xor_decode(&raw, self.image_key)))
    }

    async fn login(&self, username: &str, password: &str) -> Result<bool> {
        self.do_login(username, password).await
    }

    fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}
