//! 站点契约定义
//!
//! 所有站点实现同一个 [`Source`] Trait。站点未实现的能力不从接口上
//! 移除，而是返回 `Unsupported`，保证宿主看到的接口形状一致。

use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::core::error::{Result, SourceError};
use crate::core::model::{Chapter, Filter, Manga, MangasPage, Page};

/// 站点定义 Trait
///
/// 每个站点将自身的认证方式、分页形态与载荷格式收敛到这组操作之下。
/// 所有操作都是顺序的请求/响应链：一次操作内部没有并行扇出，
/// 登录总是在被其闸门拦截的请求重试之前完成。
#[async_trait]
pub trait Source: Send + Sync {
    /// 站点唯一标识
    fn id(&self) -> &str;

    /// 基础 URL
    fn base_url(&self) -> &str;

    /// 是否提供最新更新列表
    fn supports_latest(&self) -> bool {
        false
    }

    /// 拉取热门列表的一页
    ///
    /// 从响应解析零或多个条目追加到游标，并判定下一页指示；
    /// 游标未推进前重复调用是幂等的。
    async fn fetch_popular_page(&self, page: MangasPage) -> Result<MangasPage>;

    /// 按关键词与筛选项搜索的一页
    async fn fetch_search_page(
        &self,
        _page: MangasPage,
        _query: &str,
        _filters: &[Filter],
    ) -> Result<MangasPage> {
        Err(SourceError::Unsupported("search"))
    }

    /// 最新更新列表的一页
    async fn fetch_latest_page(&self, _page: MangasPage) -> Result<MangasPage> {
        Err(SourceError::Unsupported("latest updates"))
    }

    /// 填充条目详情字段
    ///
    /// 列表响应已含全量详情的站点原样返回，不发多余请求。
    async fn fetch_details(&self, manga: Manga) -> Result<Manga>;

    /// 拉取章节列表（最新在前）
    ///
    /// 需要登录的站点：未认证且未配置凭据时以 `NotAuthenticated` 拒绝；
    /// 配置了凭据则先登录一次，成功后重试本次拉取恰好一次。
    async fn fetch_chapter_list(&self, manga: &Manga) -> Result<Vec<Chapter>>;

    /// 拉取单章节的页清单（索引从 0 起连续）
    async fn fetch_page_list(&self, chapter: &Chapter) -> Result<Vec<Page>>;

    /// 解析单页的最终图片地址
    ///
    /// 必须是页定位符的纯函数：可重复调用，不保留任何状态。
    async fn resolve_image_url(&self, _page: &Page) -> Result<String> {
        Err(SourceError::Unsupported("image url resolution"))
    }

    /// 拉取图片字节
    ///
    /// 载荷被混淆的站点在原始响应体上恰好应用一次解码。
    async fn fetch_image(&self, page: &Page) -> Result<Bytes>;

    /// 拉取搜索筛选项集合（每会话取一次，此后不变）
    async fn fetch_filter_list(&self) -> Result<Vec<Filter>> {
        Err(SourceError::Unsupported("filters"))
    }

    /// 执行站点登录协议
    ///
    /// 返回 Ok(false) 表示协议走完但凭据被拒；全有或全无，
    /// 失败不残留半成品会话状态。
    async fn login(&self, _username: &str, _password: &str) -> Result<bool> {
        Err(SourceError::Unsupported("login"))
    }

    fn is_authenticated(&self) -> bool {
        false
    }
}

/// 列表类型
#[derive(Debug, Clone, Copy)]
pub enum Listing<'a> {
    Popular,
    Search {
        query: &'a str,
        filters: &'a [Filter],
    },
}

/// 沿游标走完整个列表
///
/// 取消令牌触发后不再发起新的分页请求，已累积的条目保持有效；
/// 下一页指示缺失时在有限步内终止。
pub async fn walk_listing(
    source: &dyn Source,
    listing: Listing<'_>,
    cancel: &CancellationToken,
) -> Result<MangasPage> {
    let mut page = MangasPage::first();

    loop {
        if cancel.is_cancelled() {
            tracing::debug!("分页游走被取消，保留 {} 个已累积条目", page.mangas.len());
            return Ok(page);
        }

        page = match listing {
            Listing::Popular => source.fetch_popular_page(page).await?,
            Listing::Search { query, filters } => {
                source.fetch_search_page(page, query, filters).await?
            }
        };

        if !page.advance() {
            return Ok(page);
        }
    }
}
