//! Batoto 目录（热门 / 搜索 / 筛选项）
//!
//! 列表接口是分页的 HTML 片段：行内首个指向站点的绝对链接即条目，
//! `#show_more_row` 标记存在则还有下一页。

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use scraper::Html;
use url::Url;

use super::{Batoto, SiteSelectors};
use crate::core::error::Result;
use crate::core::model::{Filter, Manga, MangasPage};
use crate::utils::url_without_domain;

/// 排除标记：该标签在站点上没有任何章节
const EMPTY_FILTER_LABEL: &str = "[no chapters]";

impl Batoto {
    fn popular_url(&self, page_num: u32) -> String {
        self.normalize(&format!(
            "/search_ajax?order_cond=views&order=desc&p={page_num}"
        ))
    }

    fn search_url(&self, query: &str, filters: &[Filter], page_num: u32) -> String {
        // 查询词恰好转义一次；筛选令牌本身不含需转义字符
        let query = utf8_percent_encode(query, NON_ALPHANUMERIC);
        self.normalize(&format!(
            "/search_ajax?name={query}&order_cond=views&order=desc&p={page_num}&genre_cond=and&genres={}",
            filter_tokens(filters)
        ))
    }

    pub(super) async fn popular(&self, mut page: MangasPage) -> Result<MangasPage> {
        if page.url.is_empty() {
            page.url = self.popular_url(page.page);
        }

        let html = self.client.get_text(&page.url).await?;
        let has_more = parse_catalog(&html, &self.base, &mut page.mangas);
        page.next_page_url = has_more.then(|| self.popular_url(page.page + 1));
        Ok(page)
    }

    pub(super) async fn search(
        &self,
        mut page: MangasPage,
        query: &str,
        filters: &[Filter],
    ) -> Result<MangasPage> {
        if page.url.is_empty() {
            page.url = self.search_url(query, filters, page.page);
        }

        let html = self.client.get_text(&page.url).await?;
        let has_more = parse_catalog(&html, &self.base, &mut page.mangas);
        page.next_page_url = has_more.then(|| self.search_url(query, filters, page.page + 1));
        Ok(page)
    }

    pub(super) async fn filters(&self) -> Result<Vec<Filter>> {
        let html = self.client.get_text(&self.normalize("/search")).await?;
        Ok(parse_filters(&html))
    }
}

/// 解析列表行并追加到累积条目；返回是否存在“加载更多”标记
///
/// 行内首个指向本站（与配置的 base 同宿主）的绝对链接即条目链接，
/// 广告等站外绝对链接不入选。
fn parse_catalog(html: &str, base: &Url, out: &mut Vec<Manga>) -> bool {
    let doc = Html::parse_document(html);
    let s = SiteSelectors::get();

    for row in doc.select(&s.tr) {
        let Some(link) = row.select(&s.anchor).find(|a| {
            a.value()
                .attr("href")
                .and_then(|h| Url::parse(h).ok())
                .is_some_and(|u| {
                    u.host_str() == base.host_str()
                        && u.port_or_known_default() == base.port_or_known_default()
                })
        }) else {
            continue;
        };

        let href = link.value().attr("href").unwrap_or_default();
        let title = link.text().collect::<String>().trim().to_string();
        if href.is_empty() || title.is_empty() {
            continue;
        }

        out.push(Manga {
            url: url_without_domain(href),
            title,
            ..Default::default()
        });
    }

    doc.select(&s.show_more).next().is_some()
}

fn parse_filters(html: &str) -> Vec<Filter> {
    let doc = Html::parse_document(html);
    let s = SiteSelectors::get();

    doc.select(&s.genre_buttons)
        .filter_map(|el| {
            // onclick 形如 change_genre('NN')：固定 14 字前缀 + 2 字后缀包住 id
            let onclick = el.value().attr("onclick")?;
            let id = onclick.get(14..onclick.len().checked_sub(2)?)?;
            let name = el.text().collect::<String>().trim().to_string();
            Some(Filter {
                id: id.parse().ok()?,
                name,
            })
        })
        .filter(|f| f.name != EMPTY_FILTER_LABEL)
        .collect()
}

/// 筛选项序列化为站点令牌序列，每个选中 id 一个令牌，保持选择顺序
pub(super) fn filter_tokens(filters: &[Filter]) -> String {
    filters
        .iter()
        .map(|f| format!(";i{}", f.id))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <table>
          <tr><td><a href="http://bato.to/comic/_/comics/alpha-r1">Alpha</a></td></tr>
          <tr><td><a href="/relative/ignored">skip</a></td></tr>
          <tr><td><a href="http://bato.to/comic/_/comics/beta-r2">Beta</a></td></tr>
        </table>
        <div id="show_more_row">Show more</div>
    "#;

    fn base() -> Url {
        Url::parse("http://bato.to/").unwrap()
    }

    #[test]
    fn parses_rows_and_more_marker() {
        let mut mangas = Vec::new();
        let has_more = parse_catalog(LISTING, &base(), &mut mangas);

        assert!(has_more);
        assert_eq!(mangas.len(), 2);
        assert_eq!(mangas[0].url, "/comic/_/comics/alpha-r1");
        assert_eq!(mangas[0].title, "Alpha");
        assert_eq!(mangas[1].url, "/comic/_/comics/beta-r2");
    }

    #[test]
    fn absent_marker_means_last_page() {
        let mut mangas = Vec::new();
        let has_more = parse_catalog(
            r#"<table><tr><td><a href="http://bato.to/comic/_/comics/solo-r9">Solo</a></td></tr></table>"#,
            &base(),
            &mut mangas,
        );

        assert!(!has_more);
        assert_eq!(mangas.len(), 1);
    }

    #[test]
    fn offsite_absolute_links_are_not_entries() {
        // 行里先出现广告等站外绝对链接时，条目链接仍取本站那个
        let html = r#"<table>
            <tr><td><a href="http://ads.example/click?x=1">Ad</a>
                <a href="http://bato.to/comic/_/comics/real-r5">Real</a></td></tr>
            <tr><td><a href="http://ads.example/only">Ad only</a></td></tr>
        </table>"#;
        let mut mangas = Vec::new();
        parse_catalog(html, &base(), &mut mangas);

        assert_eq!(mangas.len(), 1);
        assert_eq!(mangas[0].url, "/comic/_/comics/real-r5");
        assert_eq!(mangas[0].title, "Real");
    }

    #[test]
    fn mirror_base_matches_its_own_host() {
        let html =
            r#"<table><tr><td><a href="http://mirror.example:8080/comic/_/comics/m-r3">M</a></td></tr></table>"#;
        let mut mangas = Vec::new();
        parse_catalog(html, &Url::parse("http://mirror.example:8080/").unwrap(), &mut mangas);

        assert_eq!(mangas.len(), 1);
        assert_eq!(mangas[0].url, "/comic/_/comics/m-r3");
    }

    #[test]
    fn filter_tokens_preserve_selection_order() {
        let filters = vec![
            Filter { id: 7, name: "Action".into() },
            Filter { id: 1, name: "Comedy".into() },
        ];
        assert_eq!(filter_tokens(&filters), ";i7,;i1");
        assert_eq!(filter_tokens(&[]), "");
    }

    #[test]
    fn parses_filters_and_drops_empty_sentinel() {
        let html = r#"
            <div id="advanced_options">
              <div class="genre_buttons" onclick="change_genre('1')">Action</div>
              <div class="genre_buttons" onclick="change_genre('23')">Slice of Life</div>
              <div class="genre_buttons" onclick="change_genre('44')">[no chapters]</div>
            </div>
        "#;
        let filters = parse_filters(html);

        assert_eq!(
            filters,
            vec![
                Filter { id: 1, name: "Action".into() },
                Filter { id: 23, name: "Slice of Life".into() },
            ]
        );
    }
}
