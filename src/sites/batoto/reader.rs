//! Batoto 阅读器（页清单与图片地址解析）
//!
//! 两种布局：带 `#page_select` 下拉的逐页布局，首页图片随清单
//! 响应一并解析、其余页按需二次请求；以及图片全部内联的单页
//! 连续滚动布局，无需二次解析。

use bytes::Bytes;
use scraper::Html;

use super::{Batoto, SiteSelectors};
use crate::core::error::{Result, SourceError};
use crate::core::model::{Chapter, Page};

impl Batoto {
    fn reader_url(&self, id: &str, page_num: &str) -> String {
        self.normalize(&format!("/areader?id={id}&p={page_num}"))
    }

    pub(super) async fn pages(&self, chapter: &Chapter) -> Result<Vec<Page>> {
        // 章节定位符形如 "/reader#<hash>"，hash 即阅读器 id
        let (_, id) = chapter.url.rsplit_once('#').ok_or_else(|| {
            SourceError::Parse(format!("Malformed chapter locator: {}", chapter.url))
        })?;

        let html = self
            .client
            .get_text_with_headers(&self.reader_url(id, "1"), self.reader_headers())
            .await?;
        parse_pages(&html)
    }

    /// 从页定位符提取 id 与页码，二次请求取图片地址
    ///
    /// 定位符的纯函数：不读写任何状态，可重复调用。
    pub(super) async fn image_url(&self, page: &Page) -> Result<String> {
        let (id, page_num) = split_page_locator(&page.url).ok_or_else(|| {
            SourceError::Parse(format!("Malformed page locator: {}", page.url))
        })?;

        let html = self
            .client
            .get_text_with_headers(&self.reader_url(id, page_num), self.reader_headers())
            .await?;
        parse_image_url(&html)
    }

    pub(super) async fn image(&self, page: &Page) -> Result<Bytes> {
        let url = match &page.image_url {
            Some(url) => url.clone(),
            None => self.image_url(page).await?,
        };
        self.client
            .get_bytes_with_headers(&url, self.reader_headers())
            .await
    }
}

fn parse_pages(html: &str) -> Result<Vec<Page>> {
    let doc = Html::parse_document(html);
    let s = SiteSelectors::get();

    if let Some(select_el) = doc.select(&s.page_select).next() {
        let mut pages: Vec<Page> = select_el
            .select(&s.option)
            .filter_map(|option| option.value().attr("value"))
            .enumerate()
            .map(|(index, value)| Page::new(index, value.to_string()))
            .collect();

        // 首页图片地址随清单响应即时可得，其余页留待按需解析
        if let Some(first) = pages.first_mut() {
            first.image_url = Some(parse_image_url(html)?);
        }
        return Ok(pages);
    }

    // 单页连续滚动布局：所有图片内联
    Ok(doc
        .select(&s.inline_img)
        .filter_map(|img| img.value().attr("src"))
        .enumerate()
        .map(|(index, src)| Page::with_image(index, src.to_string()))
        .collect())
}

fn parse_image_url(html: &str) -> Result<String> {
    let doc = Html::parse_document(html);
    let s = SiteSelectors::get();

    doc.select(&s.comic_page)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string)
        .ok_or_else(|| SourceError::Parse("Comic page image not found".into()))
}

/// 页定位符形如 "...#<id>_<页码>"
fn split_page_locator(url: &str) -> Option<(&str, &str)> {
    let (_, tail) = url.split_once('#')?;
    tail.split_once('_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGED: &str = r#"
        <select id="page_select">
          <option value="http://bato.to/reader#abc123_1">page 1</option>
          <option value="http://bato.to/reader#abc123_2">page 2</option>
          <option value="http://bato.to/reader#abc123_3">page 3</option>
        </select>
        <div><img id="comic_page" src="http://img.bato.to/comics/001.png"/></div>
    "#;

    #[test]
    fn option_list_yields_contiguous_indices_with_eager_first_image() {
        let pages = parse_pages(PAGED).unwrap();

        assert_eq!(pages.len(), 3);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.index, i);
        }
        assert_eq!(
            pages[0].image_url.as_deref(),
            Some("http://img.bato.to/comics/001.png")
        );
        assert!(pages[1].image_url.is_none());
        assert_eq!(pages[1].url, "http://bato.to/reader#abc123_2");
    }

    #[test]
    fn inline_layout_yields_all_images_immediately() {
        let html = r#"<div>
            <img src="http://img.bato.to/w/001.png"/>
            <img src="http://img.bato.to/w/002.png"/>
        </div>"#;
        let pages = parse_pages(html).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].image_url.as_deref(), Some("http://img.bato.to/w/001.png"));
        assert_eq!(pages[1].image_url.as_deref(), Some("http://img.bato.to/w/002.png"));
        assert_eq!(pages[1].index, 1);
    }

    #[test]
    fn splits_page_locator_into_id_and_number() {
        assert_eq!(
            split_page_locator("http://bato.to/reader#abc123_2"),
            Some(("abc123", "2"))
        );
        assert_eq!(split_page_locator("no-fragment"), None);
        assert_eq!(split_page_locator("http://bato.to/reader#nounderscore"), None);
    }
}
