//! Batoto 详情、章节列表与登录
//!
//! 详情走 `comic_pop` 弹层接口，id 取定位符尾部 `r` 之后的数字。
//! 章节列表响应可能被带内公告整体替换，解析前先检测。

use scraper::{ElementRef, Html};

use super::{Batoto, SiteSelectors};
use crate::core::error::{Result, SourceError};
use crate::core::model::{Chapter, Manga, MangaStatus};
use crate::utils::{date, unescape_html, url_without_domain};

impl Batoto {
    pub(super) async fn details(&self, mut manga: Manga) -> Result<Manga> {
        let (_, id) = manga.url.rsplit_once('r').ok_or_else(|| {
            SourceError::Parse(format!("Malformed manga locator: {}", manga.url))
        })?;
        let url = self.normalize(&format!("/comic_pop?id={id}"));

        let html = self.client.get_text(&url).await?;
        parse_details(&html, &mut manga)?;
        manga.initialized = true;
        Ok(manga)
    }

    pub(super) async fn chapters(&self, manga: &Manga) -> Result<Vec<Chapter>> {
        let html = self.client.get_text(&self.normalize(&manga.url)).await?;
        parse_chapters(&html)
    }

    /// 表单登录：取登录页中的隐藏防伪令牌，连同凭据一并提交；
    /// 重定向响应即成功，其余一律视为拒绝
    pub(super) async fn do_login(&self, username: &str, password: &str) -> Result<bool> {
        let _gate = self.session.lock_login().await;
        if self.session.is_authenticated() {
            return Ok(true);
        }

        let login_page = self
            .client
            .get_text(&self.normalize(
                "/forums/index.php?app=core&module=global&section=login",
            ))
            .await?;

        let (action, key_name, key_value) = parse_login_form(&login_page)?;
        let form = [
            (key_name.as_str(), key_value.as_str()),
            ("ips_username", username),
            ("ips_password", password),
            ("invisible", "1"),
            ("rememberMe", "1"),
        ];

        let response = self
            .client
            .post_form(&self.normalize(&action), &form)
            .await?;

        if response.status().is_redirection() {
            self.session.mark_cookie_login();
            tracing::info!("batoto 登录成功");
            Ok(true)
        } else {
            tracing::warn!("batoto 登录被拒绝 (HTTP {})", response.status());
            Ok(false)
        }
    }
}

fn parse_details(html: &str, manga: &mut Manga) -> Result<()> {
    let doc = Html::parse_document(html);
    let s = SiteSelectors::get();

    let tbody = doc
        .select(&s.tbody)
        .next()
        .ok_or_else(|| SourceError::Parse("Detail table not found".into()))?;

    // 行首单元格是标签文本，其后的单元格是值
    let author_cells = labeled_row_cells(&tbody, "Author/Artist:");
    manga.author = author_cells.first().filter(|v| !v.is_empty()).cloned();
    manga.artist = author_cells
        .get(1)
        .filter(|v| !v.is_empty())
        .cloned()
        .or_else(|| manga.author.clone());

    manga.description = labeled_row_cells(&tbody, "Description:")
        .into_iter()
        .next()
        .filter(|v| !v.is_empty());

    manga.status = MangaStatus::from_text(
        labeled_row_cells(&tbody, "Status:")
            .first()
            .map(String::as_str),
    );

    manga.genres = find_labeled_row(&tbody, "Genres:")
        .map(|row| {
            row.select(&s.img)
                .filter_map(|img| img.value().attr("alt"))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    manga.thumbnail_url = doc
        .select(&s.thumbnail)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);

    Ok(())
}

fn find_labeled_row<'a>(tbody: &ElementRef<'a>, label: &str) -> Option<ElementRef<'a>> {
    let s = SiteSelectors::get();
    tbody
        .select(&s.tr)
        .find(|tr| tr.text().any(|t| t.contains(label)))
}

/// 标签行中标签之后各单元格的文本
fn labeled_row_cells(tbody: &ElementRef<'_>, label: &str) -> Vec<String> {
    let s = SiteSelectors::get();
    find_labeled_row(tbody, label)
        .map(|row| {
            row.select(&s.td)
                .skip(1)
                .map(|td| td.text().collect::<String>().trim().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn parse_chapters(html: &str) -> Result<Vec<Chapter>> {
    let s = SiteSelectors::get();

    // 公告替代了正常数据：解码转义文本并以 ServiceNotice 上抛，
    // 不再尝试从同一载荷解析章节
    if let Some(caps) = s.staff_notice.captures(html) {
        let notice = unescape_html(&caps[1]).trim().to_string();
        return Err(SourceError::ServiceNotice(notice));
    }

    let doc = Html::parse_document(html);
    let chapters = doc
        .select(&s.chapter_row)
        .filter_map(|row| {
            let link = row.select(&s.chapter_link).next()?;
            let href = link.value().attr("href")?;
            let name = link.text().collect::<String>().trim().to_string();

            // 第五列是上传时间；缺列或无法识别都退化为 0
            let date_upload = row
                .select(&s.td)
                .nth(4)
                .map(|td| date::parse_upload_date(&td.text().collect::<String>()))
                .unwrap_or(0);

            Some(Chapter {
                url: url_without_domain(href),
                name,
                chapter_number: None,
                date_upload,
            })
        })
        .collect();

    Ok(chapters)
}

fn parse_login_form(html: &str) -> Result<(String, String, String)> {
    let doc = Html::parse_document(html);
    let s = SiteSelectors::get();

    let form = doc
        .select(&s.login_form)
        .next()
        .ok_or_else(|| SourceError::Parse("Login form not found".into()))?;
    let action = form
        .value()
        .attr("action")
        .ok_or_else(|| SourceError::Parse("Login form has no action".into()))?
        .to_string();

    let key = form
        .select(&s.auth_key)
        .next()
        .ok_or_else(|| SourceError::Parse("Anti-forgery token not found".into()))?;
    let key_name = key.value().attr("name").unwrap_or("auth_key").to_string();
    let key_value = key.value().attr("value").unwrap_or_default().to_string();

    Ok((action, key_name, key_value))
}
