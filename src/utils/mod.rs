use url::Url;

pub mod date;
pub mod image;

pub fn to_absolute_url(base: &Url, href: &str) -> String {
    if href.is_empty() {
        return String::new();
    }

    if let Some(path_without_slashes) = href.strip_prefix("//") {
        return format!("{}://{}", base.scheme(), path_without_slashes);
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// 去掉绝对地址中的协议与域名，保留站点相对定位符
///
/// 查询串与片段属于定位符的一部分（阅读器 id 藏在片段里），必须保留。
pub fn url_without_domain(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let mut out = parsed.path().to_string();
            if let Some(query) = parsed.query() {
                out.push('?');
                out.push_str(query);
            }
            if let Some(fragment) = parsed.fragment() {
                out.push('#');
                out.push_str(fragment);
            }
            out
        }
        Err(_) => url.to_string(),
    }
}

/// 解码文本中的 HTML 实体（公告文本是转义过的）
pub fn unescape_html(text: &str) -> String {
    scraper::Html::parse_fragment(text)
        .root_element()
        .text()
        .collect()
}
