//! Crunchyroll 漫画 API 响应模型

use serde::Deserialize;

/// `list_series` 数组元素；缺少 locale 的条目没有英文详情
#[derive(Debug, Deserialize)]
pub struct Series {
    pub series_id: String,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub locale: Option<Locale>,
}

#[derive(Debug, Deserialize)]
pub struct Locale {
    #[serde(rename = "enUS")]
    pub en_us: LocaleDetails,
}

#[derive(Debug, Deserialize)]
pub struct LocaleDetails {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumb_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChapterListResponse {
    pub chapters: Vec<ChapterData>,
}

#[derive(Debug, Deserialize)]
pub struct ChapterData {
    pub chapter_id: String,
    /// 章节编号，可能是小数（如 "10.5"）
    pub number: String,
    pub locale: Locale,
}

#[derive(Debug, Deserialize)]
pub struct PageListResponse {
    pub pages: Vec<PageData>,
}

#[derive(Debug, Deserialize)]
pub struct PageData {
    pub image_url: String,
}

/// `cr_start_session` 握手响应
#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub data: SessionData,
}

#[derive(Debug, Deserialize)]
pub struct SessionData {
    pub session_id: String,
}

/// `cr_login` 响应；error 为 false 才算成功
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub error: bool,
    #[serde(default)]
    pub data: Option<AuthData>,
}

#[derive(Debug, Deserialize)]
pub struct AuthData {
    pub auth: String,
}
