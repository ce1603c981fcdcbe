use serde::{Deserialize, Serialize};
use strum::Display;

/// 连载状态
///
/// 状态文案通过显式映射表归类，未收录的文本一律归入 Unknown，
/// 绝不因此报错。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MangaStatus {
    Ongoing,
    Completed,
    #[default]
    Unknown,
}

impl MangaStatus {
    pub fn from_text(text: Option<&str>) -> Self {
        match text {
            Some("Ongoing") => MangaStatus::Ongoing,
            Some("Complete") => MangaStatus::Completed,
            _ => MangaStatus::Unknown,
        }
    }
}

/// 目录条目
///
/// `url` 是站点相对定位符，对宿主而言是不透明字符串；宿主跨会话
/// 持久化后原样传回即可，不保证可由其余字段重新推导。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manga {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub status: MangaStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    /// 详情字段是否已填充（列表页自带全量详情的站点在列表阶段置位）
    #[serde(default)]
    pub initialized: bool,
}

impl Manga {
    /// 标签集合的确定性拼接
    pub fn genre_string(&self) -> String {
        self.genres.join(", ")
    }
}

/// 章节
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chapter {
    pub url: String,
    pub name: String,
    /// 部分站点使用小数编号（如 10.5 话）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_number: Option<f32>,
    /// 上传时间（epoch 毫秒，0 表示未知）
    #[serde(default)]
    pub date_upload: i64,
}

/// 页描述符
///
/// 要么直接携带可取图的 `image_url`，要么携带需要二次请求解析的
/// 定位符 `url`。`index` 在单个章节内从 0 起连续且唯一。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Page {
    pub fn new(index: usize, url: String) -> Self {
        Self {
            index,
            url,
            image_url: None,
        }
    }

    pub fn with_image(index: usize, image_url: String) -> Self {
        Self {
            index,
            url: String::new(),
            image_url: Some(image_url),
        }
    }
}

/// 分页游标
///
/// `next_page_url` 为 None 表示分页已终止，调用方此后不得再拉取。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MangasPage {
    pub page: u32,
    /// 产生当前页的请求 URL（首页由站点按参数构造后回填）
    pub url: String,
    pub mangas: Vec<Manga>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_url: Option<String>,
}

impl MangasPage {
    /// 初始游标：第 1 页，无累积条目
    pub fn first() -> Self {
        Self {
            page: 1,
            ..Default::default()
        }
    }

    /// 若存在下一页则推进游标并返回 true；累积条目原样保留
    pub fn advance(&mut self) -> bool {
        match self.next_page_url.take() {
            Some(url) => {
                self.page += 1;
                self.url = url;
                true
            }
            None => false,
        }
    }
}

/// 搜索筛选项
///
/// id 由站点定义，整个会话内取一次后不再变化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub id: i32,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_table() {
        assert_eq!(MangaStatus::from_text(Some("Ongoing")), MangaStatus::Ongoing);
        assert_eq!(MangaStatus::from_text(Some("Complete")), MangaStatus::Completed);
        assert_eq!(MangaStatus::from_text(Some("Unknown text")), MangaStatus::Unknown);
        assert_eq!(MangaStatus::from_text(None), MangaStatus::Unknown);
    }

    #[test]
    fn genre_string_is_deterministic_join() {
        let manga = Manga {
            genres: vec!["Action".into(), "Comedy".into()],
            ..Default::default()
        };
        assert_eq!(manga.genre_string(), "Action, Comedy");
    }

    #[test]
    fn cursor_advance_keeps_accumulated_entries() {
        let mut page = MangasPage::first();
        page.mangas.push(Manga::default());
        page.next_page_url = Some("http://example.com/p2".into());

        assert!(page.advance());
        assert_eq!(page.page, 2);
        assert_eq!(page.url, "http://example.com/p2");
        assert_eq!(page.mangas.len(), 1);

        assert!(!page.advance());
        assert!(page.next_page_url.is_none());
    }
}
