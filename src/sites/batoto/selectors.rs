//! Batoto 选择器
//!
//! 预编译的 CSS 选择器与带内公告匹配模式

use std::sync::OnceLock;

use regex::Regex;
use scraper::Selector;

/// 站点选择器集合
pub struct SiteSelectors {
    pub anchor: Selector,
    pub show_more: Selector,
    pub tbody: Selector,
    pub tr: Selector,
    pub td: Selector,
    pub img: Selector,
    pub thumbnail: Selector,
    pub chapter_row: Selector,
    pub chapter_link: Selector,
    pub page_select: Selector,
    pub option: Selector,
    pub inline_img: Selector,
    pub comic_page: Selector,
    pub login_form: Selector,
    pub auth_key: Selector,
    pub genre_buttons: Selector,
    /// 带内公告块，固定标记包裹的转义文本
    pub staff_notice: Regex,
}

static SELECTORS: OnceLock<SiteSelectors> = OnceLock::new();

impl SiteSelectors {
    /// 获取全局选择器实例
    pub fn get() -> &'static SiteSelectors {
        SELECTORS.get_or_init(|| SiteSelectors {
            anchor: Selector::parse("a[href]").unwrap(),
            show_more: Selector::parse("#show_more_row").unwrap(),
            tbody: Selector::parse("tbody").unwrap(),
            tr: Selector::parse("tr").unwrap(),
            td: Selector::parse("td").unwrap(),
            img: Selector::parse("img").unwrap(),
            thumbnail: Selector::parse("img[src*='forums/uploads']").unwrap(),
            chapter_row: Selector::parse("tr.row.lang_English.chapter_row").unwrap(),
            chapter_link: Selector::parse("a[href*='/reader']").unwrap(),
            page_select: Selector::parse("#page_select").unwrap(),
            option: Selector::parse("option").unwrap(),
            inline_img: Selector::parse("div > img").unwrap(),
            comic_page: Selector::parse("#comic_page").unwrap(),
            login_form: Selector::parse("#login").unwrap(),
            auth_key: Selector::parse("input[name='auth_key']").unwrap(),
            genre_buttons: Selector::parse("#advanced_options div.genre_buttons").unwrap(),
            staff_notice: Regex::new(r"(?i)=+Batoto Staff Notice=+([^=]+)==+").unwrap(),
        })
    }
}
