//! mangatoki 核心库
//!
//! 将结构互不兼容的远端漫画站点（HTML 抓取 / JSON API）归一化为
//! 统一的 [`interfaces::Source`] 契约：列目录、取详情、列章节、
//! 列页清单、解析图片地址。站点差异（标记语言 vs JSON、Cookie 登录
//! vs 令牌登录、相对日期文本 vs 绝对时间、混淆字节流 vs 原始字节流）
//! 全部被吸收在各站点实现内部。

pub mod core;
pub mod interfaces;
pub mod network;
pub mod sites;
pub mod utils;
