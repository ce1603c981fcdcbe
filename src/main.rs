//! 应用程序入口 (Application Entrypoint)
//!
//! 负责 CLI 指令解析、遥测层初始化与单次站点操作的调度。

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use mangatoki::core::config::AppConfig;
use mangatoki::core::model::{Chapter, Filter, Manga};
use mangatoki::interfaces::{Listing, Source, walk_listing};
use mangatoki::sites::SourceRegistry;

/// 命令行界面脚手架 (CLI Scaffolding)
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出已注册站点
    Sources,
    /// 拉取热门目录（走完全部分页）
    Popular {
        /// 目标站点标识符
        #[arg(short, long)]
        site: String,
    },
    /// 按关键词与筛选项搜索
    Search {
        #[arg(short, long)]
        site: String,
        query: String,
        /// 选中的筛选项 id（可多次指定）
        #[arg(short, long)]
        genre: Vec<i32>,
    },
    /// 拉取条目详情（传入目录定位符）
    Detail {
        #[arg(short, long)]
        site: String,
        url: String,
    },
    /// 拉取章节列表
    Chapters {
        #[arg(short, long)]
        site: String,
        url: String,
    },
    /// 拉取单章节页清单
    Pages {
        #[arg(short, long)]
        site: String,
        url: String,
    },
    /// 列出搜索筛选项
    Filters {
        #[arg(short, long)]
        site: String,
    },
    /// 执行站点登录
    Login {
        #[arg(short, long)]
        site: String,
        username: String,
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 遥测层初始化 (Telemetry Layer Initialization)
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let config = Arc::new(AppConfig::load()?);
    let cli = Cli::parse();
    let registry = SourceRegistry::new();

    let source_for = |id: &str| -> anyhow::Result<Arc<dyn Source>> {
        let site_cfg = config.sites.get(id).cloned().unwrap_or_default();
        registry
            .create(id, site_cfg)
            .ok_or_else(|| anyhow::anyhow!("Unknown site identifier: {id}"))
    };

    // Ctrl-C 取消分页游走：停止发起新请求，保留已累积条目
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Commands::Sources => {
            for id in registry.list() {
                println!("{id}");
            }
        }
        Commands::Popular { site } => {
            let source = source_for(&site)?;
            let page = walk_listing(source.as_ref(), Listing::Popular, &cancel).await?;
            tracing::info!("共 {} 个条目", page.mangas.len());
            println!("{}", serde_json::to_string_pretty(&page.mangas)?);
        }
        Commands::Search { site, query, genre } => {
            let source = source_for(&site)?;
            let filters: Vec<Filter> = genre
                .into_iter()
                .map(|id| Filter {
                    id,
                    name: String::new(),
                })
                .collect();
            let listing = Listing::Search {
                query: &query,
                filters: &filters,
            };
            let page = walk_listing(source.as_ref(), listing, &cancel).await?;
            tracing::info!("共 {} 个条目", page.mangas.len());
            println!("{}", serde_json::to_string_pretty(&page.mangas)?);
        }
        Commands::Detail { site, url } => {
            let source = source_for(&site)?;
            let manga = source
                .fetch_details(Manga {
                    url,
                    ..Default::default()
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&manga)?);
        }
        Commands::Chapters { site, url } => {
            let source = source_for(&site)?;
            let manga = Manga {
                url,
                ..Default::default()
            };
            let chapters = source.fetch_chapter_list(&manga).await?;
            tracing::info!("共 {} 个章节", chapters.len());
            println!("{}", serde_json::to_string_pretty(&chapters)?);
        }
        Commands::Pages { site, url } => {
            let source = source_for(&site)?;
            let chapter = Chapter {
                url,
                ..Default::default()
            };
            let pages = source.fetch_page_list(&chapter).await?;
            tracing::info!("共 {} 页", pages.len());
            println!("{}", serde_json::to_string_pretty(&pages)?);
        }
        Commands::Filters { site } => {
            let source = source_for(&site)?;
            let filters = source.fetch_filter_list().await?;
            println!("{}", serde_json::to_string_pretty(&filters)?);
        }
        Commands::Login {
            site,
            username,
            password,
        } => {
            let source = source_for(&site)?;
            if source.login(&username, &password).await? {
                tracing::info!("登录成功");
            } else {
                tracing::error!("登录被站点拒绝");
            }
        }
    }

    Ok(())
}
