use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use nn_api::{create_api, ApiConfig, BackendKind, API_URL_ENV};
use nn_client::{ArticleView, DateArchiveLoader, HomeView, MemoryPage};
use nn_core::{NewsApi, Store};
use tracing::info;

mod browse;
mod clipboard;
mod logging;
mod render;

use clipboard::StdoutClipboard;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse the NeuroNews archive", long_about = None)]
pub struct Cli {
    /// Base URL of the archive API
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,
    /// TOML file with api settings (backend, base_url, timeout_secs, user_agent)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where articles come from: http (default) or memory
    #[arg(long)]
    backend: Option<BackendKind>,
    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the archive dates
    Dates,
    /// List the articles of a date, the most recent one by default
    List { date: Option<String> },
    /// Show one article
    Show { id: String },
    /// Show an article's sources
    Sources {
        id: String,
        /// Write every source, one per line, to stdout for piping into a clipboard tool
        #[arg(long)]
        copy: bool,
    },
    /// Interactive terminal browser
    Browse,
}

impl Cli {
    /// Defaults, then the config file, then environment and flags.
    fn api_config(&self) -> Result<ApiConfig> {
        let mut config = match &self.config {
            Some(path) => ApiConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ApiConfig::default(),
        };
        if let Some(url) = &self.api_url {
            config = config.with_url(url);
        }
        if let Some(backend) = self.backend {
            config = config.with_backend(backend);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(secs);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // the browser owns the screen, so it stays quiet unless RUST_LOG asks
    let default_filter = match cli.command {
        Commands::Browse => "off",
        _ => "info",
    };
    logging::init_logging(default_filter);

    let config = cli.api_config()?;
    let api = create_api(&config).await?;

    match cli.command {
        Commands::Dates => dates(api).await,
        Commands::List { date } => list(api, date).await,
        Commands::Show { id } => show(api, &id).await,
        Commands::Sources { id, copy } => sources(api, &id, copy).await,
        Commands::Browse => browse::run(api).await,
    }
}

async fn dates(api: Arc<dyn NewsApi>) -> Result<()> {
    let archive = DateArchiveLoader::new(api, Store::default());
    archive.load().await;
    let today = Local::now().date_naive();
    let selected = archive.selected().get();
    let out = archive
        .dates()
        .with(|dates| render::render_dates(dates, selected.as_deref(), today));
    print!("{}", out);
    Ok(())
}

async fn list(api: Arc<dyn NewsApi>, date: Option<String>) -> Result<()> {
    let home = HomeView::new(api)?;
    home.init_with(date.as_deref()).await;
    let header = home.header_label(Local::now().date_naive());
    print!("{}", render::render_list(&header, &home.articles().get(), Utc::now()));
    Ok(())
}

async fn show(api: Arc<dyn NewsApi>, id: &str) -> Result<()> {
    let view = ArticleView::new(api, Arc::new(MemoryPage::new()));
    view.open_article(Some(id)).await;
    print!("{}", render::render_article(&view.article()));
    Ok(())
}

async fn sources(api: Arc<dyn NewsApi>, id: &str, copy: bool) -> Result<()> {
    let page = Arc::new(MemoryPage::new().with_clipboard(Arc::new(StdoutClipboard)));
    let view = ArticleView::new(api, page);
    view.open_article(Some(id)).await;
    view.open_sources();

    let Some(overlay) = view.overlay().view() else {
        bail!("sources overlay did not open");
    };
    if copy {
        if !view.overlay().copy_all() {
            info!("Nothing to copy for {}", id);
        }
    } else {
        print!("{}", render::render_overlay(&overlay));
    }
    view.close_sources();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_precedence() {
        let cli = Cli::parse_from([
            "nn",
            "--api-url",
            "http://news.example:8080",
            "--timeout",
            "3",
            "list",
            "2025-08-03",
        ]);
        let config = cli.api_config().unwrap();
        assert_eq!(config.base_url, "http://news.example:8080");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.backend, BackendKind::Http);
        assert!(matches!(cli.command, Commands::List { date: Some(ref d) } if d == "2025-08-03"));
    }

    #[test]
    fn test_config_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend = \"memory\"\ntimeout_secs = 30").unwrap();

        let cli = Cli::parse_from([
            "nn",
            "--config",
            file.path().to_str().unwrap(),
            "--timeout",
            "5",
            "dates",
        ]);
        let config = cli.api_config().unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_sources_flags() {
        let cli = Cli::parse_from(["nn", "--backend", "memory", "sources", "abc", "--copy"]);
        assert_eq!(cli.backend, Some(BackendKind::Memory));
        assert!(matches!(cli.command, Commands::Sources { copy: true, .. }));
    }
}
