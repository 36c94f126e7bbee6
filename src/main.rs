use anyhow::{Context, Result};
use clap::Parser;
use shelfctl::api::{CategoryApi, HttpCategoryApi, MemoryCategoryApi};
use shelfctl::app::{App, AppEvent};
use shelfctl::category::{CategoryGateway, CategoryWorkspace};
use shelfctl::config::Config;
use shelfctl::theme::ThemeVariant;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "shelfctl",
    about = "Terminal admin console for a bookstore's category tree"
)]
struct Args {
    /// Config file (default: ~/.config/shelfctl/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Admin API base URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Print the full category tree and exit
    #[arg(long)]
    print: bool,

    /// Use a built-in sample catalogue instead of the API
    #[arg(long)]
    demo: bool,
}

/// Set up tracing. The TUI owns the terminal, so interactive runs log to a
/// file in the config directory; `--print` logs to stderr.
fn init_tracing(interactive: bool, config_dir: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env();

    match config_dir.filter(|_| interactive) {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let log_path = dir.join("shelfctl.log");
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if interactive => {
            // No place for a log file; stay silent rather than draw over the UI
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("off"))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn print_tree<A: CategoryApi>(gateway: CategoryGateway<A>) -> Result<()> {
    let mut workspace = CategoryWorkspace::new();
    workspace
        .refresh(&gateway)
        .await
        .context("Failed to fetch categories")?;
    print!("{}", shelfctl::ui::outline(workspace.store()));
    Ok(())
}

async fn run_interactive<A: CategoryApi>(
    gateway: CategoryGateway<A>,
    theme: ThemeVariant,
) -> Result<()> {
    let mut app = App::new(gateway, theme);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    shelfctl::ui::run(&mut app, event_tx, event_rx).await
}

async fn dispatch<A: CategoryApi>(
    gateway: CategoryGateway<A>,
    print: bool,
    theme: ThemeVariant,
) -> Result<()> {
    if print {
        print_tree(gateway).await
    } else {
        run_interactive(gateway, theme).await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = Config::default_dir();
    init_tracing(!args.print, config_dir.as_deref())?;

    let config_path = args
        .config
        .clone()
        .or_else(|| config_dir.as_ref().map(|dir| dir.join("config.toml")));
    let mut config = match &config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    tracing::debug!(?config, "Effective configuration");

    let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
        ThemeVariant::Dark
    });

    if args.demo {
        tracing::info!("Running against the in-memory sample catalogue");
        let gateway = CategoryGateway::new(MemoryCategoryApi::with_sample_catalogue());
        return dispatch(gateway, args.print, theme).await;
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("shelfctl/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .tcp_keepalive(std::time::Duration::from_secs(60))
        .build()
        .context("Failed to build HTTP client")?;

    let api = HttpCategoryApi::new(
        client,
        &config.api_base_url,
        config.token(),
        config.request_timeout(),
    )
    .with_context(|| format!("Invalid api_base_url: {}", config.api_base_url))?;
    tracing::info!(base_url = %api.base_url(), "Using admin API");

    dispatch(CategoryGateway::new(api), args.print, theme).await
}
