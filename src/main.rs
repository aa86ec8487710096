use clap::{Parser, Subcommand};
use import_monitor::chart::{ConsoleChart, RollingChart, SharedChart, ValueUnit};
use import_monitor::config::{ConfigLoader, MonitorConfig};
use import_monitor::display::{ConsoleSurface, MemorySurface, SharedSurface};
use import_monitor::{HttpStatusSource, LifecycleController, SnapshotStore, StatusSource, TextRefresher};
use indicatif::MultiProgress;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Parser)]
#[command(name = "import-monitor")]
#[command(version = "0.1.0")]
#[command(about = "Live status dashboard for bulk filesystem imports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the importer and render live progress until the import finishes
    Watch {
        /// Web script context, e.g. http://localhost:8080/alfresco/service
        #[arg(short, long)]
        url: Option<String>,

        /// Path to a configuration file (JSON/YAML/TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print plain text blocks instead of rendering in place with a spinner and charts
        #[arg(long)]
        plain: bool,
    },
    /// Fetch the status once and print every field
    Status {
        /// Web script context, e.g. http://localhost:8080/alfresco/service
        #[arg(short, long)]
        url: Option<String>,

        /// Path to a configuration file (JSON/YAML/TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Check {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn status_source(config: &MonitorConfig) -> anyhow::Result<Arc<HttpStatusSource>> {
    let source = HttpStatusSource::new(
        &config.context_url,
        config.request_timeout(),
        &config.user_agent,
    )?;
    log::info!("Polling {}", source.status_uri());
    Ok(Arc::new(source))
}

async fn watch(config: MonitorConfig, multi: Option<Arc<MultiProgress>>) -> anyhow::Result<()> {
    let source = status_source(&config)?;

    let surface: SharedSurface = Arc::new(Mutex::new(ConsoleSurface::new(multi.clone())));
    let files_chart: SharedChart = Arc::new(Mutex::new(ConsoleChart::new(
        RollingChart::new("Files / second", config.chart_history),
        ValueUnit::Count,
        multi.clone(),
    )));
    let bytes_chart: SharedChart = Arc::new(Mutex::new(ConsoleChart::new(
        RollingChart::new("Bytes / second", config.chart_history),
        ValueUnit::Bytes,
        multi.clone(),
    )));

    let controller = LifecycleController::new(
        source,
        surface,
        files_chart,
        bytes_chart,
        config.dashboard_options(),
    )
    .await;
    controller.start().await?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("Shutting down...");
            controller.stop().await;
        }
        _ = controller.wait_terminal() => {}
    }
    controller.wait_terminal().await;
    controller.join().await;

    if let Some(last) = controller.store().current() {
        if last.is_terminal() {
            println!("\n✅ Monitoring finished:");
        } else {
            println!("\n⏹️  Monitoring interrupted:");
        }
        println!("   Status: {}", last.current_status);
        println!("   Completed Batches: {}", last.completed_batches);
        println!(
            "   Entries Scanned: {}",
            last.source_statistics.files_scanned + last.source_statistics.folders_scanned
        );
        println!("   Content Nodes Created: {}", last.target_statistics.content_nodes_created);
        println!(
            "   Duration: {}",
            import_monitor::format::format_duration(last.duration_in_ns.unwrap_or(0), true)
        );
    }
    Ok(())
}

async fn status_once(config: MonitorConfig) -> anyhow::Result<()> {
    let source = status_source(&config)?;
    let snapshot = source.fetch().await?;

    let surface = Arc::new(Mutex::new(MemorySurface::new()));
    let refresher = TextRefresher::new(SnapshotStore::new(), surface.clone(), config.duration_details);
    refresher.render(Some(&snapshot)).await;

    for line in surface.lock().await.lines() {
        println!("{}", line);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe { std::env::set_var("RUST_LOG", "info"); }
    }
    let cli = Cli::parse();
    let logger = env_logger::Builder::from_default_env().build();
    let multi = Arc::new(MultiProgress::new());

    match cli.command {
        Commands::Watch { url, config, plain } => {
            if !plain {
                indicatif_log_bridge::LogWrapper::new((*multi).clone(), logger).try_init()?;
            } else {
                log::set_boxed_logger(Box::new(logger))?;
                log::set_max_level(log::LevelFilter::Info);
            }

            let config = ConfigLoader::resolve(config.as_deref(), url)?;
            watch(config, (!plain).then_some(multi)).await?;
        }
        Commands::Status { url, config } => {
            log::set_boxed_logger(Box::new(logger))?;
            log::set_max_level(log::LevelFilter::Warn);

            let config = ConfigLoader::resolve(config.as_deref(), url)?;
            status_once(config).await?;
        }
        Commands::Check { config } => {
            match ConfigLoader::load(&config) {
                Ok(cfg) => {
                    println!("✅ Config is valid:");
                    println!("   Context URL: {}", cfg.context_url);
                    println!("   Poll Interval: {}ms", cfg.poll_interval_ms);
                    println!("   Text Refresh Interval: {}ms", cfg.text_refresh_interval_ms);
                    println!("   Chart Interval: {}ms", cfg.chart_interval_ms);
                }
                Err(e) => {
                    eprintln!("❌ Config error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
