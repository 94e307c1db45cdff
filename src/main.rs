use clap::Parser;
use small_watch::utils::{logger, validation::Validate};
use small_watch::{HttpQueryService, PollLoop, TelegramNotifier, WatchConfig, WatchEngine};

#[derive(Parser)]
#[command(name = "small-watch")]
#[command(about = "A small polling watcher that reports matches via Telegram")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "watch-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log process resource usage after each cycle
    #[arg(long)]
    monitor: bool,

    /// Dry run - validate the config and show what would be scanned without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting small-watch");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match WatchConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be made");
        return Ok(());
    }

    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 建立查詢服務與通知通道
    let query_service = HttpQueryService::new(&config.target, config.request_timeout())?;
    let notifier = TelegramNotifier::new(&config.telegram, config.request_timeout())?;

    let poll_loop = PollLoop::new(
        query_service,
        notifier,
        config.id_range(),
        config.scan.marker.clone(),
    );
    let mut engine = WatchEngine::new_with_monitoring(poll_loop, config.cycle_sleep(), args.monitor);

    // The engine only returns on a systemic failure; otherwise it runs
    // until the process is killed.
    if let Err(e) = engine.run().await {
        tracing::error!("❌ Watcher stopped: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn display_config_summary(config: &WatchConfig, args: &Args) {
    tracing::info!("📋 Watch: {}", config.watch.name);
    if let Some(description) = &config.watch.description {
        tracing::info!("📋 {}", description);
    }
    tracing::info!("🌐 Target endpoint: {}", config.target.endpoint);
    tracing::info!(
        "🔢 Identifier range: {}..={} ({} per cycle, field '{}')",
        config.scan.id_start,
        config.scan.id_end,
        config.id_count(),
        config.target.id_field
    );
    tracing::info!("🎯 Target marker: {:?}", config.scan.marker);
    tracing::info!(
        "⏱️ Cycle sleep: {:?}, request timeout: {:?}",
        config.cycle_sleep(),
        config.request_timeout()
    );
    if args.verbose {
        tracing::debug!("Telegram API base: {}", config.telegram.api_base_url());
        tracing::debug!("Telegram chat id: {}", config.telegram.chat_id);
    }
}
