use chanwatch::{config::Config, replay::ReplayReport, Replayer};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::non_blocking;
// no EnvFilter feature; use a simple level switch via RUST_LOG

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[derive(Parser)]
#[command(name = "chanwatch")]
#[command(about = "Replay scripted channel lifecycles through configured listeners")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "demos/replay.yaml")]
    config: String,
}

fn init_logging() {
    let (non_blocking_writer, guard) = non_blocking(std::io::stderr());
    // Keep guard alive for the program lifetime to avoid log loss
    let _ = LOG_GUARD.set(guard);

    let fmt = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_ansi(true)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .compact();

    let level = match std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    let _ = fmt.with_max_level(level).try_init();
}

async fn run_with_config_path(config_path: &str) -> Result<ReplayReport, Box<dyn std::error::Error>> {
    let config = Config::from_yaml_file(config_path).await?;
    info!(
        "Loaded {} listener(s) and {} channel(s) from {}",
        config.listeners.len(),
        config.channels.len(),
        config_path
    );
    let report = Replayer::new(config).run()?;
    Ok(report)
}

fn log_report(report: &ReplayReport) {
    for channel in &report.channels {
        let delivered: Vec<String> = channel.events.iter().map(|e| e.to_string()).collect();
        info!("{} [{}]: {}", channel.channel, channel.listener, delivered.join(", "));
        if let Some(metrics) = &channel.metrics {
            info!(
                "{} metrics: {} callback(s), avg {:.3}ms, p99 {:.3}ms",
                channel.channel,
                metrics.total_callbacks,
                metrics.average_callback_ms,
                metrics.p99_callback_ms
            );
        }
        if channel.panics > 0 {
            warn!("{}: {} listener panic(s) contained", channel.channel, channel.panics);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();
    info!("Starting chanwatch replay");
    match run_with_config_path(&args.config).await {
        Ok(report) => log_report(&report),
        Err(e) => {
            error!("Replay failed: {}", e);
            return Err(e);
        }
    }
    info!("chanwatch replay finished");
    Ok(())
}
