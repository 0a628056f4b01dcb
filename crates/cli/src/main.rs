use {
    clap::Parser,
    std::{net::SocketAddr, sync::Arc},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use pipesage_gateway::{AppState, RelayConfig, serve};

#[derive(Parser)]
#[command(name = "pipesage", about = "Pipesage — LINE relay for Dify piping-drawing analysis")]
struct Cli {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Enable debug logging.
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Initialise tracing. `RUST_LOG` takes precedence; otherwise the default
/// level is `info`, raised to `debug` by `--debug`.
fn init_telemetry(cli: &Cli) {
    let default_level = if cli.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_ansi(true),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "pipesage starting");

    let config = RelayConfig::from_env()?;
    let state = Arc::new(AppState::new(&config));

    // Deployments front the relay with a proxy; bind loopback only.
    let addr = SocketAddr::from(([127, 0, 0, 1], cli.port));
    serve(addr, state).await
}
