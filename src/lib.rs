pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod models;

use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use clients::upstream::{HttpUpstream, UpstreamTransport};
pub use config::Config;
use constants::timeouts::HEALTH_MS;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let mut log_level = config.general.log_level.clone();
    if config.general.suppress_connection_errors {
        log_level.push_str(",reqwest::retry=off,hyper_util=off");
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = tracing_loki::builder()
            .label("app", "rostrum")?
            .extra_field("env", "production")?
            .build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    match cli.command {
        None | Some(Commands::Serve) => run_server(config, prometheus_handle).await,

        Some(Commands::Check) => run_check(config).await,

        Some(Commands::Init) => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }
    }
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!(
        "Rostrum v{} starting, proxying to {}",
        env!("CARGO_PKG_VERSION"),
        config.upstream.base_url
    );

    let transport: Arc<dyn UpstreamTransport> =
        Arc::new(HttpUpstream::from_config(&config.upstream)?);

    let port = config.server.port;
    let state = api::create_app_state(config, transport, prometheus_handle);
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let server_handle = tokio::spawn(async move {
        info!("Gateway listening at http://0.0.0.0:{}", port);
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    info!("Gateway running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    server_handle.abort();
    info!("Gateway stopped");

    Ok(())
}

/// One-shot reachability probe against the upstream `/health` endpoint.
async fn run_check(config: Config) -> anyhow::Result<()> {
    println!("Probing upstream: {}", config.upstream.base_url);

    let transport = HttpUpstream::from_config(&config.upstream)?;

    let mut request = clients::upstream::UpstreamRequest::get("/health");
    request.timeout = Duration::from_millis(HEALTH_MS);

    match transport.send(request).await {
        Ok(reply) if reply.status.is_success() => {
            println!("✓ Upstream is reachable ({})", reply.status);
            Ok(())
        }
        Ok(reply) => {
            println!("⚠ Upstream answered with {}", reply.status);
            Ok(())
        }
        Err(e) => {
            println!("✗ Upstream is unreachable: {}", e);
            std::process::exit(1);
        }
    }
}
