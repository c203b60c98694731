use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use scope_plugin::{
    Plugin, api,
    config::{Config, MetricKind, MetricSection, PluginSection, read_config_file},
    socket::{remove_socket_dir, setup_socket},
};
use tracing::{error, info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file
    #[arg(short, long)]
    config: Option<String>,

    /// Plugin id (also names the socket directory)
    #[arg(long)]
    id: Option<String>,

    /// Directory under which the `<id>/<id>.sock` socket is created
    #[arg(long)]
    socket_root: Option<PathBuf>,

    /// Host identity to report on
    #[arg(long)]
    host_id: Option<String>,

    /// Source of the reported metric
    #[arg(long, value_enum)]
    metric: Option<MetricKind>,

    /// Value reported by the fixed metric source
    #[arg(long)]
    value: Option<f64>,
}

impl Args {
    fn as_config(&self) -> Config {
        Config {
            plugin: PluginSection {
                id: self.id.clone(),
                ..Default::default()
            },
            socket_root: self.socket_root.clone(),
            host_id: self.host_id.clone(),
            metric: MetricSection {
                kind: self.metric,
                value: self.value,
            },
        }
    }
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("scope_plugin", LevelFilter::TRACE),
        ("tower_http", LevelFilter::DEBUG),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let file_config = match &args.config {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };
    let config = args
        .as_config()
        .merge(file_config)
        .merge(Config::from_env())
        .resolve()?;

    info!("starting on {}...", config.host_id);

    let plugin = Arc::new(Plugin::new(
        config.host_id.clone(),
        config.plugin.clone(),
        config.metric.source(),
    ));

    let listener = setup_socket(&config.socket)?;
    let result = api::serve(listener, plugin, shutdown_signal()).await;

    remove_socket_dir(&config.socket);
    info!("stopped");

    result
}

async fn shutdown_signal() {
    let mut sigterm =
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM"),
        _ = tokio::signal::ctrl_c() => info!("received interrupt"),
    }
}
