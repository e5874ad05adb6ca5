//! HTTP ingress entry point

use anyhow::Context;
use clap::Parser;
use http_ingress::{IngressConfig, IngressServer, LoggingActor, MessageFactory};
use mailbox_runtime::{MailboxRuntime, Runtime};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML, or JSON by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    bind_address: Option<String>,

    /// Port
    #[arg(short, long)]
    port: Option<u16>,

    /// Source name stamped on ingress messages
    #[arg(long)]
    source_name: Option<String>,

    /// Dispatch loop idle interval in milliseconds
    #[arg(long)]
    idle_interval_ms: Option<u64>,

    /// Message type handled by the logging actor (repeatable)
    #[arg(long = "log-type")]
    log_types: Vec<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn apply(&self, config: &mut IngressConfig) {
        if let Some(bind_address) = &self.bind_address {
            config.server.bind_address = bind_address.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(source_name) = &self.source_name {
            config.ingress.source_name = source_name.clone();
        }
        if let Some(idle_interval_ms) = self.idle_interval_ms {
            config.runtime.idle_interval_ms = idle_interval_ms;
        }
        config.actors.log_types.extend(self.log_types.iter().cloned());
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "http_ingress=info,mailbox_runtime=info,warn".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    info!("Starting HTTP ingress");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => IngressConfig::load(path)
            .await
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => IngressConfig::default(),
    };
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;
    info!("Configuration loaded: {:?}", config);

    let runtime = MailboxRuntime::in_memory(config.runtime.clone())?;
    for message_type in &config.actors.log_types {
        runtime.register(message_type.as_str(), LoggingActor::new());
    }
    runtime.start()?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    let server = IngressServer::new(
        config.server.clone(),
        Arc::new(runtime.clone()),
        MessageFactory::new(config.ingress.clone()),
    );
    server.run(shutdown_signal).await?;

    runtime.stop();
    info!(
        pending_messages = runtime.mailbox_size(),
        "Runtime stopped"
    );
    Ok(())
}
