use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::time::Instant;

use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use gym_core::{load_watch_config, GymClient, PageController, Poller, WatchConfig};
use gym_proto::GymsResponse;
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;

mod app;
mod ui;
mod viewport;

use app::InspectorApp;

#[derive(Clone)]
struct ChannelWriter {
    sender: Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = String::from_utf8(buf.to_vec()) {
            let _ = self.sender.send(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Live gym ownership map and change feed", long_about = None)]
struct Cli {
    /// Base URL of the server exposing `/gyms`. Overrides the config file.
    #[arg(long)]
    endpoint: Option<String>,
    /// JSON config file. Falls back to GYM_WATCH_CONFIG_PATH, then the builtin config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Poll period in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Fetch every gym once, print the team summary and exit.
    #[arg(long)]
    report: bool,
}

impl Cli {
    fn watch_config(&self) -> WatchConfig {
        let (mut config, _) = load_watch_config(self.config.as_deref());
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(interval_ms) = self.interval_ms {
            config.poll_interval_ms = interval_ms;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if cli.report {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .with_writer(std::io::stderr)
            .init();
        return run_report(&cli.watch_config()).await;
    }

    let (log_tx, log_rx) = mpsc::channel::<String>();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(move || ChannelWriter {
            sender: log_tx.clone(),
        })
        .init();

    let config = cli.watch_config();
    info!("Watching gyms at {}", config.endpoint);

    let client = GymClient::new(&config.endpoint, config.request_timeout())?;
    let (sender, receiver) = unbounded_channel::<GymsResponse>();

    let ui_config = config.clone();
    let ui_handle = std::thread::spawn(move || -> Result<()> {
        let app = InspectorApp::new(receiver, log_rx, &ui_config)?;
        app.run()
    });

    Poller::new(client, config.poll_interval()).run(sender).await;

    match ui_handle.join() {
        Ok(result) => result,
        Err(_) => Err(eyre!("inspector UI thread panicked")),
    }
}

async fn run_report(config: &WatchConfig) -> Result<()> {
    let client = GymClient::new(&config.endpoint, config.request_timeout())?;
    let response = client.fetch(None).await?;

    let mut page = PageController::new(config);
    page.apply(&response, Instant::now());

    print!("{}", page.stats().summary_report());
    if let Some(label) = page.updated_at_label() {
        println!("Actualizado: {label}");
    }
    Ok(())
}
