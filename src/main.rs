//! Binary entry point.
//!
//! Wires the three tasks — hub, broker relay, node control loop — onto a
//! single-threaded executor and runs forever. Configuration comes from an
//! optional TOML file (first CLI argument, falling back to
//! `agrinode.toml` in the working directory, then to built-in defaults).

use std::env;
use std::path::Path;

use anyhow::Context;
use edge_executor::LocalExecutor;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};

use agrinode::adapters::log_sink::LogEventSink;
use agrinode::adapters::uplink::HubChannelClient;
use agrinode::broker::command_relay_task;
use agrinode::channels::{COMMAND_CHANNEL, NODE_SLOT};
use agrinode::config::NodeConfig;
use agrinode::hub::task::hub_task;
use agrinode::node::service::NodeService;
use agrinode::sim::noise::NoiseSource;

const DEFAULT_CONFIG_PATH: &str = "agrinode.toml";

fn load_config() -> anyhow::Result<NodeConfig> {
    if let Some(path) = env::args().nth(1) {
        return NodeConfig::load(Path::new(&path))
            .with_context(|| format!("loading config from {path}"));
    }
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        return NodeConfig::load(Path::new(DEFAULT_CONFIG_PATH))
            .with_context(|| format!("loading config from {DEFAULT_CONFIG_PATH}"));
    }
    Ok(NodeConfig::default())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = load_config()?;
    log::info!(
        "BOOT  | agrinode {} starting, node_id={} tick={}ms",
        env!("CARGO_PKG_VERSION"),
        cfg.node_id,
        cfg.tick_interval_ms
    );

    let executor: LocalExecutor<'_, 8> = LocalExecutor::new();

    executor.spawn(hub_task(cfg.clone())).detach();
    executor
        .spawn(command_relay_task(
            cfg.command_topic.clone(),
            cfg.clinostat_default_rpm,
        ))
        .detach();
    executor
        .spawn(async move {
            let uplink = HubChannelClient::new(NODE_SLOT, cfg.ingest_timeout_ms);
            let mut service =
                NodeService::new(cfg, NoiseSource::new(), uplink, LogEventSink::new());
            let interval = Duration::from_millis(service.config().tick_interval_ms);
            let mut ticker = Ticker::every(interval);
            loop {
                match select(ticker.next(), COMMAND_CHANNEL.receive()).await {
                    Either::First(()) => service.tick().await,
                    Either::Second(command) => service.handle_command(command),
                }
            }
        })
        .detach();

    // The executor drives the three detached tasks forever.
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
    Ok(())
}
