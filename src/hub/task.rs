//! Hub actor task.
//!
//! Sole owner of the [`HubEngine`]. Requests from every client arrive on
//! one channel and are answered strictly in order, which is what makes
//! the force-pump flag's consume-once guarantee hold without a lock.

use embassy_time::Instant;

use crate::channels::{HUB_REQ_CHANNEL, HUB_RESP_SLOTS};
use crate::config::NodeConfig;
use crate::hub::engine::HubEngine;

pub async fn hub_task(cfg: NodeConfig) {
    let mut engine = HubEngine::new(&cfg);
    log::info!(
        "HUB   | up, retention {} records, query ceiling {}",
        cfg.hub_retention,
        cfg.hub_query_limit
    );
    loop {
        let request = HUB_REQ_CHANNEL.receive().await;
        let arrival_ms = Instant::now().as_millis();
        let response = engine.dispatch(&request.frame, arrival_ms);
        let Some(slot) = HUB_RESP_SLOTS.get(request.client_id) else {
            log::warn!("HUB   | no response slot for client {}", request.client_id);
            continue;
        };
        slot.send(HubEngine::encode(&response)).await;
    }
}
