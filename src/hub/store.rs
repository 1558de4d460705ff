//! Retention-capped telemetry log plus the one-shot force-pump flag.
//!
//! The store itself is plain data behind the hub actor; it has no locks
//! because [`hub_task`](super::task::hub_task) is its only owner.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::NodeConfig;
use crate::hub::schema::{RawSnapshot, SMFC_OFFLINE, VISION_PENDING};
use crate::telemetry::{
    Actuators, AntiGravity, Atmosphere, ComputerVision, CropYield, EdgeSecurity, SmfcPower,
    SoilMoisture, TelemetrySnapshot, TinymlPredictions, Web3Ledger,
};

/// `node_id` of the placeholder record an empty store answers with, so
/// chart consumers always have at least one row to render.
pub const NO_DATA: &str = "NO_DATA";

/// Answer to a successful ingest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestResponse {
    pub status: String,
    /// Manual override pending at the hub. Cleared the moment it is
    /// handed out, so exactly one ingest observes it.
    pub force_pump: bool,
}

pub struct TelemetryStore {
    log: VecDeque<TelemetrySnapshot>,
    pending_force: bool,
    retention: usize,
    query_limit: usize,
}

impl TelemetryStore {
    pub fn new(cfg: &NodeConfig) -> Self {
        Self {
            log: VecDeque::with_capacity(cfg.hub_retention),
            pending_force: false,
            retention: cfg.hub_retention,
            query_limit: cfg.hub_query_limit,
        }
    }

    /// Append one resolved snapshot and consume the pending override.
    pub fn ingest(&mut self, raw: RawSnapshot, arrival_ms: u64) -> IngestResponse {
        let snapshot = raw.resolve(arrival_ms);
        log::debug!(
            "HUB   | ingest from {} at {arrival_ms} ms ({} records held)",
            snapshot.node_id,
            self.log.len() + 1
        );
        self.log.push_back(snapshot);
        while self.log.len() > self.retention {
            self.log.pop_front();
        }
        let force_pump = core::mem::take(&mut self.pending_force);
        if force_pump {
            log::info!("HUB   | delivering force-pump override with ingest response");
        }
        IngestResponse {
            status: "success".to_owned(),
            force_pump,
        }
    }

    /// Newest-first read of the log, capped at `limit` and the hub-wide
    /// ceiling. An empty store answers with one placeholder record.
    pub fn query(&self, limit: Option<usize>) -> Vec<TelemetrySnapshot> {
        if self.log.is_empty() {
            return vec![Self::placeholder()];
        }
        let cap = limit.unwrap_or(self.query_limit).min(self.query_limit);
        self.log.iter().rev().take(cap).cloned().collect()
    }

    /// Arm the one-shot force-pump flag for the next ingest.
    pub fn request_force_pump(&mut self) {
        log::info!("HUB   | manual pump override armed");
        self.pending_force = true;
    }

    pub fn latest(&self) -> Option<&TelemetrySnapshot> {
        self.log.back()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    fn placeholder() -> TelemetrySnapshot {
        TelemetrySnapshot {
            node_id: NO_DATA.to_owned(),
            timestamp_ms: 0,
            soil_moisture: SoilMoisture {
                raw_voltage: 0.0,
                kalman_filtered_v: 0.0,
                percentage: 0.0,
            },
            atmosphere: Atmosphere {
                temperature_c: 0.0,
                humidity_pct: 0.0,
            },
            actuators: Actuators {
                pump_relay_active: false,
                flow_pulses_counted: 0,
            },
            tinyml_predictions: TinymlPredictions {
                et_forecast_mm_day: 0.0,
                wilting_probability_24h: 0.0,
            },
            computer_vision: ComputerVision {
                status: VISION_PENDING.to_owned(),
                confidence: 0.0,
            },
            smfc_power: SmfcPower {
                raw_voltage_mv: 0.0,
                status: SMFC_OFFLINE.to_owned(),
            },
            web3_ledger: Web3Ledger {
                water_saved_liters: 0.0,
                wct_tokens_minted: 0,
            },
            edge_security: EdgeSecurity {
                isolation_forest_anomaly: false,
                inference_time_ms: 0.0,
            },
            anti_gravity: AntiGravity {
                magnetic_field_ut: 0.0,
                ultrasonic_array_active: false,
                clinostat_rpm: 0.0,
            },
            crop_yield: CropYield {
                projected_yield_tha: 0.0,
                yield_increase_pct: 0.0,
            },
        }
    }
}
