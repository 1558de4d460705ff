//! Hub request engine — transport-agnostic frame dispatch.
//!
//! One JSON request frame in, one JSON response frame out. The engine
//! never sees channels or clients; the task layer owns routing. Keeping
//! dispatch pure makes the whole hub testable without an executor.

use serde::{Deserialize, Serialize};

use crate::channels::MAX_RESP_FRAME;
use crate::config::NodeConfig;
use crate::hub::schema::RawSnapshot;
use crate::hub::store::{IngestResponse, TelemetryStore};
use crate::telemetry::TelemetrySnapshot;

/// Cache marker on every query response. Telemetry is live data; nothing
/// between the hub and a chart may serve a stale copy.
pub const CACHE_NO_STORE: &str = "no-store";

/// Requests the hub understands.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HubRequest {
    /// Ingest one (possibly partial) snapshot.
    Ingest { snapshot: RawSnapshot },
    /// Read back recent records, newest first.
    Query { limit: Option<usize> },
    /// Arm the manual pump override for the next ingest.
    ForcePump,
    /// Compact single-node readout for the AR overlay.
    Status,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HubResponse {
    Ingest(IngestResponse),
    Query(QueryResponse),
    Ack { status: String },
    Status(OverlayStatus),
    Error { message: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Always [`CACHE_NO_STORE`].
    pub cache: String,
    pub count: usize,
    pub records: Vec<TelemetrySnapshot>,
}

/// The four fields the AR overlay renders next to the plant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayStatus {
    pub moisture_pct: f32,
    pub pump_active: bool,
    pub ai_wilting_prob: f32,
    pub seconds_to_sleep: u64,
}

pub struct HubEngine {
    store: TelemetryStore,
    sleep_secs: u64,
}

impl HubEngine {
    pub fn new(cfg: &NodeConfig) -> Self {
        Self {
            store: TelemetryStore::new(cfg),
            sleep_secs: cfg.tick_interval_ms / 1000,
        }
    }

    /// Handle one raw request frame. Bad frames become `Error` responses;
    /// the engine itself never fails.
    pub fn dispatch(&mut self, frame: &[u8], arrival_ms: u64) -> HubResponse {
        let request: HubRequest = match serde_json::from_slice(frame) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("HUB   | rejecting malformed request: {e}");
                return HubResponse::Error {
                    message: format!("malformed request: {e}"),
                };
            }
        };
        match request {
            HubRequest::Ingest { snapshot } => {
                HubResponse::Ingest(self.store.ingest(snapshot, arrival_ms))
            }
            HubRequest::Query { limit } => {
                let records = self.store.query(limit);
                HubResponse::Query(QueryResponse {
                    cache: CACHE_NO_STORE.to_owned(),
                    count: records.len(),
                    records,
                })
            }
            HubRequest::ForcePump => {
                self.store.request_force_pump();
                HubResponse::Ack {
                    status: "armed".to_owned(),
                }
            }
            HubRequest::Status => HubResponse::Status(self.overlay_status()),
        }
    }

    /// Serialize a response into a channel frame. Responses that cannot
    /// fit are replaced by an error frame rather than silently dropped.
    pub fn encode(response: &HubResponse) -> heapless::Vec<u8, MAX_RESP_FRAME> {
        let bytes = match serde_json::to_vec(response) {
            Ok(b) => b,
            Err(e) => {
                log::error!("HUB   | response encode failed: {e}");
                return Self::error_frame("response encode failed");
            }
        };
        match heapless::Vec::from_slice(&bytes) {
            Ok(frame) => frame,
            Err(()) => {
                log::error!(
                    "HUB   | response of {} bytes exceeds frame capacity, answering with error",
                    bytes.len()
                );
                Self::error_frame("response too large, retry with a lower limit")
            }
        }
    }

    fn error_frame(message: &str) -> heapless::Vec<u8, MAX_RESP_FRAME> {
        let fallback = serde_json::to_vec(&HubResponse::Error {
            message: message.to_owned(),
        })
        .unwrap_or_default();
        heapless::Vec::from_slice(&fallback).unwrap_or_default()
    }

    fn overlay_status(&self) -> OverlayStatus {
        match self.store.latest() {
            Some(snap) => OverlayStatus {
                moisture_pct: snap.soil_moisture.percentage,
                pump_active: snap.actuators.pump_relay_active,
                ai_wilting_prob: snap.tinyml_predictions.wilting_probability_24h,
                seconds_to_sleep: self.sleep_secs,
            },
            None => OverlayStatus {
                moisture_pct: 0.0,
                pump_active: false,
                ai_wilting_prob: 0.0,
                seconds_to_sleep: self.sleep_secs,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::store::NO_DATA;

    fn engine() -> HubEngine {
        HubEngine::new(&NodeConfig::default())
    }

    #[test]
    fn ingest_then_query_round_trip() {
        let mut hub = engine();
        let resp = hub.dispatch(
            br#"{"op":"ingest","snapshot":{"node_id":"esp32_zone_alpha"}}"#,
            500,
        );
        match resp {
            HubResponse::Ingest(ack) => {
                assert_eq!(ack.status, "success");
                assert!(!ack.force_pump);
            }
            other => panic!("expected ingest ack, got {other:?}"),
        }

        match hub.dispatch(br#"{"op":"query","limit":5}"#, 501) {
            HubResponse::Query(q) => {
                assert_eq!(q.cache, CACHE_NO_STORE);
                assert_eq!(q.count, 1);
                assert_eq!(q.records[0].node_id, "esp32_zone_alpha");
                assert_eq!(q.records[0].timestamp_ms, 500);
            }
            other => panic!("expected query records, got {other:?}"),
        }
    }

    #[test]
    fn query_on_empty_store_yields_placeholder_not_error() {
        let mut hub = engine();
        match hub.dispatch(br#"{"op":"query"}"#, 0) {
            HubResponse::Query(q) => {
                assert_eq!(q.count, 1);
                assert_eq!(q.records[0].node_id, NO_DATA);
            }
            other => panic!("expected placeholder record, got {other:?}"),
        }
    }

    #[test]
    fn force_pump_arms_the_next_ingest_only() {
        let mut hub = engine();
        assert!(matches!(
            hub.dispatch(br#"{"op":"force_pump"}"#, 0),
            HubResponse::Ack { .. }
        ));
        let first = hub.dispatch(br#"{"op":"ingest","snapshot":{}}"#, 1);
        let second = hub.dispatch(br#"{"op":"ingest","snapshot":{}}"#, 2);
        assert!(matches!(first, HubResponse::Ingest(ack) if ack.force_pump));
        assert!(matches!(second, HubResponse::Ingest(ack) if !ack.force_pump));
    }

    #[test]
    fn malformed_frames_get_error_responses() {
        let mut hub = engine();
        assert!(matches!(
            hub.dispatch(b"they're in the trees", 0),
            HubResponse::Error { .. }
        ));
        assert!(matches!(
            hub.dispatch(br#"{"op":"defragment"}"#, 0),
            HubResponse::Error { .. }
        ));
    }

    #[test]
    fn overlay_status_tracks_the_latest_record() {
        let mut hub = engine();
        match hub.dispatch(br#"{"op":"status"}"#, 0) {
            HubResponse::Status(s) => {
                assert_eq!(s.moisture_pct, 0.0);
                assert_eq!(s.seconds_to_sleep, 5);
            }
            other => panic!("expected status, got {other:?}"),
        }

        let _ = hub.dispatch(
            br#"{"op":"ingest","snapshot":{
                "soil_moisture":{"raw_voltage":1.5,"kalman_filtered_v":1.5,"percentage":66.7},
                "actuators":{"pump_relay_active":true,"flow_pulses_counted":12},
                "tinyml_predictions":{"et_forecast_mm_day":4.2,"wilting_probability_24h":38.0}
            }}"#,
            10,
        );
        match hub.dispatch(br#"{"op":"status"}"#, 11) {
            HubResponse::Status(s) => {
                assert_eq!(s.moisture_pct, 66.7);
                assert!(s.pump_active);
                assert_eq!(s.ai_wilting_prob, 38.0);
            }
            other => panic!("expected status, got {other:?}"),
        }
    }

    #[test]
    fn encoded_responses_are_valid_json_frames() {
        let mut hub = engine();
        let resp = hub.dispatch(br#"{"op":"query"}"#, 0);
        let frame = HubEngine::encode(&resp);
        let back: HubResponse = serde_json::from_slice(&frame).unwrap();
        assert!(matches!(back, HubResponse::Query(_)));
    }
}
