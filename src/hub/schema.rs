//! Hub wire schema: partial inbound snapshots and the defaulting table.
//!
//! Field nodes under duty-cycling may post incomplete bodies — a booting
//! node has no vision verdict yet, a node with a dead SMFC cell omits the
//! power group. The hub never rejects a partial body; every absent group
//! is substituted from a fixed table so the stored log stays uniformly
//! shaped.

use serde::Deserialize;

use crate::telemetry::{
    Actuators, AntiGravity, Atmosphere, ComputerVision, CropYield, EdgeSecurity, SmfcPower,
    SoilMoisture, TelemetrySnapshot, TinymlPredictions, Web3Ledger,
};

/// Stand-in node id for bodies that do not identify themselves.
pub const UNKNOWN_NODE: &str = "unknown_node";

/// Vision verdict substituted while a node has not reported one.
pub const VISION_PENDING: &str = "Calibration Pending";

/// SMFC status substituted while a node has not reported one.
pub const SMFC_OFFLINE: &str = "Offline";

/// Inbound ingest body: every group optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawSnapshot {
    pub node_id: Option<String>,
    pub timestamp_ms: Option<u64>,
    pub soil_moisture: Option<SoilMoisture>,
    pub atmosphere: Option<Atmosphere>,
    pub actuators: Option<Actuators>,
    pub tinyml_predictions: Option<TinymlPredictions>,
    pub computer_vision: Option<ComputerVision>,
    pub smfc_power: Option<SmfcPower>,
    pub web3_ledger: Option<Web3Ledger>,
    pub edge_security: Option<EdgeSecurity>,
    pub anti_gravity: Option<AntiGravity>,
    pub crop_yield: Option<CropYield>,
}

impl RawSnapshot {
    /// Merge with the default table and stamp with the arrival time. The
    /// node's own `timestamp_ms` is discarded; simulated node time and
    /// hub wall time share no epoch.
    pub fn resolve(self, arrival_ms: u64) -> TelemetrySnapshot {
        TelemetrySnapshot {
            node_id: self.node_id.unwrap_or_else(|| UNKNOWN_NODE.to_owned()),
            timestamp_ms: arrival_ms,
            soil_moisture: self.soil_moisture.unwrap_or(SoilMoisture {
                raw_voltage: 0.0,
                kalman_filtered_v: 0.0,
                percentage: 0.0,
            }),
            atmosphere: self.atmosphere.unwrap_or(Atmosphere {
                temperature_c: 32.5,
                humidity_pct: 45.0,
            }),
            actuators: self.actuators.unwrap_or(Actuators {
                pump_relay_active: false,
                flow_pulses_counted: 0,
            }),
            tinyml_predictions: self.tinyml_predictions.unwrap_or(TinymlPredictions {
                et_forecast_mm_day: 4.5,
                wilting_probability_24h: 15.0,
            }),
            computer_vision: self.computer_vision.unwrap_or_else(|| ComputerVision {
                status: VISION_PENDING.to_owned(),
                confidence: 0.0,
            }),
            smfc_power: self.smfc_power.unwrap_or_else(|| SmfcPower {
                raw_voltage_mv: 0.0,
                status: SMFC_OFFLINE.to_owned(),
            }),
            web3_ledger: self.web3_ledger.unwrap_or(Web3Ledger {
                water_saved_liters: 0.0,
                wct_tokens_minted: 0,
            }),
            edge_security: self.edge_security.unwrap_or(EdgeSecurity {
                isolation_forest_anomaly: false,
                inference_time_ms: 0.0,
            }),
            anti_gravity: self.anti_gravity.unwrap_or(AntiGravity {
                magnetic_field_ut: 0.0,
                ultrasonic_array_active: false,
                clinostat_rpm: 0.0,
            }),
            crop_yield: self.crop_yield.unwrap_or(CropYield {
                projected_yield_tha: 0.0,
                yield_increase_pct: 0.0,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_resolves_to_the_default_table() {
        let raw: RawSnapshot = serde_json::from_str("{}").unwrap();
        let snap = raw.resolve(1234);
        assert_eq!(snap.node_id, UNKNOWN_NODE);
        assert_eq!(snap.timestamp_ms, 1234);
        assert_eq!(snap.atmosphere.temperature_c, 32.5);
        assert_eq!(snap.atmosphere.humidity_pct, 45.0);
        assert_eq!(snap.tinyml_predictions.et_forecast_mm_day, 4.5);
        assert_eq!(snap.tinyml_predictions.wilting_probability_24h, 15.0);
        assert_eq!(snap.computer_vision.status, VISION_PENDING);
        assert_eq!(snap.computer_vision.confidence, 0.0);
        assert_eq!(snap.smfc_power.status, SMFC_OFFLINE);
        assert_eq!(snap.web3_ledger.wct_tokens_minted, 0);
        assert!(!snap.actuators.pump_relay_active);
    }

    #[test]
    fn present_groups_survive_resolution() {
        let raw: RawSnapshot = serde_json::from_str(
            r#"{
                "node_id": "esp32_zone_alpha",
                "soil_moisture": {"raw_voltage": 1.5, "kalman_filtered_v": 1.48, "percentage": 68.0},
                "atmosphere": {"temperature_c": 28.0, "humidity_pct": 61.0}
            }"#,
        )
        .unwrap();
        let snap = raw.resolve(99);
        assert_eq!(snap.node_id, "esp32_zone_alpha");
        assert_eq!(snap.soil_moisture.percentage, 68.0);
        assert_eq!(snap.atmosphere.humidity_pct, 61.0);
        // absent groups still defaulted
        assert_eq!(snap.smfc_power.status, SMFC_OFFLINE);
    }

    #[test]
    fn node_timestamp_is_discarded_for_arrival_time() {
        let raw: RawSnapshot = serde_json::from_str(r#"{"timestamp_ms": 5000}"#).unwrap();
        assert_eq!(raw.resolve(777).timestamp_ms, 777);
    }
}
