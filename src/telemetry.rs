//! Telemetry snapshot schema and control directives.
//!
//! [`TelemetrySnapshot`] is the immutable per-tick record the node
//! assembles and ships to the hub; the hub stores the same shape after
//! re-stamping the timestamp at arrival. [`ControlDirective`] is the
//! single instruction type merged onto actuator state, produced either by
//! the hub (manual override) or by the command channel.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Nested snapshot groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilMoisture {
    /// Unfiltered probe voltage (V).
    pub raw_voltage: f32,
    /// Kalman-filtered probe voltage (V).
    pub kalman_filtered_v: f32,
    /// Moisture percentage, always within `[0, 100]`.
    pub percentage: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actuators {
    pub pump_relay_active: bool,
    /// Flow-sensor pulse total. Monotonically nondecreasing.
    pub flow_pulses_counted: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TinymlPredictions {
    pub et_forecast_mm_day: f32,
    pub wilting_probability_24h: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputerVision {
    pub status: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmfcPower {
    pub raw_voltage_mv: f32,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Web3Ledger {
    /// Monotonically nondecreasing.
    pub water_saved_liters: f32,
    /// Invariant: `wct_tokens_minted == floor(water_saved_liters / 10)`.
    pub wct_tokens_minted: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSecurity {
    pub isolation_forest_anomaly: bool,
    pub inference_time_ms: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntiGravity {
    pub magnetic_field_ut: f32,
    pub ultrasonic_array_active: bool,
    pub clinostat_rpm: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropYield {
    pub projected_yield_tha: f32,
    pub yield_increase_pct: f32,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One immutable telemetry record, produced once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub node_id: String,
    /// Node side: milliseconds since node start. Hub side: re-stamped to
    /// milliseconds since hub start at arrival.
    pub timestamp_ms: u64,
    pub soil_moisture: SoilMoisture,
    pub atmosphere: Atmosphere,
    pub actuators: Actuators,
    pub tinyml_predictions: TinymlPredictions,
    pub computer_vision: ComputerVision,
    pub smfc_power: SmfcPower,
    pub web3_ledger: Web3Ledger,
    pub edge_security: EdgeSecurity,
    pub anti_gravity: AntiGravity,
    pub crop_yield: CropYield,
}

// ---------------------------------------------------------------------------
// Control directive
// ---------------------------------------------------------------------------

/// An instruction merged onto actuator state by the control authority.
///
/// Fields are *set* signals: `force_pump = true` activates the pump once
/// (edge-triggered; `false` is never used to turn it off), `array_enable
/// = true` latches the ultrasonic array on, `Some(rpm)` overrides the
/// clinostat speed. Absent/false fields leave state untouched, so a
/// hub response carrying only `force_pump` cannot clear a previously
/// commanded array or speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlDirective {
    pub force_pump: bool,
    pub array_enable: bool,
    pub clinostat_rpm: Option<f32>,
}

impl ControlDirective {
    /// True when the directive would not change anything.
    pub fn is_empty(&self) -> bool {
        !self.force_pump && !self.array_enable && self.clinostat_rpm.is_none()
    }

    /// Fold another directive into this one. Force/enable flags stick,
    /// the clinostat override is last-writer-wins.
    pub fn merge(&mut self, other: &ControlDirective) {
        self.force_pump |= other.force_pump;
        self.array_enable |= other.array_enable;
        if other.clinostat_rpm.is_some() {
            self.clinostat_rpm = other.clinostat_rpm;
        }
    }
}
