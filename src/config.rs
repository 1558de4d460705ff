//! System configuration parameters
//!
//! All tunable parameters for the AgriNode simulation. The thresholds of
//! the placeholder heuristics (hysteresis voltages, wilting tiers, anomaly
//! rate, SMFC charge breakpoint) are configuration defaults, not hard
//! constants — values can be overridden via a TOML file at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One tier of the piecewise wilting-probability heuristic.
///
/// Tiers are evaluated highest `above_voltage` first; the first tier whose
/// threshold the Kalman voltage exceeds wins. Each tier adds independent
/// uniform noise of magnitude `jitter`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WiltingTier {
    /// Kalman voltage above which this tier applies.
    pub above_voltage: f32,
    /// Base wilting probability (percent) for the tier.
    pub probability: f32,
    /// Uniform noise magnitude added to `probability`.
    pub jitter: f32,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    // --- Identity / topics ---
    /// Node identifier reported in every snapshot.
    pub node_id: String,
    /// Command topic name on the shared broker.
    pub command_topic: String,

    // --- Timing ---
    /// Control tick interval (milliseconds).
    pub tick_interval_ms: u64,
    /// Deadline for the ingest round trip to the hub (milliseconds).
    pub ingest_timeout_ms: u64,

    // --- Soil voltage model ---
    /// Lower clamp for the Kalman-filtered voltage (fully wet).
    pub voltage_floor: f32,
    /// Upper clamp for the Kalman-filtered voltage (bone dry).
    pub voltage_ceiling: f32,
    /// Natural dry-out rate while the pump is off (V per tick).
    pub dry_rate_v: f32,
    /// Uniform jitter on the dry-out rate (V).
    pub dry_rate_jitter_v: f32,
    /// Voltage drawdown per tick while the pump is running (V).
    pub pump_drawdown_v: f32,
    /// Jitter applied to the reported raw (unfiltered) voltage (V).
    pub raw_voltage_jitter_v: f32,

    // --- Moisture percentage mapping ---
    /// Voltage that maps to 0 % moisture.
    pub pct_zero_voltage: f32,
    /// Voltage span covering the full 0–100 % range.
    pub pct_span_v: f32,

    // --- Pump hysteresis ---
    /// Auto-activate the pump when voltage rises above this (soil dry).
    pub pump_on_voltage: f32,
    /// Auto-deactivate the pump when voltage falls to this (soil soaked).
    pub pump_off_voltage: f32,

    // --- Wilting heuristic ---
    /// Base probability when no tier applies.
    pub wilting_base: f32,
    /// Jitter on the base probability.
    pub wilting_base_jitter: f32,
    /// Voltage tiers, highest threshold first.
    pub wilting_tiers: Vec<WiltingTier>,

    // --- Derived-field heuristics ---
    /// Evapotranspiration forecast baseline (mm/day) and jitter.
    pub et_forecast_base: f32,
    pub et_forecast_jitter: f32,
    /// Wilting probability above which vision reports early blight.
    pub vision_blight_threshold: f32,
    /// Vision confidence for blight / healthy verdicts, with jitters.
    pub vision_blight_confidence: f32,
    pub vision_blight_confidence_jitter: f32,
    pub vision_healthy_confidence: f32,
    pub vision_healthy_confidence_jitter: f32,
    /// Soil microbial fuel cell output model: base + gain * moisture %.
    pub smfc_base_mv: f32,
    pub smfc_gain_mv_per_pct: f32,
    pub smfc_jitter_mv: f32,
    /// Above this output the SMFC reports "Charging Battery".
    pub smfc_charge_threshold_mv: f32,
    /// Per-tick probability of an isolation-forest anomaly flag.
    pub anomaly_rate: f32,
    /// Edge-inference timing model (ms).
    pub inference_time_base_ms: f32,
    pub inference_time_jitter_ms: f32,
    /// Magnetic field reading model (µT).
    pub magnetic_field_base_ut: f32,
    pub magnetic_field_jitter_ut: f32,
    /// Jitter on the reported clinostat speed (RPM).
    pub clinostat_jitter_rpm: f32,
    /// RPM applied when a ROTATE_CLINOSTAT command omits `rpm`.
    pub clinostat_default_rpm: f32,
    /// Atmosphere simulation baselines.
    pub atmosphere_temp_base_c: f32,
    pub atmosphere_temp_jitter_c: f32,
    pub humidity_base_pct: f32,
    pub humidity_jitter_pct: f32,
    /// Crop-yield projection baseline (t/ha) and jitter.
    pub yield_baseline_tha: f32,
    pub yield_jitter_tha: f32,

    // --- Water ledger ---
    /// Accrue savings only while wilting probability is below this.
    pub savings_wilting_ceiling: f32,
    /// Litres credited per qualifying tick.
    pub savings_liters_per_tick: f32,
    /// Mint rule: one WCT token per this many litres saved.
    pub liters_per_token: f32,
    /// Opening ledger balance at process start.
    pub opening_water_saved_liters: f32,

    // --- Hub ---
    /// Default and maximum number of records a query returns.
    pub hub_query_limit: usize,
    /// Retention cap on the in-memory telemetry log.
    pub hub_retention: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            // Identity / topics
            node_id: "esp32_zone_alpha".into(),
            command_topic: "smartfarm/commands".into(),

            // Timing
            tick_interval_ms: 5000,
            ingest_timeout_ms: 2000,

            // Soil voltage model (1.0 V = 100 % moisture, 2.5 V = 0 %)
            voltage_floor: 1.0,
            voltage_ceiling: 2.6,
            dry_rate_v: 0.02,
            dry_rate_jitter_v: 0.01,
            pump_drawdown_v: 0.1,
            raw_voltage_jitter_v: 0.05,

            // Percentage mapping
            pct_zero_voltage: 2.5,
            pct_span_v: 1.5,

            // Hysteresis band: no toggling between 1.2 V and 2.5 V
            pump_on_voltage: 2.5,
            pump_off_voltage: 1.2,

            // Wilting heuristic
            wilting_base: 15.0,
            wilting_base_jitter: 5.0,
            wilting_tiers: vec![
                WiltingTier {
                    above_voltage: 2.0,
                    probability: 85.5,
                    jitter: 10.0,
                },
                WiltingTier {
                    above_voltage: 1.5,
                    probability: 40.2,
                    jitter: 5.0,
                },
            ],

            // Derived fields
            et_forecast_base: 4.2,
            et_forecast_jitter: 0.5,
            vision_blight_threshold: 80.0,
            vision_blight_confidence: 85.0,
            vision_blight_confidence_jitter: 5.0,
            vision_healthy_confidence: 95.0,
            vision_healthy_confidence_jitter: 4.0,
            smfc_base_mv: 450.0,
            smfc_gain_mv_per_pct: 3.5,
            smfc_jitter_mv: 20.0,
            smfc_charge_threshold_mv: 600.0,
            anomaly_rate: 0.02,
            inference_time_base_ms: 12.4,
            inference_time_jitter_ms: 2.0,
            magnetic_field_base_ut: 45000.0,
            magnetic_field_jitter_ut: 500.0,
            clinostat_jitter_rpm: 0.2,
            clinostat_default_rpm: 30.0,
            atmosphere_temp_base_c: 32.5,
            atmosphere_temp_jitter_c: 1.0,
            humidity_base_pct: 45.0,
            humidity_jitter_pct: 2.0,
            yield_baseline_tha: 6.5,
            yield_jitter_tha: 0.3,

            // Water ledger
            savings_wilting_ceiling: 40.0,
            savings_liters_per_tick: 2.5,
            liters_per_token: 10.0,
            opening_water_saved_liters: 1450.5,

            // Hub
            hub_query_limit: 100,
            hub_retention: 1000,
        }
    }
}

impl NodeConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// any field the file omits.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }
}
