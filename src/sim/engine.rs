//! Tick engine — advances [`SensorState`] once per control tick.
//!
//! Purely arithmetic given the current state and a noise source; there
//! are no error conditions. All thresholds come from [`NodeConfig`] —
//! they are placeholder heuristics with configurable breakpoints, not a
//! trained model.

use crate::config::NodeConfig;
use crate::sim::noise::NoiseSource;
use crate::sim::SensorState;

/// Vision verdict when the wilting probability crosses the threshold.
pub const VISION_BLIGHT: &str = "Early Blight Detected";
/// Vision verdict below the threshold.
pub const VISION_HEALTHY: &str = "Healthy";
/// SMFC status above the charge breakpoint.
pub const SMFC_CHARGING: &str = "Charging Battery";
/// SMFC status at or below the charge breakpoint.
pub const SMFC_MAINTENANCE: &str = "Maintenance Mode";

/// Derived, per-tick readings. Ephemeral — recomputed every tick from the
/// state plus independent noise; only [`SensorState`] persists.
#[derive(Debug, Clone)]
pub struct TickReadings {
    pub raw_voltage: f32,
    pub percentage: f32,
    pub wilting_probability: f32,
    pub et_forecast_mm_day: f32,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub vision_status: &'static str,
    pub vision_confidence: f32,
    pub smfc_mv: f32,
    pub smfc_status: &'static str,
    pub anomaly: bool,
    pub inference_time_ms: f32,
    pub magnetic_field_ut: f32,
    pub clinostat_rpm: f32,
    pub projected_yield_tha: f32,
    pub yield_increase_pct: f32,
}

/// The simulator proper. Stateless apart from its configuration; the
/// mutable state lives in [`SensorState`] behind the control authority.
pub struct Simulator {
    cfg: NodeConfig,
}

impl Simulator {
    pub fn new(cfg: NodeConfig) -> Self {
        Self { cfg }
    }

    /// Run one tick: voltage update, clamp, hysteresis auto-control, then
    /// every derived reading.
    pub fn advance(&self, state: &mut SensorState, noise: &mut NoiseSource) -> TickReadings {
        let cfg = &self.cfg;

        // 1. Voltage update. Pumping wets the soil (voltage drops) and
        //    spins the flow sensor; otherwise the soil dries out.
        if state.pump_active {
            state.kalman_voltage -= cfg.pump_drawdown_v;
            state.flow_pulse_count += noise.pulse_burst();
        } else {
            state.kalman_voltage += cfg.dry_rate_v + noise.variance(cfg.dry_rate_jitter_v);
        }
        state.kalman_voltage = state
            .kalman_voltage
            .clamp(cfg.voltage_floor, cfg.voltage_ceiling);

        // 2. Moisture percentage.
        let percentage = (((cfg.pct_zero_voltage - state.kalman_voltage) / cfg.pct_span_v)
            * 100.0)
            .clamp(0.0, 100.0);

        // 3. Cycle-and-soak hysteresis. Inside the band the pump state is
        //    deliberately left alone.
        if state.kalman_voltage > cfg.pump_on_voltage && !state.pump_active {
            log::warn!("SIM   | soil critically dry, auto-activating pump relay");
            state.pump_active = true;
        } else if state.kalman_voltage <= cfg.pump_off_voltage && state.pump_active {
            log::info!("SIM   | soil saturated, auto-deactivating pump relay");
            state.pump_active = false;
        }

        // 4. Tiered wilting probability.
        let wilting_probability = self.wilting_probability(state.kalman_voltage, noise);

        // 5. Derived fields, each with independent noise.
        let blight = wilting_probability > cfg.vision_blight_threshold;
        let (vision_status, vision_confidence) = if blight {
            (
                VISION_BLIGHT,
                cfg.vision_blight_confidence + noise.variance(cfg.vision_blight_confidence_jitter),
            )
        } else {
            (
                VISION_HEALTHY,
                cfg.vision_healthy_confidence
                    + noise.variance(cfg.vision_healthy_confidence_jitter),
            )
        };

        // Wetter soil = happier bacteria = more millivolts.
        let smfc_nominal = cfg.smfc_base_mv + percentage * cfg.smfc_gain_mv_per_pct;
        let smfc_mv = smfc_nominal + noise.variance(cfg.smfc_jitter_mv);
        let smfc_status = if smfc_nominal > cfg.smfc_charge_threshold_mv {
            SMFC_CHARGING
        } else {
            SMFC_MAINTENANCE
        };

        let projected_yield_tha = cfg.yield_baseline_tha * (0.8 + 0.4 * percentage / 100.0)
            + noise.variance(cfg.yield_jitter_tha);
        let yield_increase_pct = (projected_yield_tha / cfg.yield_baseline_tha - 1.0) * 100.0;

        TickReadings {
            raw_voltage: state.kalman_voltage + noise.variance(cfg.raw_voltage_jitter_v),
            percentage,
            wilting_probability,
            et_forecast_mm_day: cfg.et_forecast_base + noise.variance(cfg.et_forecast_jitter),
            temperature_c: cfg.atmosphere_temp_base_c + noise.variance(cfg.atmosphere_temp_jitter_c),
            humidity_pct: cfg.humidity_base_pct + noise.variance(cfg.humidity_jitter_pct),
            vision_status,
            vision_confidence,
            smfc_mv,
            smfc_status,
            anomaly: noise.chance(cfg.anomaly_rate),
            inference_time_ms: cfg.inference_time_base_ms
                + noise.variance(cfg.inference_time_jitter_ms),
            magnetic_field_ut: cfg.magnetic_field_base_ut
                + noise.variance(cfg.magnetic_field_jitter_ut),
            clinostat_rpm: state.clinostat_rpm + noise.variance(cfg.clinostat_jitter_rpm),
            projected_yield_tha,
            yield_increase_pct,
        }
    }

    /// Piecewise wilting heuristic: first tier whose voltage threshold is
    /// exceeded wins; each tier carries its own noise magnitude.
    fn wilting_probability(&self, voltage: f32, noise: &mut NoiseSource) -> f32 {
        for tier in &self.cfg.wilting_tiers {
            if voltage > tier.above_voltage {
                return tier.probability + noise.variance(tier.jitter);
            }
        }
        self.cfg.wilting_base + noise.variance(self.cfg.wilting_base_jitter)
    }
}
