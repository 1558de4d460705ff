//! Sensor-state simulator — physical state, noise source, tick engine and
//! the water-savings ledger.
//!
//! The simulator owns no concurrency: [`SensorState`] is advanced by
//! [`engine::Simulator::advance`] exactly once per tick, under the control
//! authority that serializes all access.

pub mod engine;
pub mod ledger;
pub mod noise;

use crate::config::NodeConfig;

/// Mutable physical state of the node. Exclusively owned by the control
/// authority; lives for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorState {
    /// Kalman-filtered probe voltage, clamped to the configured range.
    pub kalman_voltage: f32,
    /// Whether the pump relay is energised.
    pub pump_active: bool,
    /// Flow-sensor pulse total. Never decreases.
    pub flow_pulse_count: u64,
    /// Accrued water savings (litres). Never decreases.
    pub water_saved_liters: f32,
    /// Minted WCT tokens: `floor(water_saved_liters / liters_per_token)`.
    pub tokens_minted: u64,
    /// 40 kHz ultrasonic array latch.
    pub array_enable: bool,
    /// Commanded clinostat speed (RPM).
    pub clinostat_rpm: f32,
}

impl SensorState {
    /// Fixed process-start defaults: fully wet soil, pump off, ledger at
    /// its configured opening balance.
    pub fn initial(config: &NodeConfig) -> Self {
        let water = config.opening_water_saved_liters;
        Self {
            kalman_voltage: config.voltage_floor,
            pump_active: false,
            flow_pulse_count: 0,
            water_saved_liters: water,
            tokens_minted: (water / config.liters_per_token).floor() as u64,
            array_enable: false,
            clinostat_rpm: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_honours_mint_rule() {
        let cfg = NodeConfig::default();
        let s = SensorState::initial(&cfg);
        assert_eq!(
            s.tokens_minted,
            (s.water_saved_liters / cfg.liters_per_token).floor() as u64
        );
        assert!(!s.pump_active);
        assert!((s.kalman_voltage - cfg.voltage_floor).abs() < f32::EPSILON);
    }
}
