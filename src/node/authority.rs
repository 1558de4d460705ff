//! Actuation control authority.
//!
//! The one owner of [`SensorState`]. Every mutation — directive
//! application and the tick itself — goes through here, so the tick path
//! and the command path can never read-modify-write a field concurrently.
//! Callers hold the authority inside the single service actor; there is
//! no interior locking because none is needed.

use crate::config::NodeConfig;
use crate::sim::engine::{Simulator, TickReadings};
use crate::sim::ledger::LedgerAccountant;
use crate::sim::noise::NoiseSource;
use crate::sim::SensorState;
use crate::telemetry::ControlDirective;

pub struct ControlAuthority {
    state: SensorState,
    simulator: Simulator,
    ledger: LedgerAccountant,
    noise: NoiseSource,
}

/// Everything a completed tick produced, for snapshot assembly.
pub struct TickOutcome {
    pub readings: TickReadings,
    pub tokens_minted: u64,
    pub pump_changed: bool,
}

impl ControlAuthority {
    pub fn new(cfg: &NodeConfig, noise: NoiseSource) -> Self {
        Self {
            state: SensorState::initial(cfg),
            ledger: LedgerAccountant::new(cfg),
            simulator: Simulator::new(cfg.clone()),
            noise,
        }
    }

    /// Merge one directive onto the actuator state.
    ///
    /// `force_pump` is edge-triggered: `true` energises the relay once,
    /// `false` never turns it off. `array_enable` latches on. A present
    /// `clinostat_rpm` overrides the speed; absence leaves it alone.
    pub fn apply(&mut self, directive: &ControlDirective) {
        if directive.force_pump && !self.state.pump_active {
            log::warn!("CTRL  | manual override, energising pump relay");
            self.state.pump_active = true;
        }
        if directive.array_enable && !self.state.array_enable {
            log::info!("CTRL  | 40 kHz ultrasonic array enabled");
            self.state.array_enable = true;
        }
        if let Some(rpm) = directive.clinostat_rpm {
            log::info!("CTRL  | clinostat speed set to {rpm:.1} rpm");
            self.state.clinostat_rpm = rpm;
        }
    }

    /// Advance the simulation one tick and settle the savings ledger.
    pub fn advance_tick(&mut self) -> TickOutcome {
        let pump_before = self.state.pump_active;
        self.ledger.begin_tick();
        let readings = self.simulator.advance(&mut self.state, &mut self.noise);
        let tokens_minted = self
            .ledger
            .settle(&mut self.state, readings.wilting_probability);
        TickOutcome {
            pump_changed: self.state.pump_active != pump_before,
            readings,
            tokens_minted,
        }
    }

    pub fn state(&self) -> &SensorState {
        &self.state
    }
}
