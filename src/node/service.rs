//! Node service — the single actor that owns the control loop.
//!
//! The executor task feeds this service two kinds of input: a tick from
//! the interval timer and commands relayed from the broker topic. Both
//! mutate state only through the [`ControlAuthority`], and because the
//! service is one actor there is never more than one mutation in flight.
//!
//! Per tick: apply the queued directive, advance the simulation, settle
//! the ledger, assemble a snapshot, deliver it uplink, and queue whatever
//! directive the hub's response carries for the *next* tick. A failed or
//! timed-out uplink degrades the tick (logged, no directive) rather than
//! stalling the loop.

use crate::config::NodeConfig;
use crate::node::authority::{ControlAuthority, TickOutcome};
use crate::node::commands::NodeCommand;
use crate::node::events::{NodeEvent, TickSummary};
use crate::node::ports::{EventSink, UplinkPort};
use crate::sim::noise::NoiseSource;
use crate::telemetry::{
    Actuators, AntiGravity, Atmosphere, ComputerVision, ControlDirective, CropYield, EdgeSecurity,
    SmfcPower, SoilMoisture, TelemetrySnapshot, TinymlPredictions, Web3Ledger,
};

pub struct NodeService<U: UplinkPort, E: EventSink> {
    cfg: NodeConfig,
    authority: ControlAuthority,
    /// Directives accumulated since the last tick, applied at the next.
    pending: ControlDirective,
    tick_count: u64,
    uplink: U,
    sink: E,
}

impl<U: UplinkPort, E: EventSink> NodeService<U, E> {
    pub fn new(cfg: NodeConfig, noise: NoiseSource, uplink: U, mut sink: E) -> Self {
        sink.emit(&NodeEvent::Started {
            node_id: cfg.node_id.clone(),
        });
        Self {
            authority: ControlAuthority::new(&cfg, noise),
            pending: ControlDirective::default(),
            tick_count: 0,
            cfg,
            uplink,
            sink,
        }
    }

    /// Queue a command for the next tick. Called from the actor loop when
    /// the broker relay delivers a frame; never touches state directly.
    pub fn handle_command(&mut self, command: NodeCommand) {
        log::info!("NODE  | command received: {command:?}");
        self.pending.merge(&command.to_directive());
    }

    /// Run one control tick.
    pub async fn tick(&mut self) {
        self.tick_count += 1;

        let directive = core::mem::take(&mut self.pending);
        if !directive.is_empty() {
            self.authority.apply(&directive);
            self.sink.emit(&NodeEvent::DirectiveApplied(directive));
        }

        let outcome = self.authority.advance_tick();
        self.emit_tick_events(&outcome);

        let snapshot = self.build_snapshot(&outcome);
        match self.uplink.ingest(&snapshot).await {
            Ok(ack) => {
                if ack.force_pump {
                    self.pending.merge(&ControlDirective {
                        force_pump: true,
                        ..ControlDirective::default()
                    });
                }
            }
            Err(e) => {
                log::warn!("NODE  | uplink degraded, skipping directive: {e}");
                self.sink.emit(&NodeEvent::UplinkDegraded {
                    detail: e.to_string(),
                });
            }
        }
    }

    fn emit_tick_events(&mut self, outcome: &TickOutcome) {
        let state = self.authority.state();
        if outcome.pump_changed {
            self.sink.emit(&NodeEvent::PumpChanged {
                active: state.pump_active,
            });
        }
        if outcome.tokens_minted > 0 {
            self.sink.emit(&NodeEvent::TokensMinted {
                count: outcome.tokens_minted,
                total: state.tokens_minted,
            });
        }
        if outcome.readings.anomaly {
            self.sink.emit(&NodeEvent::AnomalyFlagged {
                inference_time_ms: outcome.readings.inference_time_ms,
            });
        }
        self.sink.emit(&NodeEvent::Telemetry(TickSummary {
            tick: self.tick_count,
            kalman_voltage: state.kalman_voltage,
            moisture_pct: outcome.readings.percentage,
            pump_active: state.pump_active,
            wilting_probability: outcome.readings.wilting_probability,
            water_saved_liters: state.water_saved_liters,
        }));
    }

    /// Assemble the full wire snapshot from the tick outcome. Timestamps
    /// are simulated time (tick count x interval); the hub re-stamps on
    /// arrival.
    fn build_snapshot(&self, outcome: &TickOutcome) -> TelemetrySnapshot {
        let state = self.authority.state();
        let r = &outcome.readings;
        TelemetrySnapshot {
            node_id: self.cfg.node_id.clone(),
            timestamp_ms: self.tick_count * self.cfg.tick_interval_ms,
            soil_moisture: SoilMoisture {
                raw_voltage: r.raw_voltage,
                kalman_filtered_v: state.kalman_voltage,
                percentage: r.percentage,
            },
            atmosphere: Atmosphere {
                temperature_c: r.temperature_c,
                humidity_pct: r.humidity_pct,
            },
            actuators: Actuators {
                pump_relay_active: state.pump_active,
                flow_pulses_counted: state.flow_pulse_count,
            },
            tinyml_predictions: TinymlPredictions {
                et_forecast_mm_day: r.et_forecast_mm_day,
                wilting_probability_24h: r.wilting_probability,
            },
            computer_vision: ComputerVision {
                status: r.vision_status.to_owned(),
                confidence: r.vision_confidence,
            },
            smfc_power: SmfcPower {
                raw_voltage_mv: r.smfc_mv,
                status: r.smfc_status.to_owned(),
            },
            web3_ledger: Web3Ledger {
                water_saved_liters: state.water_saved_liters,
                wct_tokens_minted: state.tokens_minted,
            },
            edge_security: EdgeSecurity {
                isolation_forest_anomaly: r.anomaly,
                inference_time_ms: r.inference_time_ms,
            },
            anti_gravity: AntiGravity {
                magnetic_field_ut: r.magnetic_field_ut,
                ultrasonic_array_active: state.array_enable,
                clinostat_rpm: r.clinostat_rpm,
            },
            crop_yield: CropYield {
                projected_yield_tha: r.projected_yield_tha,
                yield_increase_pct: r.yield_increase_pct,
            },
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &NodeConfig {
        &self.cfg
    }
}
