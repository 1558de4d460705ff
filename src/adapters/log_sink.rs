//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured node events to the
//! logger. A future MQTT or dashboard adapter would implement the same
//! trait.

use log::{info, warn};

use crate::node::events::NodeEvent;
use crate::node::ports::EventSink;

/// Adapter that logs every [`NodeEvent`] to the console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &NodeEvent) {
        match event {
            NodeEvent::Telemetry(t) => {
                info!(
                    "TELEM | tick={} | soil={:.2}V ({:.1}%) | pump={} | \
                     wilting={:.1}% | saved={:.1}L",
                    t.tick,
                    t.kalman_voltage,
                    t.moisture_pct,
                    if t.pump_active { "ON" } else { "off" },
                    t.wilting_probability,
                    t.water_saved_liters,
                );
            }
            NodeEvent::Started { node_id } => {
                info!("START | node_id={node_id}");
            }
            NodeEvent::DirectiveApplied(d) => {
                info!(
                    "CTRL  | directive applied: force_pump={} array={} rpm={:?}",
                    d.force_pump, d.array_enable, d.clinostat_rpm,
                );
            }
            NodeEvent::PumpChanged { active } => {
                info!("PUMP  | relay {}", if *active { "energised" } else { "released" });
            }
            NodeEvent::TokensMinted { count, total } => {
                info!("WEB3  | +{count} WCT minted (lifetime {total})");
            }
            NodeEvent::AnomalyFlagged { inference_time_ms } => {
                warn!("SEC   | isolation forest anomaly, inference {inference_time_ms:.1}ms");
            }
            NodeEvent::UplinkDegraded { detail } => {
                warn!("UPLINK| degraded: {detail}");
            }
        }
    }
}
