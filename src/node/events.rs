//! Outbound node events.
//!
//! The [`NodeService`](super::service::NodeService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters decide what
//! to do with them; the default one writes the log lines the field
//! technicians grep for.

use crate::telemetry::ControlDirective;

/// Structured events emitted by the node core.
#[derive(Debug, Clone)]
pub enum NodeEvent {
    /// The service started with the given node id.
    Started { node_id: String },

    /// Per-tick summary of the readings that matter operationally.
    Telemetry(TickSummary),

    /// A merged directive was applied ahead of a tick.
    DirectiveApplied(ControlDirective),

    /// The pump relay changed state during a tick.
    PumpChanged { active: bool },

    /// The ledger minted conservation tokens at settlement.
    TokensMinted { count: u64, total: u64 },

    /// The security model flagged this tick as anomalous.
    AnomalyFlagged { inference_time_ms: f32 },

    /// The ingest round trip failed; the tick proceeded without a
    /// hub directive.
    UplinkDegraded { detail: String },
}

/// Compact per-tick readout for logging and diagnostics.
#[derive(Debug, Clone)]
pub struct TickSummary {
    pub tick: u64,
    pub kalman_voltage: f32,
    pub moisture_pct: f32,
    pub pump_active: bool,
    pub wilting_probability: f32,
    pub water_saved_liters: f32,
}
