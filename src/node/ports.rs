//! Port traits — the boundary between the node core and the outside world.
//!
//! ```text
//!   NodeService (domain) ──▶ Port trait ──▶ Adapter
//! ```
//!
//! The [`NodeService`](super::service::NodeService) consumes these via
//! generics, so the core never touches a channel or socket directly and
//! the integration tests can drop in plain mock structs.

use crate::error::UplinkError;
use crate::node::events::NodeEvent;
use crate::telemetry::TelemetrySnapshot;

/// What the hub told us after accepting a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UplinkAck {
    /// A manual override is pending at the hub; energise the pump at the
    /// next tick. Delivered at most once per request.
    pub force_pump: bool,
}

/// Write-side port: delivers snapshots to the telemetry hub.
///
/// Implementations own the transport details, including the bounded
/// deadline — a slow hub must surface as [`UplinkError::Timeout`], never
/// as an unbounded await.
#[allow(async_fn_in_trait)]
pub trait UplinkPort {
    async fn ingest(&mut self, snapshot: &TelemetrySnapshot) -> Result<UplinkAck, UplinkError>;
}

/// The node core emits structured [`NodeEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &NodeEvent);
}
