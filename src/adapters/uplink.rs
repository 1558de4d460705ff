//! Channel-backed uplink adapter.
//!
//! Implements [`UplinkPort`] over the static hub request/response
//! channels, standing in for the HTTP POST a fielded node would make.
//! The bounded deadline lives here: a hub that stops answering surfaces
//! as [`UplinkError::Timeout`] and the control loop moves on.

use embassy_time::{with_timeout, Duration};
use serde_json::json;

use crate::channels::{ClientId, HubRequestMsg, HUB_REQ_CHANNEL, HUB_RESP_SLOTS, MAX_CLIENTS};
use crate::error::{HubError, UplinkError};
use crate::hub::engine::{HubResponse, OverlayStatus, QueryResponse};
use crate::node::ports::{UplinkAck, UplinkPort};
use crate::telemetry::TelemetrySnapshot;

pub struct HubChannelClient {
    client_id: ClientId,
    deadline: Duration,
}

impl HubChannelClient {
    pub fn new(client_id: ClientId, timeout_ms: u64) -> Self {
        assert!(client_id < MAX_CLIENTS, "no response slot for client {client_id}");
        Self {
            client_id,
            deadline: Duration::from_millis(timeout_ms),
        }
    }
}

impl UplinkPort for HubChannelClient {
    async fn ingest(&mut self, snapshot: &TelemetrySnapshot) -> Result<UplinkAck, UplinkError> {
        let request = json!({ "op": "ingest", "snapshot": snapshot });
        let bytes = serde_json::to_vec(&request).map_err(UplinkError::Encode)?;
        let frame =
            heapless::Vec::from_slice(&bytes).map_err(|()| UplinkError::Oversize(bytes.len()))?;
        HUB_REQ_CHANNEL
            .try_send(HubRequestMsg {
                client_id: self.client_id,
                frame,
            })
            .map_err(|_| UplinkError::ChannelFull)?;

        let frame = with_timeout(self.deadline, HUB_RESP_SLOTS[self.client_id].receive())
            .await
            .map_err(|_| UplinkError::Timeout)?;
        let response: HubResponse =
            serde_json::from_slice(&frame).map_err(|_| UplinkError::BadResponse)?;
        match response {
            HubResponse::Ingest(ack) => Ok(UplinkAck {
                force_pump: ack.force_pump,
            }),
            _ => Err(UplinkError::BadResponse),
        }
    }
}

/// Read-side hub client, as used by the dashboard poller and the AR
/// overlay bridge. A hub that does not answer within the deadline
/// surfaces as [`HubError::Unavailable`] — distinct from an empty store,
/// which still answers with the placeholder record.
pub struct HubQueryClient {
    client_id: ClientId,
    deadline: Duration,
}

impl HubQueryClient {
    pub fn new(client_id: ClientId, timeout_ms: u64) -> Self {
        assert!(client_id < MAX_CLIENTS, "no response slot for client {client_id}");
        Self {
            client_id,
            deadline: Duration::from_millis(timeout_ms),
        }
    }

    /// Recent records, newest first.
    pub async fn query(&mut self, limit: Option<usize>) -> Result<QueryResponse, HubError> {
        match self.round_trip(json!({ "op": "query", "limit": limit })).await? {
            HubResponse::Query(q) => Ok(q),
            HubResponse::Error { message } => Err(HubError::BadRequest(message)),
            _ => Err(HubError::Unavailable),
        }
    }

    /// Single-node subset readout for the AR overlay.
    pub async fn status(&mut self) -> Result<OverlayStatus, HubError> {
        match self.round_trip(json!({ "op": "status" })).await? {
            HubResponse::Status(s) => Ok(s),
            HubResponse::Error { message } => Err(HubError::BadRequest(message)),
            _ => Err(HubError::Unavailable),
        }
    }

    /// Arm the manual pump override; it rides back on the next ingest.
    pub async fn force_pump(&mut self) -> Result<(), HubError> {
        match self.round_trip(json!({ "op": "force_pump" })).await? {
            HubResponse::Ack { .. } => Ok(()),
            HubResponse::Error { message } => Err(HubError::BadRequest(message)),
            _ => Err(HubError::Unavailable),
        }
    }

    async fn round_trip(&mut self, request: serde_json::Value) -> Result<HubResponse, HubError> {
        let bytes =
            serde_json::to_vec(&request).map_err(|e| HubError::BadRequest(e.to_string()))?;
        let frame = heapless::Vec::from_slice(&bytes)
            .map_err(|()| HubError::BadRequest("request exceeds frame capacity".to_owned()))?;
        HUB_REQ_CHANNEL
            .try_send(HubRequestMsg {
                client_id: self.client_id,
                frame,
            })
            .map_err(|_| HubError::Unavailable)?;
        let frame = with_timeout(self.deadline, HUB_RESP_SLOTS[self.client_id].receive())
            .await
            .map_err(|_| HubError::Unavailable)?;
        serde_json::from_slice(&frame).map_err(|_| HubError::Unavailable)
    }
}
