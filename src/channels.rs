//! Inter-task communication channels.
//!
//! `embassy-sync` bounded MPMC channels bridge the broker relay, the hub
//! task, and the node control loop. All three tasks share these statics
//! without heap allocation for the channel itself.
//!
//! Requests from every client funnel into one channel; responses go back
//! over a per-client slot so that concurrent clients never consume each
//! other's frames.
//!
//! ```text
//! ┌──────────────┐  NodeCommand   ┌──────────────┐
//! │ broker relay │───────────────▶│  node loop   │
//! └──────────────┘                └──────┬───────┘
//!                                        │ HubRequestMsg
//! ┌──────────────┐◀───────────────────────┘
//! │   hub task   │  ResponseFrame
//! └──────────────┘───────────────▶ HUB_RESP_SLOTS[client_id]
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use crate::node::commands::NodeCommand;

/// Slot identifier for hub clients. The node's uplink is always slot 0;
/// auxiliary clients (CLI query tools, the overlay bridge) take higher
/// slots.
pub type ClientId = usize;

/// The node's uplink adapter occupies this slot.
pub const NODE_SLOT: ClientId = 0;

/// Number of response slots, and therefore the hard cap on concurrent
/// hub clients.
pub const MAX_CLIENTS: usize = 4;

/// Largest JSON request frame the hub channel will carry.
pub const MAX_FRAME: usize = 2048;

/// Largest response frame. Queries return up to a hundred full snapshots
/// in one frame, so this is much roomier than the request side.
pub const MAX_RESP_FRAME: usize = 65536;

/// Inbound request to the hub task.
pub struct HubRequestMsg {
    pub client_id: ClientId,
    /// Raw JSON request frame.
    pub frame: Vec<u8, MAX_FRAME>,
}

/// Raw JSON response frame.
pub type ResponseFrame = Vec<u8, MAX_RESP_FRAME>;

const COMMAND_DEPTH: usize = 8;
const HUB_DEPTH: usize = 4;

/// Decoded commands: broker relay -> node control loop.
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, NodeCommand, COMMAND_DEPTH> =
    Channel::new();

/// Requests: clients -> hub task.
pub static HUB_REQ_CHANNEL: Channel<CriticalSectionRawMutex, HubRequestMsg, HUB_DEPTH> =
    Channel::new();

type ResponseSlot = Channel<CriticalSectionRawMutex, ResponseFrame, HUB_DEPTH>;

/// Responses: hub task -> the issuing client. Each client receives only
/// from its own slot, so overlapping round trips cannot steal frames
/// from one another.
pub static HUB_RESP_SLOTS: [ResponseSlot; MAX_CLIENTS] = {
    const SLOT: ResponseSlot = Channel::new();
    [SLOT; MAX_CLIENTS]
};
