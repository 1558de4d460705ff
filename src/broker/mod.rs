//! In-process command broker.
//!
//! One shared publish/subscribe topic carries raw JSON command frames.
//! Anything may publish (the hub's manual-override path, a CLI, a test);
//! the relay task is the topic's consumer on the node side — it decodes
//! frames and forwards recognized commands to the control loop, entirely
//! decoupled from tick cadence.
//!
//! Bad input never kills the relay: malformed frames are logged and
//! dropped, unknown actions are ignored, and falling behind the bus only
//! costs the lagged frames.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pubsub::{PubSubChannel, WaitResult};
use heapless::Vec;

use crate::channels::COMMAND_CHANNEL;
use crate::node::commands::parse_command;

/// Largest command frame the bus will carry.
pub const MAX_CMD_FRAME: usize = 256;

const BUS_CAP: usize = 8;
const BUS_SUBS: usize = 2;
const BUS_PUBS: usize = 2;

/// The shared command topic.
pub static COMMAND_BUS: PubSubChannel<
    CriticalSectionRawMutex,
    Vec<u8, MAX_CMD_FRAME>,
    BUS_CAP,
    BUS_SUBS,
    BUS_PUBS,
> = PubSubChannel::new();

/// Publish one raw frame onto the command topic. Oversize frames are
/// dropped with a log line; publication itself cannot fail.
pub fn publish_raw(payload: &[u8]) {
    let Ok(frame) = Vec::from_slice(payload) else {
        log::warn!(
            "BUS   | dropping oversize command frame ({} > {MAX_CMD_FRAME} bytes)",
            payload.len()
        );
        return;
    };
    COMMAND_BUS.immediate_publisher().publish_immediate(frame);
}

/// Topic consumer: decode frames and hand commands to the control loop.
pub async fn command_relay_task(topic: String, default_rpm: f32) {
    let mut sub = match COMMAND_BUS.subscriber() {
        Ok(s) => s,
        Err(e) => {
            log::error!("BUS   | no subscriber slot left on {topic}: {e:?}");
            return;
        }
    };
    log::info!("BUS   | relay subscribed to {topic}");
    loop {
        match sub.next_message().await {
            WaitResult::Lagged(n) => {
                log::warn!("BUS   | relay lagged, {n} frames lost on {topic}");
            }
            WaitResult::Message(frame) => match parse_command(&frame, default_rpm) {
                Ok(Some(cmd)) => COMMAND_CHANNEL.send(cmd).await,
                Ok(None) => {}
                Err(e) => log::warn!("BUS   | dropping malformed frame: {e}"),
            },
        }
    }
}
