//! Adapters binding the node core's ports to concrete transports.

pub mod log_sink;
pub mod uplink;
