//! The edge node's application core.
//!
//! ```text
//!   broker task ──▶ NodeCommand ──▶ NodeService ──▶ UplinkPort ──▶ hub
//!                                       │
//!                                       └──▶ EventSink (log, ...)
//! ```
//!
//! [`service::NodeService`] is the single actor that owns all mutable
//! state; ticks and commands are serialized through it, so nothing in
//! here needs a lock.

pub mod authority;
pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
