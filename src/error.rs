//! Unified error types for the AgriNode crate.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the control loop's error handling uniform. No error here is fatal to
//! the tick loop: uplink failures degrade to a skipped directive, command
//! parse failures drop the message.

#![allow(dead_code)] // Top-level funnel variants reserved for typed returns across task boundaries

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the node funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// The uplink to the telemetry hub failed.
    Uplink(UplinkError),
    /// A command-channel message could not be parsed.
    Command(CommandParseError),
    /// A hub request failed on the hub side.
    Hub(HubError),
    /// Configuration is invalid or could not be loaded.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uplink(e) => write!(f, "uplink: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Hub(e) => write!(f, "hub: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Uplink errors
// ---------------------------------------------------------------------------

/// Failures of the ingest round trip from the node to the hub.
#[derive(Debug)]
pub enum UplinkError {
    /// The hub did not answer within the configured deadline.
    Timeout,
    /// The request could not be queued (hub task gone or backlogged).
    ChannelFull,
    /// The hub answered with something other than an ingest response.
    BadResponse,
    /// The snapshot could not be serialized for transmission.
    Encode(serde_json::Error),
    /// The serialized request does not fit a channel frame.
    Oversize(usize),
}

impl fmt::Display for UplinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "ingest round trip timed out"),
            Self::ChannelFull => write!(f, "request channel full"),
            Self::BadResponse => write!(f, "unexpected hub response"),
            Self::Encode(e) => write!(f, "snapshot encode failed: {e}"),
            Self::Oversize(n) => write!(f, "request of {n} bytes exceeds frame capacity"),
        }
    }
}

impl From<UplinkError> for Error {
    fn from(e: UplinkError) -> Self {
        Self::Uplink(e)
    }
}

// ---------------------------------------------------------------------------
// Command parse errors
// ---------------------------------------------------------------------------

/// Failures while decoding a command-channel message.
///
/// Unrecognized *actions* are not errors — they are silently ignored.
/// These variants cover payloads that are not valid command JSON at all.
#[derive(Debug)]
pub enum CommandParseError {
    /// The payload is not valid JSON or lacks the `action` field.
    Json(serde_json::Error),
    /// The payload is not valid UTF-8.
    Utf8,
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "invalid command JSON: {e}"),
            Self::Utf8 => write!(f, "command payload is not UTF-8"),
        }
    }
}

impl From<serde_json::Error> for CommandParseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<CommandParseError> for Error {
    fn from(e: CommandParseError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Hub errors
// ---------------------------------------------------------------------------

/// Failures surfaced to hub clients.
///
/// `Unavailable` is distinct from an empty store: an empty store answers a
/// query with the `NO_DATA` placeholder record, not an error.
#[derive(Debug)]
pub enum HubError {
    /// The hub task is unreachable (channel closed or deadline passed).
    Unavailable,
    /// The request frame could not be decoded.
    BadRequest(String),
}

impl fmt::Display for HubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "hub unreachable"),
            Self::BadRequest(msg) => write!(f, "bad request: {msg}"),
        }
    }
}

impl From<HubError> for Error {
    fn from(e: HubError) -> Self {
        Self::Hub(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
