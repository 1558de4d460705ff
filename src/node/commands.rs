//! Inbound commands to the node service.
//!
//! These arrive as JSON frames on the shared command topic, e.g.
//! `{"action": "ROTATE_CLINOSTAT", "rpm": 45.0}`. Parsing is deliberately
//! forgiving: unknown actions are ignored, only unparseable frames are
//! errors.

use serde::Deserialize;

use crate::error::CommandParseError;
use crate::telemetry::ControlDirective;

/// Commands the outside world can send into the node core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeCommand {
    /// Energise the pump relay once, regardless of soil state.
    ForcePump,

    /// Override the clinostat rotation speed.
    RotateClinostat { rpm: f32 },

    /// Latch the 40 kHz ultrasonic levitation array on.
    EnableUltrasonicArray,
}

/// Raw command frame as published on the broker topic.
#[derive(Debug, Deserialize)]
struct CommandFrame<'a> {
    action: &'a str,
    rpm: Option<f32>,
}

/// Decode one broker frame.
///
/// Returns `Ok(None)` for well-formed frames whose action is not
/// recognized — those are someone else's traffic on a shared topic, not
/// a fault. `default_rpm` fills in `ROTATE_CLINOSTAT` frames that omit
/// the payload.
pub fn parse_command(raw: &[u8], default_rpm: f32) -> Result<Option<NodeCommand>, CommandParseError> {
    let text = core::str::from_utf8(raw).map_err(|_| CommandParseError::Utf8)?;
    let frame: CommandFrame<'_> = serde_json::from_str(text)?;
    let cmd = match frame.action {
        "FORCE_PUMP" => NodeCommand::ForcePump,
        "ROTATE_CLINOSTAT" => NodeCommand::RotateClinostat {
            rpm: frame.rpm.unwrap_or(default_rpm),
        },
        "ENABLE_40KHZ_ARRAY" => NodeCommand::EnableUltrasonicArray,
        other => {
            log::debug!("CMD   | ignoring unrecognized action {other:?}");
            return Ok(None);
        }
    };
    Ok(Some(cmd))
}

impl NodeCommand {
    /// Express this command as a directive for the control authority.
    pub fn to_directive(self) -> ControlDirective {
        match self {
            Self::ForcePump => ControlDirective {
                force_pump: true,
                ..ControlDirective::default()
            },
            Self::RotateClinostat { rpm } => ControlDirective {
                clinostat_rpm: Some(rpm),
                ..ControlDirective::default()
            },
            Self::EnableUltrasonicArray => ControlDirective {
                array_enable: true,
                ..ControlDirective::default()
            },
        }
    }
}
