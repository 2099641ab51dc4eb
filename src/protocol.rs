//! Messages posted from the inner frame to the outer shell.
//!
//! On the wire every message is a JSON string `{"command_type": n, "data": ...}`.
//! `version` and `seq` are optional additions; envelopes without them decode
//! as version 1 and bypass sequencing.

use crate::error::{PlayerError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const PROTOCOL_VERSION: u32 = 1;
pub const DEFAULT_PLAYLIST_NAME: &str = "Individual Track";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    SetQueue,
    SetPageTitle,
    Navigate,
    GoBack,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::SetQueue,
        CommandKind::SetPageTitle,
        CommandKind::Navigate,
        CommandKind::GoBack,
    ];

    pub fn code(self) -> u8 {
        match self {
            Self::SetQueue => 1,
            Self::SetPageTitle => 2,
            Self::Navigate => 3,
            Self::GoBack => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| i64::from(kind.code()) == code)
    }

    fn index(self) -> usize {
        self.code() as usize - 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueRequest {
    #[serde(default = "default_playlist_name")]
    pub playlist_name: String,
    #[serde(deserialize_with = "ids_from_strings_or_numbers")]
    pub ids: Vec<String>,
    #[serde(default)]
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameCommand {
    SetQueue(QueueRequest),
    SetPageTitle(String),
    Navigate(String),
    GoBack,
}

impl FrameCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::SetQueue(_) => CommandKind::SetQueue,
            Self::SetPageTitle(_) => CommandKind::SetPageTitle,
            Self::Navigate(_) => CommandKind::Navigate,
            Self::GoBack => CommandKind::GoBack,
        }
    }
}

/// A decoded message plus its optional ordering stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMessage {
    pub command: FrameCommand,
    pub seq: Option<u64>,
}

impl FrameMessage {
    pub fn new(command: FrameCommand) -> Self {
        Self { command, seq: None }
    }

    pub fn with_seq(command: FrameCommand, seq: u64) -> Self {
        Self {
            command,
            seq: Some(seq),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireEnvelope {
    command_type: i64,
    #[serde(default)]
    data: Value,
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seq: Option<u64>,
}

pub fn encode(message: &FrameMessage) -> Result<String> {
    let data = match &message.command {
        FrameCommand::SetQueue(request) => serde_json::to_value(request)?,
        FrameCommand::SetPageTitle(title) => Value::String(title.clone()),
        FrameCommand::Navigate(location) => Value::String(location.clone()),
        FrameCommand::GoBack => Value::Null,
    };
    let envelope = WireEnvelope {
        command_type: i64::from(message.command.kind().code()),
        data,
        version: PROTOCOL_VERSION,
        seq: message.seq,
    };
    Ok(serde_json::to_string(&envelope)?)
}

pub fn decode(raw: &str) -> Result<FrameMessage> {
    let envelope: WireEnvelope = serde_json::from_str(raw)
        .map_err(|e| PlayerError::protocol(format!("malformed envelope: {e}")))?;

    if envelope.version > PROTOCOL_VERSION {
        return Err(PlayerError::protocol(format!(
            "unsupported version {}",
            envelope.version
        )));
    }

    let kind = CommandKind::from_code(envelope.command_type).ok_or_else(|| {
        PlayerError::protocol(format!("unknown command type {}", envelope.command_type))
    })?;

    let command = match kind {
        CommandKind::SetQueue => {
            let request: QueueRequest = serde_json::from_value(envelope.data)
                .map_err(|e| PlayerError::protocol(format!("bad set-queue payload: {e}")))?;
            FrameCommand::SetQueue(request)
        }
        CommandKind::SetPageTitle => FrameCommand::SetPageTitle(expect_string(kind, envelope.data)?),
        CommandKind::Navigate => FrameCommand::Navigate(expect_string(kind, envelope.data)?),
        CommandKind::GoBack => FrameCommand::GoBack,
    };

    Ok(FrameMessage {
        command,
        seq: envelope.seq,
    })
}

fn expect_string(kind: CommandKind, data: Value) -> Result<String> {
    match data {
        Value::String(text) => Ok(text),
        other => Err(PlayerError::protocol(format!(
            "command type {} expects a string, got {other}",
            kind.code()
        ))),
    }
}

/// Drops a sequenced message when a newer one of the same kind was applied.
#[derive(Debug, Default, Clone)]
pub struct SequenceGate {
    latest: [Option<u64>; 4],
}

impl SequenceGate {
    pub fn admit(&mut self, message: &FrameMessage) -> bool {
        let Some(seq) = message.seq else {
            return true;
        };
        let slot = &mut self.latest[message.command.kind().index()];
        match *slot {
            Some(latest) if seq <= latest => false,
            _ => {
                *slot = Some(seq);
                true
            }
        }
    }
}

fn default_playlist_name() -> String {
    DEFAULT_PLAYLIST_NAME.to_string()
}

fn default_version() -> u32 {
    PROTOCOL_VERSION
}

fn ids_from_strings_or_numbers<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    values
        .into_iter()
        .map(|value| match value {
            Value::String(text) => Ok(text),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "track ids must be strings or numbers, got {other}"
            ))),
        })
        .collect()
}
