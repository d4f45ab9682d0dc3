//! Signaling message envelope
//!
//! Every payload is a JSON object whose `@type` key names one of three message
//! kinds. The remaining keys form the body of that kind. Unknown kinds are
//! always rejected so both peers agree on whether a message was handled.

use crate::codec::{CodecError, Result};
use crate::types::{CandidatesMessage, InitialSetupMessage, MediaStateMessage};
use serde::de::{DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Wire key of the message discriminant
pub const TYPE_KEY: &str = "@type";

/// Signaling message
///
/// Exactly one kind is active; the `@type` discriminant written on the wire is
/// always the variant name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum Message {
    /// ICE credentials, DTLS fingerprints and media descriptions
    InitialSetup(InitialSetupMessage),
    /// Trickled ICE candidates
    Candidates(CandidatesMessage),
    /// Mute, video and battery state
    MediaState(MediaStateMessage),
}

/// Discriminant of a [`Message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// `InitialSetup`
    InitialSetup,
    /// `Candidates`
    Candidates,
    /// `MediaState`
    MediaState,
}

impl MessageKind {
    /// All message kinds
    pub const ALL: [MessageKind; 3] = [Self::InitialSetup, Self::Candidates, Self::MediaState];

    /// Wire value of the `@type` discriminant
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialSetup => "InitialSetup",
            Self::Candidates => "Candidates",
            Self::MediaState => "MediaState",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = CodecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CodecError::UnknownDiscriminant(s.to_string()))
    }
}

impl Message {
    /// Get the message kind
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::InitialSetup(_) => MessageKind::InitialSetup,
            Self::Candidates(_) => MessageKind::Candidates,
            Self::MediaState(_) => MessageKind::MediaState,
        }
    }

    /// Serialize into a compact UTF-8 JSON payload
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(CodecError::Encode)
    }

    /// Parse a wire payload
    ///
    /// # Errors
    ///
    /// Returns error if the payload is not a JSON object, the discriminant is
    /// missing or unknown, or the body fails its schema
    pub fn from_bytes(payload: &[u8]) -> Result<Self> {
        let result = Self::decode(payload);
        if let Err(e) = &result {
            tracing::trace!(error = %e, size = payload.len(), "Signaling payload rejected");
        }
        result
    }

    /// Parse a wire payload, discarding the failure reason
    #[must_use]
    pub fn parse(payload: &[u8]) -> Option<Self> {
        Self::from_bytes(payload).ok()
    }

    fn decode(payload: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(payload).map_err(|e| {
            if e.is_data() {
                CodecError::NotAnObject
            } else {
                CodecError::Malformed(e)
            }
        })?;

        let kind = match envelope.kind {
            None => return Err(CodecError::MissingDiscriminant),
            Some(Value::String(kind)) => kind.parse::<MessageKind>()?,
            Some(_) => return Err(CodecError::DiscriminantNotString),
        };

        // The body structs skip `@type` like any other unknown key, so a
        // repeated discriminant resolves to the last one as the scan did
        let message = match kind {
            MessageKind::InitialSetup => decode_body(payload).map(Self::InitialSetup),
            MessageKind::Candidates => decode_body(payload).map(Self::Candidates),
            MessageKind::MediaState => decode_body(payload).map(Self::MediaState),
        };
        message.map_err(|source| CodecError::InvalidBody { kind, source })
    }
}

fn decode_body<T: DeserializeOwned>(payload: &[u8]) -> serde_json::Result<T> {
    serde_json::from_slice(payload)
}

impl From<InitialSetupMessage> for Message {
    fn from(message: InitialSetupMessage) -> Self {
        Self::InitialSetup(message)
    }
}

impl From<CandidatesMessage> for Message {
    fn from(message: CandidatesMessage) -> Self {
        Self::Candidates(message)
    }
}

impl From<MediaStateMessage> for Message {
    fn from(message: MediaStateMessage) -> Self {
        Self::MediaState(message)
    }
}

/// Top-level object scan that keeps only the discriminant
///
/// Accepts JSON objects only; arrays and scalars are data errors.
struct Envelope {
    kind: Option<Value>,
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EnvelopeVisitor;

        impl<'de> Visitor<'de> for EnvelopeVisitor {
            type Value = Envelope;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a signaling message object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut kind = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == TYPE_KEY {
                        kind = Some(map.next_value::<Value>()?);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(Envelope { kind })
            }
        }

        deserializer.deserialize_map(EnvelopeVisitor)
    }
}
