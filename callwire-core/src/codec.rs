//! Entity codecs, codec errors and the configured signaling codec

use crate::signaling::{Message, MessageKind};
use crate::types::{
    CandidatesMessage, ConnectionAddress, DtlsFingerprint, FeedbackType, IceCandidate,
    InitialSetupMessage, MediaContent, MediaStateMessage, PayloadType, RtpExtension, SsrcGroup,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Default maximum signaling payload size (64KB)
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// Codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    /// Payload is not valid JSON
    #[error("Malformed payload: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Top-level value is not a JSON object
    #[error("Payload is not a JSON object")]
    NotAnObject,

    /// `@type` is absent
    #[error("Missing @type discriminant")]
    MissingDiscriminant,

    /// `@type` is present but not a string
    #[error("@type discriminant is not a string")]
    DiscriminantNotString,

    /// `@type` names no known message kind
    #[error("Unknown message kind: {0}")]
    UnknownDiscriminant(String),

    /// Message body does not match its schema
    #[error("Invalid {kind} message: {source}")]
    InvalidBody {
        /// Kind named by the discriminant
        kind: MessageKind,
        /// Underlying schema error
        source: serde_json::Error,
    },

    /// A standalone entity object does not match its schema
    #[error("Invalid entity: {0}")]
    InvalidEntity(#[source] serde_json::Error),

    /// Serialization failed
    #[error("Encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Payload exceeds the configured limit
    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Actual size in bytes
        size: usize,
        /// Configured maximum
        max: usize,
    },
}

/// Codec result type
pub type Result<T> = std::result::Result<T, CodecError>;

/// Bidirectional mapping between an entity and its JSON object form
pub trait WireObject: Serialize + DeserializeOwned {
    /// Serialize into a JSON object
    ///
    /// # Errors
    ///
    /// Returns error if the entity does not serialize to an object
    fn to_object(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self).map_err(CodecError::Encode)? {
            Value::Object(object) => Ok(object),
            _ => Err(CodecError::NotAnObject),
        }
    }

    /// Parse from a JSON object
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns error if a required field is missing, a field has the wrong
    /// type, or any nested element fails to parse
    fn from_object(object: Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(object)).map_err(CodecError::InvalidEntity)
    }
}

impl WireObject for ConnectionAddress {}
impl WireObject for DtlsFingerprint {}
impl WireObject for IceCandidate {}
impl WireObject for SsrcGroup {}
impl WireObject for FeedbackType {}
impl WireObject for RtpExtension {}
impl WireObject for PayloadType {}
impl WireObject for MediaContent {}
impl WireObject for InitialSetupMessage {}
impl WireObject for CandidatesMessage {}
impl WireObject for MediaStateMessage {}

/// Codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CodecConfig {
    /// Largest payload accepted or produced, in bytes
    pub max_payload_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }
}

impl CodecConfig {
    /// Set the maximum payload size
    #[must_use]
    pub fn with_max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }
}

/// Signaling codec with payload size enforcement
///
/// Wraps [`Message::to_bytes`] and [`Message::from_bytes`], rejecting payloads
/// larger than [`CodecConfig::max_payload_size`] in either direction. Oversized
/// input is refused before any parsing takes place.
#[derive(Debug, Clone, Default)]
pub struct SignalingCodec {
    config: CodecConfig,
}

impl SignalingCodec {
    /// Create a codec with the given configuration
    #[must_use]
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Get codec configuration
    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a message into a wire payload
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails or the payload exceeds the limit
    #[tracing::instrument(skip(self, message), fields(kind = %message.kind()))]
    pub fn encode(&self, message: &Message) -> Result<Bytes> {
        let payload = message.to_bytes()?;
        self.check_size(payload.len())?;
        tracing::debug!(size = payload.len(), "Encoded signaling message");
        Ok(Bytes::from(payload))
    }

    /// Decode a wire payload into a message
    ///
    /// # Errors
    ///
    /// Returns error if the payload exceeds the limit or fails to parse
    #[tracing::instrument(skip(self, payload), fields(size = payload.len()))]
    pub fn decode(&self, payload: &[u8]) -> Result<Message> {
        let result = self
            .check_size(payload.len())
            .and_then(|()| Message::from_bytes(payload));
        match &result {
            Ok(message) => tracing::debug!(kind = %message.kind(), "Decoded signaling message"),
            Err(e) => tracing::debug!(error = %e, "Rejected signaling payload"),
        }
        result
    }

    fn check_size(&self, size: usize) -> Result<()> {
        let max = self.config.max_payload_size;
        if size > max {
            return Err(CodecError::PayloadTooLarge { size, max });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::VideoState;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(object) => object,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_connection_address_object() {
        let address = ConnectionAddress::new("127.0.0.1", 9000);
        let obj = address.to_object().unwrap();
        assert_eq!(Value::Object(obj.clone()), json!({"ip": "127.0.0.1", "port": 9000}));
        assert_eq!(ConnectionAddress::from_object(obj).unwrap(), address);
    }

    #[test]
    fn test_connection_address_wrong_types() {
        let result = ConnectionAddress::from_object(object(json!({"ip": 1, "port": 9000})));
        assert!(matches!(result, Err(CodecError::InvalidEntity(_))));

        let result = ConnectionAddress::from_object(object(json!({"ip": "::1", "port": "9000"})));
        assert!(result.is_err());

        let result = ConnectionAddress::from_object(object(json!({"ip": "::1"})));
        assert!(result.is_err());
    }

    #[test]
    fn test_dtls_fingerprint_requires_all_fields() {
        let full = json!({"hash": "sha-256", "setup": "active", "fingerprint": "AA:BB"});
        assert!(DtlsFingerprint::from_object(object(full)).is_ok());

        for missing in ["hash", "setup", "fingerprint"] {
            let mut obj = object(json!({"hash": "sha-256", "setup": "active", "fingerprint": "AA:BB"}));
            obj.remove(missing);
            assert!(DtlsFingerprint::from_object(obj).is_err(), "{missing}");
        }
    }

    #[test]
    fn test_ssrc_group_zero_rejected() {
        let good = object(json!({"semantics": "FID", "ssrcs": ["1", "2"]}));
        assert_eq!(
            SsrcGroup::from_object(good).unwrap(),
            SsrcGroup::new("FID", vec![1, 2])
        );

        let zero = object(json!({"semantics": "FID", "ssrcs": ["1", "0"]}));
        assert!(SsrcGroup::from_object(zero).is_err());

        let junk = object(json!({"semantics": "SIM", "ssrcs": ["video"]}));
        assert!(SsrcGroup::from_object(junk).is_err());
    }

    #[test]
    fn test_media_content_zero_ssrc_accepted() {
        let content = MediaContent::from_object(object(json!({"ssrc": "0", "rtpExtensions": []})))
            .unwrap();
        assert_eq!(content.ssrc, 0);
    }

    #[test]
    fn test_feedback_type_and_rtp_extension() {
        let feedback = FeedbackType::new("nack", "pli");
        let obj = feedback.to_object().unwrap();
        assert_eq!(Value::Object(obj.clone()), json!({"type": "nack", "subtype": "pli"}));
        assert_eq!(FeedbackType::from_object(obj).unwrap(), feedback);

        let extension = RtpExtension::new(3, "urn:ietf:params:rtp-hdrext:ssrc-audio-level");
        let obj = extension.to_object().unwrap();
        assert_eq!(RtpExtension::from_object(obj).unwrap(), extension);

        let result = RtpExtension::from_object(object(json!({"id": "3", "uri": "x"})));
        assert!(result.is_err());
    }

    #[test]
    fn test_payload_type_bad_feedback_element_fails() {
        let result = PayloadType::from_object(object(json!({
            "id": 96,
            "name": "VP8",
            "clockrate": 90000,
            "feedbackTypes": [{"type": "nack", "subtype": ""}, {"type": "ccm"}]
        })));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let obj = object(json!({
            "ssrc": "7",
            "futureField": {"nested": true},
            "rtpExtensions": [{"id": 1, "uri": "u", "extra": 5}]
        }));
        let content = MediaContent::from_object(obj).unwrap();
        assert_eq!(content.ssrc, 7);
        assert_eq!(content.rtp_extensions, vec![RtpExtension::new(1, "u")]);
    }

    #[test]
    fn test_media_state_object() {
        let state = MediaStateMessage {
            is_muted: true,
            video_state: VideoState::Suspended,
            is_battery_low: false,
        };
        let obj = state.to_object().unwrap();
        assert_eq!(
            Value::Object(obj.clone()),
            json!({"muted": true, "videoState": "suspended", "lowBattery": false})
        );
        assert_eq!(MediaStateMessage::from_object(obj).unwrap(), state);
    }

    #[test]
    fn test_codec_default_config() {
        let codec = SignalingCodec::default();
        assert_eq!(codec.config().max_payload_size, DEFAULT_MAX_PAYLOAD_SIZE);
    }

    #[test]
    fn test_codec_encode_decode() {
        let codec = SignalingCodec::default();
        let message = Message::from(MediaStateMessage {
            is_muted: true,
            ..MediaStateMessage::default()
        });
        let payload = codec.encode(&message).unwrap();
        assert_eq!(codec.decode(&payload).unwrap(), message);
    }

    #[test]
    fn test_codec_rejects_oversized_input() {
        let codec = SignalingCodec::new(CodecConfig::default().with_max_payload_size(16));
        let payload = br#"{"@type":"MediaState","muted":true}"#;
        let result = codec.decode(payload);
        assert!(matches!(
            result,
            Err(CodecError::PayloadTooLarge { size, max: 16 }) if size == payload.len()
        ));
    }

    #[test]
    fn test_codec_rejects_oversized_output() {
        let codec = SignalingCodec::new(CodecConfig::default().with_max_payload_size(8));
        let message = Message::from(MediaStateMessage::default());
        assert!(matches!(
            codec.encode(&message),
            Err(CodecError::PayloadTooLarge { max: 8, .. })
        ));
    }

    #[test]
    fn test_codec_config_from_json() {
        let config: CodecConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CodecConfig::default());

        let config: CodecConfig = serde_json::from_str(r#"{"max_payload_size": 1024}"#).unwrap();
        assert_eq!(config.max_payload_size, 1024);
    }
}
