//! Signaling data model
//!
//! Every entity is a plain value type. Field names follow Rust conventions;
//! the serde attributes carry the wire names and the per-field schema rules
//! (required, optional, decimal-string, native-number, never-null).

use crate::numeric;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Field-level schema helpers used through `deserialize_with`
mod wire {
    use serde::de::value::MapAccessDeserializer;
    use serde::de::{self, MapAccess, Visitor};
    use serde::{Deserialize, Deserializer};
    use std::fmt;
    use std::marker::PhantomData;

    /// Value that must arrive as a JSON object
    ///
    /// Derived struct impls also accept arrays, which the wire format never
    /// allows in place of an entity.
    struct Object<T>(T);

    impl<'de, T> Deserialize<'de> for Object<T>
    where
        T: Deserialize<'de>,
    {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct ObjectVisitor<T>(PhantomData<T>);

            impl<'de, T> Visitor<'de> for ObjectVisitor<T>
            where
                T: Deserialize<'de>,
            {
                type Value = T;

                fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                    formatter.write_str("a JSON object")
                }

                fn visit_map<A>(self, map: A) -> Result<T, A::Error>
                where
                    A: MapAccess<'de>,
                {
                    T::deserialize(MapAccessDeserializer::new(map))
                }
            }

            deserializer
                .deserialize_map(ObjectVisitor(PhantomData))
                .map(Object)
        }
    }

    /// Required entity field
    pub fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Object::<T>::deserialize(deserializer).map(|Object(value)| value)
    }

    /// Optional entity field: absent is `None`, present must be an object
    ///
    /// Pair with `#[serde(default)]`.
    pub fn optional_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        object(deserializer).map(Some)
    }

    /// Array of entities, each an object
    pub fn objects<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        let items = Vec::<Object<T>>::deserialize(deserializer)?;
        Ok(items.into_iter().map(|Object(value)| value).collect())
    }

    /// Integer field types a JSON number converts into
    pub trait WireInt: Sized {
        /// Keep the low bits of `value` that fit this type
        fn wrap(value: i64) -> Self;
    }

    macro_rules! wire_int {
        ($($ty:ty),*) => {
            $(impl WireInt for $ty {
                fn wrap(value: i64) -> Self {
                    value as Self
                }
            })*
        };
    }

    wire_int!(i32, u16, u32);

    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a JSON number")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            Ok(value as i64)
        }

        // Truncates toward zero; out-of-range values saturate, NaN is 0
        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
            Ok(value as i64)
        }
    }

    /// Native-number integer field
    ///
    /// Any JSON number is accepted: fractions truncate toward zero and the
    /// result wraps to the field's width. Non-numbers are type errors.
    pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: WireInt,
    {
        deserializer.deserialize_any(NumberVisitor).map(T::wrap)
    }

    /// Optional native-number field: absent is `None`, `null` is a type error
    ///
    /// Pair with `#[serde(default)]`.
    pub fn optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: WireInt,
    {
        number(deserializer).map(Some)
    }

    /// Codec parameters: a JSON object of string values, kept as ordered pairs
    ///
    /// Wire order is preserved, and so are repeated keys when the payload is
    /// decoded straight from bytes.
    pub mod parameters {
        use serde::de::{MapAccess, Visitor};
        use serde::{Deserializer, Serializer};
        use std::fmt;

        pub fn serialize<S>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_map(pairs.iter().map(|(key, value)| (key, value)))
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct ParametersVisitor;

            impl<'de> Visitor<'de> for ParametersVisitor {
                type Value = Vec<(String, String)>;

                fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                    formatter.write_str("an object mapping parameter names to string values")
                }

                fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
                where
                    A: MapAccess<'de>,
                {
                    let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                    while let Some((key, value)) = map.next_entry::<String, String>()? {
                        pairs.push((key, value));
                    }
                    Ok(pairs)
                }
            }

            deserializer.deserialize_map(ParametersVisitor)
        }
    }
}

/// Transport address of an ICE candidate
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionAddress {
    /// IP address or hostname
    pub ip: String,
    /// Port, conventionally 0-65535 (not enforced)
    #[serde(deserialize_with = "wire::number")]
    pub port: i32,
}

impl ConnectionAddress {
    /// Create a new address
    pub fn new(ip: impl Into<String>, port: i32) -> Self {
        Self {
            ip: ip.into(),
            port,
        }
    }
}

/// DTLS certificate fingerprint with the sender's setup role
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DtlsFingerprint {
    /// Hash algorithm name, e.g. `sha-256`
    pub hash: String,
    /// Setup role: `active`, `passive` or `actpass`
    pub setup: String,
    /// Hex digest, colon separated
    pub fingerprint: String,
}

impl DtlsFingerprint {
    /// Create a new fingerprint
    pub fn new(
        hash: impl Into<String>,
        setup: impl Into<String>,
        fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            setup: setup.into(),
            fingerprint: fingerprint.into(),
        }
    }
}

/// ICE connectivity candidate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    /// Component id (1 = RTP, 2 = RTCP)
    #[serde(deserialize_with = "wire::number")]
    pub component: i32,
    /// Transport protocol, `udp` or `tcp`
    pub protocol: String,
    /// Candidate address
    #[serde(deserialize_with = "wire::object")]
    pub address: ConnectionAddress,
    /// Related address for reflexive and relayed candidates
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "wire::optional_object"
    )]
    pub rel_address: Option<ConnectionAddress>,
    /// TCP candidate type; empty when not applicable
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tcp_type: String,
    /// Candidate priority
    #[serde(with = "numeric::decimal")]
    pub priority: u32,
    /// ICE username fragment
    pub username: String,
    /// ICE password
    pub password: String,
    /// Candidate type: `host`, `srflx`, `prflx` or `relay`
    #[serde(rename = "type")]
    pub candidate_type: String,
    /// Gathering generation
    #[serde(with = "numeric::decimal")]
    pub generation: u32,
    /// Foundation string
    pub foundation: String,
    /// Local network interface id
    #[serde(deserialize_with = "wire::number")]
    pub network_id: u16,
    /// Relative cost of the network interface
    #[serde(deserialize_with = "wire::number")]
    pub network_cost: u16,
}

/// SSRCs related by a grouping semantic (`FID`, `SIM`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SsrcGroup {
    /// Group semantics
    pub semantics: String,
    /// Member SSRCs in order; zero is never valid on the wire
    #[serde(with = "numeric::nonzero_decimal_seq")]
    pub ssrcs: Vec<u32>,
}

impl SsrcGroup {
    /// Create a new group
    pub fn new(semantics: impl Into<String>, ssrcs: Vec<u32>) -> Self {
        Self {
            semantics: semantics.into(),
            ssrcs,
        }
    }
}

/// RTCP feedback mechanism supported by a payload type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedbackType {
    /// Feedback type, e.g. `nack`
    #[serde(rename = "type")]
    pub feedback_type: String,
    /// Feedback subtype, e.g. `pli`; may be empty
    pub subtype: String,
}

impl FeedbackType {
    /// Create a new feedback type
    pub fn new(feedback_type: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            feedback_type: feedback_type.into(),
            subtype: subtype.into(),
        }
    }
}

/// Negotiated RTP header extension
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RtpExtension {
    /// Extension id
    #[serde(deserialize_with = "wire::number")]
    pub id: i32,
    /// URI naming the extension
    pub uri: String,
}

impl RtpExtension {
    /// Create a new extension
    pub fn new(id: i32, uri: impl Into<String>) -> Self {
        Self {
            id,
            uri: uri.into(),
        }
    }
}

/// Negotiated codec configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadType {
    /// RTP payload type number
    #[serde(deserialize_with = "wire::number")]
    pub id: u32,
    /// Codec name, e.g. `opus`
    pub name: String,
    /// Clock rate in Hz
    #[serde(deserialize_with = "wire::number")]
    pub clockrate: u32,
    /// Channel count; `None` leaves the media engine default
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "wire::optional_number"
    )]
    pub channels: Option<u32>,
    /// Supported RTCP feedback mechanisms
    #[serde(default, deserialize_with = "wire::objects")]
    pub feedback_types: Vec<FeedbackType>,
    /// Codec-specific format parameters, in order
    #[serde(default, with = "wire::parameters")]
    pub parameters: Vec<(String, String)>,
}

/// Description of one media stream (audio or video)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContent {
    /// Primary SSRC; zero is accepted
    #[serde(with = "numeric::decimal")]
    pub ssrc: u32,
    /// SSRC groups
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "wire::objects"
    )]
    pub ssrc_groups: Vec<SsrcGroup>,
    /// Offered payload types
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "wire::objects"
    )]
    pub payload_types: Vec<PayloadType>,
    /// Negotiated header extensions
    #[serde(default, deserialize_with = "wire::objects")]
    pub rtp_extensions: Vec<RtpExtension>,
}

impl MediaContent {
    /// Create a media description with only a primary SSRC
    pub fn new(ssrc: u32) -> Self {
        Self {
            ssrc,
            ..Self::default()
        }
    }
}

/// Session setup: ICE credentials, DTLS fingerprints and media descriptions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialSetupMessage {
    /// ICE username fragment
    pub ufrag: String,
    /// ICE password
    pub pwd: String,
    /// DTLS fingerprints
    #[serde(deserialize_with = "wire::objects")]
    pub fingerprints: Vec<DtlsFingerprint>,
    /// Audio description, if audio is offered
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "wire::optional_object"
    )]
    pub audio: Option<MediaContent>,
    /// Video description, if video is offered
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "wire::optional_object"
    )]
    pub video: Option<MediaContent>,
}

/// Newly gathered local ICE candidates (trickle)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatesMessage {
    /// Candidates in gathering order
    #[serde(rename = "candidates", deserialize_with = "wire::objects")]
    pub ice_candidates: Vec<IceCandidate>,
}

/// Video activity reported in a media state update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoState {
    /// No video
    #[default]
    Inactive,
    /// Video paused, e.g. app in background
    Suspended,
    /// Video flowing
    Active,
}

impl VideoState {
    /// Wire string for this state
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
            Self::Active => "active",
        }
    }

    /// Map a wire string to a state; unrecognized values mean `Inactive`
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "suspended" => Self::Suspended,
            "active" => Self::Active,
            _ => Self::Inactive,
        }
    }
}

impl fmt::Display for VideoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VideoState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&value))
    }
}

/// Runtime media state of the sender
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaStateMessage {
    /// Microphone muted
    #[serde(rename = "muted", default)]
    pub is_muted: bool,
    /// Video activity
    #[serde(rename = "videoState", default)]
    pub video_state: VideoState,
    /// Device battery is low
    #[serde(rename = "lowBattery", default)]
    pub is_battery_low: bool,
}
