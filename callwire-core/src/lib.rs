//! Callwire - signaling message codec for peer-to-peer calls
//!
//! Two call participants exchange three kinds of signaling message over an
//! opaque transport:
//!
//! - **InitialSetup**: ICE credentials, DTLS fingerprints and the audio/video
//!   media descriptions (SSRCs, payload types, RTP header extensions)
//! - **Candidates**: ICE candidates trickled as they are gathered
//! - **MediaState**: mute, video activity and battery state
//!
//! This crate converts between those messages and their JSON wire form. It
//! performs no I/O; delivering the bytes is up to the caller.
//!
//! # Examples
//!
//! ```rust
//! use callwire_core::{DtlsFingerprint, InitialSetupMessage, MediaContent, Message};
//!
//! # fn example() -> callwire_core::Result<()> {
//! let message = Message::from(InitialSetupMessage {
//!     ufrag: "abc".to_string(),
//!     pwd: "xyz".to_string(),
//!     fingerprints: vec![DtlsFingerprint::new("sha-256", "actpass", "AA:BB")],
//!     audio: Some(MediaContent::new(12345)),
//!     video: None,
//! });
//!
//! let payload = message.to_bytes()?;
//! let parsed = Message::from_bytes(&payload)?;
//! assert_eq!(parsed, message);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

/// Decimal-string encoding of 32-bit integers
pub mod numeric;

/// Signaling data model
pub mod types;

/// Entity codecs, errors and the configured codec
pub mod codec;

/// Message envelope and dispatch
pub mod signaling;

// Re-export main types at crate root
pub use codec::{
    CodecConfig, CodecError, Result, SignalingCodec, WireObject, DEFAULT_MAX_PAYLOAD_SIZE,
};
pub use numeric::{decode_u32, encode_u32};
pub use signaling::{Message, MessageKind, TYPE_KEY};
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::codec::{CodecConfig, CodecError, SignalingCodec, WireObject};
    pub use crate::signaling::{Message, MessageKind};
    pub use crate::types::{
        CandidatesMessage, ConnectionAddress, DtlsFingerprint, IceCandidate, InitialSetupMessage,
        MediaContent, MediaStateMessage, VideoState,
    };
}
