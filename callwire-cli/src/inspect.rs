//! Payload inspection helpers behind the CLI subcommands

use anyhow::{Context, Result};
use callwire_core::{
    CandidatesMessage, ConnectionAddress, DtlsFingerprint, FeedbackType, IceCandidate,
    InitialSetupMessage, MediaContent, MediaStateMessage, Message, MessageKind, PayloadType,
    RtpExtension, SignalingCodec, SsrcGroup, VideoState,
};
use clap::ValueEnum;
use std::io::Read;
use std::path::Path;

/// Message kind selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliMessageKind {
    /// Session setup with media descriptions
    InitialSetup,
    /// Trickled ICE candidates
    Candidates,
    /// Mute, video and battery state
    MediaState,
}

impl From<CliMessageKind> for MessageKind {
    fn from(kind: CliMessageKind) -> Self {
        match kind {
            CliMessageKind::InitialSetup => MessageKind::InitialSetup,
            CliMessageKind::Candidates => MessageKind::Candidates,
            CliMessageKind::MediaState => MessageKind::MediaState,
        }
    }
}

/// Read a payload from `path`, or from stdin when `path` is absent or `-`
pub fn read_payload(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .with_context(|| format!("failed to read payload from {}", path.display())),
        _ => {
            let mut payload = Vec::new();
            std::io::stdin()
                .read_to_end(&mut payload)
                .context("failed to read payload from stdin")?;
            Ok(payload)
        }
    }
}

/// Check a payload and report its kind
pub fn validate(codec: &SignalingCodec, payload: &[u8]) -> Result<MessageKind> {
    let message = codec.decode(payload).context("invalid signaling payload")?;
    Ok(message.kind())
}

/// Decode a payload into a kind header followed by its canonical pretty form
pub fn decode_report(codec: &SignalingCodec, payload: &[u8]) -> Result<String> {
    let message = codec.decode(payload).context("invalid signaling payload")?;
    Ok(format!("{}\n{}", message.kind(), pretty(&message)?))
}

/// Pretty-printed wire form of a message
pub fn pretty(message: &Message) -> Result<String> {
    serde_json::to_string_pretty(message).context("failed to render message")
}

/// A representative message of the given kind
pub fn sample_message(kind: MessageKind) -> Message {
    match kind {
        MessageKind::InitialSetup => Message::from(InitialSetupMessage {
            ufrag: "Vx3k".to_string(),
            pwd: "m2b0q1s9d8f7g6h5j4k3l2".to_string(),
            fingerprints: vec![DtlsFingerprint::new(
                "sha-256",
                "actpass",
                "5C:1F:0A:93:7E:44:B2:D8:61:0C:9A:3E:F7:21:88:4B:D0:6E:13:A5:7C:42:B9:F0:1D:6A:E8:35:C7:92:0B:54",
            )],
            audio: Some(MediaContent {
                ssrc: 2_837_104_221,
                ssrc_groups: Vec::new(),
                payload_types: vec![PayloadType {
                    id: 111,
                    name: "opus".to_string(),
                    clockrate: 48000,
                    channels: Some(2),
                    feedback_types: vec![FeedbackType::new("transport-cc", "")],
                    parameters: vec![
                        ("minptime".to_string(), "10".to_string()),
                        ("useinbandfec".to_string(), "1".to_string()),
                    ],
                }],
                rtp_extensions: vec![RtpExtension::new(
                    1,
                    "urn:ietf:params:rtp-hdrext:ssrc-audio-level",
                )],
            }),
            video: Some(MediaContent {
                ssrc: 1001,
                ssrc_groups: vec![SsrcGroup::new("FID", vec![1001, 1002])],
                payload_types: vec![
                    PayloadType {
                        id: 100,
                        name: "VP8".to_string(),
                        clockrate: 90000,
                        channels: None,
                        feedback_types: vec![
                            FeedbackType::new("nack", ""),
                            FeedbackType::new("nack", "pli"),
                            FeedbackType::new("goog-remb", ""),
                        ],
                        parameters: Vec::new(),
                    },
                    PayloadType {
                        id: 101,
                        name: "rtx".to_string(),
                        clockrate: 90000,
                        channels: None,
                        feedback_types: Vec::new(),
                        parameters: vec![("apt".to_string(), "100".to_string())],
                    },
                ],
                rtp_extensions: vec![RtpExtension::new(3, "urn:3gpp:video-orientation")],
            }),
        }),
        MessageKind::Candidates => Message::from(CandidatesMessage {
            ice_candidates: vec![
                IceCandidate {
                    component: 1,
                    protocol: "udp".to_string(),
                    address: ConnectionAddress::new("192.168.1.20", 50412),
                    rel_address: None,
                    tcp_type: String::new(),
                    priority: 2_122_260_223,
                    username: "Vx3k".to_string(),
                    password: "m2b0q1s9d8f7g6h5j4k3l2".to_string(),
                    candidate_type: "host".to_string(),
                    generation: 0,
                    foundation: "1".to_string(),
                    network_id: 1,
                    network_cost: 10,
                },
                IceCandidate {
                    component: 1,
                    protocol: "udp".to_string(),
                    address: ConnectionAddress::new("203.0.113.7", 61000),
                    rel_address: Some(ConnectionAddress::new("192.168.1.20", 50412)),
                    tcp_type: String::new(),
                    priority: 1_686_052_607,
                    username: "Vx3k".to_string(),
                    password: "m2b0q1s9d8f7g6h5j4k3l2".to_string(),
                    candidate_type: "srflx".to_string(),
                    generation: 0,
                    foundation: "2".to_string(),
                    network_id: 1,
                    network_cost: 10,
                },
            ],
        }),
        MessageKind::MediaState => Message::from(MediaStateMessage {
            is_muted: true,
            video_state: VideoState::Active,
            is_battery_low: false,
        }),
    }
}
