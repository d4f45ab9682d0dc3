#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::inspect::*;
    use super::super::{Cli, Commands};
    use callwire_core::{CodecConfig, CodecError, Message, MessageKind, SignalingCodec};
    use clap::{CommandFactory, Parser};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_message_kind_conversion() {
        assert_eq!(
            MessageKind::from(CliMessageKind::InitialSetup),
            MessageKind::InitialSetup
        );
        assert_eq!(
            MessageKind::from(CliMessageKind::Candidates),
            MessageKind::Candidates
        );
        assert_eq!(
            MessageKind::from(CliMessageKind::MediaState),
            MessageKind::MediaState
        );
    }

    #[test]
    fn test_parse_sample_command() {
        let cli = Cli::try_parse_from(["callwire", "sample", "media-state"]).unwrap();
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Sample {
                kind: CliMessageKind::MediaState
            }
        ));
    }

    #[test]
    fn test_parse_decode_command() {
        let cli = Cli::try_parse_from([
            "callwire",
            "--verbose",
            "--max-payload-size",
            "512",
            "decode",
            "payload.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.max_payload_size, 512);
        match cli.command {
            Commands::Decode { file } => assert_eq!(file, Some(PathBuf::from("payload.json"))),
            _ => unreachable!("expected decode"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_sample_kind() {
        assert!(Cli::try_parse_from(["callwire", "sample", "hangup"]).is_err());
    }

    #[test]
    fn test_samples_pass_validation() {
        let codec = SignalingCodec::default();
        for kind in MessageKind::ALL {
            let message = sample_message(kind);
            assert_eq!(message.kind(), kind);

            let rendered = pretty(&message).unwrap();
            assert_eq!(validate(&codec, rendered.as_bytes()).unwrap(), kind);
            assert_eq!(Message::from_bytes(rendered.as_bytes()).unwrap(), message);
        }
    }

    #[test]
    fn test_decode_report_header() {
        let codec = SignalingCodec::default();
        let report = decode_report(&codec, br#"{"@type":"MediaState","muted":true}"#).unwrap();
        let (header, body) = report.split_once('\n').unwrap();
        assert_eq!(header, "MediaState");

        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "@type": "MediaState",
                "muted": true,
                "videoState": "inactive",
                "lowBattery": false
            })
        );
    }

    #[test]
    fn test_validate_reports_codec_error() {
        let codec = SignalingCodec::default();
        let err = validate(&codec, br#"{"@type":"Hangup"}"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodecError>(),
            Some(CodecError::UnknownDiscriminant(kind)) if kind == "Hangup"
        ));
    }

    #[test]
    fn test_validate_respects_payload_limit() {
        let codec = SignalingCodec::new(CodecConfig::default().with_max_payload_size(16));
        let err = validate(&codec, br#"{"@type":"MediaState","muted":true}"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodecError>(),
            Some(CodecError::PayloadTooLarge { max: 16, .. })
        ));
    }

    #[test]
    fn test_read_payload_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"@type":"Candidates","candidates":[]}"#)
            .unwrap();

        let payload = read_payload(Some(file.path())).unwrap();
        let codec = SignalingCodec::default();
        assert_eq!(validate(&codec, &payload).unwrap(), MessageKind::Candidates);
    }

    #[test]
    fn test_read_payload_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = read_payload(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
