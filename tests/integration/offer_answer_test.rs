//! Integration tests for offer/answer exchanges through a text parser and encoder

mod common;

use anyhow::Result;
use common::{remote_offer_text, round_trip, LineParser};
use sdp_engine::{
    compute_payload_size, describe_codec_by_name, parse_with, Direction, MediaType,
    NegotiationConfig, Negotiator, SdpEngineError, Session, SystemResolver,
};

fn remote_offer() -> Result<Session> {
    Ok(parse_with(&LineParser, remote_offer_text())?.session)
}

#[test]
fn test_answer_to_multi_flow_offer() -> Result<()> {
    sdp_logging::init_console_logging("offer-answer-test", "debug");

    let negotiator = Negotiator::new(NegotiationConfig::default());
    let offer = remote_offer()?;
    let local = negotiator.build_offer(1000, "192.0.2.50", 40000, Some("12345"))?;

    let answer = negotiator.answer(&local, &offer)?;

    let types: Vec<MediaType> = answer.media.iter().map(|m| m.media_type.clone()).collect();
    assert_eq!(
        types,
        vec![MediaType::Audio, MediaType::Video, MediaType::Application]
    );

    let audio = answer.audio().expect("audio flow");
    assert_eq!(audio.port, 40000);
    assert_eq!(
        audio.format_names(),
        vec!["PCMA", "PCMU", "G729", "telephone-event"]
    );
    assert_eq!(audio.mode, Direction::SendRecv);
    assert_eq!(audio.attributes.get("ssrc"), Some("12345"));

    assert_eq!(answer.media[1].port, 0);
    assert_eq!(answer.media[2].port, 0);
    assert_eq!(answer.origin.session_id, 1000);
    assert_eq!(answer.origin.session_version, 2);

    // positional congruence survives the wire
    let reparsed = round_trip(&answer)?;
    assert_eq!(reparsed, answer);
    Ok(())
}

#[test]
fn test_offer_round_trip_and_json_snapshot() -> Result<()> {
    let offer = remote_offer()?;
    assert_eq!(offer.origin.session_version, 7);
    assert_eq!(round_trip(&offer)?, offer);

    let snapshot = serde_json::to_value(&offer)?;
    let restored: Session = serde_json::from_value(snapshot)?;
    assert_eq!(restored, offer);

    let mut modified = restored.clone();
    modified.media[0].formats.retain(|f| f.payload != 13);
    assert_ne!(modified, offer);
    assert_eq!(offer.media[0].formats.len(), 5);
    Ok(())
}

#[test]
fn test_echo_responder_answer() -> Result<()> {
    let negotiator = Negotiator::new(NegotiationConfig::default());
    let offer = remote_offer()?;

    let (answer, dtmf) = negotiator.build_self_answer(&offer, Direction::SendRecv)?;

    assert!(dtmf);
    assert_eq!(answer.origin.session_id, 3000);
    assert_eq!(answer.origin.session_version, 1);
    let audio = answer.audio().expect("audio flow");
    assert_eq!(audio.format_names(), vec!["PCMU", "telephone-event"]);
    assert_eq!(audio.mode, Direction::SendRecv);
    assert!(answer.media.iter().skip(1).all(|m| m.port == 0));
    Ok(())
}

#[test]
fn test_effective_media_address() -> Result<()> {
    let offer = remote_offer()?;

    let addr = offer.effective_media_addr(&MediaType::Audio, &SystemResolver)?;
    assert_eq!(addr.to_string(), "198.51.100.20:30000");
    assert_eq!(
        offer.effective_connection_for(&MediaType::Video),
        Some("198.51.100.20")
    );
    assert!(!offer.is_t38_image());
    assert!(!offer.are_all_flows_dropped_or_disabled());
    Ok(())
}

#[test]
fn test_malformed_text_is_a_parse_error() {
    let err = parse_with(&LineParser, "o=- 1 1 IN IP4 10.0.0.1").unwrap_err();
    assert!(matches!(err, SdpEngineError::Parse(_)));
}

#[test]
fn test_restore_missing_rtpmaps_after_parse() -> Result<()> {
    let text = "v=0
o=- 1 1 IN IP4 10.0.0.1
s=-
c=IN IP4 10.0.0.1
m=audio 5004 RTP/AVP 0 8 96
";
    let mut session = parse_with(&LineParser, text)?.session;

    let missing = session.restore_missing_rtpmaps();

    let audio = session.audio().expect("audio flow");
    assert_eq!(audio.format_names(), vec!["PCMU", "PCMA", ""]);
    assert_eq!(missing, vec!["media type audio, payload type 96".to_string()]);
    Ok(())
}

#[test]
fn test_payload_sizes_for_offered_codecs() -> Result<()> {
    let size = |name: &str, ms: u32, mode: Option<f64>| {
        let codec = describe_codec_by_name(name).expect("known codec");
        compute_payload_size(codec, ms, mode)
    };

    assert_eq!(size("G729", 10, None)?, 10);
    assert!(size("G729", 15, None).is_err());
    assert_eq!(size("AMR", 20, Some(12.2))?, 31);
    assert_eq!(size("opus", 20, None)?, 0);
    Ok(())
}
