//! Integration tests for configuration-driven negotiation

mod common;

use anyhow::Result;
use common::{remote_offer_text, LineParser};
use sdp_config::{ConfigError, EngineConfig};
use sdp_engine::{parse_with, Direction, Negotiator};
use std::io::Write;

fn config_file(contents: &str) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn test_negotiator_from_config_file() -> Result<()> {
    sdp_logging::init_console_logging("config-negotiator-test", "debug");

    let file = config_file(
        r#"
[negotiation]
audio_codecs = ["G722", "*"]
offer_codecs = [9, 0, 101]
session_name = "conference"
ptime_ms = 30
dtmf_events = "0-15"
"#,
    )?;
    let config = EngineConfig::load(Some(file.path()))?;
    let negotiator = Negotiator::new(config.negotiation);

    let local = negotiator.build_offer(500, "192.0.2.9", 42000, None)?;
    assert_eq!(local.name, "conference");
    let audio = local.audio().expect("audio flow");
    assert_eq!(audio.payload_types(), vec![9, 0, 101]);
    assert_eq!(audio.ptime, Some(30));
    assert_eq!(
        audio.first_dtmf_format().expect("dtmf").params,
        vec!["0-15".to_string()]
    );

    let offer = parse_with(&LineParser, remote_offer_text())?.session;
    let answer = negotiator.answer(&local, &offer)?;

    let audio = answer.audio().expect("audio flow");
    assert_eq!(audio.format_names(), vec!["PCMU", "telephone-event"]);
    assert_eq!(audio.mode, Direction::SendRecv);
    assert_eq!(answer.effective_ptime(), 30);
    Ok(())
}

#[test]
fn test_self_answer_honours_configured_codecs() -> Result<()> {
    let file = config_file(
        r#"
[negotiation]
audio_codecs = ["*", "G729"]
"#,
    )?;
    let config = EngineConfig::load(Some(file.path()))?;
    let negotiator = Negotiator::new(config.negotiation);
    let offer = parse_with(&LineParser, remote_offer_text())?.session;

    let (answer, dtmf) = negotiator.build_self_answer(&offer, Direction::RecvOnly)?;

    assert!(dtmf);
    let audio = answer.audio().expect("audio flow");
    assert_eq!(audio.format_names(), vec!["G729", "telephone-event"]);
    assert_eq!(audio.mode, Direction::SendRecv);
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let file = config_file(
        r#"
[negotiation]
audio_codecs = []
"#,
    )?;

    let result = EngineConfig::load(Some(file.path()));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
    Ok(())
}
