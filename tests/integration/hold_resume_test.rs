//! Integration tests for call hold and resume re-offers between two endpoints

mod common;

use anyhow::Result;
use common::round_trip;
use sdp_engine::{
    negotiate_answer_direction, next_local_directive, Direction, MediaType, NegotiationConfig,
    Negotiator, SdpEngineError, Session,
};

struct Call {
    negotiator: Negotiator,
    alice: Session,
    /// Bob's capabilities, answers are built from these
    bob: Session,
}

/// Alice offers, Bob answers from his own capabilities
fn established_call() -> Result<Call> {
    sdp_logging::init_console_logging("hold-resume-test", "debug");

    let negotiator = Negotiator::new(NegotiationConfig::default());
    let alice = negotiator.build_offer(1, "192.0.2.1", 40000, None)?;
    let bob = negotiator.build_offer(2, "192.0.2.2", 50000, None)?;
    let answer = negotiator.answer(&bob, &round_trip(&alice)?)?;
    assert_eq!(answer.audio().expect("audio").mode, Direction::SendRecv);
    // identical capabilities, nothing changed
    assert_eq!(answer.origin.session_version, 1);

    Ok(Call {
        negotiator,
        alice,
        bob,
    })
}

#[test]
fn test_hold_then_resume() -> Result<()> {
    let mut call = established_call()?;

    assert_eq!(call.alice.apply_hold(true)?, Direction::SendOnly);
    assert_eq!(call.alice.origin.session_version, 2);
    assert!(call.alice.is_call_held());

    let bob_held = call.negotiator.answer(&call.bob, &round_trip(&call.alice)?)?;
    assert_eq!(bob_held.audio().expect("audio").mode, Direction::RecvOnly);
    assert!(!bob_held.is_call_held());
    assert_eq!(bob_held.origin.session_version, 2);

    assert_eq!(call.alice.apply_hold(false)?, Direction::SendRecv);
    assert!(!call.alice.is_call_held());

    let bob_resumed = call.negotiator.answer(&call.bob, &round_trip(&call.alice)?)?;
    assert_eq!(bob_resumed.audio().expect("audio").mode, Direction::SendRecv);
    Ok(())
}

#[test]
fn test_double_hold_is_rejected() -> Result<()> {
    let mut call = established_call()?;
    call.alice.apply_hold(true)?;
    let version = call.alice.origin.session_version;

    let err = call.alice.apply_hold(true).unwrap_err();

    assert!(matches!(err, SdpEngineError::InvalidDirectionTransition { .. }));
    assert_eq!(err.to_string(), "cannot hold from direction sendonly");
    assert_eq!(call.alice.origin.session_version, version);
    Ok(())
}

#[test]
fn test_mutual_hold_degrades_to_inactive() -> Result<()> {
    let mut call = established_call()?;
    call.alice.apply_hold(true)?;

    // Bob wants to hold as well
    let bob_wish = next_local_directive(call.bob.effective_direction(), true).expect("valid hold");
    let mut bob_local = call.bob.clone();
    bob_local.audio_mut().expect("audio").mode = bob_wish;

    let answer = call.negotiator.answer(&bob_local, &call.alice)?;
    assert_eq!(answer.audio().expect("audio").mode, Direction::Inactive);
    assert!(answer.is_call_held());
    assert_eq!(
        negotiate_answer_direction(Direction::SendOnly, Direction::SendOnly),
        Direction::Inactive
    );
    Ok(())
}

#[test]
fn test_hold_by_null_connection() -> Result<()> {
    let mut call = established_call()?;
    call.alice
        .set_connection(&MediaType::Audio, "0.0.0.0", 40000, true, false);

    assert!(call.alice.is_call_held());
    assert_eq!(call.alice.effective_direction(), Direction::SendRecv);
    assert!(call
        .alice
        .effective_media_socket(call.alice.audio().expect("audio"))
        .is_some());
    Ok(())
}

#[test]
fn test_answer_to_rejected_audio() -> Result<()> {
    let call = established_call()?;
    let mut offer = call.alice.clone();
    offer.disable_flows(&[MediaType::Audio]);
    assert!(offer.are_all_flows_dropped_or_disabled());

    let answer = call.negotiator.answer(&call.bob, &offer)?;
    assert!(answer.are_all_flows_dropped_or_disabled());
    Ok(())
}
