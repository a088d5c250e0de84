//! Challenge generation, verification and refresh.

mod common;

use complaint_intake_core::{
    challenge::{verify, ChallengeBox, ChallengeGenerator, MISMATCH_MESSAGE},
    command::FormCommand,
    event::FormEvent,
    rng::{RngBank, RngSlot},
    FormError,
};

#[test]
fn generated_codes_are_five_uppercase_alphanumerics() {
    let mut bank = RngBank::new(common::SEED);
    for _ in 0..1000 {
        let challenge = ChallengeGenerator::generate(bank.for_slot(RngSlot::Challenge), 5);
        assert_eq!(challenge.code.chars().count(), 5);
        assert!(
            challenge.code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()),
            "unexpected character in {}",
            challenge.code
        );
    }
}

#[test]
fn any_casing_of_the_code_verifies() {
    let mut bank = RngBank::new(3);
    for _ in 0..100 {
        let code = ChallengeGenerator::generate(bank.for_slot(RngSlot::Challenge), 5).code;
        assert!(verify(&code, &code));
        assert!(verify(&code.to_lowercase(), &code));
        let mixed: String = code
            .chars()
            .enumerate()
            .map(|(i, c)| if i % 2 == 0 { c.to_ascii_lowercase() } else { c })
            .collect();
        assert!(verify(&mixed, &code), "{mixed} should match {code}");
    }
}

#[test]
fn surrounding_whitespace_is_not_trimmed() {
    assert!(!verify("AB12C ", "AB12C"));
    assert!(!verify("AB 12C", "AB12C"));
}

#[test]
fn mismatch_sets_error_and_leaves_unverified() {
    let mut bank = RngBank::new(11);
    let mut cbox = ChallengeBox::new(bank.for_slot(RngSlot::Challenge), 5);
    cbox.set_input("!!!!!");

    let err = cbox.verify().unwrap_err();
    assert!(matches!(err, FormError::ChallengeMismatch));
    assert!(!cbox.is_verified());
    assert_eq!(cbox.error(), Some(MISMATCH_MESSAGE));
}

#[test]
fn blank_input_cannot_be_verified() {
    let mut bank = RngBank::new(11);
    let mut cbox = ChallengeBox::new(bank.for_slot(RngSlot::Challenge), 5);
    cbox.set_input("   ");

    assert!(!cbox.can_verify());
    assert!(matches!(cbox.verify(), Err(FormError::EmptyChallengeInput)));
    assert_eq!(cbox.error(), None);
}

#[test]
fn refresh_resets_verified_input_and_error() {
    let mut bank = RngBank::new(11);
    let mut cbox = ChallengeBox::new(bank.for_slot(RngSlot::Challenge), 5);

    // Verified state.
    let code = cbox.challenge().code.clone();
    cbox.set_input(code);
    cbox.verify().unwrap();
    assert!(cbox.is_verified());
    cbox.refresh(bank.for_slot(RngSlot::Challenge));
    assert!(!cbox.is_verified());
    assert_eq!(cbox.input(), "");
    assert_eq!(cbox.error(), None);

    // Error state.
    cbox.set_input("WRONG");
    let _ = cbox.verify();
    assert!(cbox.error().is_some());
    cbox.refresh(bank.for_slot(RngSlot::Challenge));
    assert!(!cbox.is_verified());
    assert_eq!(cbox.input(), "");
    assert_eq!(cbox.error(), None);
}

#[test]
fn session_mismatch_is_reported_as_event_not_error() {
    let mut session = common::session(common::SEED);
    session.apply(FormCommand::SetChallengeInput { value: "nope!".into() }).unwrap();

    let events = session.apply(FormCommand::VerifyChallenge).unwrap();
    assert_eq!(
        events,
        vec![FormEvent::ChallengeMismatch { message: MISMATCH_MESSAGE.to_string() }]
    );
    assert!(!session.snapshot().challenge.verified);
}

#[test]
fn session_refresh_after_verify_requires_reverification() {
    let mut session = common::session(common::SEED);
    common::verify(&mut session);
    assert!(session.snapshot().can_submit);

    let events = session.apply(FormCommand::RefreshChallenge).unwrap();
    assert_eq!(events, vec![FormEvent::ChallengeRefreshed]);

    let view = session.snapshot();
    assert!(!view.challenge.verified);
    assert_eq!(view.challenge.input, "");
    assert!(!view.can_submit);
}
