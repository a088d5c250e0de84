//! Shared fixtures for session-level tests.

#![allow(dead_code)]

use std::sync::Arc;

use complaint_intake_core::{
    clock::ManualClock,
    config::FormConfig,
    validation::FieldName,
    FormSession,
};

pub const SEED: u64 = 0x5EED_F0A4_1234_0001;

/// Session on virtual time; the returned clock records every sleep.
pub fn session_with_clock(seed: u64) -> (FormSession, Arc<ManualClock>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let clock = Arc::new(ManualClock::fixed());
    let session = FormSession::with_clock(FormConfig::default(), seed, Box::new(clock.clone()));
    (session, clock)
}

pub fn session(seed: u64) -> FormSession {
    session_with_clock(seed).0
}

pub fn fill_valid(session: &mut FormSession) {
    session.set_field(FieldName::FullName, "Jane Doe");
    session.set_field(FieldName::Email, "jane@x.com");
    session.set_field(FieldName::AdvisorName, "Bob Smith");
    session.set_field(FieldName::Description, "a".repeat(200));
}

pub fn verify(session: &mut FormSession) {
    let code = session.challenge().challenge().code.clone();
    session.set_challenge_input(code);
    session.verify_challenge().expect("correct code verifies");
}
