//! Form configuration loading and checks.

use complaint_intake_core::{config::FormConfig, FormError};

fn data_dir() -> String {
    format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn shipped_config_matches_builtin_defaults() {
    let loaded = FormConfig::load(&data_dir()).expect("data/form.json loads");
    let builtin = FormConfig::default();

    assert_eq!(loaded.challenge_length, builtin.challenge_length);
    assert_eq!(loaded.min_description_chars, 200);
    assert_eq!(loaded.max_attachment_bytes, 10_485_760);
    assert_eq!(loaded.allowed_file_types, builtin.allowed_file_types);
    assert_eq!(loaded.submit_delay_ms, 1000);
    assert_eq!(loaded.ticket_prefix, "SM-");
    assert_eq!(loaded.firm, builtin.firm);
    assert_eq!(loaded.process_steps, builtin.process_steps);
}

#[test]
fn missing_directory_is_an_error() {
    assert!(FormConfig::load("/definitely/not/here").is_err());
}

#[test]
fn nonsensical_values_are_rejected() {
    let mut config = FormConfig::default();
    config.challenge_length = 0;
    assert!(matches!(config.validate("test"), Err(FormError::Config { .. })));

    let mut config = FormConfig::default();
    config.allowed_file_types.clear();
    assert!(matches!(config.validate("test"), Err(FormError::Config { .. })));

    assert!(FormConfig::default().validate("test").is_ok());
}

#[test]
fn test_config_has_no_delay() {
    assert!(FormConfig::default_test().submit_delay().is_zero());
}
