use std::io::Write;

use sim::{ConfigError, SimConfig};

#[test]
fn defaults_when_file_is_sparse() {
    let config = SimConfig::from_ron_str("(settle_limit: 50)").unwrap();
    assert_eq!(config.settle_limit, 50);
    assert_eq!(config.scheduler, SimConfig::default().scheduler);
    assert_eq!(
        config.journal_capacity,
        Some(SimConfig::DEFAULT_JOURNAL_CAPACITY)
    );
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "(scheduler: (max_chain_depth: 4, record_events: false), journal_capacity: None)"
    )
    .unwrap();

    let config = SimConfig::load(file.path()).unwrap();
    assert_eq!(config.scheduler.max_chain_depth, 4);
    assert!(!config.scheduler.record_events);
    assert_eq!(config.journal_capacity, None);
}

#[test]
fn zero_chain_depth_is_rejected() {
    let error = SimConfig::from_ron_str("(scheduler: (max_chain_depth: 0))").unwrap_err();
    assert!(matches!(error, ConfigError::ZeroChainDepth));
}

#[test]
fn malformed_file_reports_parse_error() {
    let error = SimConfig::from_ron_str("(settle_limit: \"soon\")").unwrap_err();
    assert!(matches!(error, ConfigError::Parse(_)));
}

#[test]
fn missing_file_reports_path() {
    let error = SimConfig::load("/nonexistent/sim.ron").unwrap_err();
    assert!(matches!(error, ConfigError::Read { .. }));
    assert!(error.to_string().contains("/nonexistent/sim.ron"));
}
