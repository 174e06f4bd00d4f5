//! Integration tests for the `logger` crate

use logger::{debug, error, info, verbose, warn};
use logger::{level, set_level, set_level_from_str, Level};

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("Warn"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("DEBUG"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn set_level_is_observable() {
    set_level(Level::Debug);
    assert_eq!(level(), Level::Debug);
}

#[test]
fn logs_do_not_panic() {
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration");
}

#[test]
fn verbose_respects_runtime_flag() {
    logger::disable_verbose();
    assert!(!logger::is_verbose_enabled());
    verbose!("not printed");
    logger::enable_verbose();
    verbose!("printed when the feature is on: {}", 42);
    logger::disable_verbose();
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_captures_tagged_lines() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("gpaplanner.log");

    assert!(logger::init_file_logging(&path));
    error!("transcript load failed");
    warn!("semester without summary line");
    logger::close_file_logging();

    let contents = std::fs::read_to_string(&path).expect("read log file");
    assert!(contents.contains("[ERROR] transcript load failed"));
    assert!(contents.contains("[WARN] semester without summary line"));
}
