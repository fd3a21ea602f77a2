//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry builders and DefaultLogger formatting.

use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use std::time::SystemTime;

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_have_fixed_width() {
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        assert_eq!(severity.label().len(), 5);
    }
    assert_eq!(LogSeverity::Warn.label().trim_end(), "WARN");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_new_has_no_location() {
    let entry = LogEntry::new(
        LogSeverity::Info,
        "galaxy3d::gles2::FBOManager",
        "FBO probing took 0.010000 seconds".to_string(),
    );

    assert_eq!(entry.severity, LogSeverity::Info);
    assert_eq!(entry.source, "galaxy3d::gles2::FBOManager");
    assert!(entry.file.is_none());
    assert!(entry.line.is_none());
}

#[test]
fn test_log_entry_with_location() {
    let entry = LogEntry::new(LogSeverity::Error, "galaxy3d::gles2", "bad".to_string())
        .with_location("gles2_frame_buffer.rs", 42);

    assert_eq!(entry.file, Some("gles2_frame_buffer.rs"));
    assert_eq!(entry.line, Some(42));
}

#[test]
fn test_log_entry_timestamp_is_recent() {
    let before = SystemTime::now();
    let entry = LogEntry::new(LogSeverity::Debug, "test", "msg".to_string());
    assert!(entry.timestamp >= before);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_format_contains_parts() {
    let entry = LogEntry::new(
        LogSeverity::Warn,
        "galaxy3d::gles2::FBOManager",
        "not all renderbuffers were released".to_string(),
    );

    let line = DefaultLogger::format(&entry);
    assert!(line.contains("WARN"));
    assert!(line.contains("galaxy3d::gles2::FBOManager"));
    assert!(line.contains("not all renderbuffers were released"));
    assert!(!line.contains(".rs:"));
}

#[test]
fn test_default_logger_format_with_location() {
    let entry = LogEntry::new(LogSeverity::Error, "test", "boom".to_string())
        .with_location("probe.rs", 7);

    let line = DefaultLogger::format(&entry);
    assert!(line.contains("(probe.rs:7)"));
}

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&LogEntry::new(severity, "test", format!("{:?} message", severity)));
    }
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}
