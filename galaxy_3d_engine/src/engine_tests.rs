//! Unit tests for the Engine logging facade
//!
//! IMPORTANT: the logger is a global shared across all tests.
//! All tests are marked with #[serial] to run sequentially.

use crate::galaxy3d::Engine;
use crate::galaxy3d::log::{LogEntry, LogSeverity, Logger};
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        entries.push(format!("{:?}: {}", entry.severity, entry.message));
    }
}

fn install() -> Arc<Mutex<Vec<String>>> {
    Engine::reset_logger();
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(TestLogger { entries: entries.clone() });
    entries
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_default_logger_logs_without_panic() {
    Engine::reset_logger();
    Engine::log(LogSeverity::Info, "galaxy3d::test", "hello".to_string());
}

#[test]
#[serial]
fn test_custom_logger_receives_logs() {
    let entries = install();

    Engine::log(LogSeverity::Info, "galaxy3d::test", "first".to_string());
    Engine::log(LogSeverity::Warn, "galaxy3d::test", "second".to_string());

    let captured = entries.lock().unwrap();
    assert_eq!(captured.as_slice(), ["Info: first", "Warn: second"]);
    drop(captured);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_log_detailed_reaches_logger() {
    let entries = install();

    Engine::log_detailed(
        LogSeverity::Error,
        "galaxy3d::test",
        "detailed".to_string(),
        "engine.rs",
        12,
    );

    assert_eq!(entries.lock().unwrap().len(), 1);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_min_severity_filters_entries() {
    let entries = install();
    Engine::set_min_severity(LogSeverity::Warn);

    Engine::log(LogSeverity::Trace, "galaxy3d::test", "dropped".to_string());
    Engine::log(LogSeverity::Info, "galaxy3d::test", "dropped".to_string());
    Engine::log(LogSeverity::Warn, "galaxy3d::test", "kept".to_string());

    let captured = entries.lock().unwrap();
    assert_eq!(captured.as_slice(), ["Warn: kept"]);
    drop(captured);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_reset_logger_restores_default_severity() {
    Engine::set_min_severity(LogSeverity::Error);
    Engine::reset_logger();
    assert_eq!(Engine::min_severity(), LogSeverity::Debug);
}

#[test]
#[serial]
fn test_engine_macros_route_through_logger() {
    let entries = install();

    crate::engine_info!("galaxy3d::test", "value={}", 3);
    crate::engine_warn!("galaxy3d::test", "careful");
    crate::engine_error!("galaxy3d::test", "failed");

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[0], "Info: value=3");
    drop(captured);
    Engine::reset_logger();
}
