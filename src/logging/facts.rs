use log::Level;
use serde_json::Value;

/// Receives structured facts (one JSON object per event).
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Receives human-readable audit lines.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// Discards everything. Useful when the caller only wants return values.
#[derive(Default)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, _level: Level, _msg: &str) {}
}

/// Forwards facts and audit lines to the `log` facade.
///
/// Facts are written at `info` (`warn` for failures) as a single JSON line
/// under the subsystem as log target.
#[derive(Default)]
pub struct LogSink;

impl FactsEmitter for LogSink {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        let level = if decision == "failure" {
            Level::Warn
        } else {
            Level::Info
        };
        log::log!(target: subsystem, level, "{event} {decision} {fields}");
    }
}

impl AuditSink for LogSink {
    fn log(&self, level: Level, msg: &str) {
        log::log!(level, "{msg}");
    }
}
