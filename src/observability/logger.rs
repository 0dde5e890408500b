//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, `severity` second, remaining keys sorted
//! - Written to stderr; stdout belongs to command output
//! - Events below the configured threshold are dropped

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl LogLevel {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error.",
                other
            )),
        }
    }
}

static THRESHOLD: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);

/// Process-wide structured logger
pub struct Logger;

impl Logger {
    /// Sets the minimum level that is written
    pub fn set_threshold(level: LogLevel) {
        THRESHOLD.store(level as u8, Ordering::Relaxed);
    }

    pub fn threshold() -> LogLevel {
        LogLevel::from_u8(THRESHOLD.load(Ordering::Relaxed))
    }

    pub fn enabled(level: LogLevel) -> bool {
        level >= Self::threshold()
    }

    /// Log an event with the given level and fields
    pub fn log(level: LogLevel, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(level) {
            return;
        }
        Self::log_to_writer(level, event, fields, &mut io::stderr());
    }

    fn log_to_writer<W: Write>(
        level: LogLevel,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let mut output = String::with_capacity(256);

        output.push('{');

        output.push_str("\"event\":\"");
        Self::escape_json_string(&mut output, event);
        output.push('"');

        output.push_str(",\"severity\":\"");
        output.push_str(level.as_str());
        output.push('"');

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push_str(",\"");
            Self::escape_json_string(&mut output, key);
            output.push_str("\":\"");
            Self::escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push('}');
        output.push('\n');

        // One write per line
        let _ = writer.write_all(output.as_bytes());
        let _ = writer.flush();
    }

    fn escape_json_string(output: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => output.push_str("\\\""),
                '\\' => output.push_str("\\\\"),
                '\n' => output.push_str("\\n"),
                '\r' => output.push_str("\\r"),
                '\t' => output.push_str("\\t"),
                c if c.is_control() => {
                    output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => output.push(c),
            }
        }
    }

    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(LogLevel::Trace, event, fields);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(LogLevel::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(LogLevel::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(LogLevel::Error, event, fields);
    }
}

/// Capture logs to a buffer for testing
#[cfg(test)]
pub fn capture_log(level: LogLevel, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(level, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("trace".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_json_format() {
        let output = capture_log(LogLevel::Info, "RECORD_INSERTED", &[("table", "alunos")]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "RECORD_INSERTED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["table"], "alunos");
    }

    #[test]
    fn test_log_deterministic_ordering() {
        let output1 = capture_log(
            LogLevel::Warn,
            "UNKNOWN_FIELD",
            &[("table", "alunos"), ("field", "email"), ("code", "1")],
        );
        let output2 = capture_log(
            LogLevel::Warn,
            "UNKNOWN_FIELD",
            &[("code", "1"), ("table", "alunos"), ("field", "email")],
        );
        assert_eq!(output1, output2);

        let code_pos = output1.find("\"code\"").unwrap();
        let field_pos = output1.find("\"field\"").unwrap();
        let table_pos = output1.find("\"table\"").unwrap();
        assert!(code_pos < field_pos);
        assert!(field_pos < table_pos);
    }

    #[test]
    fn test_log_escapes_special_chars() {
        let output = capture_log(LogLevel::Info, "TEST", &[("name", "Ana \"Bia\"\nSilva")]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["name"], "Ana \"Bia\"\nSilva");
    }

    #[test]
    fn test_log_one_line() {
        let output = capture_log(LogLevel::Info, "TEST", &[("a", "1"), ("b", "2")]);
        assert_eq!(output.chars().filter(|c| *c == '\n').count(), 1);
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_threshold_filters() {
        Logger::set_threshold(LogLevel::Warn);
        assert!(!Logger::enabled(LogLevel::Info));
        assert!(Logger::enabled(LogLevel::Warn));
        assert!(Logger::enabled(LogLevel::Error));
    }
}
