//! Rendering contract consumed by bootstrap and the polling loop.
//!
//! `Renderer` is the terminal implementation; `RecordingSink` captures lines
//! so flows can be asserted on without touching stderr.

use std::sync::Mutex;

use super::renderer::Renderer;

/// Injectable console output.
pub trait RenderSink {
    /// Titled section divider.
    fn section(&self, title: &str);
    /// One key/value row under a section.
    fn field(&self, key: &str, value: &str);
    /// Lifecycle/progress text.
    fn activity(&self, text: &str);
    /// Indented detail text, e.g. a URL to open.
    fn detail(&self, text: &str);
    /// Completed step.
    fn success(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

impl RenderSink for Renderer {
    fn section(&self, title: &str) {
        self.section(title);
    }

    fn field(&self, key: &str, value: &str) {
        self.field(key, value);
    }

    fn activity(&self, text: &str) {
        self.activity(text);
    }

    fn detail(&self, text: &str) {
        self.detail(text);
    }

    fn success(&self, msg: &str) {
        self.success(msg);
    }

    fn warn(&self, msg: &str) {
        self.warn(msg);
    }

    fn error(&self, msg: &str) {
        self.error(msg);
    }
}

/// Sink that keeps every rendered line, prefixed by its kind.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines rendered so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// True when any rendered line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    fn push(&self, kind: &str, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format!("{kind}: {text}"));
        }
    }
}

impl RenderSink for RecordingSink {
    fn section(&self, title: &str) {
        self.push("section", title);
    }

    fn field(&self, key: &str, value: &str) {
        self.push("field", &format!("{key}={value}"));
    }

    fn activity(&self, text: &str) {
        self.push("activity", text);
    }

    fn detail(&self, text: &str) {
        self.push("detail", text);
    }

    fn success(&self, msg: &str) {
        self.push("success", msg);
    }

    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }

    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order_and_kind() {
        let sink = RecordingSink::new();
        sink.section("bootstrap");
        sink.field("config", "/tmp/x");
        sink.error("boom");
        assert_eq!(
            sink.lines(),
            vec![
                "section: bootstrap".to_string(),
                "field: config=/tmp/x".to_string(),
                "error: boom".to_string(),
            ]
        );
        assert!(sink.contains("boom"));
        assert!(!sink.contains("nope"));
    }
}
