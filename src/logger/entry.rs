//! Structured log lines.

use std::fmt::{self, Display, Write as _};

use log::{Level, Log, Metadata, Record};

/// One structured log line: an event name followed by `key=value` fields.
///
/// Rendered as `event:key=value,key=value`. Separators and backslashes inside
/// values are escaped with a backslash so lines stay machine-splittable.
///
/// ```
/// use directive_agent::logger::LogEntry;
///
/// let entry = LogEntry::new("CapabilityAgent", "handleDirectiveFailed")
///     .d("reason", "messageIdNotFound")
///     .d("messageId", "m1");
/// assert_eq!(
///     entry.to_string(),
///     "handleDirectiveFailed:reason=messageIdNotFound,messageId=m1"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct LogEntry {
    tag: &'static str,
    line: String,
    has_fields: bool,
}

impl LogEntry {
    /// Start a line for `event`, logged under the `tag` target.
    pub fn new(tag: &'static str, event: &str) -> Self {
        Self {
            tag,
            line: event.to_string(),
            has_fields: false,
        }
    }

    /// Append a `key=value` field.
    pub fn d(mut self, key: &str, value: impl Display) -> Self {
        self.line.push(if self.has_fields { ',' } else { ':' });
        self.has_fields = true;
        self.line.push_str(key);
        self.line.push('=');
        let raw = value.to_string();
        for c in raw.chars() {
            if matches!(c, '\\' | ',' | '=' | ':') {
                self.line.push('\\');
            }
            self.line.push(c);
        }
        self
    }

    /// Append a free-form trailing message.
    pub fn m(mut self, message: impl Display) -> Self {
        let _ = write!(self.line, " - {}", message);
        self
    }

    /// Send the line to `logger` at `level` if the logger accepts it.
    pub fn emit(&self, logger: &dyn Log, level: Level) {
        let metadata = Metadata::builder().level(level).target(self.tag).build();
        if !logger.enabled(&metadata) {
            return;
        }
        logger.log(
            &Record::builder()
                .metadata(metadata)
                .args(format_args!("{}", self.line))
                .build(),
        );
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}
