//! Recording fakes for the collaborator traits, shared by unit tests.

use std::sync::Arc;

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

use crate::directive::DirectiveHandlerResult;
use crate::exception::{ExceptionEncounteredSender, ExceptionErrorType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed(String),
    InProgress,
}

/// Result handle whose reports can be inspected after it has been consumed.
#[derive(Debug, Clone, Default)]
pub struct RecordingResult {
    outcomes: Arc<Mutex<Vec<Outcome>>>,
}

impl RecordingResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes.lock().clone()
    }
}

impl DirectiveHandlerResult for RecordingResult {
    fn set_completed(self: Box<Self>) {
        self.outcomes.lock().push(Outcome::Completed);
    }

    fn set_failed(self: Box<Self>, description: &str) {
        self.outcomes
            .lock()
            .push(Outcome::Failed(description.to_string()));
    }

    fn report_in_progress(&self) {
        self.outcomes.lock().push(Outcome::InProgress);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentException {
    pub unparsed: String,
    pub error_type: ExceptionErrorType,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct RecordingExceptionSender {
    sent: Mutex<Vec<SentException>>,
}

impl RecordingExceptionSender {
    pub fn sent(&self) -> Vec<SentException> {
        self.sent.lock().clone()
    }
}

impl ExceptionEncounteredSender for RecordingExceptionSender {
    fn send_exception_encountered(
        &self,
        unparsed_directive: &str,
        error_type: ExceptionErrorType,
        message: &str,
    ) {
        self.sent.lock().push(SentException {
            unparsed: unparsed_directive.to_string(),
            error_type,
            message: message.to_string(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// `log::Log` that keeps every accepted record in memory.
#[derive(Debug, Clone)]
pub struct CapturingLog {
    level: LevelFilter,
    lines: Arc<Mutex<Vec<CapturedLine>>>,
}

impl CapturingLog {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn lines(&self) -> Vec<CapturedLine> {
        self.lines.lock().clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|line| line.level == level)
            .map(|line| line.message.clone())
            .collect()
    }
}

impl Log for CapturingLog {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.lines.lock().push(CapturedLine {
                level: record.level(),
                target: record.target().to_string(),
                message: record.args().to_string(),
            });
        }
    }

    fn flush(&self) {}
}
