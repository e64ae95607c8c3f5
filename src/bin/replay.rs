//! Replays directives through a capability agent.
//!
//! Reads newline-delimited directive JSON from stdin. Each directive is
//! pre-handled and then handled by an agent that reports progress, completes
//! the directive and removes it. Directives for another namespace, and lines
//! that do not parse, are reported as exceptions.
//!
//! # Environment Variables
//!
//! - `DIRECTIVE_AGENT_CONFIG` - Path to a JSON config file (optional)
//! - `RUST_LOG` - Filter applied by the console sink (default: "trace")
//!
//! # Usage
//!
//! ```bash
//! cat directives.jsonl | cargo run --bin replay
//! ```

use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::Context;
use log::{Level, Log};

use directive_agent::capability_agent::{CapabilityAgent, CapabilityAgentCore};
use directive_agent::config::AgentConfig;
use directive_agent::directive::{Directive, DirectiveHandlerResult};
use directive_agent::exception::{ExceptionEncounteredSender, ExceptionErrorType};
use directive_agent::logger::{LogEntry, ModuleLogger, SinkLogger};
use directive_agent::registry::DirectiveRecord;

const TAG: &str = "Replay";
const DEFAULT_NAMESPACE: &str = "Replay";

struct ReplayAgent {
    core: CapabilityAgentCore,
}

impl CapabilityAgent for ReplayAgent {
    fn core(&self) -> &CapabilityAgentCore {
        &self.core
    }

    fn on_pre_handle(&self, record: &DirectiveRecord) {
        LogEntry::new(TAG, "preHandled")
            .d("messageId", record.message_id())
            .d("name", record.directive().name())
            .emit(self.core.logger(), Level::Info);
    }

    fn on_handle(&self, record: &DirectiveRecord) {
        record.report_in_progress();
        let outcome = if record.is_cancelled() {
            record.set_failed("cancelled")
        } else {
            record.set_completed()
        };
        log_late_report(outcome, record, self.core.logger());
        self.remove_directive(record.message_id());
    }

    fn on_cancel(&self, record: &DirectiveRecord) {
        log_late_report(record.set_failed("cancelled"), record, self.core.logger());
        self.remove_directive(record.message_id());
    }
}

/// Log a completion that lost to an earlier one instead of dropping it.
fn log_late_report(
    outcome: directive_agent::Result<()>,
    record: &DirectiveRecord,
    logger: &dyn Log,
) {
    if let Err(e) = outcome {
        LogEntry::new(TAG, "resultAlreadyReported")
            .d("messageId", record.message_id())
            .m(e)
            .emit(logger, Level::Debug);
    }
}

/// Logs the outcome of one directive.
struct LoggedResult {
    message_id: String,
    logger: Arc<dyn Log>,
}

impl DirectiveHandlerResult for LoggedResult {
    fn set_completed(self: Box<Self>) {
        LogEntry::new(TAG, "directiveCompleted")
            .d("messageId", &self.message_id)
            .emit(self.logger.as_ref(), Level::Info);
    }

    fn set_failed(self: Box<Self>, description: &str) {
        LogEntry::new(TAG, "directiveFailed")
            .d("messageId", &self.message_id)
            .d("reason", description)
            .emit(self.logger.as_ref(), Level::Warn);
    }

    fn report_in_progress(&self) {
        LogEntry::new(TAG, "directiveInProgress")
            .d("messageId", &self.message_id)
            .emit(self.logger.as_ref(), Level::Debug);
    }
}

/// Logs exception reports instead of sending them upstream.
struct LoggedExceptionSender {
    logger: Arc<dyn Log>,
}

impl ExceptionEncounteredSender for LoggedExceptionSender {
    fn send_exception_encountered(
        &self,
        unparsed_directive: &str,
        error_type: ExceptionErrorType,
        message: &str,
    ) {
        LogEntry::new(TAG, "exceptionEncountered")
            .d("type", error_type)
            .d("message", message)
            .d("directive", unparsed_directive)
            .emit(self.logger.as_ref(), Level::Error);
    }
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::var("DIRECTIVE_AGENT_CONFIG") {
        Ok(path) => AgentConfig::from_path(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        Err(_) => AgentConfig::default(),
    };

    let console = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
        .build();
    let sink = SinkLogger::new(Box::new(console), config.sink_level()?);
    let agent_logger: Arc<dyn Log> = ModuleLogger::new("capabilityAgent", Arc::clone(&sink), &config)?;
    let replay_logger: Arc<dyn Log> = ModuleLogger::new("replay", Arc::clone(&sink), &config)?;

    let exceptions = Arc::new(LoggedExceptionSender {
        logger: Arc::clone(&replay_logger),
    });
    let namespace = config
        .namespace
        .clone()
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
    let agent = ReplayAgent {
        core: CapabilityAgentCore::new(
            namespace,
            Some(Arc::clone(&exceptions) as Arc<dyn ExceptionEncounteredSender>),
            agent_logger,
        ),
    };

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let directive = match Directive::from_json(&line) {
            Ok(directive) => Arc::new(directive),
            Err(e) => {
                exceptions.send_exception_encountered(
                    &line,
                    ExceptionErrorType::UnexpectedInformationReceived,
                    &e.to_string(),
                );
                continue;
            }
        };

        if directive.namespace() != agent.namespace() {
            exceptions.send_exception_encountered(
                directive.unparsed(),
                ExceptionErrorType::UnsupportedOperation,
                "unsupported namespace",
            );
            continue;
        }

        let message_id = directive.message_id().to_string();
        let result = Box::new(LoggedResult {
            message_id: message_id.clone(),
            logger: Arc::clone(&replay_logger),
        });
        agent.pre_handle_directive(directive, result);
        agent.handle_directive(&message_id);
    }

    sink.flush();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{LevelFilter, Metadata, Record};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl Log for Lines {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= LevelFilter::Trace
        }

        fn log(&self, record: &Record<'_>) {
            self.0.lock().push(record.args().to_string());
        }

        fn flush(&self) {}
    }

    #[test]
    fn test_cancel_after_completion_is_logged() {
        let lines = Arc::new(Lines::default());
        let agent = ReplayAgent {
            core: CapabilityAgentCore::new("Replay", None, Arc::clone(&lines) as Arc<dyn Log>),
        };
        let record = DirectiveRecord::new(
            Arc::new(Directive::new("Replay", "Run", "m1")),
            Box::new(LoggedResult {
                message_id: "m1".to_string(),
                logger: Arc::clone(&lines) as Arc<dyn Log>,
            }),
        );

        agent.on_handle(&record);
        agent.on_cancel(&record);

        let lines = lines.0.lock();
        assert!(lines.iter().any(|l| l == "directiveCompleted:messageId=m1"));
        assert!(lines
            .iter()
            .any(|l| l.starts_with("resultAlreadyReported:messageId=m1 - ")));
        assert!(!lines.iter().any(|l| l.starts_with("directiveFailed")));
    }
}
