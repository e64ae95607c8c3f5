//! State shared by every capability agent.

use std::fmt;
use std::sync::Arc;

use log::{Level, Log};

use crate::directive::{Directive, DirectiveHandlerResult};
use crate::exception::{ExceptionEncounteredSender, ExceptionErrorType};
use crate::logger::LogEntry;
use crate::registry::{DirectiveRecord, DirectiveRegistry};

pub(crate) const TAG: &str = "CapabilityAgent";

/// Failure reason reported when a directive reuses a live message id.
pub const MESSAGE_ID_IN_USE: &str = "messageIdIsAlreadyInUse";

/// Log reason for lookups of an unregistered message id.
pub const MESSAGE_ID_NOT_FOUND: &str = "messageIdNotFound";

/// Namespace, directive registry and collaborators of one capability agent.
///
/// Embedded by concrete agents and exposed through
/// [`CapabilityAgent::core`](super::CapabilityAgent::core).
pub struct CapabilityAgentCore {
    namespace: String,
    registry: DirectiveRegistry,
    exception_sender: Option<Arc<dyn ExceptionEncounteredSender>>,
    logger: Arc<dyn Log>,
}

impl CapabilityAgentCore {
    pub fn new(
        namespace: impl Into<String>,
        exception_sender: Option<Arc<dyn ExceptionEncounteredSender>>,
        logger: Arc<dyn Log>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            registry: DirectiveRegistry::new(),
            exception_sender,
            logger,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }

    pub fn logger(&self) -> &dyn Log {
        self.logger.as_ref()
    }

    /// Run `f` against the live record for `message_id`.
    ///
    /// The registry lock is released before `f` runs. Returns `None` if the
    /// directive is not (or no longer) registered.
    pub fn with_directive<R>(
        &self,
        message_id: &str,
        f: impl FnOnce(&DirectiveRecord) -> R,
    ) -> Option<R> {
        let record = self.registry.lookup(message_id)?;
        Some(f(&record))
    }

    /// Reject a directive whose message id is already registered.
    ///
    /// The failure is always logged and reported to the exception sender.
    /// `result` is failed only if it has not already been completed.
    pub(crate) fn reject_duplicate(
        &self,
        directive: &Directive,
        result: Option<Box<dyn DirectiveHandlerResult>>,
    ) {
        LogEntry::new(TAG, "preHandleDirectiveFailed")
            .d("reason", MESSAGE_ID_IN_USE)
            .d("messageId", directive.message_id())
            .emit(self.logger(), Level::Error);
        if let Some(result) = result {
            result.set_failed(MESSAGE_ID_IN_USE);
        }
        if let Some(sender) = &self.exception_sender {
            sender.send_exception_encountered(
                directive.unparsed(),
                ExceptionErrorType::InternalError,
                MESSAGE_ID_IN_USE,
            );
        }
    }

    /// Look up `message_id`, logging `event` when it is not registered.
    pub(crate) fn lookup_or_log(&self, message_id: &str, event: &str) -> Option<Arc<DirectiveRecord>> {
        let record = self.registry.lookup(message_id);
        if record.is_none() {
            LogEntry::new(TAG, event)
                .d("reason", MESSAGE_ID_NOT_FOUND)
                .d("messageId", message_id)
                .emit(self.logger(), Level::Error);
        }
        record
    }
}

impl fmt::Debug for CapabilityAgentCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityAgentCore")
            .field("namespace", &self.namespace)
            .field("registry", &self.registry)
            .field("has_exception_sender", &self.exception_sender.is_some())
            .finish()
    }
}
