//! The in-flight state of one accepted directive.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::directive::{Directive, DirectiveHandlerResult};
use crate::error::{AgentError, Result};

/// Pairs an accepted directive with the handle used to report its outcome.
///
/// The result handle is owned by the record and completed at most once: the
/// first `set_completed`/`set_failed` takes it out, later calls get
/// [`AgentError::ResultAlreadyReported`] and never reach the handle.
pub struct DirectiveRecord {
    directive: Arc<Directive>,
    result: Mutex<Option<Box<dyn DirectiveHandlerResult>>>,
    cancelled: AtomicBool,
}

impl DirectiveRecord {
    /// Create a record that owns `result` until the directive is completed.
    pub fn new(directive: Arc<Directive>, result: Box<dyn DirectiveHandlerResult>) -> Self {
        Self {
            directive,
            result: Mutex::new(Some(result)),
            cancelled: AtomicBool::new(false),
        }
    }

    /// The directive this record was created for.
    pub fn directive(&self) -> &Arc<Directive> {
        &self.directive
    }

    pub fn message_id(&self) -> &str {
        self.directive.message_id()
    }

    /// Whether a cancel has been requested for this directive.
    ///
    /// Lock-free; long-running handlers poll this between expensive steps.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Flag the directive as cancelled. The flag is never cleared.
    pub fn mark_cancelled(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether the result handle has already been completed.
    pub fn has_reported(&self) -> bool {
        self.result.lock().is_none()
    }

    pub fn set_completed(&self) -> Result<()> {
        let result = self.take_result()?;
        result.set_completed();
        Ok(())
    }

    pub fn set_failed(&self, description: &str) -> Result<()> {
        let result = self.take_result()?;
        result.set_failed(description);
        Ok(())
    }

    /// Forward a progress report; a no-op once the result has been completed.
    pub fn report_in_progress(&self) {
        if let Some(result) = self.result.lock().as_ref() {
            result.report_in_progress();
        }
    }

    fn take_result(&self) -> Result<Box<dyn DirectiveHandlerResult>> {
        self.result
            .lock()
            .take()
            .ok_or_else(|| AgentError::ResultAlreadyReported {
                message_id: self.message_id().to_string(),
            })
    }

    /// Give the result handle back, for a record that never got registered.
    pub(crate) fn into_result(self) -> Option<Box<dyn DirectiveHandlerResult>> {
        self.result.into_inner()
    }
}

impl fmt::Debug for DirectiveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveRecord")
            .field("message_id", &self.message_id())
            .field("cancelled", &self.is_cancelled())
            .field("reported", &self.has_reported())
            .finish()
    }
}
