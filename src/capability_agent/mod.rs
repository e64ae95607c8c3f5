//! Capability agents: namespace-scoped handlers of directives.
//!
//! A concrete agent embeds a [`CapabilityAgentCore`] and implements the three
//! lifecycle hooks of [`CapabilityAgent`]. The provided methods of the trait
//! are the surface the transport layer calls:
//!
//! 1. [`pre_handle_directive`](CapabilityAgent::pre_handle_directive) registers
//!    a newly arrived directive and runs [`on_pre_handle`](CapabilityAgent::on_pre_handle).
//! 2. [`handle_directive`](CapabilityAgent::handle_directive) runs
//!    [`on_handle`](CapabilityAgent::on_handle) for a registered directive.
//! 3. [`cancel_directive`](CapabilityAgent::cancel_directive) flags the record
//!    and runs [`on_cancel`](CapabilityAgent::on_cancel).
//! 4. [`remove_directive`](CapabilityAgent::remove_directive) drops the record.
//!
//! Hooks run outside the registry lock and may be invoked concurrently for
//! the same message id; a running `on_handle` learns about a cancel only by
//! polling [`DirectiveRecord::is_cancelled`].
//!
//! The core never removes a record on its own. The agent must call
//! `remove_directive` once processing has finished on every exit path
//! (success, failure or cancel), otherwise the entry stays registered and its
//! message id cannot be reused. A panic inside a hook propagates to the caller
//! and leaves the record in place.

pub mod base;

pub use self::base::{CapabilityAgentCore, MESSAGE_ID_IN_USE, MESSAGE_ID_NOT_FOUND};

use std::sync::Arc;

use log::Level;
use serde::{Deserialize, Serialize};

use self::base::TAG;
use crate::directive::{Directive, DirectiveHandlerResult};
use crate::event_builder;
use crate::logger::LogEntry;
use crate::registry::DirectiveRecord;

/// Audio focus granted to an agent's activity channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FocusState {
    Foreground,
    Background,
    None,
}

/// Why a context request could not be fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextRequestError {
    /// A state provider did not answer in time.
    StateProviderTimedOut,
    /// The context could not be assembled.
    BuildContextError,
}

/// A handler for the directives of one namespace.
pub trait CapabilityAgent: Send + Sync {
    fn core(&self) -> &CapabilityAgentCore;

    /// Prepare a newly registered directive ahead of `on_handle`.
    fn on_pre_handle(&self, record: &DirectiveRecord);

    /// Process a registered directive and report through its result handle.
    fn on_handle(&self, record: &DirectiveRecord);

    /// Stop processing a directive. The record is already flagged cancelled.
    fn on_cancel(&self, record: &DirectiveRecord);

    /// Build the record stored for an accepted directive.
    fn create_directive_record(
        &self,
        directive: Arc<Directive>,
        result: Box<dyn DirectiveHandlerResult>,
    ) -> DirectiveRecord {
        DirectiveRecord::new(directive, result)
    }

    /// The agent is no longer registered with the directive sequencer.
    fn on_deregistered(&self) {}

    fn on_focus_changed(&self, _new_focus: FocusState) {}

    /// Provide this agent's state for the context request `_state_request_token`.
    fn provide_state(&self, _state_request_token: u32) {}

    fn on_context_available(&self, _json_context: &str) {}

    fn on_context_failure(&self, _error: ContextRequestError) {}

    fn namespace(&self) -> &str {
        self.core().namespace()
    }

    /// Accept a newly arrived directive.
    ///
    /// A directive whose message id is still registered is a duplicate: its
    /// own result handle is failed with [`MESSAGE_ID_IN_USE`], the exception
    /// sender is notified with [`InternalError`](crate::exception::ExceptionErrorType::InternalError),
    /// and the registered record is left untouched.
    fn pre_handle_directive(
        &self,
        directive: Arc<Directive>,
        result: Box<dyn DirectiveHandlerResult>,
    ) {
        let core = self.core();
        let message_id = directive.message_id();
        if core.registry().contains(message_id) {
            core.reject_duplicate(&directive, Some(result));
            return;
        }

        LogEntry::new(TAG, "addingMessageIdToMap")
            .d("messageId", message_id)
            .emit(core.logger(), Level::Debug);
        let record = self.create_directive_record(Arc::clone(&directive), result);
        match core.registry().insert(message_id, record) {
            Ok(record) => self.on_pre_handle(&record),
            // Another thread registered the id between the check and the insert.
            Err(record) => core.reject_duplicate(&directive, record.into_result()),
        }
    }

    /// Dispatch a registered directive to `on_handle`.
    ///
    /// Returns `false` if no directive is registered under `message_id`.
    /// `true` only means the directive was dispatched; its outcome is reported
    /// through the record's result handle.
    fn handle_directive(&self, message_id: &str) -> bool {
        match self.core().lookup_or_log(message_id, "handleDirectiveFailed") {
            Some(record) => {
                self.on_handle(&record);
                true
            }
            None => false,
        }
    }

    /// Flag a registered directive as cancelled and dispatch it to `on_cancel`.
    ///
    /// Unknown message ids are only logged.
    fn cancel_directive(&self, message_id: &str) {
        if let Some(record) = self.core().lookup_or_log(message_id, "cancelDirectiveFailed") {
            record.mark_cancelled();
            self.on_cancel(&record);
        }
    }

    /// Drop the record for `message_id`. Removing an unknown id is a no-op.
    fn remove_directive(&self, message_id: &str) {
        let core = self.core();
        LogEntry::new(TAG, "removingMessageIdFromMap")
            .d("messageId", message_id)
            .emit(core.logger(), Level::Debug);
        core.registry().remove(message_id);
    }

    /// Build an event in this agent's namespace. See
    /// [`event_builder::build_json_event_string`].
    fn build_json_event_string(
        &self,
        event_name: &str,
        dialog_request_id: &str,
        payload: &str,
        context: &str,
    ) -> (String, String) {
        let core = self.core();
        event_builder::build_json_event_string(
            core.namespace(),
            event_name,
            dialog_request_id,
            payload,
            context,
            core.logger(),
        )
    }
}
