//! Completion sink for a single directive.

/// Reports the outcome of one directive back to the transport layer.
///
/// Completion consumes the handle, so each handle can be completed once.
/// Progress reports borrow it and may be sent any number of times before
/// completion.
pub trait DirectiveHandlerResult: Send {
    /// The directive was processed successfully.
    fn set_completed(self: Box<Self>);

    /// The directive could not be processed.
    fn set_failed(self: Box<Self>, description: &str);

    /// The directive is still being processed.
    fn report_in_progress(&self) {}
}
