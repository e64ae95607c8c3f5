//! Exception reporting to the remote service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification attached to an exception report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExceptionErrorType {
    /// The directive could not be parsed or was malformed.
    UnexpectedInformationReceived,
    /// The directive asked for an operation this client does not support.
    UnsupportedOperation,
    /// The client failed internally while processing the directive.
    InternalError,
}

impl fmt::Display for ExceptionErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExceptionErrorType::UnexpectedInformationReceived => "UNEXPECTED_INFORMATION_RECEIVED",
            ExceptionErrorType::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            ExceptionErrorType::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", name)
    }
}

/// Notified when a directive cannot be processed.
///
/// Fire-and-forget: implementations must not block the caller on I/O.
pub trait ExceptionEncounteredSender: Send + Sync {
    fn send_exception_encountered(
        &self,
        unparsed_directive: &str,
        error_type: ExceptionErrorType,
        message: &str,
    );
}
