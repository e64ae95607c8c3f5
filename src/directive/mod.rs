//! Directives received from the remote service.
//!
//! A [`Directive`] is immutable once built and is shared as `Arc<Directive>`
//! between the transport layer and the capability agent that owns it.

pub mod result;

pub use result::DirectiveHandlerResult;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AgentError, Result};

/// A command sent by the remote service, identified by a unique message id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    namespace: String,
    name: String,
    message_id: String,
    dialog_request_id: Option<String>,
    payload: String,
    unparsed: String,
}

#[derive(Deserialize)]
struct Envelope {
    directive: EnvelopeBody,
}

#[derive(Deserialize)]
struct EnvelopeBody {
    header: Header,
    #[serde(default)]
    payload: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Header {
    namespace: Option<String>,
    name: Option<String>,
    message_id: Option<String>,
    #[serde(default)]
    dialog_request_id: Option<String>,
}

impl Directive {
    /// Create a directive with an empty payload.
    ///
    /// The unparsed text defaults to an empty string; transports that keep the
    /// raw text should attach it with [`Directive::with_unparsed`].
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            message_id: message_id.into(),
            dialog_request_id: None,
            payload: "{}".to_string(),
            unparsed: String::new(),
        }
    }

    pub fn with_dialog_request_id(mut self, dialog_request_id: impl Into<String>) -> Self {
        self.dialog_request_id = Some(dialog_request_id.into());
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_unparsed(mut self, unparsed: impl Into<String>) -> Self {
        self.unparsed = unparsed.into();
        self
    }

    /// Parse a directive from its JSON envelope.
    ///
    /// Expects `{"directive":{"header":{...},"payload":{...}}}`. The header must
    /// carry `namespace`, `name` and `messageId`; `dialogRequestId` and the
    /// payload are optional. The input text is kept verbatim as the unparsed
    /// form used in exception reports.
    pub fn from_json(text: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(text)?;
        let header = envelope.directive.header;

        let namespace = require(header.namespace, "namespace")?;
        let name = require(header.name, "name")?;
        let message_id = require(header.message_id, "messageId")?;

        let payload = match envelope.directive.payload {
            Some(value) => serde_json::to_string(&value)?,
            None => "{}".to_string(),
        };

        Ok(Self {
            namespace,
            name,
            message_id,
            dialog_request_id: header.dialog_request_id.filter(|id| !id.is_empty()),
            payload,
            unparsed: text.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unique key correlating this directive with its in-flight record.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn dialog_request_id(&self) -> Option<&str> {
        self.dialog_request_id.as_deref()
    }

    /// The payload as a JSON string.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// The directive text exactly as it was received.
    pub fn unparsed(&self) -> &str {
        &self.unparsed
    }
}

fn require(field: Option<String>, key: &str) -> Result<String> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AgentError::InvalidDirective(format!("missing header field: {}", key))),
    }
}
