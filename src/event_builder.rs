//! Construction of outgoing event messages.

use log::{Level, Log};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::logger::LogEntry;

const TAG: &str = "EventBuilder";

/// Build the JSON for an event sent by a capability agent.
///
/// # Arguments
///
/// * `namespace` - Namespace of the sending agent.
/// * `event_name` - Name of the event.
/// * `dialog_request_id` - Dialog request id; omitted from the header when empty.
/// * `payload` - Payload as a JSON object string; empty means `{}`.
/// * `context` - Context as a JSON array string; empty means no context.
/// * `logger` - Receives a warning when `payload` or `context` is not valid JSON.
///
/// # Returns
///
/// `(header, event)`: the serialized header, which carries a freshly generated
/// `messageId`, and the complete event message.
pub fn build_json_event_string(
    namespace: &str,
    event_name: &str,
    dialog_request_id: &str,
    payload: &str,
    context: &str,
    logger: &dyn Log,
) -> (String, String) {
    let mut header = Map::new();
    header.insert("namespace".into(), Value::String(namespace.to_string()));
    header.insert("name".into(), Value::String(event_name.to_string()));
    header.insert("messageId".into(), Value::String(Uuid::new_v4().to_string()));
    if !dialog_request_id.is_empty() {
        header.insert(
            "dialogRequestId".into(),
            Value::String(dialog_request_id.to_string()),
        );
    }
    let header = Value::Object(header);

    let payload = parse_or(payload, json!({}), "payload", event_name, logger);
    let context = parse_or(context, json!([]), "context", event_name, logger);

    let header_text = header.to_string();
    let event = json!({
        "context": context,
        "event": {
            "header": header,
            "payload": payload,
        },
    });

    (header_text, event.to_string())
}

fn parse_or(text: &str, fallback: Value, field: &str, event_name: &str, logger: &dyn Log) -> Value {
    if text.trim().is_empty() {
        return fallback;
    }
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            LogEntry::new(TAG, "buildJsonEventStringWarning")
                .d("reason", "invalidJson")
                .d("field", field)
                .d("event", event_name)
                .m(e)
                .emit(logger, Level::Warn);
            fallback
        }
    }
}
