use crate::common::timestamp_utils;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Playback handle returned to the caller. Built fresh per request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionDescriptor {
    pub playback_url: String,
    pub protocol: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub raw_response: Option<Value>,
}

impl SessionDescriptor {
    /// JSON payload handed to clients: `expires_at` is a UTC timestamp string
    /// or `false`, and `meta` carries the backend response when there is one.
    pub fn client_payload(&self, camera_id: u64) -> Value {
        let mut payload = Map::new();
        payload.insert("camera_id".to_string(), json!(camera_id));
        payload.insert("playback_url".to_string(), json!(self.playback_url));
        payload.insert("protocol".to_string(), json!(self.protocol));
        payload.insert(
            "expires_at".to_string(),
            self.expires_at
                .map(|at| json!(timestamp_utils::format_session_timestamp(&at)))
                .unwrap_or(Value::Bool(false)),
        );
        if let Some(meta) = self.raw_response.as_ref().filter(|raw| !is_empty_value(raw)) {
            payload.insert("meta".to_string(), meta.clone());
        }
        Value::Object(payload)
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
