//! Bridge-HTTP branch: ask the external bridge to provision a stream and
//! normalize whatever shape of response it sends back.

use crate::bridge_settings::BridgeSettings;
use crate::broker::session::SessionDescriptor;
use crate::camera_config::CameraDescriptor;
use crate::errors::AppError;
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

pub const STREAMS_ENDPOINT: &str = "/api/streams";

/// Response fields that may carry the playback URL, in priority order.
/// Different bridge vendors use different names.
pub const PLAYBACK_URL_FIELDS: [&str; 3] = ["playback_url", "url", "hls_url"];

#[derive(Debug, Serialize)]
struct StreamRequest<'a> {
    source: &'a str,
    protocol: &'a str,
    username: &'a str,
    password: &'a str,
    camera_id: u64,
    session_ttl: i64,
}

pub async fn request_bridge_session(
    http_client: &Client,
    settings: &BridgeSettings,
    camera: &CameraDescriptor,
) -> Result<SessionDescriptor, AppError> {
    if settings.bridge_base_url.is_empty() {
        return Err(AppError::Configuration(
            "bridge base URL not configured".to_string(),
        ));
    }

    let protocol = settings.protocol.as_str();
    let payload = StreamRequest {
        source: &camera.stream_url,
        protocol,
        username: camera.username.as_deref().unwrap_or(""),
        password: camera.password.as_deref().unwrap_or(""),
        camera_id: camera.id,
        session_ttl: settings.session_ttl_seconds,
    };
    let endpoint = format!("{}{}", settings.bridge_base_url, STREAMS_ENDPOINT);
    debug!("Requesting {} session for camera {} from {}", protocol, camera.id, endpoint);
    let request_start = Instant::now();

    let mut request = http_client
        .post(&endpoint)
        .header(CONTENT_TYPE, "application/json")
        .json(&payload);
    if let Some(api_key) = settings.api_key.as_deref() {
        request = request.bearer_auth(api_key);
    }

    let response = request
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| {
            error!("❌ Bridge request failed for camera {} after {:?}: {}", camera.id, request_start.elapsed(), e);
            AppError::upstream_with("bridge service unavailable", e)
        })?;

    let body = response.text().await.map_err(|e| {
        error!("❌ Failed to read bridge response for camera {}: {}", camera.id, e);
        AppError::upstream_with("bridge service unavailable", e)
    })?;

    let data: Value = match serde_json::from_str(&body) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) | Err(_) => {
            error!("Bridge returned a non-JSON payload: {}", body);
            return Err(AppError::upstream("unexpected response from bridge"));
        }
    };

    let playback_url = extract_playback_url(&data)
        .ok_or_else(|| AppError::upstream("bridge did not return a playback URL"))?;
    let expires_at = compute_expires_at(
        data.get("expires_in"),
        settings.session_ttl_seconds,
        Utc::now(),
    );
    let protocol = data
        .get("protocol")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .unwrap_or(protocol)
        .to_string();

    info!(
        "Bridge session granted for camera {} via protocol {} in {:?}",
        camera.id,
        protocol,
        request_start.elapsed()
    );
    Ok(SessionDescriptor {
        playback_url,
        protocol,
        expires_at,
        raw_response: Some(data),
    })
}

/// First non-empty string among [`PLAYBACK_URL_FIELDS`].
pub fn extract_playback_url(data: &Value) -> Option<String> {
    PLAYBACK_URL_FIELDS
        .iter()
        .filter_map(|field| data.get(*field).and_then(Value::as_str))
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

/// Expiry for a bridge session. A usable `expires_in` from the response wins,
/// otherwise the configured TTL applies. An `expires_in` that is present but
/// not an integer yields no expiry instead of an error.
pub fn compute_expires_at(
    expires_in: Option<&Value>,
    fallback_ttl_seconds: i64,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let seconds = match expires_in.filter(|value| is_truthy(value)) {
        Some(value) => parse_seconds(value)?,
        None if fallback_ttl_seconds != 0 => fallback_ttl_seconds,
        None => return None,
    };
    Duration::try_seconds(seconds).and_then(|delta| now.checked_add_signed(delta))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn parse_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}
