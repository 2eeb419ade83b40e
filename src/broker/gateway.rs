//! WebRTC branch: the gateway provisions streams on demand at a path, so the
//! session is pure URL construction against its WHEP endpoint.

use crate::bridge_settings::BridgeSettings;
use crate::broker::session::SessionDescriptor;
use crate::camera_config::CameraDescriptor;
use crate::errors::AppError;
use log::debug;
use serde_json::json;

pub const WEBRTC_PROTOCOL: &str = "webrtc";

/// Gateway path for a camera: explicit gateway path, else identifier, else
/// `camera-<id>`, without surrounding slashes.
pub fn gateway_path(camera: &CameraDescriptor) -> String {
    let raw = non_empty(camera.gateway_path.as_deref())
        .or_else(|| non_empty(camera.identifier.as_deref()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("camera-{}", camera.id));
    raw.trim_matches('/').to_string()
}

pub fn whep_session(
    settings: &BridgeSettings,
    camera: &CameraDescriptor,
) -> Result<SessionDescriptor, AppError> {
    if settings.gateway_base_url.is_empty() {
        return Err(AppError::Configuration(
            "gateway base URL not configured".to_string(),
        ));
    }

    let path = gateway_path(camera);
    // A path made only of slashes collapses to empty; fall back to the bare id.
    let segment = if path.is_empty() {
        camera.id.to_string()
    } else {
        path.clone()
    };
    let playback_url = format!("{}/{}/whep", settings.gateway_base_url, segment);
    debug!("WHEP endpoint for camera {}: {}", camera.id, playback_url);

    Ok(SessionDescriptor {
        playback_url,
        protocol: WEBRTC_PROTOCOL.to_string(),
        expires_at: None,
        raw_response: Some(json!({ "path": path })),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
