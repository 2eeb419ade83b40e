// Shared helpers for the integration tests.
#![allow(dead_code)]

use cctv_bridge::bridge_settings::{
    KEY_BRIDGE_API_KEY, KEY_BRIDGE_BASE_URL, KEY_BRIDGE_PROTOCOL, KEY_GATEWAY_BASE_URL,
    KEY_SESSION_TTL,
};
use cctv_bridge::{BridgeSettings, CameraDescriptor, MapSettingsStore};
use wiremock::MockServer;

pub fn bridge_settings(base_url: &str, protocol: &str) -> BridgeSettings {
    BridgeSettings::from_store(
        &MapSettingsStore::new()
            .with(KEY_BRIDGE_BASE_URL, base_url)
            .with(KEY_BRIDGE_PROTOCOL, protocol),
    )
}

pub fn bridge_settings_with(base_url: &str, protocol: &str, api_key: &str, ttl: &str) -> BridgeSettings {
    BridgeSettings::from_store(
        &MapSettingsStore::new()
            .with(KEY_BRIDGE_BASE_URL, base_url)
            .with(KEY_BRIDGE_PROTOCOL, protocol)
            .with(KEY_BRIDGE_API_KEY, api_key)
            .with(KEY_SESSION_TTL, ttl),
    )
}

pub fn webrtc_settings(gateway_base_url: &str, bridge_base_url: &str) -> BridgeSettings {
    BridgeSettings::from_store(
        &MapSettingsStore::new()
            .with(KEY_BRIDGE_PROTOCOL, "webrtc")
            .with(KEY_GATEWAY_BASE_URL, gateway_base_url)
            .with(KEY_BRIDGE_BASE_URL, bridge_base_url),
    )
}

pub fn mock_camera(id: u64) -> CameraDescriptor {
    let mut camera = CameraDescriptor::new(id, format!("rtsp://10.0.0.{}/stream1", id));
    camera.username = Some("viewer".to_string());
    camera.password = Some("secret".to_string());
    camera
}

pub async fn start_mock_bridge() -> MockServer {
    MockServer::start().await
}

pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or(0)
}
