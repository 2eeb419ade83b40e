//! Session broker: turns a camera descriptor plus a bridge settings snapshot
//! into a playable session, via the WebRTC gateway or the bridge HTTP API.

pub mod bridge_http;
pub mod gateway;
pub mod session;

pub use session::SessionDescriptor;

use crate::bridge_settings::{BridgeSettings, OutputProtocol};
use crate::camera_config::CameraDescriptor;
use crate::errors::AppError;
use log::debug;
use reqwest::Client;
use std::time::Duration;

pub const BRIDGE_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Stateless apart from the HTTP client's connection pool; clone freely
/// across tasks.
#[derive(Clone)]
pub struct SessionBroker {
    http_client: Client,
}

impl SessionBroker {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(BRIDGE_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpClient(format!("Failed to build bridge HTTP client: {}", e)))?;
        Ok(SessionBroker { http_client })
    }

    /// Broker one playback session. No retries: a failed bridge call is
    /// returned to the caller as is.
    pub async fn request_stream(
        &self,
        settings: &BridgeSettings,
        camera: &CameraDescriptor,
    ) -> Result<SessionDescriptor, AppError> {
        debug!("Brokering {} session for camera {}", settings.protocol, camera.id);
        match settings.protocol {
            OutputProtocol::WebRtc => gateway::whep_session(settings, camera),
            _ => bridge_http::request_bridge_session(&self.http_client, settings, camera).await,
        }
    }
}
