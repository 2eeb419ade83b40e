use serde::Deserialize;
use std::env;
use std::fmt;
use log::debug;

/// Protocol the camera itself speaks at `stream_url`.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceProtocol {
    #[default]
    Rtsp,
    Rtmp,
    Hls,
    Webrtc,
}

impl fmt::Display for SourceProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceProtocol::Rtsp => "rtsp",
            SourceProtocol::Rtmp => "rtmp",
            SourceProtocol::Hls => "hls",
            SourceProtocol::Webrtc => "webrtc",
        };
        f.write_str(name)
    }
}

/// Last known reachability of a camera.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    #[default]
    Unknown,
    Online,
    Offline,
    Error,
}

impl fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CameraStatus::Unknown => "unknown",
            CameraStatus::Online => "online",
            CameraStatus::Offline => "offline",
            CameraStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Named collection of cameras, e.g. a site or a floor.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CameraGroup {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub color: u32, // Color index used by front ends
}

#[derive(Deserialize, Clone)]
pub struct CameraConfig {
    pub id: u64,
    pub name: String,
    #[serde(default = "default_sequence")]
    pub sequence: i32, // Listing order, ties broken by name
    pub group: Option<String>, // Name of an entry in `groups:`
    pub stream_url: String,
    #[serde(default)]
    pub protocol: SourceProtocol,
    pub username: Option<String>,
    pub password: Option<String>, // Falls back to <NAME>_PASSWORD env var when absent
    pub identifier: Option<String>,
    pub gateway_path: Option<String>, // e.g., "lobby/main" on the WebRTC gateway
    pub location: Option<String>,
    pub snapshot_url: Option<String>,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u32, // Seconds between stream token refreshes for vendor APIs
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub status: CameraStatus,
    pub note: Option<String>,
}

fn default_sequence() -> i32 {
    10
}

fn default_refresh_interval() -> u32 {
    60
}

fn default_active() -> bool {
    true
}

impl fmt::Debug for CameraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("sequence", &self.sequence)
            .field("group", &self.group)
            .field("protocol", &self.protocol)
            .field("identifier", &self.identifier)
            .field("gateway_path", &self.gateway_path)
            .field("location", &self.location)
            .field("is_active", &self.is_active)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl CameraConfig {
    /// Key for listing order: sequence first, then name.
    pub fn sort_key(&self) -> (i32, &str) {
        (self.sequence, self.name.as_str())
    }

    pub fn password_env_var(&self) -> String {
        format!("{}_PASSWORD", self.name.to_uppercase().replace(['-', ' '], "_"))
    }

    pub fn resolve_password(&self) -> Option<String> {
        if let Some(password) = self.password.as_ref().filter(|p| !p.is_empty()) {
            return Some(password.clone());
        }
        let env_var_name = self.password_env_var();
        match env::var(&env_var_name) {
            Ok(pass) => Some(pass),
            Err(_) => {
                debug!(
                    "No password stored or found in environment variable '{}' for camera '{}'",
                    env_var_name, self.name
                );
                None
            }
        }
    }

    pub fn descriptor(&self) -> CameraDescriptor {
        CameraDescriptor {
            id: self.id,
            stream_url: self.stream_url.clone(),
            username: self.username.clone(),
            password: self.resolve_password(),
            gateway_path: self.gateway_path.clone(),
            identifier: self.identifier.clone(),
        }
    }
}

/// The subset of a camera record the session broker needs.
#[derive(Clone, Default, PartialEq)]
pub struct CameraDescriptor {
    pub id: u64,
    pub stream_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub gateway_path: Option<String>,
    pub identifier: Option<String>,
}

impl CameraDescriptor {
    pub fn new(id: u64, stream_url: impl Into<String>) -> Self {
        CameraDescriptor {
            id,
            stream_url: stream_url.into(),
            ..Default::default()
        }
    }
}

impl fmt::Debug for CameraDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraDescriptor")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("gateway_path", &self.gateway_path)
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(name: &str) -> CameraConfig {
        serde_yaml::from_str(&format!(
            "id: 7\nname: {}\nstream_url: rtsp://10.0.0.7/live\n",
            name
        ))
        .unwrap()
    }

    #[test]
    fn record_defaults() {
        let cam = camera("lobby");
        assert_eq!(cam.protocol, SourceProtocol::Rtsp);
        assert!(cam.is_active);
        assert!(cam.gateway_path.is_none());
        assert_eq!(cam.sequence, 10);
        assert_eq!(cam.refresh_interval, 60);
        assert_eq!(cam.status, CameraStatus::Unknown);
        assert!(cam.group.is_none());
    }

    #[test]
    fn status_and_group_parse() {
        let cam: CameraConfig = serde_yaml::from_str(
            "id: 2\nname: dock\nstream_url: rtsp://x\nstatus: offline\ngroup: warehouse\nsequence: 3\n",
        )
        .unwrap();
        assert_eq!(cam.status, CameraStatus::Offline);
        assert_eq!(cam.group.as_deref(), Some("warehouse"));
        assert_eq!(cam.sort_key(), (3, "dock"));

        let group: CameraGroup = serde_yaml::from_str("name: warehouse\n").unwrap();
        assert_eq!(group.color, 0);
        assert!(group.description.is_none());
    }

    #[test]
    fn password_env_var_name() {
        assert_eq!(camera("front-door").password_env_var(), "FRONT_DOOR_PASSWORD");
        assert_eq!(camera("'back yard'").password_env_var(), "BACK_YARD_PASSWORD");
    }

    #[test]
    fn stored_password_wins_over_environment() {
        let mut cam = camera("garage-cam-unit-test");
        cam.password = Some("stored".to_string());
        env::set_var(cam.password_env_var(), "from-env");
        assert_eq!(cam.resolve_password().as_deref(), Some("stored"));

        cam.password = None;
        assert_eq!(cam.resolve_password().as_deref(), Some("from-env"));
        env::remove_var(cam.password_env_var());
    }

    #[test]
    fn debug_never_prints_password() {
        let mut descriptor = camera("lobby").descriptor();
        descriptor.password = Some("hunter2".to_string());
        assert!(!format!("{:?}", descriptor).contains("hunter2"));
    }
}
