//! Bridge configuration: the key/value settings store and the per-request
//! snapshot the session broker consumes.

use log::{debug, warn};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::fmt;

pub const KEY_BRIDGE_BASE_URL: &str = "cctv.bridge_base_url";
pub const KEY_BRIDGE_API_KEY: &str = "cctv.bridge_api_key";
pub const KEY_BRIDGE_PROTOCOL: &str = "cctv.bridge_protocol";
pub const KEY_SESSION_TTL: &str = "cctv.bridge_session_ttl";
pub const KEY_GATEWAY_BASE_URL: &str = "cctv.gateway_base_url";

pub const DEFAULT_PROTOCOL: &str = "hls";
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 60;

/// Read access to string-valued settings.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// Settings held in memory, deserialized from the `bridge:` section of the
/// config file. Scalar YAML values are exposed as strings.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MapSettingsStore {
    params: HashMap<String, Value>,
}

impl MapSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.params.insert(key.to_string(), Value::String(value.into()));
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

// Values may hold secrets; only the keys are shown.
impl fmt::Debug for MapSettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.params.keys().collect();
        keys.sort();
        f.debug_struct("MapSettingsStore").field("keys", &keys).finish()
    }
}

impl SettingsStore for MapSettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.params.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                warn!("Setting '{}' is not a scalar value ({:?}); ignoring it.", key, other);
                None
            }
        }
    }
}

/// Output protocol requested from the streaming backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputProtocol {
    #[default]
    Hls,
    WebRtc,
    /// Any other protocol name, passed through to the bridge verbatim.
    Other(String),
}

impl OutputProtocol {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "hls" => OutputProtocol::Hls,
            "webrtc" => OutputProtocol::WebRtc,
            other => OutputProtocol::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OutputProtocol::Hls => "hls",
            OutputProtocol::WebRtc => "webrtc",
            OutputProtocol::Other(name) => name,
        }
    }

    pub fn is_webrtc(&self) -> bool {
        matches!(self, OutputProtocol::WebRtc)
    }
}

impl fmt::Display for OutputProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consistent snapshot of the bridge settings, read once per request.
#[derive(Clone, PartialEq)]
pub struct BridgeSettings {
    pub bridge_base_url: String,
    pub protocol: OutputProtocol,
    pub api_key: Option<String>,
    pub session_ttl_seconds: i64,
    pub gateway_base_url: String,
}

impl BridgeSettings {
    pub fn from_store(store: &dyn SettingsStore) -> Self {
        let settings = BridgeSettings {
            bridge_base_url: normalize_base_url(store.get(KEY_BRIDGE_BASE_URL)),
            protocol: OutputProtocol::parse(&store.get_or(KEY_BRIDGE_PROTOCOL, DEFAULT_PROTOCOL)),
            api_key: store.get(KEY_BRIDGE_API_KEY).filter(|key| !key.is_empty()),
            session_ttl_seconds: parse_session_ttl(store.get(KEY_SESSION_TTL).as_deref()),
            gateway_base_url: normalize_base_url(store.get(KEY_GATEWAY_BASE_URL)),
        };
        debug!("Bridge settings snapshot: {:?}", settings);
        settings
    }
}

// The API key must never end up in logs.
impl fmt::Debug for BridgeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeSettings")
            .field("bridge_base_url", &self.bridge_base_url)
            .field("protocol", &self.protocol)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("gateway_base_url", &self.gateway_base_url)
            .finish()
    }
}

fn normalize_base_url(raw: Option<String>) -> String {
    raw.map(|url| url.trim().trim_end_matches('/').to_string())
        .unwrap_or_default()
}

fn parse_session_ttl(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return DEFAULT_SESSION_TTL_SECONDS;
    };
    match raw.trim().parse::<i64>() {
        Ok(ttl) => ttl,
        Err(_) => {
            warn!(
                "Unparsable session TTL '{}', falling back to {} seconds.",
                raw, DEFAULT_SESSION_TTL_SECONDS
            );
            DEFAULT_SESSION_TTL_SECONDS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_yields_defaults() {
        let settings = BridgeSettings::from_store(&MapSettingsStore::new());
        assert_eq!(settings.bridge_base_url, "");
        assert_eq!(settings.gateway_base_url, "");
        assert_eq!(settings.protocol, OutputProtocol::Hls);
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.session_ttl_seconds, 60);
    }

    #[test]
    fn strips_trailing_slashes_from_base_urls() {
        let store = MapSettingsStore::new()
            .with(KEY_BRIDGE_BASE_URL, " http://bridge:8080// ")
            .with(KEY_GATEWAY_BASE_URL, "http://gw:8889/");
        let settings = BridgeSettings::from_store(&store);
        assert_eq!(settings.bridge_base_url, "http://bridge:8080");
        assert_eq!(settings.gateway_base_url, "http://gw:8889");
    }

    #[test]
    fn unparsable_ttl_falls_back_to_sixty() {
        let store = MapSettingsStore::new().with(KEY_SESSION_TTL, "soon");
        assert_eq!(BridgeSettings::from_store(&store).session_ttl_seconds, 60);

        let store = MapSettingsStore::new().with(KEY_SESSION_TTL, "120");
        assert_eq!(BridgeSettings::from_store(&store).session_ttl_seconds, 120);
    }

    #[test]
    fn empty_api_key_is_absent() {
        let store = MapSettingsStore::new().with(KEY_BRIDGE_API_KEY, "");
        assert_eq!(BridgeSettings::from_store(&store).api_key, None);
    }

    #[test]
    fn protocol_parsing() {
        assert_eq!(OutputProtocol::parse(""), OutputProtocol::Hls);
        assert_eq!(OutputProtocol::parse("webrtc"), OutputProtocol::WebRtc);
        assert_eq!(OutputProtocol::parse("rtmp"), OutputProtocol::Other("rtmp".to_string()));
        assert_eq!(OutputProtocol::parse("rtmp").as_str(), "rtmp");
    }

    #[test]
    fn yaml_scalars_are_stringified() {
        let store: MapSettingsStore = serde_yaml::from_str(
            "cctv.bridge_session_ttl: 45\ncctv.bridge_protocol: webrtc\ncctv.bridge_api_key: ~\n",
        )
        .unwrap();
        let settings = BridgeSettings::from_store(&store);
        assert_eq!(settings.session_ttl_seconds, 45);
        assert!(settings.protocol.is_webrtc());
        assert_eq!(settings.api_key, None);
    }

    #[test]
    fn debug_output_masks_api_key() {
        let store = MapSettingsStore::new().with(KEY_BRIDGE_API_KEY, "s3cret");
        let rendered = format!("{:?}", BridgeSettings::from_store(&store));
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("***"));
    }
}
