use serde::Deserialize;
use std::fs;
use crate::app_config::ApplicationConfig;
use crate::bridge_settings::{BridgeSettings, MapSettingsStore};
use crate::camera_config::{CameraConfig, CameraGroup};
use crate::common::timestamp_utils;
use anyhow::{Result, Context, bail};
use std::collections::HashSet;
use log::{debug, info, warn};
use std::time::Instant;

#[derive(Debug, Deserialize, Clone)]
pub struct MasterConfig {
    #[serde(rename = "application", default)]
    pub app_settings: ApplicationConfig,
    #[serde(default)]
    pub bridge: MapSettingsStore,
    #[serde(default)]
    pub groups: Vec<CameraGroup>,
    pub cameras: Vec<CameraConfig>,
}

impl MasterConfig {
    /// Fresh snapshot of the bridge settings, read together in one pass.
    pub fn bridge_settings(&self) -> BridgeSettings {
        BridgeSettings::from_store(&self.bridge)
    }
}

pub fn load_config(path: &str) -> Result<MasterConfig> {
    debug!("📄 Attempting to load config from: {}", path);
    let start_time = Instant::now();

    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file '{}'. 📖", path))?;
    debug!("Read config file in {:?}", start_time.elapsed());

    let config = parse_config(&config_str)
        .with_context(|| format!("Invalid configuration in '{}'", path))?;

    info!("✅ Successfully loaded and validated configuration from '{}' in {:?}", path, start_time.elapsed());
    Ok(config)
}

pub fn parse_config(config_str: &str) -> Result<MasterConfig> {
    let parse_start_time = Instant::now();
    let config: MasterConfig = serde_yaml::from_str(config_str)
        .context("Failed to parse YAML configuration. 💔")?;
    debug!("Parsed YAML in {:?}", parse_start_time.elapsed());

    validate_master_config(&config).context("Master configuration validation failed 👎")?;
    Ok(config)
}

fn validate_master_config(config: &MasterConfig) -> Result<()> {
    debug!("🕵️ Validating master configuration...");
    let validation_start_time = Instant::now();

    let timestamp_format = &config.app_settings.filename_timestamp_format;
    if !timestamp_utils::is_valid_format(timestamp_format) {
        bail!("❌ Invalid filename_timestamp_format '{}'.", timestamp_format);
    }

    if config.cameras.is_empty() {
        bail!("❌ No cameras defined in the configuration.");
    }

    let mut group_names = HashSet::new();
    for group in &config.groups {
        if group.name.trim().is_empty() {
            bail!("❌ Camera group name cannot be empty.");
        }
        if !group_names.insert(group.name.as_str()) {
            bail!("❌ Duplicate camera group found: {}", group.name);
        }
    }

    let mut camera_ids = HashSet::new();
    let mut camera_names = HashSet::new();
    for (idx, camera) in config.cameras.iter().enumerate() {
        debug!("Validating camera #{}: {}", idx + 1, camera.name);
        if camera.name.trim().is_empty() {
            bail!("❌ Camera name cannot be empty for camera #{}.", idx + 1);
        }
        if !camera_ids.insert(camera.id) {
            bail!("❌ Duplicate camera id found: {}", camera.id);
        }
        if !camera_names.insert(camera.name.as_str()) {
            bail!("❌ Duplicate camera name found: {}", camera.name);
        }
        if camera.stream_url.trim().is_empty() {
            bail!("❌ Stream URL is required for camera '{}'.", camera.name);
        }
        if let Some(group) = &camera.group {
            if !group_names.contains(group.as_str()) {
                bail!("❌ Camera '{}' references unknown group '{}'.", camera.name, group);
            }
        }
        debug!("Camera '{}' validated successfully.", camera.name);
    }

    // Missing bridge settings are reported per request by the broker; only warn here.
    debug!("{} bridge setting(s) present.", config.bridge.len());
    let settings = config.bridge_settings();
    if settings.protocol.is_webrtc() && settings.gateway_base_url.is_empty() {
        warn!("⚠️ Protocol is webrtc but no gateway base URL is configured; stream requests will fail.");
    } else if !settings.protocol.is_webrtc() && settings.bridge_base_url.is_empty() {
        warn!("⚠️ No bridge base URL is configured; stream requests will fail.");
    }

    info!("👍 Master configuration validated successfully in {:?}.", validation_start_time.elapsed());
    Ok(())
}
