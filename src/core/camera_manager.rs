use crate::camera_config::{CameraConfig, CameraGroup};
use crate::config_loader::MasterConfig;
use crate::errors::AppError;
use anyhow::{Result, bail};
use log::{info, debug};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Read-only registry of camera records, keyed by id.
pub struct CameraManager {
    cameras: BTreeMap<u64, Arc<CameraConfig>>,
    groups: Vec<CameraGroup>,
}

impl CameraManager {
    pub fn new(master_config: &MasterConfig) -> Result<Self> {
        debug!("🛠️ Initializing CameraManager...");
        let start_time = Instant::now();
        let mut cameras = BTreeMap::new();
        for (idx, cam_config) in master_config.cameras.iter().enumerate() {
            debug!("  Processing camera config #{}: {}", idx + 1, cam_config.name);
            if cameras.contains_key(&cam_config.id) {
                bail!("❌ Duplicate camera id found in configuration: {}", cam_config.id);
            }
            cameras.insert(cam_config.id, Arc::new(cam_config.clone()));
            debug!("  Added camera '{}' (id {}) to manager.", cam_config.name, cam_config.id);
        }
        let groups = master_config.groups.clone();
        info!(
            "✅ CameraManager initialized with {} cameras in {} groups in {:?}.",
            cameras.len(),
            groups.len(),
            start_time.elapsed()
        );
        Ok(CameraManager { cameras, groups })
    }

    pub fn get_camera(&self, id: u64) -> Option<Arc<CameraConfig>> {
        self.cameras.get(&id).cloned()
    }

    pub fn find_by_name(&self, name: &str) -> Option<Arc<CameraConfig>> {
        self.cameras.values().find(|cam| cam.name == name).cloned()
    }

    /// Numeric selectors are camera ids, anything else is a camera name.
    pub fn resolve(&self, selector: &str) -> Result<Arc<CameraConfig>, AppError> {
        let selector = selector.trim();
        let found = match selector.parse::<u64>() {
            Ok(id) => self.get_camera(id),
            Err(_) => self.find_by_name(selector),
        };
        found.ok_or_else(|| AppError::NotFound(format!("No camera matches '{}'", selector)))
    }

    /// All cameras, ordered by sequence and then name.
    pub fn get_all_cameras(&self) -> Vec<Arc<CameraConfig>> {
        debug!("📷 Retrieving all configured cameras ({})", self.cameras.len());
        sorted(self.cameras.values().cloned().collect())
    }

    pub fn active_cameras(&self) -> Vec<Arc<CameraConfig>> {
        sorted(self.cameras.values().filter(|cam| cam.is_active).cloned().collect())
    }

    pub fn groups(&self) -> &[CameraGroup] {
        &self.groups
    }

    /// Number of cameras assigned to `group_name`.
    pub fn camera_count(&self, group_name: &str) -> usize {
        self.cameras
            .values()
            .filter(|cam| cam.group.as_deref() == Some(group_name))
            .count()
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}

fn sorted(mut cameras: Vec<Arc<CameraConfig>>) -> Vec<Arc<CameraConfig>> {
    cameras.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    cameras
}

// Helper to parse comma-separated camera selectors from CLI
pub fn parse_camera_selectors(selectors_opt: Option<&String>) -> Option<Vec<String>> {
    debug!("📝 Parsing camera selectors argument: {:?}", selectors_opt);
    selectors_opt.map(|selectors| {
        selectors.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
    })
}
