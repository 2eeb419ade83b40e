use crate::bridge_settings::BridgeSettings;
use crate::broker::{SessionBroker, SessionDescriptor};
use crate::camera_config::CameraConfig;
use crate::config_loader::MasterConfig;
use crate::core::camera_manager::{CameraManager, parse_camera_selectors};
use crate::errors::AppError;
use anyhow::{Context, Result};
use clap::ArgMatches;
use futures::future::join_all;
use log::{info, error, warn, debug};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Outcome of brokering a session for one camera.
pub struct CameraSessionResult {
    pub camera: Arc<CameraConfig>,
    pub result: Result<SessionDescriptor, AppError>,
}

/// Resolve the cameras an operation should act on.
///
/// With no `--cameras` argument every active camera is targeted. An explicit
/// selector that matches nothing is an error rather than a silent skip.
pub fn determine_target_cameras(
    camera_manager: &CameraManager,
    selectors_arg: Option<&String>,
    operation_display_name: &str,
) -> Result<Vec<Arc<CameraConfig>>> {
    match parse_camera_selectors(selectors_arg) {
        Some(selectors) => {
            debug!("  Resolving cameras {:?} for '{}'", selectors, operation_display_name);
            selectors
                .iter()
                .map(|selector| camera_manager.resolve(selector).map_err(anyhow::Error::from))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Failed to select cameras for '{}'", operation_display_name))
        }
        None => {
            let cameras = camera_manager.active_cameras();
            debug!("  Using all {} active camera(s) for '{}'", cameras.len(), operation_display_name);
            Ok(cameras)
        }
    }
}

/// Broker one session per camera, each in its own Tokio task.
///
/// All tasks share the same settings snapshot so a single invocation never
/// mixes settings. Results come back in the order of `cameras`.
pub async fn broker_sessions(
    broker: &SessionBroker,
    settings: &BridgeSettings,
    cameras: &[Arc<CameraConfig>],
    operation_display_name: &str,
) -> Vec<CameraSessionResult> {
    let op_helper_start_time = Instant::now();
    info!("🔄 Brokering {} session(s) for '{}'...", cameras.len(), operation_display_name);

    let settings_arc = Arc::new(settings.clone());
    let mut tasks: Vec<JoinHandle<Result<SessionDescriptor, AppError>>> = Vec::new();
    for camera in cameras {
        let task_broker = broker.clone();
        let task_settings = Arc::clone(&settings_arc);
        let descriptor = camera.descriptor();
        tasks.push(tokio::spawn(async move {
            task_broker.request_stream(&task_settings, &descriptor).await
        }));
    }

    let results = join_all(tasks).await;
    let mut outcomes = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (camera, task_result) in cameras.iter().zip(results) {
        let result = match task_result {
            Ok(result) => result,
            Err(join_err) => {
                error!("💀 Task execution failed (panic or cancellation) for camera '{}': {}", camera.name, join_err);
                Err(AppError::upstream(format!("session task failed: {}", join_err)))
            }
        };
        if let Err(e) = &result {
            failures += 1;
            debug!("  Camera '{}' failed during '{}': {}", camera.name, operation_display_name, e);
        }
        outcomes.push(CameraSessionResult {
            camera: Arc::clone(camera),
            result,
        });
    }

    if failures == 0 {
        info!("✅ All {} session(s) brokered for '{}' in {:?}.", outcomes.len(), operation_display_name, op_helper_start_time.elapsed());
    } else {
        warn!(
            "⚠️ '{}' finished with {} failure(s) out of {} camera(s) in {:?}.",
            operation_display_name, failures, outcomes.len(), op_helper_start_time.elapsed()
        );
    }
    outcomes
}

pub fn determine_operation_output_dir(
    master_config: &MasterConfig,
    args: &ArgMatches,
    output_cli_arg_key: &str,
    default_output_subdir: Option<&str>,
    operation_display_name: &str,
) -> Result<PathBuf> {
    let output_dir = match args.get_one::<String>(output_cli_arg_key) {
        Some(path_str) => {
            debug!("  Output directory specified via CLI for '{}': {}", operation_display_name, path_str);
            PathBuf::from(path_str)
        }
        None => {
            let mut dir = PathBuf::from(&master_config.app_settings.output_directory);
            if let Some(subdir) = default_output_subdir {
                dir.push(subdir);
            }
            debug!("  Using default output directory for '{}': {}", operation_display_name, dir.display());
            dir
        }
    };
    let dir_str = output_dir.to_string_lossy().to_string();
    crate::common::file_utils::ensure_output_directory(&dir_str)
        .with_context(|| format!("❌ Failed to prepare output directory '{}' for '{}'", dir_str, operation_display_name))
}
