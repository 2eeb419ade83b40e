use crate::broker::SessionBroker;
use crate::config_loader::MasterConfig;
use crate::core::camera_manager::CameraManager;
use crate::operations::op_helper::{self, CameraSessionResult};
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use log::{info, error};
use serde_json::Value;
use std::time::Instant;

pub async fn handle_stream_cli(
    master_config: &MasterConfig,
    camera_manager: &CameraManager,
    args: &ArgMatches,
) -> Result<()> {
    let op_start_time = Instant::now();
    let operation_display_name = "Stream Session";

    let cameras = op_helper::determine_target_cameras(
        camera_manager,
        args.get_one::<String>("cameras"),
        operation_display_name,
    )?;
    if cameras.is_empty() {
        info!("No cameras selected or active for {}. Exiting.", operation_display_name);
        return Ok(());
    }

    let broker = SessionBroker::new().context("Failed to create session broker")?;
    let settings = master_config.bridge_settings();
    let outcomes = op_helper::broker_sessions(&broker, &settings, &cameras, operation_display_name).await;

    let (output, failed) = collect_payloads(outcomes);
    println!("{}", serde_json::to_string_pretty(&output)?);

    if !failed.is_empty() {
        bail!(
            "{} of {} camera(s) failed: {}",
            failed.len(),
            cameras.len(),
            failed.join(", ")
        );
    }
    info!("🏁 {} finished in {:?}.", operation_display_name, op_start_time.elapsed());
    Ok(())
}

/// Client payloads for the successful sessions, always as a JSON array, plus the names of failed cameras.
pub fn collect_payloads(outcomes: Vec<CameraSessionResult>) -> (Value, Vec<String>) {
    let mut payloads = Vec::new();
    let mut failed = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(session) => {
                info!(
                    "🎥 Session for camera '{}' ({}): {}",
                    outcome.camera.name, session.protocol, session.playback_url
                );
                payloads.push(session.client_payload(outcome.camera.id));
            }
            Err(e) => {
                error!("❌ Could not broker a session for camera '{}': {:#}", outcome.camera.name, anyhow::Error::from(e));
                failed.push(outcome.camera.name.clone());
            }
        }
    }
    (Value::Array(payloads), failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::SessionDescriptor;
    use crate::camera_config::CameraConfig;
    use crate::errors::AppError;
    use std::sync::Arc;

    fn camera(id: u64, name: &str) -> Arc<CameraConfig> {
        Arc::new(
            serde_yaml::from_str(&format!("id: {}\nname: {}\nstream_url: rtsp://cam\n", id, name)).unwrap(),
        )
    }

    fn session(url: &str) -> SessionDescriptor {
        SessionDescriptor {
            playback_url: url.to_string(),
            protocol: "hls".to_string(),
            expires_at: None,
            raw_response: None,
        }
    }

    #[test]
    fn single_camera_still_yields_an_array() {
        let outcomes = vec![CameraSessionResult { camera: camera(1, "lobby"), result: Ok(session("http://b/1.m3u8")) }];
        let (output, failed) = collect_payloads(outcomes);
        assert!(failed.is_empty());
        let payloads = output.as_array().unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0]["camera_id"], 1);
        assert_eq!(payloads[0]["playback_url"], "http://b/1.m3u8");
    }

    #[test]
    fn failures_are_reported_by_name() {
        let outcomes = vec![
            CameraSessionResult { camera: camera(1, "lobby"), result: Ok(session("http://b/1.m3u8")) },
            CameraSessionResult { camera: camera(2, "dock"), result: Err(AppError::upstream("boom")) },
        ];
        let (output, failed) = collect_payloads(outcomes);
        assert_eq!(output.as_array().unwrap().len(), 1);
        assert_eq!(failed, vec!["dock".to_string()]);
    }
}
