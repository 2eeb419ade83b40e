use crate::broker::{SessionBroker, SessionDescriptor};
use crate::camera_config::CameraConfig;
use crate::common::{file_utils, timestamp_utils};
use crate::config_loader::MasterConfig;
use crate::core::camera_manager::CameraManager;
use crate::errors::AppError;
use crate::operations::op_helper;
use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{info, debug};
use minijinja::{context, Environment};
use std::path::PathBuf;
use std::time::Instant;

const PLAYER_TEMPLATE_NAME: &str = "stream_player.html";
const PLAYER_TEMPLATE: &str = include_str!("../templates/stream_player.html");

/// Render the standalone player page for a brokered session.
pub fn render_player_page(camera: &CameraConfig, session: &SessionDescriptor) -> Result<String, AppError> {
    let mut env = Environment::new();
    // The .html suffix turns on HTML auto-escaping.
    env.add_template(PLAYER_TEMPLATE_NAME, PLAYER_TEMPLATE)?;
    let template = env.get_template(PLAYER_TEMPLATE_NAME)?;
    let page = template.render(context! {
        camera_name => &camera.name,
        location => camera.location.as_deref(),
        playback_url => &session.playback_url,
        protocol => &session.protocol,
        expires_at => session.expires_at.as_ref().map(timestamp_utils::format_session_timestamp),
    })?;
    Ok(page)
}

pub async fn handle_play_cli(
    master_config: &MasterConfig,
    camera_manager: &CameraManager,
    args: &ArgMatches,
) -> Result<()> {
    let op_start_time = Instant::now();
    let operation_display_name = "Player Page";

    let selector = args
        .get_one::<String>("camera")
        .context("--camera is required for the play command")?;
    let camera = camera_manager.resolve(selector)?;
    debug!("Rendering player for camera '{}' (id {})", camera.name, camera.id);

    let broker = SessionBroker::new().context("Failed to create session broker")?;
    let settings = master_config.bridge_settings();
    let session = broker
        .request_stream(&settings, &camera.descriptor())
        .await
        .with_context(|| format!("Failed to broker a session for camera '{}'", camera.name))?;

    let page = render_player_page(&camera, &session)?;
    let output_dir = op_helper::determine_operation_output_dir(
        master_config,
        args,
        "output",
        Some("players"),
        operation_display_name,
    )?;
    let filename = file_utils::generate_timestamped_filename(
        &camera.name,
        &master_config.app_settings.filename_timestamp_format,
        "html",
    )?;
    let page_path: PathBuf = output_dir.join(filename);
    tokio::fs::write(&page_path, page)
        .await
        .with_context(|| format!("Failed to write player page '{}'", page_path.display()))?;

    info!(
        "✅ Player page for camera '{}' written to {} in {:?}",
        camera.name,
        page_path.display(),
        op_start_time.elapsed()
    );
    println!("{}", page_path.display());
    Ok(())
}
