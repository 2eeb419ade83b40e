use cctv_bridge::cli;
use cctv_bridge::common::logging_setup;
use cctv_bridge::config_loader;
use cctv_bridge::core::camera_manager::CameraManager;
use cctv_bridge::operations;
use log::{info, error, debug};
use anyhow::{Context, Result, bail};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<()> {
    let main_start_time = Instant::now();
    let matches = cli::build_cli().get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map(|s| s.as_str())
        .unwrap_or(cli::DEFAULT_CONFIG_PATH);

    let master_config = match config_loader::load_config(config_path) {
        Ok(cfg) => {
            logging_setup::initialize_logging(Some(&cfg), &matches);
            info!("✅ Configuration loaded from: {}", config_path);
            cfg
        }
        Err(e) => {
            logging_setup::initialize_logging(None, &matches);
            error!("❌ Failed to load master configuration from '{}': {:#}. Exiting.", config_path, e);
            return Err(e);
        }
    };

    let camera_manager = CameraManager::new(&master_config)
        .context("Failed to initialize CameraManager")?;
    info!("🚀 cctv-bridge starting with {} cameras configured.", camera_manager.len());

    let Some((operation_name, sub_matches)) = matches.subcommand() else {
        info!("🤔 No subcommand provided. Run with --help to see the available commands.");
        return Ok(());
    };

    debug!("🎬 Dispatching to subcommand: {}", operation_name);
    let op_start_time = Instant::now();
    let op_result: Result<()> = match operation_name {
        "stream" => operations::stream_op::handle_stream_cli(&master_config, &camera_manager, sub_matches).await,
        "play" => operations::player_op::handle_play_cli(&master_config, &camera_manager, sub_matches).await,
        "list" => operations::list_op::handle_list_cli(&camera_manager),
        "test" => operations::diagnostic_op::handle_diagnostic_cli(&master_config, &camera_manager).await,
        other => bail!("Subcommand '{}' not implemented.", other),
    };

    if let Err(e) = op_result {
        error!("❌ Operation '{}' failed after {:?}: {:#}", operation_name, op_start_time.elapsed(), e);
        return Err(e);
    }
    info!("🏁 Operation '{}' finished in {:?} (total {:?}).", operation_name, op_start_time.elapsed(), main_start_time.elapsed());
    Ok(())
}
