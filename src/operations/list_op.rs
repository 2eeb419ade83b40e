use crate::core::camera_manager::CameraManager;
use anyhow::Result;
use log::{info, warn};

pub fn handle_list_cli(camera_manager: &CameraManager) -> Result<()> {
    if camera_manager.is_empty() {
        warn!("⚠️ No cameras configured.");
        return Ok(());
    }
    let cameras = camera_manager.get_all_cameras();
    info!("📋 {} camera(s) configured.", camera_manager.len());

    println!(
        "{:>5}  {:>4}  {:<24} {:<16} {:<8} {:<24} {:<8} {}",
        "ID", "SEQ", "NAME", "GROUP", "SOURCE", "LOCATION", "STATUS", "ACTIVE"
    );
    for camera in cameras {
        println!(
            "{:>5}  {:>4}  {:<24} {:<16} {:<8} {:<24} {:<8} {}",
            camera.id,
            camera.sequence,
            camera.name,
            camera.group.as_deref().unwrap_or("-"),
            camera.protocol.to_string(),
            camera.location.as_deref().unwrap_or("-"),
            camera.status.to_string(),
            if camera.is_active { "yes" } else { "no" }
        );
    }

    let groups = camera_manager.groups();
    if !groups.is_empty() {
        println!();
        println!("{:<16} {:>7}  {:>5}  {}", "GROUP", "CAMERAS", "COLOR", "DESCRIPTION");
        for group in groups {
            println!(
                "{:<16} {:>7}  {:>5}  {}",
                group.name,
                camera_manager.camera_count(&group.name),
                group.color,
                group.description.as_deref().unwrap_or("-")
            );
        }
    }
    Ok(())
}
