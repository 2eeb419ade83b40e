pub mod camera_manager;
