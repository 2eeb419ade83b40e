pub mod app_config;
pub mod bridge_settings;
pub mod broker;
pub mod camera_config;
pub mod cli;
pub mod common;
pub mod config_loader;
pub mod core;
pub mod errors;
pub mod operations;

pub use bridge_settings::{BridgeSettings, MapSettingsStore, OutputProtocol, SettingsStore};
pub use broker::{SessionBroker, SessionDescriptor};
pub use camera_config::{CameraConfig, CameraDescriptor};
pub use errors::AppError;
