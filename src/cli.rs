use clap::{Arg, Command, ArgAction};

pub const DEFAULT_CONFIG_PATH: &str = "config/cctv.yaml";

pub fn build_cli() -> Command {
    Command::new("cctv-bridge")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Brokers short-lived CCTV playback sessions through a video bridge or WebRTC gateway.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom configuration file")
                .default_value(DEFAULT_CONFIG_PATH)
                .action(ArgAction::Set)
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
        )
        .subcommand(
            Command::new("stream")
                .about("Requests playback sessions and prints them as JSON")
                .arg(Arg::new("cameras").long("cameras").value_name("CAMERAS").help("Comma-separated camera ids or names (default: all active cameras)").action(ArgAction::Set))
        )
        .subcommand(
            Command::new("play")
                .about("Requests a playback session and writes an HTML player page for it")
                .arg(Arg::new("camera").long("camera").value_name("CAMERA").required(true).help("Camera id or name").action(ArgAction::Set))
                .arg(Arg::new("output").short('o').long("output").value_name("DIR").help("Output directory for the player page").action(ArgAction::Set))
        )
        .subcommand(
            Command::new("list")
                .about("Lists configured cameras")
        )
        .subcommand(
            Command::new("test")
                .about("Checks bridge settings and requests a session for every active camera")
        )
}
