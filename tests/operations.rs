mod common;

use cctv_bridge::cli;
use cctv_bridge::config_loader::{parse_config, MasterConfig};
use cctv_bridge::core::camera_manager::CameraManager;
use cctv_bridge::operations::{op_helper, player_op};
use cctv_bridge::SessionBroker;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(bridge_uri: &str, protocol: &str) -> MasterConfig {
    parse_config(&format!(
        r#"
bridge:
  cctv.bridge_base_url: {bridge_uri}
  cctv.bridge_protocol: {protocol}
  cctv.gateway_base_url: http://gw:8889
groups:
  - {{name: warehouse}}
cameras:
  - {{id: 1, name: lobby, sequence: 1, stream_url: "rtsp://cam/1", identifier: lobby-main, location: Entrance}}
  - {{id: 2, name: dock, sequence: 2, group: warehouse, stream_url: "rtsp://cam/2"}}
  - {{id: 3, name: parking, stream_url: "rtsp://cam/3", is_active: false}}
"#
    ))
    .unwrap()
}

async fn mount_camera(server: &MockServer, camera_id: u64, status: u16) {
    Mock::given(method("POST"))
        .and(path("/api/streams"))
        .and(body_partial_json(json!({"camera_id": camera_id})))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "playback_url": format!("http://bridge/hls/{}.m3u8", camera_id)
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn brokers_every_active_camera_independently() {
    let server = MockServer::start().await;
    mount_camera(&server, 1, 200).await;
    mount_camera(&server, 2, 502).await;

    let config = config_for(&server.uri(), "hls");
    let manager = CameraManager::new(&config).unwrap();
    let cameras = op_helper::determine_target_cameras(&manager, None, "test").unwrap();
    assert_eq!(cameras.len(), 2);

    let broker = SessionBroker::new().unwrap();
    let outcomes = op_helper::broker_sessions(&broker, &config.bridge_settings(), &cameras, "test").await;

    assert_eq!(outcomes[0].camera.id, 1);
    let session = outcomes[0].result.as_ref().unwrap();
    assert_eq!(session.playback_url, "http://bridge/hls/1.m3u8");
    let payload = session.client_payload(1);
    assert_eq!(payload["camera_id"], 1);
    assert!(payload["expires_at"].is_string());

    assert_eq!(outcomes[1].camera.id, 2);
    assert!(outcomes[1].result.as_ref().unwrap_err().is_upstream());
}

#[tokio::test]
async fn default_sequence_orders_by_name() {
    let config = parse_config(
        "cameras:\n  - {id: 1, name: lobby, stream_url: rtsp://a}\n  - {id: 2, name: dock, stream_url: rtsp://b}\n",
    )
    .unwrap();
    let manager = CameraManager::new(&config).unwrap();
    let cameras = op_helper::determine_target_cameras(&manager, None, "test").unwrap();
    let names: Vec<&str> = cameras.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["dock", "lobby"]);
    assert_eq!(manager.camera_count("warehouse"), 0);
}

#[tokio::test]
async fn unknown_selector_is_rejected() {
    let config = config_for("http://unused", "hls");
    let manager = CameraManager::new(&config).unwrap();
    let selectors = "lobby,attic".to_string();
    assert!(op_helper::determine_target_cameras(&manager, Some(&selectors), "test").is_err());

    let selectors = "3, lobby".to_string();
    let cameras = op_helper::determine_target_cameras(&manager, Some(&selectors), "test").unwrap();
    let ids: Vec<u64> = cameras.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![3, 1]);
}

#[tokio::test]
async fn play_writes_a_webrtc_player_page() {
    let config = config_for("", "webrtc");
    let manager = CameraManager::new(&config).unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let out_str = out_dir.path().to_str().unwrap();

    let matches = cli::build_cli()
        .try_get_matches_from(["cctv-bridge", "play", "--camera", "lobby", "-o", out_str])
        .unwrap();
    let (_, play_matches) = matches.subcommand().unwrap();
    player_op::handle_play_cli(&config, &manager, play_matches).await.unwrap();

    let pages: Vec<_> = std::fs::read_dir(out_dir.path()).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(pages.len(), 1);
    let file_name = pages[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("lobby_") && file_name.ends_with(".html"));

    let page = std::fs::read_to_string(&pages[0]).unwrap();
    assert!(page.contains("http://gw:8889/lobby-main/whep"));
    assert!(page.contains("Entrance"));
}

#[tokio::test]
async fn play_reports_missing_bridge_configuration() {
    let config = config_for("", "hls");
    let manager = CameraManager::new(&config).unwrap();
    let out_dir = tempfile::tempdir().unwrap();

    let matches = cli::build_cli()
        .try_get_matches_from(["cctv-bridge", "play", "--camera", "2", "-o", out_dir.path().to_str().unwrap()])
        .unwrap();
    let (_, play_matches) = matches.subcommand().unwrap();
    let err = player_op::handle_play_cli(&config, &manager, play_matches).await.unwrap_err();
    assert!(format!("{:#}", err).contains("bridge base URL not configured"));
    assert_eq!(std::fs::read_dir(out_dir.path()).unwrap().count(), 0);
}
