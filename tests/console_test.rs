use httpmock::prelude::*;
use hub_console::config::cli::{Command, ConfigCommand, StorageCommand};
use hub_console::core::{DeviceApi, StatusArea};
use hub_console::{Console, ConsoleConfig, HttpDeviceClient, HubError, MemoryStatus};
use serde_json::json;
use tempfile::TempDir;

fn setup(server: &MockServer) -> (HttpDeviceClient<MemoryStatus>, ConsoleConfig) {
    let mut settings = ConsoleConfig::default();
    settings.device.url = server.base_url();
    let client = HttpDeviceClient::new(&settings.device.url, MemoryStatus::new()).unwrap();
    (client, settings)
}

#[tokio::test]
async fn test_devices_lists_sensors_and_receivers() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/sensors/");
        then.status(200).json_body(json!({
            "sensors": [
                {"positionID": 0, "description": {"name": "BME280", "type": "environmental", "id": 0}},
                {"positionID": 1, "description": {"name": "SCD40", "type": "environmental", "id": 1}}
            ]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/signals/");
        then.status(200).json_body(json!({"receivers": []}));
    });

    let (client, settings) = setup(&server);
    let out = Console::new(&client, settings)
        .run(&Command::Devices)
        .await
        .unwrap();

    assert_eq!(
        out,
        "Sensors:\n[0] BME280 (environmental)\n[1] SCD40 (environmental)\nReceivers:\nNo active receivers\n"
    );
}

#[tokio::test]
async fn test_config_show_renders_fields() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/config/");
        then.status(200).json_body(json!({}));
    });

    let (client, settings) = setup(&server);
    let out = Console::new(&client, settings)
        .run(&Command::Config(ConfigCommand::Show))
        .await
        .unwrap();

    assert_eq!(out, "No configurable options\n");
}

#[tokio::test]
async fn test_bad_edit_never_reaches_device() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/config/");
        then.status(200).json_body(json!({"period": 10}));
    });
    let post_mock = server.mock(|when, then| {
        when.method(POST).path("/config");
        then.status(200).body("OK");
    });

    let (client, settings) = setup(&server);
    let err = Console::new(&client, settings)
        .run(&Command::Config(ConfigCommand::Set {
            assignments: vec!["period=later".to_string()],
        }))
        .await
        .unwrap_err();

    assert!(matches!(err, HubError::FormError { .. }));
    post_mock.assert_hits(0);
}

#[tokio::test]
async fn test_storage_get_saves_file() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/download")
            .query_param("path", "/log/today.csv");
        then.status(200).body("t,v\n1,2\n");
    });

    let (client, settings) = setup(&server);
    let output = temp_dir.path().join("today.csv");
    let out = Console::new(&client, settings)
        .run(&Command::Storage(StorageCommand::Get {
            path: "/log/today.csv".to_string(),
            output: Some(output.clone()),
        }))
        .await
        .unwrap();

    assert!(out.starts_with("Saved 8 bytes to "));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "t,v\n1,2\n");
}

#[tokio::test]
async fn test_reboot_shows_success_message() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT).path("/reboot");
        then.status(200).body("OK");
    });

    let (client, settings) = setup(&server);
    let out = Console::new(&client, settings)
        .run(&Command::Reboot)
        .await
        .unwrap();

    mock.assert();
    assert!(out.is_empty());
    assert_eq!(client.status().current(), "Success, rebooting!");
}

#[tokio::test]
async fn test_relative_paths_are_rejected_before_sending() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/delete");
        then.status(200).body("{}");
    });

    let (client, settings) = setup(&server);
    let result = Console::new(&client, settings)
        .assume_yes(true)
        .run(&Command::Storage(StorageCommand::Rm {
            path: "www/index.html".to_string(),
        }))
        .await;

    assert!(result.is_err());
    mock.assert_hits(0);
}
