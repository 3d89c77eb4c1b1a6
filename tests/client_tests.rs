use std::{sync::mpsc, thread};

use datastorage::{server, ClientError, DataStorageClient, KVStore, ServerConfig};
use reqwest::StatusCode;
use serde_json::json;

/// Runs a datastorage server on an ephemeral port in its own actix system and
/// returns its base URL.
fn spawn_server() -> String {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        actix_web::rt::System::new().block_on(async move {
            let config = ServerConfig {
                bind_addr: "127.0.0.1:0".to_string(),
                cors_origins_file: "/nonexistent/.env_cors".to_string(),
                ..ServerConfig::default()
            };
            let (server, addrs) = server::start(&config, KVStore::new()).unwrap();
            tx.send(addrs[0]).unwrap();
            server.await.unwrap();
        })
    });
    format!("http://{}", rx.recv().unwrap())
}

#[test]
fn client_round_trip_against_live_server() {
    let client = DataStorageClient::new(spawn_server()).unwrap();

    assert_eq!(client.health().unwrap(), StatusCode::OK);

    let reply = client.upload("greeting", b"hello".to_vec()).unwrap();
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["data"], json!({"size": 5}));

    let reply = client.retrieve("greeting").unwrap();
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.body,
        json!({
            "status": "success",
            "message": "data with name: 'greeting' found",
            "data": {"content": "hello", "size": 5}
        })
    );

    let reply = client.delete("greeting").unwrap();
    assert_eq!(reply.status, StatusCode::OK);

    let reply = client.retrieve("greeting").unwrap();
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(
        reply.body["error"],
        "attempted to access data associated with name: greeting - not found"
    );
}

#[test]
fn names_are_query_encoded() {
    let client = DataStorageClient::new(format!("{}/", spawn_server())).unwrap();

    let reply = client.upload("a name&with=chars", b"x".to_vec()).unwrap();
    assert_eq!(reply.status, StatusCode::CREATED);

    let reply = client.retrieve("a name&with=chars").unwrap();
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["content"], "x");
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let client = DataStorageClient::new("http://127.0.0.1:1").unwrap();
    assert!(matches!(
        client.retrieve("greeting"),
        Err(ClientError::Http(_))
    ));
}
