use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    routing::get,
    Router,
};
use party_finder::{api::ApiClientConfig, FinderError, GameDataApi, TibiaDataClient};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const WORLD_BODY: &str = r#"{
    "world": {
        "name": "Antica",
        "players_online": 2,
        "online_players": [
            {"name": "Bubble", "level": 120, "vocation": "Elite Knight"},
            {"name": "Eternal Oblivion", "level": 80, "vocation": "Master Sorcerer"}
        ]
    }
}"#;

/// Canned TibiaData responses. Only `antica` exists; every request path is recorded.
#[derive(Clone)]
struct Fixture {
    world_body: &'static str,
    seen: Arc<Mutex<Vec<String>>>,
}

impl Fixture {
    fn new(world_body: &'static str) -> Self {
        Self {
            world_body,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

async fn world(
    State(fixture): State<Fixture>,
    Path(world): Path<String>,
    uri: Uri,
) -> (StatusCode, String) {
    fixture.seen.lock().unwrap().push(uri.path().to_string());
    if world == "antica" {
        (StatusCode::OK, fixture.world_body.to_string())
    } else {
        (StatusCode::NOT_FOUND, "{}".to_string())
    }
}

async fn character(
    State(fixture): State<Fixture>,
    Path(name): Path<String>,
    uri: Uri,
) -> (StatusCode, String) {
    fixture.seen.lock().unwrap().push(uri.path().to_string());
    let body = serde_json::json!({
        "character": {
            "character": { "name": name, "level": 80 }
        }
    });
    (StatusCode::OK, body.to_string())
}

async fn serve(fixture: Fixture) -> String {
    let app = Router::new()
        .route("/v4/world/:world", get(world))
        .route("/v4/character/:name", get(character))
        .with_state(fixture);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    format!("http://{}/v4", addr)
}

fn client(base_url: String) -> TibiaDataClient {
    TibiaDataClient::new(ApiClientConfig {
        base_url,
        timeout_seconds: 5,
        user_agent: "party-finder-test".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_world_roster() {
    let fixture = Fixture::new(WORLD_BODY);
    let client = client(serve(fixture.clone()).await);

    let response = client.fetch_world("Antica").await.unwrap();
    let players = response.into_players().unwrap();

    assert_eq!(players.len(), 2);
    assert_eq!(players[0].name, "Bubble");
    assert_eq!(players[1].vocation, "Master Sorcerer");
    assert_eq!(fixture.seen(), vec!["/v4/world/antica".to_string()]);
}

#[tokio::test]
async fn test_missing_world_is_api_error() {
    let client = client(serve(Fixture::new(WORLD_BODY)).await);

    match client.fetch_world("nowhere").await {
        Err(FinderError::ApiError { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected api error, got {:?}", other.map(|r| r.world.name)),
    }
}

#[tokio::test]
async fn test_unexpected_body_is_malformed() {
    let client = client(serve(Fixture::new("<html>maintenance</html>")).await);

    let err = client.fetch_world("antica").await.unwrap_err();
    assert!(matches!(err, FinderError::MalformedResponse(_)));
    assert!(err.is_remote());
}

#[tokio::test]
async fn test_character_name_is_encoded() {
    let fixture = Fixture::new(WORLD_BODY);
    let client = client(serve(fixture.clone()).await);

    let response = client.fetch_character("Eternal Oblivion").await.unwrap();
    let name = response
        .character
        .and_then(|c| c.character)
        .and_then(|c| c.name);

    assert_eq!(name.as_deref(), Some("Eternal Oblivion"));
    assert_eq!(fixture.seen(), vec!["/v4/character/Eternal%20Oblivion".to_string()]);
}

#[tokio::test]
async fn test_unreachable_host_is_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{}/v4", addr));
    let err = client.fetch_world("antica").await.unwrap_err();
    assert!(matches!(err, FinderError::NetworkFailure(_)));
}
