use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use userdir::directory::{StoreStatus, UserStore};
use userdir::model::NewUser;
use userdir::persistence::UserPersistence;
use userdir::remote::{FetchError, HttpUserSource, UserSource};
use userdir::store::fs::FsBlobStore;

const LEANNE: &str = r#"{
    "id": 1,
    "name": "Leanne Graham",
    "username": "Bret",
    "email": "Sincere@april.biz",
    "address": {
        "street": "Kulas Light",
        "suite": "Apt. 556",
        "city": "Gwenborough",
        "zipcode": "92998-3874",
        "geo": { "lat": "-37.3159", "lng": "81.1496" }
    },
    "phone": "1-770-736-8031 x56442",
    "website": "hildegard.org",
    "company": {
        "name": "Romaguera-Crona",
        "catchPhrase": "Multi-layered client-server neural-net",
        "bs": "harness real-time e-markets"
    }
}"#;

const ERVIN: &str = r#"{
    "id": 2,
    "name": "Ervin Howell",
    "username": "Antonette",
    "email": "Shanna@melissa.tv",
    "address": { "street": "Victor Plains", "city": "Wisokyburgh", "zipcode": "90566-7771" },
    "phone": "010-692-6593 x09125",
    "website": "anastasia.net",
    "company": { "name": "Deckow-Crist" }
}"#;

/// Serve a single canned response, reporting the request line back.
async fn serve_once(status: &str, body: String) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    let response = format!(
        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let n = socket.read(&mut buf).await.unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        let request_line = request.lines().next().unwrap_or_default().to_string();
        let _ = tx.send(request_line);
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });

    (format!("http://{}", addr), rx)
}

fn source(base: &str) -> HttpUserSource {
    HttpUserSource::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetch_all_decodes_users_and_ignores_extra_fields() {
    let (base, request) = serve_once("200 OK", format!("[{}, {}]", LEANNE, ERVIN)).await;

    let users = source(&base).fetch_all().await.unwrap();

    assert_eq!(request.await.unwrap(), "GET /users HTTP/1.1");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Leanne Graham");
    assert_eq!(users[0].address.city, "Gwenborough");
    assert_eq!(users[0].company.name, "Romaguera-Crona");
    assert_eq!(users[1].id, 2);
}

#[tokio::test]
async fn fetch_one_hits_user_path() {
    let (base, request) = serve_once("200 OK", LEANNE.to_string()).await;

    let user = source(&base).fetch_one(1).await.unwrap();

    assert_eq!(request.await.unwrap(), "GET /users/1 HTTP/1.1");
    assert_eq!(user.map(|u| u.username), Some("Bret".to_string()));
}

#[tokio::test]
async fn fetch_one_maps_404_to_none() {
    let (base, _request) = serve_once("404 Not Found", "{}".to_string()).await;

    let user = source(&base).fetch_one(77).await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn server_error_is_a_network_error() {
    let (base, _request) =
        serve_once("500 Internal Server Error", r#"{"error":"down"}"#.to_string()).await;

    let error = source(&base).fetch_all().await.unwrap_err();
    match error {
        FetchError::Network { message } => assert!(message.contains("500"), "{}", message),
        other => panic!("expected network error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (base, _request) = serve_once("200 OK", "[{\"id\": 1,".to_string()).await;

    let error = source(&base).fetch_all().await.unwrap_err();
    assert!(matches!(error, FetchError::Decode { .. }));
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = source(&format!("http://{}", addr))
        .fetch_all()
        .await
        .unwrap_err();
    assert!(matches!(error, FetchError::Network { .. }));
}

#[tokio::test]
async fn refresh_merges_remote_users_into_file_store() {
    let dir = TempDir::new().unwrap();
    let mut store = UserStore::initialize(UserPersistence::new(FsBlobStore::new(dir.path())));
    store.add_user(NewUser::new("Local Leanne", "leanne@local.test").with_id(1));

    let (base, _request) = serve_once("200 OK", format!("[{}, {}]", LEANNE, ERVIN)).await;
    let report = store.refresh(&source(&base)).await.unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.status(), StoreStatus::Idle);
    assert_eq!(store.find(1).unwrap().email, "leanne@local.test");

    let reloaded = UserStore::initialize(UserPersistence::new(FsBlobStore::new(dir.path())));
    let ids: Vec<_> = reloaded.users().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn failed_refresh_sets_error_and_keeps_collection() {
    let dir = TempDir::new().unwrap();
    let mut store = UserStore::initialize(UserPersistence::new(FsBlobStore::new(dir.path())));
    store.add_user(NewUser::new("Ann", "ann@x.com").with_id(5));

    let (base, _request) = serve_once("503 Service Unavailable", String::new()).await;
    assert!(store.refresh(&source(&base)).await.is_err());

    assert_eq!(store.status(), StoreStatus::Error);
    assert!(store.last_error().is_some());
    assert_eq!(store.len(), 1);
}
