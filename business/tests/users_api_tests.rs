//! Users API client against a mock server.

use usuarios_business::{BusinessConfig, FetchUsersError, PageRequest, User, list_users};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn users_json(ids: std::ops::RangeInclusive<i64>) -> serde_json::Value {
    ids.map(|id| {
        serde_json::json!({
            "id": id,
            "name": format!("user{id}"),
            "email": format!("user{id}@x.com"),
        })
    })
    .collect()
}

#[tokio::test]
async fn test_list_users_sends_one_based_page_and_size() {
    init_logger();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "1"))
        .and(query_param("size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": users_json(1..=5),
            "totalPages": 3,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = BusinessConfig::new(server.uri());
    let page = list_users(&config.users_url(), PageRequest::new(0, 5))
        .await
        .expect("page should load");

    assert_eq!(page.len(), 5);
    assert_eq!(page.total_pages, Some(3));
    assert_eq!(
        page.items[0],
        User {
            id: 1,
            name: "user1".to_string(),
            email: "user1@x.com".to_string(),
        }
    );
}

#[tokio::test]
async fn test_list_users_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_json(11..=14)))
        .mount(&server)
        .await;

    let config = BusinessConfig::new(server.uri());
    let page = list_users(&config.users_url(), PageRequest::new(1, 10))
        .await
        .expect("page should load");

    assert_eq!(page.len(), 4);
    assert_eq!(page.total_pages, None);
}

#[tokio::test]
async fn test_list_users_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = BusinessConfig::new(server.uri());
    let result = list_users(&config.users_url(), PageRequest::new(0, 5)).await;

    assert_eq!(result, Err(FetchUsersError::Server { status: 500 }));
}

#[tokio::test]
async fn test_list_users_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let config = BusinessConfig::new(server.uri());
    let result = list_users(&config.users_url(), PageRequest::new(0, 5)).await;

    assert!(
        matches!(result, Err(FetchUsersError::Parse(_))),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn test_list_users_unreachable_host() {
    // Port 1 is reserved and nothing listens on it.
    let config = BusinessConfig::new("http://127.0.0.1:1".to_string());
    let result = list_users(&config.users_url(), PageRequest::new(0, 5)).await;

    assert!(
        matches!(result, Err(FetchUsersError::Network(_))),
        "unexpected result: {result:?}"
    );
}
