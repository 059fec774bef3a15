use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    routing::post,
};
use lms_gateway::{
    identity::{GraphqlIdentityClient, IdentityError, IdentityProvider},
    roles::Role,
    session::{SESSION_COOKIE, SessionToken},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Stand-in for the GraphQL API, answering by session cookie.
async fn graphql(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    assert!(body["query"].as_str().unwrap().contains("me {"));

    let cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    Json(match cookie {
        "session_token=business" => json!({
            "data": { "me": {
                "role": "BUSINESS",
                "companyId": "company-1",
                "customerId": "cus_42",
                "firstName": "Ada"
            } }
        }),
        "session_token=nobody" => json!({ "data": { "me": null } }),
        _ => json!({ "data": null, "errors": [{ "message": "not authenticated" }] }),
    })
}

async fn spawn_api() -> String {
    let router = Router::new()
        .route("/graphql", post(graphql))
        .route(
            "/broken",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

fn client(url: String) -> GraphqlIdentityClient {
    GraphqlIdentityClient::new(url, SESSION_COOKIE, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_resolves_identity_fields() {
    let address = spawn_api().await;
    let identity = client(format!("{address}/graphql"))
        .current_identity(&SessionToken::new("business"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(identity.parsed_role(), Some(Role::Business));
    assert_eq!(identity.company_id.as_deref(), Some("company-1"));
    assert_eq!(identity.customer_id.as_deref(), Some("cus_42"));
    assert_eq!(identity.first_name.as_deref(), Some("Ada"));
    assert_eq!(identity.email, None);
}

#[tokio::test]
async fn test_null_me_is_no_identity() {
    let address = spawn_api().await;
    let identity = client(format!("{address}/graphql"))
        .current_identity(&SessionToken::new("nobody"))
        .await
        .unwrap();

    assert!(identity.is_none());
}

#[tokio::test]
async fn test_graphql_errors_are_reported() {
    let address = spawn_api().await;
    let result = client(format!("{address}/graphql"))
        .current_identity(&SessionToken::new("expired"))
        .await;

    match result {
        Err(IdentityError::Graphql(message)) => assert_eq!(message, "not authenticated"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let address = spawn_api().await;
    let result = client(format!("{address}/broken"))
        .current_identity(&SessionToken::new("business"))
        .await;

    assert!(matches!(result, Err(IdentityError::Status(502))));
}

#[tokio::test]
async fn test_unreachable_api_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = client(format!("http://127.0.0.1:{port}/graphql"))
        .current_identity(&SessionToken::new("business"))
        .await;

    assert!(matches!(result, Err(IdentityError::Transport(_))));
}
