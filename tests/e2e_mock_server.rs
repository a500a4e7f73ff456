//! E2E tests using the mock OpenProject server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use openproject_client::mock_server::{Fixtures, MockServer, MockState};
use openproject_client::{
    BasicAuth, CookieSessionAuth, Create, Delete, FilterOperator, Filters, Get, List,
    OpenProjectClient, OpenProjectError, Project, Status, User, WorkPackage,
};

fn api_key_client(server: &MockServer) -> OpenProjectClient {
    OpenProjectClient::new(server.url(), BasicAuth::api_key("token")).unwrap()
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    let result = reqwest::Client::new().get(format!("{}/health", url)).send().await;
    assert!(result.is_err());
}

// =============================================================================
// Work Package Workflows
// =============================================================================

#[tokio::test]
async fn test_work_package_create_get_delete() {
    let server = MockServer::start().await;
    let client = api_key_client(&server);

    let created = WorkPackage::create(
        &client,
        "demo-project".to_string(),
        WorkPackage::draft("Book the venue"),
    )
    .await
    .unwrap();
    assert!(created.id >= 1000);
    assert_eq!(created.project().unwrap().id(), Some("1"));
    assert_eq!(created.status().unwrap().title.as_deref(), Some("New"));

    let fetched = WorkPackage::get(&client, created.id).await.unwrap();
    assert_eq!(fetched, created);

    WorkPackage::delete(&client, created.id).await.unwrap();
    let err = WorkPackage::get(&client, created.id).await.unwrap_err();
    assert!(err.is_not_found());

    server.shutdown().await;
}

#[tokio::test]
async fn test_work_package_without_subject_is_rejected() {
    let server = MockServer::start().await;
    let client = api_key_client(&server);

    let err = WorkPackage::create(&client, "demo-project".to_string(), WorkPackage::default())
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(422));
    assert!(err.to_string().contains("Subject can't be blank"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_work_package_filters_and_paging() {
    let server = MockServer::start().await;
    let client = api_key_client(&server);

    let in_demo = Filters::new().with("project", FilterOperator::Equal, "1");
    let first = WorkPackage::list_page(&client, &in_demo, 1, 2).await.unwrap();
    assert_eq!(first.total, 3);
    assert_eq!(first.len(), 2);
    assert!(first.has_more());

    let all = WorkPackage::list_all(&client, &in_demo).await.unwrap();
    assert_eq!(all.len(), 3);

    let new_in_demo = in_demo.with("status", FilterOperator::Equal, "1");
    let page = WorkPackage::list_page(&client, &new_in_demo, 1, 20).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.elements()[0].subject, "Set date and location of conference");

    server.shutdown().await;
}

#[tokio::test]
async fn test_unknown_filter_is_bad_request() {
    let server = MockServer::start().await;
    let client = api_key_client(&server);

    let filters = Filters::new().with("colour", FilterOperator::Equal, "blue");
    let err = WorkPackage::list_page(&client, &filters, 1, 20).await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));

    server.shutdown().await;
}

// =============================================================================
// Project and User Workflows
// =============================================================================

#[tokio::test]
async fn test_project_lifecycle_by_identifier() {
    let server = MockServer::start().await;
    let client = api_key_client(&server);

    let draft = Project {
        name: "Release Train".to_string(),
        ..Default::default()
    };
    let created = Project::create(&client, (), draft).await.unwrap();
    assert_eq!(created.identifier, "release-train");

    WorkPackage::create(&client, created.identifier.clone(), WorkPackage::draft("Kickoff"))
        .await
        .unwrap();

    let fetched = Project::get(&client, "release-train".to_string()).await.unwrap();
    assert_eq!(fetched.id, created.id);

    Project::delete(&client, "release-train".to_string()).await.unwrap();
    assert!(Project::get(&client, "release-train".to_string())
        .await
        .unwrap_err()
        .is_not_found());

    // work packages go with their project
    let in_project = Filters::new().with("project", FilterOperator::Equal, &created.id.to_string());
    let page = WorkPackage::list_page(&client, &in_project, 1, 20).await.unwrap();
    assert!(page.is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn test_user_create_never_echoes_password() {
    let server = MockServer::start_empty().await;
    let client = api_key_client(&server);

    let draft = User {
        login: "h.wright".to_string(),
        email: "h.wright@example.org".to_string(),
        first_name: "Hannah".to_string(),
        last_name: "Wright".to_string(),
        password: Some("correct horse".to_string()),
        ..Default::default()
    };
    let created = User::create(&client, (), draft).await.unwrap();

    assert_eq!(created.name, "Hannah Wright");
    assert!(created.password.is_none());
    assert!(created.is_active());

    let by_login = Filters::new().with("login", FilterOperator::Equal, "h.wright");
    let found = User::list_all(&client, &by_login).await.unwrap();
    assert_eq!(found.len(), 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_custom_state() {
    let status = Fixtures::status(3, "Rejected", true);
    let server = MockServer::with_state(MockState::new().with_status(status)).await;
    let client = api_key_client(&server);

    let statuses = Status::list_all(&client, &Filters::new()).await.unwrap();
    assert_eq!(statuses.len(), 1);
    assert!(statuses[0].is_closed);

    server.shutdown().await;
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_wrong_credentials_are_unauthorized() {
    let state = MockServer::default_state().with_credentials("admin", "secret");
    let server = MockServer::with_state(state).await;
    let client = OpenProjectClient::new(server.url(), BasicAuth::new("admin", "nope")).unwrap();

    let err = Status::get(&client, 1).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));

    let client = OpenProjectClient::new(server.url(), BasicAuth::new("admin", "secret")).unwrap();
    assert_eq!(Status::get(&client, 1).await.unwrap().name, "New");

    server.shutdown().await;
}

#[tokio::test]
async fn test_cookie_session_logs_in_once() {
    let state = MockServer::default_state().with_credentials("admin", "secret");
    let server = MockServer::with_state(state).await;
    let auth = CookieSessionAuth::new("admin", "secret", &server.login_url()).unwrap();
    let client = OpenProjectClient::new(server.url(), auth).unwrap();

    let (a, b) = tokio::join!(WorkPackage::get(&client, 1), Project::get(&client, "2".to_string()));
    a.unwrap();
    b.unwrap();
    Status::list_all(&client, &Filters::new()).await.unwrap();

    assert_eq!(server.state().read().await.login_count, 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_cookie_session_bad_password_is_auth_error() {
    let state = MockServer::default_state().with_credentials("admin", "secret");
    let server = MockServer::with_state(state).await;
    let auth = CookieSessionAuth::new("admin", "guess", &server.login_url()).unwrap();
    let client = OpenProjectClient::new(server.url(), auth).unwrap();

    let err = WorkPackage::get(&client, 1).await.unwrap_err();
    assert!(matches!(err, OpenProjectError::Auth(_)));
    assert_eq!(server.state().read().await.login_count, 0);

    server.shutdown().await;
}
