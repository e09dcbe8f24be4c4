//! Integration tests for the Black Hole gateway client

use blackhole_core::{MangaStatus, SessionStorage, SortBy, User};
use blackhole_http::types::{MangaListQuery, NewManga, PageQuery, ProfileUpdate, RegisterRequest};
use blackhole_http::{BlackHoleClient, ClientError, GatewayEvent};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::error::TryRecvError;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json(id: i64, bio: &str) -> Value {
    json!({
        "id": id,
        "username": "reader",
        "email": "reader@example.com",
        "profile_image": "default-avatar.png",
        "bio": bio,
        "is_admin": false,
        "is_moderator": false,
        "is_verified": true,
        "is_banned": false,
        "created_at": "2024-03-01T10:15:30",
        "updated_at": "2024-03-02T08:00:00"
    })
}

fn stored_user() -> User {
    serde_json::from_value(user_json(1, "")).unwrap()
}

fn empty_list() -> Value {
    json!({
        "manga": [],
        "pagination": {
            "page": 1, "per_page": 20, "total": 0, "pages": 0,
            "has_next": false, "has_prev": false
        }
    })
}

fn client_with_storage(server: &MockServer, storage: &SessionStorage) -> BlackHoleClient {
    BlackHoleClient::builder()
        .base_url(server.uri())
        .storage(storage.clone())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_client_builder() {
    let client = BlackHoleClient::builder()
        .base_url("http://localhost:5000/api/")
        .build();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:5000/api");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = BlackHoleClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));

    let result = BlackHoleClient::new("not a url");
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_bearer_token_attached_from_storage() {
    let mock_server = MockServer::start().await;
    let storage = SessionStorage::in_memory();
    storage.save("stored-token", &stored_user()).unwrap();

    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", "Bearer stored-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json(1, "") })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_with_storage(&mock_server, &storage);
    let profile = client.get_profile().await.unwrap();
    assert_eq!(profile.user.id, 1);
}

#[tokio::test]
async fn test_anonymous_request_has_no_authorization_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/manga"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_list()))
        .mount(&mock_server)
        .await;

    let client = BlackHoleClient::new(mock_server.uri()).unwrap();
    client.list_manga(&MangaListQuery::default()).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_token_change_applies_to_next_request() {
    let mock_server = MockServer::start().await;
    let storage = SessionStorage::in_memory();

    Mock::given(method("GET"))
        .and(path("/manga/favorites"))
        .and(header("authorization", "Bearer first"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "favorites": [],
            "pagination": empty_list()["pagination"].clone()
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/manga/favorites"))
        .and(header("authorization", "Bearer second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "favorites": [],
            "pagination": empty_list()["pagination"].clone()
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_with_storage(&mock_server, &storage);

    storage.set_token("first").unwrap();
    client.favorites(&PageQuery::default()).await.unwrap();

    storage.set_token("second").unwrap();
    client.favorites(&PageQuery::default()).await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_catalog_fetch_expires_session() {
    let mock_server = MockServer::start().await;
    let storage = SessionStorage::in_memory();
    storage.save("stale-token", &stored_user()).unwrap();

    Mock::given(method("GET"))
        .and(path("/manga"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "msg": "Token has expired" })),
        )
        .mount(&mock_server)
        .await;

    let client = client_with_storage(&mock_server, &storage);
    let mut events = client.subscribe();

    let result = client.list_manga(&MangaListQuery::default()).await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(None))));

    assert!(storage.is_empty().unwrap());
    assert_eq!(events.try_recv().unwrap(), GatewayEvent::SessionExpired);
}

#[tokio::test]
async fn test_expiry_hooks_run_before_error_returns() {
    let mock_server = MockServer::start().await;
    let storage = SessionStorage::in_memory();
    storage.save("stale-token", &stored_user()).unwrap();

    Mock::given(method("GET"))
        .and(path("/manga"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = client_with_storage(&mock_server, &storage);
    let rejected: Arc<Mutex<Vec<Option<String>>>> = Arc::default();
    let seen = rejected.clone();
    let id = client.on_session_expired(Arc::new(move |token: Option<&str>| {
        seen.lock().unwrap().push(token.map(str::to_owned));
    }));

    let _ = client.list_manga(&MangaListQuery::default()).await;
    assert_eq!(*rejected.lock().unwrap(), vec![Some("stale-token".to_string())]);

    // The persisted token is gone, so the second request goes out anonymously
    let _ = client.list_manga(&MangaListQuery::default()).await;
    assert_eq!(rejected.lock().unwrap().last(), Some(&None));

    assert!(client.remove_expiry_hook(id));
    assert!(!client.remove_expiry_hook(id));
    let _ = client.list_manga(&MangaListQuery::default()).await;
    assert_eq!(rejected.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_login_does_not_expire_session() {
    let mock_server = MockServer::start().await;
    let storage = SessionStorage::in_memory();
    storage.save("live-token", &stored_user()).unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "البريد الإلكتروني أو كلمة المرور غير صحيحة"
        })))
        .mount(&mock_server)
        .await;

    let client = client_with_storage(&mock_server, &storage);
    let mut events = client.subscribe();

    let result = client
        .login(&blackhole_http::types::LoginRequest {
            email: "reader@example.com".into(),
            password: "wrong".into(),
        })
        .await;

    let error = result.unwrap_err();
    assert_eq!(
        error.server_message(),
        Some("البريد الإلكتروني أو كلمة المرور غير صحيحة")
    );
    assert_eq!(storage.token().unwrap().as_deref(), Some("live-token"));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_error_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "اسم المستخدم موجود بالفعل" })),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/manga/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = BlackHoleClient::new(mock_server.uri()).unwrap();

    let result = client
        .register(&RegisterRequest {
            username: "taken".into(),
            email: "a@b.com".into(),
            password: "secret1".into(),
        })
        .await;
    match result {
        Err(ClientError::BadRequest(Some(message))) => {
            assert_eq!(message, "اسم المستخدم موجود بالفعل");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let result = client.get_manga(99).await;
    let error = result.unwrap_err();
    assert_eq!(error.status(), Some(404));
    assert_eq!(error.server_message(), None);
}

#[tokio::test]
async fn test_manga_list_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/manga"))
        .and(query_param("page", "2"))
        .and(query_param("search", "solo"))
        .and(query_param("status", "completed"))
        .and(query_param("sort_by", "rating"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "manga": [{
                "id": 3,
                "title": "Solo Leveling",
                "arabic_title": "سولو ليفلينج",
                "status": "completed",
                "average_rating": 4.5,
                "total_chapters": 200
            }],
            "pagination": {
                "page": 2, "per_page": 20, "total": 21, "pages": 2,
                "has_next": false, "has_prev": true
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BlackHoleClient::new(mock_server.uri()).unwrap();
    let query = MangaListQuery {
        page: Some(2),
        search: Some("solo".into()),
        status: Some(MangaStatus::Completed),
        sort_by: Some(SortBy::Rating),
        ..MangaListQuery::default()
    };

    let response = client.list_manga(&query).await.unwrap();
    assert_eq!(response.manga.len(), 1);
    assert_eq!(response.manga[0].total_chapters, 200);
    assert!(response.pagination.has_prev);
}

#[tokio::test]
async fn test_json_bodies_and_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/auth/profile"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "bio": "new bio" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "user": user_json(1, "new bio")
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/manga/3/chapters/10/rate"))
        .and(body_json(json!({ "rating": 4.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "rated" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BlackHoleClient::new(mock_server.uri()).unwrap();

    let update = ProfileUpdate {
        bio: Some("new bio".into()),
        ..ProfileUpdate::default()
    };
    let response = client.update_profile(&update).await.unwrap();
    assert_eq!(response.user.bio, "new bio");

    let response = client.rate_chapter(3, 10, 4.0).await.unwrap();
    assert_eq!(response.message.as_deref(), Some("rated"));
}

#[tokio::test]
async fn test_admin_endpoints() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/manga"))
        .and(body_json(json!({
            "title": "Omniscient Reader",
            "arabic_title": "القارئ العليم",
            "status": "ongoing"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "created",
            "manga": { "id": 12, "title": "Omniscient Reader", "arabic_title": "القارئ العليم" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/admin/chapters/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/admin/users/8/ban"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "banned",
            "user": user_json(8, "")
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BlackHoleClient::new(mock_server.uri()).unwrap();

    let created = client
        .create_manga(&NewManga {
            title: "Omniscient Reader".into(),
            arabic_title: "القارئ العليم".into(),
            status: Some(MangaStatus::Ongoing),
            ..NewManga::default()
        })
        .await
        .unwrap();
    assert_eq!(created.manga.id, 12);

    client.delete_chapter(5).await.unwrap();

    let banned = client.ban_user(8).await.unwrap();
    assert_eq!(banned.user.id, 8);
}

#[tokio::test]
async fn test_admin_forbidden_is_not_expiry() {
    let mock_server = MockServer::start().await;
    let storage = SessionStorage::in_memory();
    storage.save("reader-token", &stored_user()).unwrap();

    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "error": "غير مصرح لك بالوصول" })),
        )
        .mount(&mock_server)
        .await;

    let client = client_with_storage(&mock_server, &storage);
    let error = client.admin_stats().await.unwrap_err();

    assert!(matches!(error, ClientError::Forbidden(Some(_))));
    assert!(!storage.is_empty().unwrap());
}

#[tokio::test]
async fn test_user_directory_is_typed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [user_json(4, "hello"), user_json(5, "")],
            "pagination": {
                "page": 2, "per_page": 2, "total": 6, "pages": 3,
                "has_next": true, "has_prev": true
            }
        })))
        .mount(&mock_server)
        .await;

    let mut bare = user_json(4, "hello");
    bare["bio"] = Value::Null;
    Mock::given(method("GET"))
        .and(path("/users/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bare))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user": user_json(5, "") })),
        )
        .mount(&mock_server)
        .await;

    let client = BlackHoleClient::new(mock_server.uri()).unwrap();

    let directory = client
        .list_users(&PageQuery {
            page: Some(2),
            per_page: Some(2),
        })
        .await
        .unwrap();
    let ids: Vec<i64> = directory.users().iter().map(|user| user.id).collect();
    assert_eq!(ids, vec![4, 5]);
    assert_eq!(directory.pagination().map(|p| p.pages), Some(3));

    let bare = client.get_user(4).await.unwrap().into_user();
    assert_eq!(bare.id, 4);
    assert_eq!(bare.bio, "");

    let enveloped = client.get_user(5).await.unwrap();
    assert_eq!(enveloped.user().id, 5);
}

#[tokio::test]
async fn test_user_directory_accepts_plain_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_json(7, "")])))
        .mount(&mock_server)
        .await;

    let client = BlackHoleClient::new(mock_server.uri()).unwrap();
    let directory = client.list_users(&PageQuery::default()).await.unwrap();

    assert_eq!(directory.users().len(), 1);
    assert!(directory.pagination().is_none());
}
