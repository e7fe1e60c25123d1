use chrono::{TimeZone, Utc};
use fenfav_core::models::FavoriteRecord;
use fenfav_core::storage::{self, Backend, JsonFileStore};
use fenfav_server::{FavoritesRequest, FavoritesResponse, Router};
use http::{Method, StatusCode};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

fn routers() -> Vec<(TempDir, Router)> {
    [Backend::Memory, Backend::Json, Backend::Sqlite]
        .into_iter()
        .map(|backend| {
            let dir = tempdir().unwrap();
            let store = storage::open(backend, &dir.path().join(format!("favorites.{backend}"))).unwrap();
            (dir, Router::new(store))
        })
        .collect()
}

fn body(response: &FavoritesResponse) -> Value {
    serde_json::from_slice(&response.body).unwrap()
}

fn post(router: &Router, payload: Value) -> FavoritesResponse {
    router.handle(&FavoritesRequest::new(Method::POST).with_body(payload.to_string()))
}

fn delete(router: &Router, payload: Value) -> FavoritesResponse {
    router.handle(&FavoritesRequest::new(Method::DELETE).with_body(payload.to_string()))
}

fn list(router: &Router, query: Option<&str>) -> FavoritesResponse {
    let mut request = FavoritesRequest::new(Method::GET);
    if let Some(query) = query {
        request = request.with_query(query);
    }
    router.handle(&request)
}

fn ids(response: &FavoritesResponse) -> Vec<String> {
    body(response)
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_delete_of_unknown_id_succeeds_without_changes() {
    for (_dir, router) in routers() {
        post(&router, json!({"fen": "F1", "id": "1"}));
        let before = list(&router, None).body;

        let response = delete(&router, json!({"id": "nonexistent"}));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(body(&response), json!({"success": true}));

        assert_eq!(list(&router, None).body, before);
    }
}

#[test]
fn test_create_with_same_id_overwrites() {
    for (_dir, router) in routers() {
        assert_eq!(post(&router, json!({"fen": "A", "id": "x"})).status, StatusCode::CREATED);
        assert_eq!(post(&router, json!({"fen": "B", "id": "x"})).status, StatusCode::CREATED);

        let records = body(&list(&router, None));
        assert_eq!(records.as_array().unwrap().len(), 1);
        assert_eq!(records[0]["id"], "x");
        assert_eq!(records[0]["fen"], "B");
    }
}

#[test]
fn test_delete_falls_back_to_fen() {
    for (_dir, router) in routers() {
        post(&router, json!({"fen": "F1", "id": "1"}));
        post(&router, json!({"fen": "F2", "id": "2"}));

        let response = delete(&router, json!({"id": "nonexistent", "fen": "F1"}));
        assert_eq!(response.status, StatusCode::OK);

        assert_eq!(ids(&list(&router, None)), vec!["2"]);
    }
}

#[test]
fn test_date_filter_from_query() {
    let jan = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let jun = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    for (_dir, router) in routers() {
        router.with_store(|store| {
            store
                .put(FavoriteRecord::with_date("1".into(), "F1".into(), jan))
                .unwrap();
            store
                .put(FavoriteRecord::with_date("2".into(), "F2".into(), jun))
                .unwrap();
        });

        assert_eq!(ids(&list(&router, Some("from=2024-03-01"))), vec!["2"]);
        assert_eq!(ids(&list(&router, Some("to=2024-03-01"))), vec!["1"]);
        assert_eq!(ids(&list(&router, Some("from=2024-01-01&to=2024-06-01"))), vec!["1", "2"]);
        assert_eq!(ids(&list(&router, None)), vec!["1", "2"]);
        assert_eq!(ids(&list(&router, Some("from=&to="))), vec!["1", "2"]);
    }
}

#[test]
fn test_malformed_date_bound_is_rejected() {
    for (_dir, router) in routers() {
        post(&router, json!({"fen": "F1"}));

        let response = list(&router, Some("from=yesterday"));
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&response)["kind"], "validation");
        assert!(body(&response)["error"].as_str().unwrap().contains("yesterday"));
    }
}

#[test]
fn test_created_record_survives_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("favorites.json");

    let router = Router::new(Box::new(JsonFileStore::new(&path)));
    let created = body(&post(&router, json!({"fen": "F1"})));
    let id = created["id"].as_str().unwrap().to_string();
    let listed = body(&list(&router, None));

    let reloaded = Router::new(Box::new(JsonFileStore::new(&path)));
    let records = body(&list(&reloaded, None));
    assert_eq!(records, listed);
    assert_eq!(records[0]["id"], id.as_str());
    assert_eq!(records[0]["fen"], "F1");
}

#[test]
fn test_unsupported_method_is_405_and_leaves_store_alone() {
    for (_dir, router) in routers() {
        post(&router, json!({"fen": "F1", "id": "1"}));

        for method in [Method::PUT, Method::PATCH, Method::HEAD] {
            let response = router.handle(
                &FavoritesRequest::new(method).with_body(json!({"fen": "F2", "id": "2"}).to_string()),
            );
            assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body(&response), json!({"error": "Method not allowed"}));
        }

        assert_eq!(ids(&list(&router, None)), vec!["1"]);
    }
}

#[test]
fn test_malformed_post_body_creates_nothing() {
    for (_dir, router) in routers() {
        let response = router.handle(&FavoritesRequest::new(Method::POST).with_body("{\"fen\": "));
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&response)["kind"], "malformed_request");
        assert!(body(&response)["error"].is_string());

        assert!(ids(&list(&router, None)).is_empty());
    }
}

#[test]
fn test_post_without_fen_is_validation_error() {
    for (_dir, router) in routers() {
        for payload in [json!({"id": "x"}), json!({"fen": 7}), json!({"fen": ""})] {
            let response = post(&router, payload);
            assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body(&response)["kind"], "validation");
        }
        assert!(ids(&list(&router, None)).is_empty());
    }
}

#[test]
fn test_caller_supplied_date_is_refused() {
    for (_dir, router) in routers() {
        let response = post(&router, json!({"fen": "F1", "id": "1", "date": "2000-01-01T00:00:00.000Z"}));
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&response)["kind"], "validation");
        assert!(ids(&list(&router, None)).is_empty());
    }
}

#[test]
fn test_post_generates_id_when_missing_or_empty() {
    for (_dir, router) in routers() {
        let first = body(&post(&router, json!({"fen": "F1"})));
        let second = body(&post(&router, json!({"fen": "F1", "id": ""})));

        assert_eq!(first["success"], true);
        assert!(!first["id"].as_str().unwrap().is_empty());
        assert_ne!(first["id"], second["id"]);
        assert_eq!(ids(&list(&router, None)).len(), 2);
    }
}

#[test]
fn test_every_response_carries_cors_headers() {
    let (_dir, router) = routers().remove(0);
    let responses = [
        router.handle(&FavoritesRequest::new(Method::OPTIONS)),
        list(&router, None),
        post(&router, json!({"fen": "F1"})),
        delete(&router, json!({"fen": "F1"})),
        router.handle(&FavoritesRequest::new(Method::PUT)),
        router.handle(&FavoritesRequest::new(Method::DELETE)),
    ];

    for response in responses {
        assert_eq!(response.headers["access-control-allow-origin"], "*");
        assert_eq!(response.headers["access-control-allow-headers"], "Content-Type");
        assert_eq!(
            response.headers["access-control-allow-methods"],
            "GET, POST, DELETE, OPTIONS"
        );
    }
}

#[test]
fn test_listed_dates_use_millisecond_iso_format() {
    for (_dir, router) in routers() {
        post(&router, json!({"fen": "F1"}));

        let records = body(&list(&router, None));
        let date = records[0]["date"].as_str().unwrap();
        assert_eq!(date.len(), "2024-01-01T00:00:00.000Z".len());
        assert!(date.ends_with('Z'));
    }
}
