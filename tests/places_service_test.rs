use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use place_listings::{
    NewPlace, PlacesError, PlacesService, ReqwestHttpClient, StaticIdentity,
};
use serde_json::{json, Value};
use tokio_stream::StreamExt;
use tokio_test::{assert_err, assert_ok};

const PLACEHOLDER: &str =
    "https://i.pinimg.com/originals/65/8f/77/658f77b9b527f89922ba996560a3e2b0.jpg";

fn body(title: &str, price: f64, owner: &str) -> Value {
    json!({
        "title": title,
        "description": format!("{} description", title),
        "imageUrl": "https://img.example/place.jpg",
        "price": price,
        "availableFrom": "2024-05-01T00:00:00.000Z",
        "availableTo": "2024-09-30T00:00:00.000Z",
        "userId": owner
    })
}

fn service(
    server: &MockServer,
    identity: StaticIdentity,
) -> PlacesService<ReqwestHttpClient, StaticIdentity> {
    let http = ReqwestHttpClient::new(&server.base_url()).unwrap();
    PlacesService::new(http, identity)
}

fn cabin() -> NewPlace {
    NewPlace {
        title: "Cabin".to_string(),
        description: "Quiet cabin in the woods".to_string(),
        price: 75.0,
        available_from: Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
        available_to: Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_fetch_places_fills_held_collection() {
    let server = MockServer::start_async().await;
    let list_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/offered-places.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "a": body("Alpha", 100.0, "u1"),
                    "b": body("Beta", 55.5, "u2")
                }));
        })
        .await;

    let service = service(&server, StaticIdentity::anonymous());
    let places = service.fetch_places().await.unwrap();

    list_mock.assert_async().await;
    assert_eq!(places.len(), 2);

    let snapshot = service.snapshot();
    assert_eq!(snapshot.len(), 2);

    let a = snapshot.get("a").unwrap();
    assert_eq!(a.title, "Alpha");
    assert_eq!(a.description, "Alpha description");
    assert_eq!(a.price, 100.0);
    assert_eq!(a.owner_id, "u1");
    assert_eq!(
        a.available_from,
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(
        a.available_to,
        Utc.with_ymd_and_hms(2024, 9, 30, 0, 0, 0).unwrap()
    );

    let b = snapshot.get("b").unwrap();
    assert_eq!(b.title, "Beta");
    assert_eq!(b.price, 55.5);
}

#[tokio::test]
async fn test_fetch_failure_leaves_held_collection() {
    let server = MockServer::start_async().await;
    let mut ok_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/offered-places.json");
            then.status(200)
                .json_body(json!({ "a": body("Alpha", 100.0, "u1") }));
        })
        .await;

    let service = service(&server, StaticIdentity::anonymous());
    assert_ok!(service.fetch_places().await);
    ok_mock.delete_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/offered-places.json");
            then.status(500);
        })
        .await;

    let err = service.fetch_places().await.unwrap_err();
    assert!(matches!(err, PlacesError::Status { status: 500, .. }));

    let snapshot = service.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.version(), 1);
}

#[tokio::test]
async fn test_get_place_uses_requested_id() {
    let server = MockServer::start_async().await;
    let mut stored = body("Loft", 120.0, "u1");
    stored["id"] = json!("something-else");

    let get_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/offered-places/x.json");
            then.status(200).json_body(stored);
        })
        .await;

    let service = service(&server, StaticIdentity::anonymous());
    let place = service.get_place("x").await.unwrap();

    get_mock.assert_async().await;
    assert_eq!(place.id, "x");
    assert_eq!(place.title, "Loft");
    assert!(service.snapshot().is_empty());
}

#[tokio::test]
async fn test_get_missing_place_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/offered-places/gone.json");
            then.status(200).body("null");
        })
        .await;

    let service = service(&server, StaticIdentity::anonymous());
    let err = service.get_place("gone").await.unwrap_err();

    assert!(matches!(err, PlacesError::NotFound { ref id } if id == "gone"));
}

#[tokio::test]
async fn test_add_place_appends_with_assigned_id() {
    let server = MockServer::start_async().await;
    let post_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/offered-places.json").json_body(json!({
                "title": "Cabin",
                "description": "Quiet cabin in the woods",
                "imageUrl": PLACEHOLDER,
                "price": 75.0,
                "availableFrom": "2024-07-01T00:00:00.000Z",
                "availableTo": "2024-08-01T00:00:00.000Z",
                "userId": "user-42"
            }));
            then.status(200).json_body(json!({ "name": "g1" }));
        })
        .await;

    let service = service(&server, StaticIdentity::new("user-42"));
    let place = service.add_place(cabin()).await.unwrap();

    post_mock.assert_async().await;
    assert_eq!(place.id, "g1");

    let snapshot = service.snapshot();
    let last = snapshot.places().last().unwrap();
    assert_eq!(last.id, "g1");
    assert_eq!(last.owner_id, "user-42");
    assert_eq!(last.image_url, PLACEHOLDER);
}

#[tokio::test]
async fn test_add_place_failure_leaves_held_collection() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/offered-places.json");
            then.status(503);
        })
        .await;

    let service = service(&server, StaticIdentity::new("user-42"));
    assert_err!(service.add_place(cabin()).await);

    let snapshot = service.snapshot();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.version(), 0);
}

#[tokio::test]
async fn test_add_place_requires_identity() {
    let server = MockServer::start_async().await;
    let post_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/offered-places.json");
            then.status(200).json_body(json!({ "name": "g1" }));
        })
        .await;

    let service = service(&server, StaticIdentity::anonymous());
    let err = service.add_place(cabin()).await.unwrap_err();

    assert!(matches!(err, PlacesError::Unauthenticated));
    post_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_concurrent_creates_are_both_kept() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/offered-places.json")
                .body_contains("\"title\":\"Cabin\"");
            then.status(200).json_body(json!({ "name": "c1" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/offered-places.json")
                .body_contains("\"title\":\"Chalet\"");
            then.status(200).json_body(json!({ "name": "c2" }));
        })
        .await;

    let service = service(&server, StaticIdentity::new("user-42"));
    let chalet = NewPlace {
        title: "Chalet".to_string(),
        ..cabin()
    };

    let (first, second) = tokio::join!(service.add_place(cabin()), service.add_place(chalet));
    assert_ok!(first);
    assert_ok!(second);

    let snapshot = service.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.get("c1").is_some());
    assert!(snapshot.get("c2").is_some());
    assert_eq!(snapshot.version(), 2);
}

#[tokio::test]
async fn test_update_place_replaces_one_record() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/offered-places.json");
            then.status(200).json_body(json!({
                "a": body("Alpha", 100.0, "u1"),
                "b": body("Beta", 55.5, "u2")
            }));
        })
        .await;
    let put_mock = server
        .mock_async(|when, then| {
            when.method(PUT).path("/offered-places/a.json").json_body(json!({
                "title": "T",
                "description": "D",
                "imageUrl": "https://img.example/place.jpg",
                "price": 100.0,
                "availableFrom": "2024-05-01T00:00:00.000Z",
                "availableTo": "2024-09-30T00:00:00.000Z",
                "userId": "u1"
            }));
            then.status(200).json_body(json!({ "title": "T" }));
        })
        .await;

    let service = service(&server, StaticIdentity::new("someone-else"));
    service.fetch_places().await.unwrap();
    let before = service.snapshot().get("a").unwrap().clone();

    let updated = service.update_place("a", "T", "D").await.unwrap();

    put_mock.assert_async().await;
    let snapshot = service.snapshot();
    let a = snapshot.get("a").unwrap();
    assert_eq!(a, &updated);
    assert_eq!(a.title, "T");
    assert_eq!(a.description, "D");
    assert_eq!(a.price, before.price);
    assert_eq!(a.available_from, before.available_from);
    assert_eq!(a.available_to, before.available_to);
    assert_eq!(a.owner_id, "u1");
    assert_eq!(snapshot.get("b").unwrap().title, "Beta");
}

#[tokio::test]
async fn test_update_unknown_place_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/offered-places.json");
            then.status(200)
                .json_body(json!({ "a": body("Alpha", 100.0, "u1") }));
        })
        .await;
    let put_mock = server
        .mock_async(|when, then| {
            when.method(PUT).path_contains("/offered-places/");
            then.status(200).json_body(json!({}));
        })
        .await;

    let service = service(&server, StaticIdentity::anonymous());
    service.ensure_loaded().await.unwrap();

    let err = service.update_place("missing", "T", "D").await.unwrap_err();

    assert!(err.is_not_found());
    put_mock.assert_hits_async(0).await;
    assert_eq!(service.snapshot().get("a").unwrap().title, "Alpha");
}

#[tokio::test]
async fn test_ensure_loaded_then_update_on_empty_collection() {
    let server = MockServer::start_async().await;
    let list_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/offered-places.json");
            then.status(200).json_body(json!({
                "a": body("Alpha", 100.0, "u1"),
                "b": body("Beta", 55.5, "u2")
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/offered-places/b.json");
            then.status(200).json_body(json!({}));
        })
        .await;

    let service = service(&server, StaticIdentity::anonymous());
    assert!(service.snapshot().is_empty());

    let loaded = service.ensure_loaded().await.unwrap();
    assert_eq!(loaded.len(), 2);

    // second call is served from the held collection
    service.ensure_loaded().await.unwrap();
    list_mock.assert_hits_async(1).await;

    service.update_place("b", "New Beta", "Fresh").await.unwrap();

    let snapshot = service.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.get("a").unwrap().title, "Alpha");
    assert_eq!(snapshot.get("b").unwrap().title, "New Beta");
    assert_eq!(snapshot.get("b").unwrap().description, "Fresh");
}

#[tokio::test]
async fn test_subscribers_follow_the_held_collection() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/offered-places.json");
            then.status(200)
                .json_body(json!({ "a": body("Alpha", 100.0, "u1") }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/offered-places.json");
            then.status(200).json_body(json!({ "name": "g1" }));
        })
        .await;

    let service = service(&server, StaticIdentity::new("user-42"));
    let mut stream = service.places_stream();

    let initial = stream.next().await.unwrap();
    assert!(initial.is_empty());

    service.fetch_places().await.unwrap();
    let loaded = stream.next().await.unwrap();
    assert_eq!(loaded.len(), 1);

    service.add_place(cabin()).await.unwrap();
    let appended = stream.next().await.unwrap();
    let ids: Vec<&str> = appended.places().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "g1"]);

    let late = service.places();
    assert_eq!(late.borrow().len(), 2);
}

#[tokio::test]
async fn test_get_place_cannot_escape_the_collection() {
    let server = MockServer::start_async().await;
    let outside_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/secret.json");
            then.status(200).json_body(body("Secret", 1.0, "admin"));
        })
        .await;

    let service = service(&server, StaticIdentity::anonymous());

    let err = service.get_place("../secret").await.unwrap_err();
    assert!(matches!(err, PlacesError::InvalidInput { .. }));

    let err = service.get_place("x?shallow=true").await.unwrap_err();
    assert!(matches!(err, PlacesError::InvalidInput { .. }));

    outside_mock.assert_hits_async(0).await;
}
