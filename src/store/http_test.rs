use super::*;
use crate::model::{Building, EntityData, Room, Staff};
use crate::routes;
use crate::state::test_helpers::{self, ADMIN_EMAIL, ADMIN_PASSWORD};
use serde_json::json;

async fn serve() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = routes::app(test_helpers::test_app_state());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn room(building_id: Uuid, floor: i32, number: &str) -> NewEntity {
    EntityData::Room(Room {
        building_id: Some(building_id),
        floor,
        room_number: number.into(),
        ..Room::default()
    })
}

// =============================================================================
// status_error
// =============================================================================

#[test]
fn client_statuses_map_to_validation() {
    for status in [400, 422] {
        let err = status_error(status, "room requires roomNumber".into(), EntityKind::Room, None);
        assert!(matches!(err, StoreError::Validation(ref m) if m.contains("roomNumber")));
    }
}

#[test]
fn not_found_needs_an_id() {
    let id = Uuid::new_v4();
    assert!(matches!(
        status_error(404, String::new(), EntityKind::Staff, Some(id)),
        StoreError::NotFound { kind: EntityKind::Staff, id: got } if got == id
    ));
    assert!(matches!(
        status_error(404, "unknown collection".into(), EntityKind::Staff, None),
        StoreError::Server { status: 404, .. }
    ));
}

#[test]
fn other_statuses_map_to_server() {
    assert!(matches!(
        status_error(401, String::new(), EntityKind::Building, None),
        StoreError::Server { status: 401, .. }
    ));
    assert!(matches!(
        status_error(502, "bad gateway".into(), EntityKind::Building, Some(Uuid::nil())),
        StoreError::Server { status: 502, .. }
    ));
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let store = HttpStore::new("http://localhost:3000/").unwrap();
    let id = Uuid::nil();
    assert_eq!(store.url(EntityKind::Hallway, None), "http://localhost:3000/api/hallways");
    assert_eq!(store.url(EntityKind::Staff, Some(id)), format!("http://localhost:3000/api/staff/{id}"));
}

// =============================================================================
// Against a live router
// =============================================================================

#[tokio::test]
async fn crud_round_trip_over_http() {
    let base = serve().await;
    let store = HttpStore::login(&base, ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

    let building = store
        .create_entity(EntityData::Building(Building { name: "Library".into(), floors: 2, ..Building::default() }))
        .await
        .unwrap();
    assert!(building.active);

    let ground = store.create_entity(room(building.id, 1, "101")).await.unwrap();
    store.create_entity(room(building.id, 2, "201")).await.unwrap();

    let filter = ListFilter { building_id: Some(building.id), floor: Some(1), ..ListFilter::default() };
    let rooms = store.list_entities(EntityKind::Room, &filter).await.unwrap();
    assert_eq!(rooms, vec![ground.clone()]);

    let fetched = store.get_entity(EntityKind::Room, ground.id).await.unwrap();
    assert_eq!(fetched, ground);

    let updated = store.update_entity(EntityKind::Room, ground.id, json!({ "name": "Reading room" })).await.unwrap();
    let EntityData::Room(r) = &updated.data else { unreachable!() };
    assert_eq!(r.name, "Reading room");

    store.delete_entity(EntityKind::Room, ground.id).await.unwrap();
    let all = ListFilter { include_inactive: true, ..ListFilter::for_building(building.id) };
    let rooms = store.list_entities(EntityKind::Room, &all).await.unwrap();
    assert_eq!(rooms.len(), 2);
    assert!(rooms.iter().any(|r| r.id == ground.id && !r.active));

    store.hard_delete_entity(EntityKind::Room, ground.id).await.unwrap();
    let err = store.get_entity(EntityKind::Room, ground.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { kind: EntityKind::Room, id } if id == ground.id));
}

#[tokio::test]
async fn invalid_create_is_validation_error() {
    let base = serve().await;
    let store = HttpStore::login(&base, ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    let err = store.create_entity(EntityData::Staff(Staff::default())).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(ref m) if m.contains("name")), "{err}");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let base = serve().await;
    let err = HttpStore::login(&base, ADMIN_EMAIL, "hunter2").await.unwrap_err();
    assert!(matches!(err, StoreError::Server { status: 401, .. }));
}

#[tokio::test]
async fn anonymous_client_reads_but_cannot_write() {
    let base = serve().await;
    let store = HttpStore::new(&base).unwrap();
    assert!(store.list_entities(EntityKind::Announcement, &ListFilter::default()).await.unwrap().is_empty());

    let err = store
        .create_entity(EntityData::Building(Building { name: "Gym".into(), ..Building::default() }))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Server { status: 401, .. }));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let store = HttpStore::new(&format!("http://{addr}")).unwrap();
    let err = store.get_entity(EntityKind::Building, Uuid::nil()).await.unwrap_err();
    assert!(matches!(err, StoreError::Network(_)));
}
