use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde_json::Value;
use tracing::info;

use super::country_id_for;
use crate::constants::AREA_PROFILE;
use crate::db::begin_write;
use crate::mason::nearby::links;
use crate::mason::{Control, MasonBuilder, NearbyControls};
use crate::models::{Area, AreaInput};
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, ok};
use crate::utils::validation::parse_body;
use crate::AppState;

pub async fn list_areas(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let areas = Area::all(&mut tx).await?;

    let mut body = MasonBuilder::new();
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::AREAS))
        .add_control_add_area()
        .add_control_get_events()
        .with_items();

    for area in areas {
        let mut item = MasonBuilder::new().with("name", area.name.as_str());
        item.add_control("self", Control::link(links::area(&area.name)))
            .add_control("profile", Control::link(AREA_PROFILE));
        body.push_item(item);
    }

    Ok(ok(body))
}

pub async fn create_area(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let input: AreaInput = parse_body(payload, &Area::schema())?;

    let mut tx = begin_write(&state.pool).await?;
    let country_id = country_id_for(&mut tx, &input.country).await?;
    Area::insert(&mut tx, &input.name, country_id).await?;
    tx.commit().await?;

    info!(area = %input.name, "Area created");
    Ok(created(links::area(&input.name)))
}

pub async fn get_area(
    State(state): State<AppState>,
    Path(area): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let area = find(&mut tx, &area).await?;

    let mut body = MasonBuilder::new()
        .with("name", area.name.as_str())
        .with("country", area.country.as_str());
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::area(&area.name)))
        .add_control("profile", Control::link(AREA_PROFILE))
        .add_control("collection", Control::link(links::AREAS))
        .add_control_modify_area(&area.name)
        .add_control_delete_area(&area.name)
        .add_control_events_by(&area.name)
        .add_control_get_country(&area.country);

    Ok(ok(body))
}

/// Renames are allowed; events in the area follow the new name.
pub async fn update_area(
    State(state): State<AppState>,
    Path(area): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &area).await?;
    let input: AreaInput = parse_body(payload, &Area::schema())?;

    let country_id = country_id_for(&mut tx, &input.country).await?;
    Area::update(&mut tx, existing.id, &input.name, country_id).await?;
    tx.commit().await?;

    info!(from = %existing.name, to = %input.name, "Area updated");
    Ok(no_content())
}

pub async fn delete_area(
    State(state): State<AppState>,
    Path(area): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &area).await?;
    Area::delete(&mut tx, existing.id).await?;
    tx.commit().await?;

    info!(area = %existing.name, "Area deleted");
    Ok(no_content())
}

async fn find(conn: &mut sqlx::SqliteConnection, name: &str) -> Result<Area, AppError> {
    Area::find_by_name(conn, name)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No area was found with the name {name}")))
}

#[cfg(test)]
mod tests {
    use crate::handlers::testing::*;
    use axum::http::{header, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_areas() {
        let app = app().await;
        seed(&app).await;

        let reply = get(&app, "/api/areas/").await;
        assert_eq!(reply.status, StatusCode::OK);
        let body = reply.body;
        assert_eq!(body["@controls"]["self"]["href"], "/api/areas/");
        assert_eq!(body["@controls"]["nearby:add-area"]["method"], "POST");
        assert_eq!(
            body["@controls"]["nearby:add-area"]["schema"]["required"],
            json!(["name", "country"])
        );
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "Oulu - Keskusta");
        assert_eq!(
            items[0]["@controls"]["self"]["href"],
            "/api/areas/Oulu%20-%20Keskusta/"
        );
        assert_eq!(items[0]["@controls"]["profile"]["href"], "/profiles/area/");
        // Lists only summarize
        assert!(items[0].get("country").is_none());
    }

    #[tokio::test]
    async fn test_create_and_get_area() {
        let app = app().await;
        seed(&app).await;

        let reply = post(
            &app,
            "/api/areas/",
            json!({"name": "Helsinki - Vuosaari", "country": "Finland"}),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        let location = reply.headers[header::LOCATION].to_str().unwrap().to_string();
        assert_eq!(location, "/api/areas/Helsinki%20-%20Vuosaari/");

        let reply = get(&app, &location).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["name"], "Helsinki - Vuosaari");
        assert_eq!(reply.body["country"], "Finland");
        assert_eq!(reply.body["@controls"]["nearby:edit-area"]["method"], "PUT");
        assert_eq!(
            reply.body["@controls"]["nearby:delete-area"]["href"],
            "/api/areas/Helsinki%20-%20Vuosaari/"
        );
        assert_eq!(
            reply.body["@controls"]["nearby:events-by"]["href"],
            "/api/events/by-area/Helsinki%20-%20Vuosaari"
        );
    }

    #[tokio::test]
    async fn test_duplicate_area_conflicts() {
        let app = app().await;
        seed(&app).await;

        let reply = post(
            &app,
            "/api/areas/",
            json!({"name": "Oulu - Keskusta", "country": "Finland"}),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CONFLICT);
        assert_eq!(reply.body["resource_url"], "/api/areas/");
        let messages = reply.body["@error"]["@messages"].as_array().unwrap();
        assert!(!messages.is_empty());

        let reply = get(&app, "/api/areas/").await;
        assert_eq!(reply.body["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_areas_conflict() {
        let (app, _dir) = file_app().await;
        seed(&app).await;

        for round in 0..20 {
            let body = json!({"name": format!("Oulu - Alue {round}"), "country": "Finland"});
            let (first, second) = tokio::join!(
                post(&app, "/api/areas/", body.clone()),
                post(&app, "/api/areas/", body)
            );
            let mut statuses = [first.status, second.status];
            statuses.sort();
            assert_eq!(
                statuses,
                [StatusCode::CREATED, StatusCode::CONFLICT],
                "round {round}"
            );
        }

        let reply = get(&app, "/api/areas/").await;
        assert_eq!(reply.body["items"].as_array().unwrap().len(), 21);
    }

    #[tokio::test]
    async fn test_area_needs_existing_country() {
        let app = app().await;
        let reply = post(
            &app,
            "/api/areas/",
            json!({"name": "Madrid - Centro", "country": "Spain"}),
        )
        .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_area_body() {
        let app = app().await;
        let reply = post(&app, "/api/areas/", json!({"title": "no name"})).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["@error"]["@message"], "Invalid JSON document");
    }

    #[tokio::test]
    async fn test_rename_area() {
        let app = app().await;
        seed(&app).await;
        post(&app, "/api/events/", comedy()).await;

        let reply = put(
            &app,
            "/api/areas/Oulu%20-%20Keskusta/",
            json!({"name": "Oulu - Tuira", "country": "Finland"}),
        )
        .await;
        assert_eq!(reply.status, StatusCode::NO_CONTENT);

        assert_eq!(
            get(&app, "/api/areas/Oulu%20-%20Keskusta/").await.status,
            StatusCode::NOT_FOUND
        );
        let reply = get(&app, "/api/events/by-area/Oulu%20-%20Tuira").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_area() {
        let app = app().await;
        seed(&app).await;
        post(&app, "/api/events/", comedy()).await;

        let reply = delete(&app, "/api/areas/Oulu%20-%20Keskusta/").await;
        assert_eq!(reply.status, StatusCode::NO_CONTENT);
        assert_eq!(
            delete(&app, "/api/areas/Oulu%20-%20Keskusta/").await.status,
            StatusCode::NOT_FOUND
        );

        let reply = get(&app, "/api/events/Stand%20Up%20Comedy%20at%2045%20Special/").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["area"], serde_json::Value::Null);
    }
}
