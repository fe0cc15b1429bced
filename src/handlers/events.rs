use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde_json::Value;
use sqlx::SqliteConnection;
use tracing::info;

use super::{area_id_for, ensure_user};
use crate::constants::EVENT_PROFILE;
use crate::db::begin_write;
use crate::mason::nearby::links;
use crate::mason::{Control, MasonBuilder, NearbyControls};
use crate::models::{Area, Event, EventInput, EventLinks};
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, ok};
use crate::utils::validation::parse_body;
use crate::AppState;

/// Summary of an event as it appears in lists.
fn event_item(event: &Event) -> MasonBuilder {
    let mut item = MasonBuilder::new().with("name", event.name.as_str());
    item.add_control("self", Control::link(links::event(&event.name)))
        .add_control("profile", Control::link(EVENT_PROFILE));
    item
}

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let events = Event::all(&mut tx).await?;

    let mut body = MasonBuilder::new();
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::EVENTS))
        .add_control_add_event()
        .add_control_get_areas()
        .with_items();
    for event in &events {
        body.push_item(event_item(event));
    }

    Ok(ok(body))
}

/// Events held in one area. An unknown area is a 404; a known area without
/// events is an empty list.
pub async fn events_by_area(
    State(state): State<AppState>,
    Path(area): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let db_area = Area::find_by_name(&mut tx, &area)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No area was found with the name {area}")))?;
    let events = Event::in_area(&mut tx, db_area.id).await?;

    let mut body = MasonBuilder::new();
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::events_by_area(&db_area.name)))
        .add_control("up", Control::link(links::area(&db_area.name)))
        .add_control_add_event()
        .add_control_get_events()
        .with_items();
    for event in &events {
        body.push_item(event_item(event));
    }

    Ok(ok(body))
}

async fn resolve_links(
    conn: &mut SqliteConnection,
    input: &EventInput,
) -> Result<EventLinks, AppError> {
    let area_id = match input.area.as_deref() {
        Some(name) => Some(area_id_for(conn, name).await?),
        None => None,
    };
    let manager_id = match input.manager {
        Some(id) => Some(ensure_user(conn, id).await?),
        None => None,
    };
    Ok(EventLinks {
        area_id,
        manager_id,
    })
}

pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let input: EventInput = parse_body(payload, &Event::schema())?;

    let mut tx = begin_write(&state.pool).await?;
    let event_links = resolve_links(&mut tx, &input).await?;
    Event::insert(&mut tx, &input, event_links).await?;
    tx.commit().await?;

    info!(event = %input.name, "Event created");
    Ok(created(links::event(&input.name)))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let event = find(&mut tx, &event).await?;

    let mut body = MasonBuilder::new()
        .with("name", event.name.as_str())
        .with("max_tickets", event.max_tickets)
        .with("ticket_price", event.ticket_price)
        .with("status", event.status.as_str())
        .with("event_begin", event.event_begin.to_rfc3339())
        .with("area", event.area_name.clone())
        .with("manager", event.manager_id);
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::event(&event.name)))
        .add_control("profile", Control::link(EVENT_PROFILE))
        .add_control("collection", Control::link(links::EVENTS))
        .add_control_modify_event(&event.name)
        .add_control_delete_event(&event.name)
        .add_control_add_reservation();
    if let Some(area) = &event.area_name {
        body.add_control_get_area(area).add_control_events_by(area);
    }
    if let Some(manager) = event.manager_id {
        body.add_control_get_user("manager", manager);
    }

    Ok(ok(body))
}

/// Replaces every mutable field, including the area and manager links.
pub async fn update_event(
    State(state): State<AppState>,
    Path(event): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &event).await?;
    let input: EventInput = parse_body(payload, &Event::schema())?;

    let event_links = resolve_links(&mut tx, &input).await?;
    Event::update(&mut tx, existing.id, &input, event_links).await?;
    tx.commit().await?;

    info!(event = %input.name, "Event updated");
    Ok(no_content())
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(event): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &event).await?;
    Event::delete(&mut tx, existing.id).await?;
    tx.commit().await?;

    info!(event = %existing.name, "Event deleted");
    Ok(no_content())
}

async fn find(conn: &mut SqliteConnection, name: &str) -> Result<Event, AppError> {
    Event::find_by_name(conn, name)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No event was found with the name {name}")))
}
