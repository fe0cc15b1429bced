use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde_json::Value;
use sqlx::SqliteConnection;
use tracing::info;

use super::{ensure_user, event_id_for, parse_id};
use crate::constants::RESERVATION_PROFILE;
use crate::db::begin_write;
use crate::mason::nearby::links;
use crate::mason::{Control, MasonBuilder, NearbyControls};
use crate::models::{Reservation, ReservationInput};
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, ok};
use crate::utils::validation::parse_body;
use crate::AppState;

pub async fn list_reservations(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let reservations = Reservation::all(&mut tx).await?;

    let mut body = MasonBuilder::new();
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::RESERVATIONS))
        .add_control_add_reservation()
        .with_items();
    for reservation in reservations {
        let mut item = MasonBuilder::new()
            .with("id", reservation.id)
            .with("event", reservation.event_name.as_str());
        item.add_control("self", Control::link(links::reservation(reservation.id)))
            .add_control("profile", Control::link(RESERVATION_PROFILE));
        body.push_item(item);
    }

    Ok(ok(body))
}

pub async fn create_reservation(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let input: ReservationInput = parse_body(payload, &Reservation::schema())?;

    let mut tx = begin_write(&state.pool).await?;
    let event_id = event_id_for(&mut tx, &input.event).await?;
    let user_id = ensure_user(&mut tx, input.user).await?;
    let id = Reservation::insert(&mut tx, input.paid, event_id, user_id).await?;
    tx.commit().await?;

    info!(reservation = id, event = %input.event, "Reservation created");
    Ok(created(links::reservation(id)))
}

pub async fn get_reservation(
    State(state): State<AppState>,
    Path(reservation): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let reservation = find(&mut tx, &reservation).await?;

    let mut body = MasonBuilder::new()
        .with("id", reservation.id)
        .with("paid", reservation.paid)
        .with("created_at", reservation.created_at.to_rfc3339())
        .with("event", reservation.event_name.as_str())
        .with("user", reservation.user_id);
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::reservation(reservation.id)))
        .add_control("profile", Control::link(RESERVATION_PROFILE))
        .add_control("collection", Control::link(links::RESERVATIONS))
        .add_control_modify_reservation(reservation.id)
        .add_control_delete_reservation(reservation.id)
        .add_control_get_event(&reservation.event_name)
        .add_control_get_user("booked-by", reservation.user_id)
        .add_control_tickets_of(reservation.id)
        .add_control_add_ticket(reservation.id);

    Ok(ok(body))
}

/// Moves a reservation to another event or user; `created_at` is kept.
pub async fn update_reservation(
    State(state): State<AppState>,
    Path(reservation): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &reservation).await?;
    let input: ReservationInput = parse_body(payload, &Reservation::schema())?;

    let event_id = event_id_for(&mut tx, &input.event).await?;
    let user_id = ensure_user(&mut tx, input.user).await?;
    Reservation::update(&mut tx, existing.id, input.paid, event_id, user_id).await?;
    tx.commit().await?;

    info!(reservation = existing.id, "Reservation updated");
    Ok(no_content())
}

pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(reservation): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &reservation).await?;
    Reservation::delete(&mut tx, existing.id).await?;
    tx.commit().await?;

    info!(reservation = existing.id, "Reservation deleted");
    Ok(no_content())
}

pub(crate) async fn find(conn: &mut SqliteConnection, raw_id: &str) -> Result<Reservation, AppError> {
    let id = parse_id(raw_id, "reservation")?;
    Reservation::find(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No reservation was found with the id {id}")))
}

#[cfg(test)]
mod tests {
    use crate::handlers::testing::*;
    use axum::http::{header, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_reservation_round_trip() {
        let app = app().await;
        seed(&app).await;
        post(&app, "/api/events/", comedy()).await;

        let reply = post(
            &app,
            "/api/reservations/",
            json!({"event": "Stand Up Comedy at 45 Special", "user": 1, "paid": true}),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        let location = reply.headers[header::LOCATION].to_str().unwrap().to_string();
        assert_eq!(location, "/api/reservations/1/");

        let reply = get(&app, &location).await;
        assert_eq!(reply.body["event"], "Stand Up Comedy at 45 Special");
        assert_eq!(reply.body["user"], 1);
        assert_eq!(reply.body["paid"], true);
        assert_eq!(
            reply.body["@controls"]["nearby:tickets-of"]["href"],
            "/api/reservations/1/tickets/"
        );
        assert_eq!(
            reply.body["@controls"]["nearby:booked-by"]["href"],
            "/api/users/1/"
        );
    }

    #[tokio::test]
    async fn test_reservation_for_unknown_event() {
        let app = app().await;
        seed(&app).await;

        let reply = post(
            &app,
            "/api/reservations/",
            json!({"event": "Nothing", "user": 1}),
        )
        .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_move_reservation_to_other_event() {
        let app = app().await;
        seed(&app).await;
        post(&app, "/api/events/", comedy()).await;
        let mut other = comedy();
        other["name"] = json!("Fifty shades of gray in Valkea");
        post(&app, "/api/events/", other).await;
        post(
            &app,
            "/api/reservations/",
            json!({"event": "Stand Up Comedy at 45 Special", "user": 1}),
        )
        .await;

        let reply = put(
            &app,
            "/api/reservations/1/",
            json!({"event": "Fifty shades of gray in Valkea", "user": 1, "paid": true}),
        )
        .await;
        assert_eq!(reply.status, StatusCode::NO_CONTENT);

        let reply = get(&app, "/api/reservations/1/").await;
        assert_eq!(reply.body["event"], "Fifty shades of gray in Valkea");
        assert_eq!(reply.body["paid"], true);
    }

    #[tokio::test]
    async fn test_delete_event_cascades_reservations() {
        let app = app().await;
        seed(&app).await;
        post(&app, "/api/events/", comedy()).await;
        post(
            &app,
            "/api/reservations/",
            json!({"event": "Stand Up Comedy at 45 Special", "user": 1}),
        )
        .await;

        delete(&app, "/api/events/Stand%20Up%20Comedy%20at%2045%20Special/").await;

        assert_eq!(
            get(&app, "/api/reservations/1/").await.status,
            StatusCode::NOT_FOUND
        );
    }
}
