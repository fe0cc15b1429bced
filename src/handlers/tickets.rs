use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde_json::Value;
use sqlx::SqliteConnection;
use tracing::info;

use super::parse_id;
use crate::constants::TICKET_PROFILE;
use crate::db::begin_write;
use crate::mason::nearby::links;
use crate::mason::{Control, MasonBuilder, NearbyControls};
use crate::models::{Ticket, TicketInput};
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, ok};
use crate::utils::validation::parse_body;
use crate::AppState;

pub async fn list_tickets(
    State(state): State<AppState>,
    Path(reservation): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let reservation = super::reservations::find(&mut tx, &reservation).await?;
    let tickets = Ticket::of_reservation(&mut tx, reservation.id).await?;

    let mut body = MasonBuilder::new();
    body.add_nearby_namespace()
        .add_control(
            "self",
            Control::link(links::reservation_tickets(reservation.id)),
        )
        .add_control("up", Control::link(links::reservation(reservation.id)))
        .add_control_add_ticket(reservation.id)
        .with_items();
    for ticket in tickets {
        let mut item = MasonBuilder::new()
            .with("id", ticket.id)
            .with("type", ticket.ticket_type.as_str());
        item.add_control("self", Control::link(links::ticket(ticket.id)))
            .add_control("profile", Control::link(TICKET_PROFILE));
        body.push_item(item);
    }

    Ok(ok(body))
}

pub async fn create_ticket(
    State(state): State<AppState>,
    Path(reservation): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let reservation = super::reservations::find(&mut tx, &reservation).await?;
    let input: TicketInput = parse_body(payload, &Ticket::schema())?;

    let id = Ticket::insert(&mut tx, reservation.id, &input).await?;
    tx.commit().await?;

    info!(ticket = id, reservation = reservation.id, "Ticket created");
    Ok(created(links::ticket(id)))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let ticket = find(&mut tx, &ticket).await?;

    let mut body = MasonBuilder::new()
        .with("id", ticket.id)
        .with("type", ticket.ticket_type.as_str())
        .with("reservation", ticket.reservation_id);
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::ticket(ticket.id)))
        .add_control("profile", Control::link(TICKET_PROFILE))
        .add_control(
            "collection",
            Control::link(links::reservation_tickets(ticket.reservation_id)),
        )
        .add_control_get_reservation(ticket.reservation_id)
        .add_control_modify_ticket(ticket.id)
        .add_control_delete_ticket(ticket.id);

    Ok(ok(body))
}

pub async fn update_ticket(
    State(state): State<AppState>,
    Path(ticket): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &ticket).await?;
    let input: TicketInput = parse_body(payload, &Ticket::schema())?;

    Ticket::update(&mut tx, existing.id, &input).await?;
    tx.commit().await?;

    info!(ticket = existing.id, "Ticket updated");
    Ok(no_content())
}

pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(ticket): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &ticket).await?;
    Ticket::delete(&mut tx, existing.id).await?;
    tx.commit().await?;

    info!(ticket = existing.id, "Ticket deleted");
    Ok(no_content())
}

async fn find(conn: &mut SqliteConnection, raw_id: &str) -> Result<Ticket, AppError> {
    let id = parse_id(raw_id, "ticket")?;
    Ticket::find(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No ticket was found with the id {id}")))
}
