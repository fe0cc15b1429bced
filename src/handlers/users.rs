use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde_json::Value;
use sqlx::SqliteConnection;
use tracing::info;

use super::{country_id_for, parse_id};
use crate::constants::USER_PROFILE;
use crate::db::begin_write;
use crate::mason::nearby::links;
use crate::mason::{Control, MasonBuilder, NearbyControls};
use crate::models::{Event, Reservation, User, UserInput};
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, ok};
use crate::utils::validation::parse_body;
use crate::AppState;

pub async fn list_users(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let users = User::all(&mut tx).await?;

    let mut body = MasonBuilder::new();
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::USERS))
        .add_control_add_user()
        .with_items();
    for user in users {
        let mut item = MasonBuilder::new()
            .with("id", user.id)
            .with("email", user.email.as_str());
        item.add_control("self", Control::link(links::user(user.id)))
            .add_control("profile", Control::link(USER_PROFILE));
        body.push_item(item);
    }

    Ok(ok(body))
}

async fn resolve_country(
    conn: &mut SqliteConnection,
    input: &UserInput,
) -> Result<Option<i64>, AppError> {
    match input.country.as_deref() {
        Some(name) => Ok(Some(country_id_for(conn, name).await?)),
        None => Ok(None),
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let input: UserInput = parse_body(payload, &User::schema())?;

    let mut tx = begin_write(&state.pool).await?;
    let country_id = resolve_country(&mut tx, &input).await?;
    let id = User::insert(&mut tx, &input, country_id).await?;
    tx.commit().await?;

    info!(user = id, "User created");
    Ok(created(links::user(id)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let user = find(&mut tx, &user).await?;
    let managed = Event::managed_by(&mut tx, user.id).await?;
    let reservations = Reservation::of_user(&mut tx, user.id).await?;

    let mut body = MasonBuilder::new()
        .with("id", user.id)
        .with("first_name", user.first_name.as_str())
        .with("last_name", user.last_name.as_str())
        .with("birth_date", user.birth_date.to_string())
        .with("email", user.email.as_str())
        .with("country", user.country.clone())
        .with(
            "managed_events",
            managed.into_iter().map(|e| e.name).collect::<Vec<_>>(),
        )
        .with(
            "reservations",
            reservations.into_iter().map(|r| r.id).collect::<Vec<_>>(),
        );
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::user(user.id)))
        .add_control("profile", Control::link(USER_PROFILE))
        .add_control("collection", Control::link(links::USERS))
        .add_control_modify_user(user.id)
        .add_control_delete_user(user.id);
    if let Some(country) = &user.country {
        body.add_control_get_country(country);
    }

    Ok(ok(body))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &user).await?;
    let input: UserInput = parse_body(payload, &User::schema())?;

    let country_id = resolve_country(&mut tx, &input).await?;
    User::update(&mut tx, existing.id, &input, country_id).await?;
    tx.commit().await?;

    info!(user = existing.id, "User updated");
    Ok(no_content())
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &user).await?;
    User::delete(&mut tx, existing.id).await?;
    tx.commit().await?;

    info!(user = existing.id, "User deleted");
    Ok(no_content())
}

async fn find(conn: &mut SqliteConnection, raw_id: &str) -> Result<User, AppError> {
    let id = parse_id(raw_id, "user")?;
    User::find(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No user was found with the id {id}")))
}

#[cfg(test)]
mod tests {
    use crate::handlers::testing::*;
    use axum::http::{header, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_user_round_trip() {
        let app = app().await;
        seed(&app).await;

        let reply = get(&app, "/api/users/1/").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["email"], "user.test@gmail.com");
        assert_eq!(reply.body["birth_date"], "1990-05-17");
        assert_eq!(reply.body["country"], "Finland");
        assert_eq!(
            reply.body["@controls"]["nearby:country"]["href"],
            "/api/countries/Finland/"
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let app = app().await;
        seed(&app).await;

        let reply = post(
            &app,
            "/api/users/",
            json!({
                "first_name": "Pekka",
                "last_name": "Pouta",
                "birth_date": "1985-01-01",
                "email": "user.test@gmail.com"
            }),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CONFLICT);
        assert_eq!(
            get(&app, "/api/users/").await.body["items"]
                .as_array()
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_user_without_country() {
        let app = app().await;
        let reply = post(
            &app,
            "/api/users/",
            json!({
                "first_name": "Pekka",
                "last_name": "Pouta",
                "birth_date": "1985-01-01",
                "email": "pekkispouta@gmail.com"
            }),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        let location = reply.headers[header::LOCATION].to_str().unwrap().to_string();
        let reply = get(&app, &location).await;
        assert_eq!(reply.body["email"], "pekkispouta@gmail.com");
        assert_eq!(reply.body["country"], json!(null));
    }

    #[tokio::test]
    async fn test_non_numeric_user_id_is_not_found() {
        let app = app().await;
        let reply = get(&app, "/api/users/pekka/").await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_manager_keeps_event() {
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

        assert_eq!(delete(&app, "/api/users/1/").await.status, StatusCode::NO_CONTENT);

        let reply = get(&app, "/api/events/Stand%20Up%20Comedy%20at%2045%20Special/").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["manager"], json!(null));
        let reply = get(&app, "/api/reservations/").await;
        assert_eq!(reply.body["items"], json!([]));
    }
}
