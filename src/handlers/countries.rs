use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde_json::Value;
use sqlx::SqliteConnection;
use tracing::info;

use crate::constants::COUNTRY_PROFILE;
use crate::db::begin_write;
use crate::mason::nearby::links;
use crate::mason::{Control, MasonBuilder, NearbyControls};
use crate::models::{Country, CountryInput};
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, ok};
use crate::utils::validation::parse_body;
use crate::AppState;

pub async fn list_countries(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let countries = Country::all(&mut tx).await?;

    let mut body = MasonBuilder::new();
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::COUNTRIES))
        .add_control_add_country()
        .with_items();
    for country in countries {
        let mut item = MasonBuilder::new().with("name", country.name.as_str());
        item.add_control("self", Control::link(links::country(&country.name)))
            .add_control("profile", Control::link(COUNTRY_PROFILE));
        body.push_item(item);
    }

    Ok(ok(body))
}

pub async fn create_country(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let input: CountryInput = parse_body(payload, &Country::schema())?;

    let mut tx = begin_write(&state.pool).await?;
    Country::insert(&mut tx, &input).await?;
    tx.commit().await?;

    info!(country = %input.name, "Country created");
    Ok(created(links::country(&input.name)))
}

pub async fn get_country(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;
    let country = find(&mut tx, &country).await?;

    let mut body = MasonBuilder::new()
        .with("name", country.name.as_str())
        .with("currency", country.currency.as_str());
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::country(&country.name)))
        .add_control("profile", Control::link(COUNTRY_PROFILE))
        .add_control("collection", Control::link(links::COUNTRIES))
        .add_control_modify_country(&country.name)
        .add_control_delete_country(&country.name)
        .add_control_get_areas();

    Ok(ok(body))
}

pub async fn update_country(
    State(state): State<AppState>,
    Path(country): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &country).await?;
    let input: CountryInput = parse_body(payload, &Country::schema())?;

    Country::update(&mut tx, existing.id, &input).await?;
    tx.commit().await?;

    info!(from = %existing.name, to = %input.name, "Country updated");
    Ok(no_content())
}

pub async fn delete_country(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = begin_write(&state.pool).await?;
    let existing = find(&mut tx, &country).await?;
    Country::delete(&mut tx, existing.id).await?;
    tx.commit().await?;

    info!(country = %existing.name, "Country deleted");
    Ok(no_content())
}

async fn find(conn: &mut SqliteConnection, name: &str) -> Result<Country, AppError> {
    Country::find_by_name(conn, name)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No country was found with the name {name}")))
}

#[cfg(test)]
mod tests {
    use crate::handlers::testing::*;
    use axum::http::{header, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_country_round_trip() {
        let app = app().await;
        let reply = post(
            &app,
            "/api/countries/",
            json!({"name": "Finland", "currency": "EUR"}),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED);

        let location = reply.headers[header::LOCATION].to_str().unwrap().to_string();
        let reply = get(&app, &location).await;
        assert_eq!(reply.body["name"], "Finland");
        assert_eq!(reply.body["currency"], "EUR");
    }

    #[tokio::test]
    async fn test_duplicate_country_conflicts() {
        let app = app().await;
        seed(&app).await;
        let reply = post(
            &app,
            "/api/countries/",
            json!({"name": "Finland", "currency": "EUR"}),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_delete_country_cascades() {
        let app = app().await;
        seed(&app).await;

        let reply = delete(&app, "/api/countries/Finland/").await;
        assert_eq!(reply.status, StatusCode::NO_CONTENT);

        let reply = get(&app, "/api/areas/").await;
        assert_eq!(reply.body["items"], json!([]));
        let reply = get(&app, "/api/users/1/").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["country"], json!(null));
    }

    #[tokio::test]
    async fn test_rename_country() {
        let app = app().await;
        seed(&app).await;

        let reply = put(
            &app,
            "/api/countries/Finland/",
            json!({"name": "Suomi", "currency": "EUR"}),
        )
        .await;
        assert_eq!(reply.status, StatusCode::NO_CONTENT);
        let reply = get(&app, "/api/areas/Oulu%20-%20Keskusta/").await;
        assert_eq!(reply.body["country"], "Suomi");
    }
}
