use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::SqliteConnection;

use crate::mason::nearby::links;
use crate::mason::{Control, MasonBuilder, NearbyControls};
use crate::models::{Area, Country, Event, User};
use crate::utils::error::AppError;
use crate::utils::response::ok;

pub mod areas;
pub mod countries;
pub mod events;
pub mod reservations;
pub mod tickets;
pub mod users;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "nearby-events-api",
    };

    axum::Json(payload).into_response()
}

/// API entry point linking every top-level collection.
pub async fn entry_point() -> Response {
    let mut body = MasonBuilder::new();
    body.add_nearby_namespace()
        .add_control("self", Control::link(links::ENTRY))
        .add_control_get_countries()
        .add_control_get_users()
        .add_control_get_areas()
        .add_control_get_events()
        .add_control_get_reservations();
    ok(body)
}

pub async fn fallback(uri: Uri) -> AppError {
    AppError::not_found(format!("No resource at {}", uri.path()))
}

/// Numeric path segments that don't parse can't name a resource.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::not_found(format!("No {what} was found with the id {raw}")))
}

pub(crate) async fn country_id_for(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<i64, AppError> {
    Country::find_by_name(conn, name)
        .await?
        .map(|c| c.id)
        .ok_or_else(|| AppError::invalid(format!("No country was found with the name {name}")))
}

pub(crate) async fn area_id_for(conn: &mut SqliteConnection, name: &str) -> Result<i64, AppError> {
    Area::find_by_name(conn, name)
        .await?
        .map(|a| a.id)
        .ok_or_else(|| AppError::invalid(format!("No area was found with the name {name}")))
}

pub(crate) async fn event_id_for(conn: &mut SqliteConnection, name: &str) -> Result<i64, AppError> {
    Event::find_by_name(conn, name)
        .await?
        .map(|e| e.id)
        .ok_or_else(|| AppError::invalid(format!("No event was found with the name {name}")))
}

pub(crate) async fn ensure_user(conn: &mut SqliteConnection, id: i64) -> Result<i64, AppError> {
    User::find(conn, id)
        .await?
        .map(|u| u.id)
        .ok_or_else(|| AppError::invalid(format!("No user was found with the id {id}")))
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use axum::http::{header, Method, StatusCode};

    #[tokio::test]
    async fn test_health_check() {
        let app = app().await;
        let reply = get(&app, "/health").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["status"], "ok");
    }

    #[tokio::test]
    async fn test_entry_point_links_collections() {
        let app = app().await;
        let reply = get(&app, "/api/").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.headers[header::CONTENT_TYPE],
            "application/vnd.mason+json"
        );
        let controls = &reply.body["@controls"];
        assert_eq!(controls["nearby:areas-all"]["href"], "/api/areas/");
        assert_eq!(controls["nearby:events-all"]["href"], "/api/events/");
        assert_eq!(
            reply.body["@namespaces"]["nearby"]["name"],
            "/nearby/link-relations/"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_mason_404() {
        let app = app().await;
        let reply = get(&app, "/api/nothing-here/").await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body["resource_url"], "/api/nothing-here/");
        assert_eq!(reply.body["@controls"]["profile"]["href"], "/profiles/error/");
    }

    #[tokio::test]
    async fn test_wrong_method_is_mason_405() {
        let app = app().await;
        let reply = send(&app, Method::PATCH, "/api/areas/Oulu/", None).await;
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            reply.headers[header::CONTENT_TYPE],
            "application/vnd.mason+json"
        );
        assert!(reply.headers.contains_key(header::ALLOW));
        assert_eq!(reply.body["resource_url"], "/api/areas/Oulu/");
        assert_eq!(reply.body["@error"]["@message"], "Method Not Allowed");
        assert_eq!(
            reply.body["@error"]["@messages"][0],
            "PATCH is not supported on /api/areas/Oulu/"
        );
    }

    #[tokio::test]
    async fn test_undecodable_path_is_mason_error() {
        let app = app().await;
        let reply = get(&app, "/api/areas/%FF/").await;
        assert!(reply.status.is_client_error());
        assert_eq!(
            reply.headers[header::CONTENT_TYPE],
            "application/vnd.mason+json"
        );
        assert_eq!(reply.body["@controls"]["profile"]["href"], "/profiles/error/");
        assert!(!reply.body["@error"]["@messages"][0]
            .as_str()
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_security_headers_are_set() {
        let app = app().await;
        let reply = get(&app, "/api/").await;
        assert_eq!(reply.headers["x-content-type-options"], "nosniff");
        assert!(reply.headers.contains_key("x-request-id"));
    }
}
