use axum::routing::get;
use axum::{middleware, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, with_security_headers, Config};
use crate::handlers::{
    areas, countries, entry_point, events, fallback, health_check, reservations, tickets, users,
};
use crate::utils::response::render_errors;
use crate::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/", get(entry_point))
        .route(
            "/api/countries/",
            get(countries::list_countries).post(countries::create_country),
        )
        .route(
            "/api/countries/:country/",
            get(countries::get_country)
                .put(countries::update_country)
                .delete(countries::delete_country),
        )
        .route("/api/users/", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/:user/",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/areas/", get(areas::list_areas).post(areas::create_area))
        .route(
            "/api/areas/:area/",
            get(areas::get_area)
                .put(areas::update_area)
                .delete(areas::delete_area),
        )
        .route(
            "/api/events/",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/events/by-area/:area", get(events::events_by_area))
        .route(
            "/api/events/:event/",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/api/reservations/",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/api/reservations/:reservation/",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        )
        .route(
            "/api/reservations/:reservation/tickets/",
            get(tickets::list_tickets).post(tickets::create_ticket),
        )
        .route(
            "/api/tickets/:ticket/",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(render_errors))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(create_cors_layer(config.cors_allowed_origins.as_deref()));

    with_security_headers(router, config.production)
}
