//! Link relations and URIs of the nearby-events API.

use super::{BodyMethod, Control, MasonBuilder};
use crate::constants::{LINK_RELATIONS_URL, NAMESPACE};
use crate::models::{Area, Country, Event, Reservation, Ticket, User};

/// Canonical resource URIs. Path segments are percent-encoded, so names
/// with spaces or slashes produce valid links.
pub mod links {
    use urlencoding::encode;

    pub const ENTRY: &str = "/api/";
    pub const COUNTRIES: &str = "/api/countries/";
    pub const USERS: &str = "/api/users/";
    pub const AREAS: &str = "/api/areas/";
    pub const EVENTS: &str = "/api/events/";
    pub const RESERVATIONS: &str = "/api/reservations/";

    pub fn country(name: &str) -> String {
        format!("{COUNTRIES}{}/", encode(name))
    }

    pub fn user(id: i64) -> String {
        format!("{USERS}{id}/")
    }

    pub fn area(name: &str) -> String {
        format!("{AREAS}{}/", encode(name))
    }

    pub fn event(name: &str) -> String {
        format!("{EVENTS}{}/", encode(name))
    }

    pub fn events_by_area(area: &str) -> String {
        format!("{EVENTS}by-area/{}", encode(area))
    }

    pub fn reservation(id: i64) -> String {
        format!("{RESERVATIONS}{id}/")
    }

    pub fn reservation_tickets(reservation: i64) -> String {
        format!("{RESERVATIONS}{reservation}/tickets/")
    }

    pub fn ticket(id: i64) -> String {
        format!("/api/tickets/{id}/")
    }
}

fn rel(name: &str) -> String {
    format!("{NAMESPACE}:{name}")
}

/// Named controls for every operation of the API, one helper per
/// entity/operation pair.
pub trait NearbyControls {
    fn add_nearby_namespace(&mut self) -> &mut Self;

    fn add_control_get_countries(&mut self) -> &mut Self;
    fn add_control_get_country(&mut self, country: &str) -> &mut Self;
    fn add_control_add_country(&mut self) -> &mut Self;
    fn add_control_modify_country(&mut self, country: &str) -> &mut Self;
    fn add_control_delete_country(&mut self, country: &str) -> &mut Self;

    fn add_control_get_users(&mut self) -> &mut Self;
    fn add_control_get_user(&mut self, rel_name: &str, user: i64) -> &mut Self;
    fn add_control_add_user(&mut self) -> &mut Self;
    fn add_control_modify_user(&mut self, user: i64) -> &mut Self;
    fn add_control_delete_user(&mut self, user: i64) -> &mut Self;

    fn add_control_get_areas(&mut self) -> &mut Self;
    fn add_control_get_area(&mut self, area: &str) -> &mut Self;
    fn add_control_add_area(&mut self) -> &mut Self;
    fn add_control_modify_area(&mut self, area: &str) -> &mut Self;
    fn add_control_delete_area(&mut self, area: &str) -> &mut Self;
    fn add_control_events_by(&mut self, area: &str) -> &mut Self;

    fn add_control_get_events(&mut self) -> &mut Self;
    fn add_control_get_event(&mut self, event: &str) -> &mut Self;
    fn add_control_add_event(&mut self) -> &mut Self;
    fn add_control_modify_event(&mut self, event: &str) -> &mut Self;
    fn add_control_delete_event(&mut self, event: &str) -> &mut Self;

    fn add_control_get_reservations(&mut self) -> &mut Self;
    fn add_control_get_reservation(&mut self, reservation: i64) -> &mut Self;
    fn add_control_add_reservation(&mut self) -> &mut Self;
    fn add_control_modify_reservation(&mut self, reservation: i64) -> &mut Self;
    fn add_control_delete_reservation(&mut self, reservation: i64) -> &mut Self;

    fn add_control_tickets_of(&mut self, reservation: i64) -> &mut Self;
    fn add_control_add_ticket(&mut self, reservation: i64) -> &mut Self;
    fn add_control_modify_ticket(&mut self, ticket: i64) -> &mut Self;
    fn add_control_delete_ticket(&mut self, ticket: i64) -> &mut Self;
}

impl NearbyControls for MasonBuilder {
    fn add_nearby_namespace(&mut self) -> &mut Self {
        self.add_namespace(NAMESPACE, LINK_RELATIONS_URL)
    }

    fn add_control_get_countries(&mut self) -> &mut Self {
        self.add_control(
            rel("countries-all"),
            Control::get(links::COUNTRIES, "All countries"),
        )
    }

    fn add_control_get_country(&mut self, country: &str) -> &mut Self {
        self.add_control(
            rel("country"),
            Control::get(links::country(country), "Country of this resource"),
        )
    }

    fn add_control_add_country(&mut self) -> &mut Self {
        self.add_control(
            rel("add-country"),
            Control::submit(
                BodyMethod::Post,
                links::COUNTRIES,
                "Add a new country",
                Country::schema(),
            ),
        )
    }

    fn add_control_modify_country(&mut self, country: &str) -> &mut Self {
        self.add_control(
            rel("edit-country"),
            Control::submit(
                BodyMethod::Put,
                links::country(country),
                "Edit this country",
                Country::schema(),
            ),
        )
    }

    fn add_control_delete_country(&mut self, country: &str) -> &mut Self {
        self.add_control(
            rel("delete-country"),
            Control::delete(links::country(country), "Delete this country"),
        )
    }

    fn add_control_get_users(&mut self) -> &mut Self {
        self.add_control(rel("users-all"), Control::get(links::USERS, "All users"))
    }

    fn add_control_get_user(&mut self, rel_name: &str, user: i64) -> &mut Self {
        self.add_control(rel(rel_name), Control::get(links::user(user), "Get this user"))
    }

    fn add_control_add_user(&mut self) -> &mut Self {
        self.add_control(
            rel("add-user"),
            Control::submit(BodyMethod::Post, links::USERS, "Add a new user", User::schema()),
        )
    }

    fn add_control_modify_user(&mut self, user: i64) -> &mut Self {
        self.add_control(
            rel("edit-user"),
            Control::submit(
                BodyMethod::Put,
                links::user(user),
                "Edit this user",
                User::schema(),
            ),
        )
    }

    fn add_control_delete_user(&mut self, user: i64) -> &mut Self {
        self.add_control(
            rel("delete-user"),
            Control::delete(links::user(user), "Delete this user"),
        )
    }

    fn add_control_get_areas(&mut self) -> &mut Self {
        self.add_control(rel("areas-all"), Control::get(links::AREAS, "All areas"))
    }

    fn add_control_get_area(&mut self, area: &str) -> &mut Self {
        self.add_control(rel("area"), Control::get(links::area(area), "Get this area"))
    }

    fn add_control_add_area(&mut self) -> &mut Self {
        self.add_control(
            rel("add-area"),
            Control::submit(BodyMethod::Post, links::AREAS, "Add a new area", Area::schema()),
        )
    }

    fn add_control_modify_area(&mut self, area: &str) -> &mut Self {
        self.add_control(
            rel("edit-area"),
            Control::submit(
                BodyMethod::Put,
                links::area(area),
                "Edit this area",
                Area::schema(),
            ),
        )
    }

    fn add_control_delete_area(&mut self, area: &str) -> &mut Self {
        self.add_control(
            rel("delete-area"),
            Control::delete(links::area(area), "Delete this area"),
        )
    }

    fn add_control_events_by(&mut self, area: &str) -> &mut Self {
        self.add_control(
            rel("events-by"),
            Control::get(links::events_by_area(area), "Events in this area"),
        )
    }

    fn add_control_get_events(&mut self) -> &mut Self {
        self.add_control(rel("events-all"), Control::get(links::EVENTS, "All events"))
    }

    fn add_control_get_event(&mut self, event: &str) -> &mut Self {
        self.add_control(rel("event"), Control::get(links::event(event), "Get this event"))
    }

    fn add_control_add_event(&mut self) -> &mut Self {
        self.add_control(
            rel("add-event"),
            Control::submit(
                BodyMethod::Post,
                links::EVENTS,
                "Add a new event",
                Event::schema(),
            ),
        )
    }

    fn add_control_modify_event(&mut self, event: &str) -> &mut Self {
        self.add_control(
            rel("edit-event"),
            Control::submit(
                BodyMethod::Put,
                links::event(event),
                "Edit this event",
                Event::schema(),
            ),
        )
    }

    fn add_control_delete_event(&mut self, event: &str) -> &mut Self {
        self.add_control(
            rel("delete-event"),
            Control::delete(links::event(event), "Delete this event"),
        )
    }

    fn add_control_get_reservations(&mut self) -> &mut Self {
        self.add_control(
            rel("reservations-all"),
            Control::get(links::RESERVATIONS, "All reservations"),
        )
    }

    fn add_control_get_reservation(&mut self, reservation: i64) -> &mut Self {
        self.add_control(
            rel("reservation"),
            Control::get(links::reservation(reservation), "Get this reservation"),
        )
    }

    fn add_control_add_reservation(&mut self) -> &mut Self {
        self.add_control(
            rel("add-reservation"),
            Control::submit(
                BodyMethod::Post,
                links::RESERVATIONS,
                "Make a new reservation",
                Reservation::schema(),
            ),
        )
    }

    fn add_control_modify_reservation(&mut self, reservation: i64) -> &mut Self {
        self.add_control(
            rel("edit-reservation"),
            Control::submit(
                BodyMethod::Put,
                links::reservation(reservation),
                "Edit this reservation",
                Reservation::schema(),
            ),
        )
    }

    fn add_control_delete_reservation(&mut self, reservation: i64) -> &mut Self {
        self.add_control(
            rel("delete-reservation"),
            Control::delete(links::reservation(reservation), "Cancel this reservation"),
        )
    }

    fn add_control_tickets_of(&mut self, reservation: i64) -> &mut Self {
        self.add_control(
            rel("tickets-of"),
            Control::get(
                links::reservation_tickets(reservation),
                "Tickets of this reservation",
            ),
        )
    }

    fn add_control_add_ticket(&mut self, reservation: i64) -> &mut Self {
        self.add_control(
            rel("add-ticket"),
            Control::submit(
                BodyMethod::Post,
                links::reservation_tickets(reservation),
                "Add a ticket to this reservation",
                Ticket::schema(),
            ),
        )
    }

    fn add_control_modify_ticket(&mut self, ticket: i64) -> &mut Self {
        self.add_control(
            rel("edit-ticket"),
            Control::submit(
                BodyMethod::Put,
                links::ticket(ticket),
                "Edit this ticket",
                Ticket::schema(),
            ),
        )
    }

    fn add_control_delete_ticket(&mut self, ticket: i64) -> &mut Self {
        self.add_control(
            rel("delete-ticket"),
            Control::delete(links::ticket(ticket), "Delete this ticket"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mason::Method;

    #[test]
    fn test_links_are_percent_encoded() {
        assert_eq!(links::area("Oulu - Keskusta"), "/api/areas/Oulu%20-%20Keskusta/");
        assert_eq!(
            links::events_by_area("Oulu - Keskusta"),
            "/api/events/by-area/Oulu%20-%20Keskusta"
        );
        assert_eq!(links::event("a/b"), "/api/events/a%2Fb/");
    }

    #[test]
    fn test_area_controls() {
        let mut doc = MasonBuilder::new();
        doc.add_nearby_namespace()
            .add_control_add_area()
            .add_control_modify_area("Oulu")
            .add_control_delete_area("Oulu")
            .add_control_events_by("Oulu");

        let add = doc.control("nearby:add-area").unwrap();
        assert_eq!(add.href(), "/api/areas/");
        assert_eq!(add.method(), Some(Method::Post));

        let edit = doc.control("nearby:edit-area").unwrap();
        assert_eq!(edit.href(), "/api/areas/Oulu/");
        assert_eq!(edit.method(), Some(Method::Put));

        assert_eq!(
            doc.control("nearby:delete-area").unwrap().method(),
            Some(Method::Delete)
        );
        assert_eq!(
            doc.control("nearby:events-by").unwrap().href(),
            "/api/events/by-area/Oulu"
        );
    }

    #[test]
    fn test_mutating_controls_advertise_schema() {
        let mut doc = MasonBuilder::new();
        doc.add_control_add_event();
        let value = serde_json::to_value(&doc).unwrap();
        let control = &value["@controls"]["nearby:add-event"];
        assert_eq!(control["encoding"], "json");
        assert_eq!(control["schema"]["required"][0], "name");
    }

    #[test]
    fn test_ticket_controls_scope_to_reservation() {
        let mut doc = MasonBuilder::new();
        doc.add_control_add_ticket(3).add_control_modify_ticket(8);
        assert_eq!(
            doc.control("nearby:add-ticket").unwrap().href(),
            "/api/reservations/3/tickets/"
        );
        assert_eq!(doc.control("nearby:edit-ticket").unwrap().href(), "/api/tickets/8/");
    }
}
