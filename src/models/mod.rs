//! Relational entity model.
//!
//! Delete rules live in the schema (see `migrations/`), so they hold no matter
//! which handler removes a row:
//!
//! * country → areas cascade, users have their country cleared
//! * area → events have their area cleared
//! * user → managed events lose their manager, reservations cascade
//! * event → reservations cascade
//! * reservation → tickets cascade

pub mod area;
pub mod country;
pub mod event;
pub mod reservation;
pub mod ticket;
pub mod user;

pub use area::{Area, AreaInput};
pub use country::{Country, CountryInput};
pub use event::{Event, EventInput, EventLinks};
pub use reservation::{Reservation, ReservationInput};
pub use ticket::{Ticket, TicketInput};
pub use user::{User, UserInput};
