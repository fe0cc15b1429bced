use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{FromRow, SqliteConnection};

const SELECT_EVENT: &str = "SELECT e.id, e.name, e.max_tickets, e.ticket_price, e.status, \
     e.event_begin, e.area_id, a.name AS area_name, e.manager_id \
     FROM events e LEFT JOIN areas a ON a.id = e.area_id";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub max_tickets: i64,
    pub ticket_price: f64,
    pub status: String,
    pub event_begin: DateTime<Utc>,
    pub area_id: Option<i64>,
    /// Current name of the linked area.
    pub area_name: Option<String>,
    pub manager_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    pub name: String,
    pub max_tickets: i64,
    pub ticket_price: f64,
    pub status: String,
    pub event_begin: DateTime<Utc>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub manager: Option<i64>,
}

/// Foreign keys of an event, resolved from the names in an [`EventInput`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EventLinks {
    pub area_id: Option<i64>,
    pub manager_id: Option<i64>,
}

impl Event {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["name", "max_tickets", "ticket_price", "status", "event_begin"],
            "properties": {
                "name": {
                    "description": "Event name",
                    "type": "string",
                    "minLength": 1
                },
                "max_tickets": {
                    "description": "Maximum number of tickets sold",
                    "type": "integer",
                    "minimum": 0
                },
                "ticket_price": {
                    "description": "Price of a single ticket",
                    "type": "number",
                    "minimum": 0
                },
                "status": {
                    "description": "Event status",
                    "type": "string"
                },
                "event_begin": {
                    "description": "Start time in RFC 3339 format",
                    "type": "string",
                    "format": "date-time"
                },
                "area": {
                    "description": "Name of the area the event is held in",
                    "type": ["string", "null"]
                },
                "manager": {
                    "description": "Id of the user managing the event",
                    "type": ["integer", "null"]
                }
            }
        })
    }

    pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("{SELECT_EVENT} ORDER BY e.name"))
            .fetch_all(conn)
            .await
    }

    pub async fn find_by_name(
        conn: &mut SqliteConnection,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("{SELECT_EVENT} WHERE e.name = ?"))
            .bind(name)
            .fetch_optional(conn)
            .await
    }

    pub async fn in_area(
        conn: &mut SqliteConnection,
        area_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("{SELECT_EVENT} WHERE e.area_id = ? ORDER BY e.name"))
            .bind(area_id)
            .fetch_all(conn)
            .await
    }

    pub async fn managed_by(
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "{SELECT_EVENT} WHERE e.manager_id = ? ORDER BY e.name"
        ))
        .bind(user_id)
        .fetch_all(conn)
        .await
    }

    pub async fn insert(
        conn: &mut SqliteConnection,
        input: &EventInput,
        links: EventLinks,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO events \
             (name, max_tickets, ticket_price, status, event_begin, area_id, manager_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&input.name)
        .bind(input.max_tickets)
        .bind(input.ticket_price)
        .bind(&input.status)
        .bind(input.event_begin)
        .bind(links.area_id)
        .bind(links.manager_id)
        .fetch_one(conn)
        .await
    }

    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        input: &EventInput,
        links: EventLinks,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE events SET name = ?, max_tickets = ?, ticket_price = ?, status = ?, \
             event_begin = ?, area_id = ?, manager_id = ? WHERE id = ?",
        )
        .bind(&input.name)
        .bind(input.max_tickets)
        .bind(input.ticket_price)
        .bind(&input.status)
        .bind(input.event_begin)
        .bind(links.area_id)
        .bind(links.manager_id)
        .bind(id)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
