use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{FromRow, SqliteConnection};

const SELECT_RESERVATION: &str = "SELECT r.id, r.paid, r.created_at, r.event_id, \
     e.name AS event_name, r.user_id \
     FROM reservations r JOIN events e ON e.id = r.event_id";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub event_id: i64,
    pub event_name: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReservationInput {
    #[serde(default)]
    pub paid: bool,
    pub event: String,
    pub user: i64,
}

impl Reservation {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["event", "user"],
            "properties": {
                "paid": {
                    "description": "Whether the reservation has been paid",
                    "type": "boolean"
                },
                "event": {
                    "description": "Name of the reserved event",
                    "type": "string"
                },
                "user": {
                    "description": "Id of the user making the reservation",
                    "type": "integer"
                }
            }
        })
    }

    pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("{SELECT_RESERVATION} ORDER BY r.id"))
            .fetch_all(conn)
            .await
    }

    pub async fn find(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("{SELECT_RESERVATION} WHERE r.id = ?"))
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn of_user(
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("{SELECT_RESERVATION} WHERE r.user_id = ? ORDER BY r.id"))
            .bind(user_id)
            .fetch_all(conn)
            .await
    }

    pub async fn insert(
        conn: &mut SqliteConnection,
        paid: bool,
        event_id: i64,
        user_id: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO reservations (paid, created_at, event_id, user_id) \
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(paid)
        .bind(Utc::now())
        .bind(event_id)
        .bind(user_id)
        .fetch_one(conn)
        .await
    }

    /// `created_at` is fixed at creation and never replaced.
    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        paid: bool,
        event_id: i64,
        user_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE reservations SET paid = ?, event_id = ?, user_id = ? WHERE id = ?")
            .bind(paid)
            .bind(event_id)
            .bind(user_id)
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM reservations WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
