use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{FromRow, SqliteConnection};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub ticket_type: String,
    pub reservation_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketInput {
    #[serde(rename = "type")]
    pub ticket_type: String,
}

impl Ticket {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["type"],
            "properties": {
                "type": {
                    "description": "Ticket type, e.g. VIP",
                    "type": "string",
                    "minLength": 1
                }
            }
        })
    }

    pub async fn find(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT id, type, reservation_id FROM tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn of_reservation(
        conn: &mut SqliteConnection,
        reservation_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, type, reservation_id FROM tickets WHERE reservation_id = ? ORDER BY id",
        )
        .bind(reservation_id)
        .fetch_all(conn)
        .await
    }

    pub async fn insert(
        conn: &mut SqliteConnection,
        reservation_id: i64,
        input: &TicketInput,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("INSERT INTO tickets (type, reservation_id) VALUES (?, ?) RETURNING id")
            .bind(&input.ticket_type)
            .bind(reservation_id)
            .fetch_one(conn)
            .await
    }

    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        input: &TicketInput,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tickets SET type = ? WHERE id = ?")
            .bind(&input.ticket_type)
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM tickets WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
