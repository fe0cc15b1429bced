use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{FromRow, SqliteConnection};

const SELECT_AREA: &str = "SELECT a.id, a.name, a.country_id, c.name AS country \
     FROM areas a JOIN countries c ON c.id = a.country_id";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Area {
    pub id: i64,
    pub name: String,
    pub country_id: i64,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaInput {
    pub name: String,
    pub country: String,
}

impl Area {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["name", "country"],
            "properties": {
                "name": {
                    "description": "Area name",
                    "type": "string",
                    "minLength": 1
                },
                "country": {
                    "description": "Name of the country the area belongs to",
                    "type": "string"
                }
            }
        })
    }

    pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("{SELECT_AREA} ORDER BY a.name"))
            .fetch_all(conn)
            .await
    }

    pub async fn find_by_name(
        conn: &mut SqliteConnection,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("{SELECT_AREA} WHERE a.name = ?"))
            .bind(name)
            .fetch_optional(conn)
            .await
    }

    pub async fn insert(
        conn: &mut SqliteConnection,
        name: &str,
        country_id: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("INSERT INTO areas (name, country_id) VALUES (?, ?) RETURNING id")
            .bind(name)
            .bind(country_id)
            .fetch_one(conn)
            .await
    }

    /// Renaming keeps every event linked: events reference the area by id
    /// and read its current name through a join.
    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        name: &str,
        country_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE areas SET name = ?, country_id = ? WHERE id = ?")
            .bind(name)
            .bind(country_id)
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM areas WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
