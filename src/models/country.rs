use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{FromRow, SqliteConnection};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryInput {
    pub name: String,
    pub currency: String,
}

impl Country {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["name", "currency"],
            "properties": {
                "name": {
                    "description": "Country name",
                    "type": "string",
                    "minLength": 1
                },
                "currency": {
                    "description": "Currency code used in the country",
                    "type": "string",
                    "minLength": 1
                }
            }
        })
    }

    pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT id, name, currency FROM countries ORDER BY name")
            .fetch_all(conn)
            .await
    }

    pub async fn find_by_name(
        conn: &mut SqliteConnection,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT id, name, currency FROM countries WHERE name = ?")
            .bind(name)
            .fetch_optional(conn)
            .await
    }

    pub async fn insert(
        conn: &mut SqliteConnection,
        input: &CountryInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO countries (name, currency) VALUES (?, ?) RETURNING id, name, currency",
        )
        .bind(&input.name)
        .bind(&input.currency)
        .fetch_one(conn)
        .await
    }

    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        input: &CountryInput,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE countries SET name = ?, currency = ? WHERE id = ?")
            .bind(&input.name)
            .bind(&input.currency)
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Areas of the country go with it; users only lose their country.
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM countries WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
