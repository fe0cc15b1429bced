use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{FromRow, SqliteConnection};

const SELECT_USER: &str = "SELECT u.id, u.first_name, u.last_name, u.birth_date, u.email, \
     u.country_id, c.name AS country \
     FROM users u LEFT JOIN countries c ON c.id = u.country_id";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub email: String,
    pub country_id: Option<i64>,
    /// Name of the linked country, resolved at read time.
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub email: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl User {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["first_name", "last_name", "birth_date", "email"],
            "properties": {
                "first_name": {
                    "description": "First name of the user",
                    "type": "string",
                    "minLength": 1
                },
                "last_name": {
                    "description": "Last name of the user",
                    "type": "string",
                    "minLength": 1
                },
                "birth_date": {
                    "description": "Birth date as YYYY-MM-DD",
                    "type": "string",
                    "pattern": "^[0-9]{4}-[0-9]{2}-[0-9]{2}$"
                },
                "email": {
                    "description": "Email address, unique per user",
                    "type": "string",
                    "pattern": "^[^@\\s]+@[^@\\s]+$"
                },
                "country": {
                    "description": "Name of the user's country",
                    "type": ["string", "null"]
                }
            }
        })
    }

    pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("{SELECT_USER} ORDER BY u.id"))
            .fetch_all(conn)
            .await
    }

    pub async fn find(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("{SELECT_USER} WHERE u.id = ?"))
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn insert(
        conn: &mut SqliteConnection,
        input: &UserInput,
        country_id: Option<i64>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO users (first_name, last_name, birth_date, email, country_id) \
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.birth_date)
        .bind(&input.email)
        .bind(country_id)
        .fetch_one(conn)
        .await
    }

    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        input: &UserInput,
        country_id: Option<i64>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET first_name = ?, last_name = ?, birth_date = ?, email = ?, \
             country_id = ? WHERE id = ?",
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.birth_date)
        .bind(&input.email)
        .bind(country_id)
        .bind(id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Managed events are kept without a manager; reservations are removed.
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
