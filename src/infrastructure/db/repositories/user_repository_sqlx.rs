use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::user_repository::{NewUser, UserRepository, UsernameTaken};
use crate::domain::users::user::{ProfileChanges, User};
use crate::infrastructure::db::PgPool;

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, is_active, is_activated, send_messages, date_joined";

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_user(r: &PgRow) -> User {
    User {
        id: r.get("id"),
        username: r.get("username"),
        email: r.get("email"),
        first_name: r.get("first_name"),
        last_name: r.get("last_name"),
        is_active: r.get("is_active"),
        is_activated: r.get("is_activated"),
        send_messages: r.get("send_messages"),
        date_joined: r.get("date_joined"),
    }
}

/// The only unique index on `users` besides the primary key is the username.
fn map_write_error(err: sqlx::Error) -> anyhow::Error {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => UsernameTaken.into(),
        _ => err.into(),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(&self, new_user: &NewUser) -> anyhow::Result<User> {
        let sql = format!(
            r#"INSERT INTO users (username, email, first_name, last_name, send_messages, password_hash, is_active, is_activated)
               VALUES ($1, $2, $3, $4, $5, $6, FALSE, FALSE)
               RETURNING {USER_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(new_user.send_messages)
            .bind(&new_user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(map_user(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_user))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_user))
    }

    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<(User, String)>> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = $1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| (map_user(&r), r.get("password_hash"))))
    }

    async fn password_hash(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(hash)
    }

    async fn username_taken(&self, username: &str, except: Option<Uuid>) -> anyhow::Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                   SELECT 1 FROM users
                   WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2)
               )"#,
        )
        .bind(username)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn mark_activated(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE users SET is_active = TRUE, is_activated = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>> {
        let sql = format!(
            r#"UPDATE users SET
                   username = $1,
                   email = $2,
                   first_name = $3,
                   last_name = $4,
                   send_messages = $5
               WHERE id = $6
               RETURNING {USER_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(&changes.username)
            .bind(&changes.email)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(changes.send_messages)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(row.as_ref().map(map_user))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
