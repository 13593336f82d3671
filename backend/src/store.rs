use crate::error::AppError;
use budget_analyzer::stat::{Budget, Defaults};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::SqliteConnection;
use std::str::FromStr;
use std::sync::Arc;

const MAX_PRESET_NAME: usize = 64;

/// Per-user budget and preset persistence.
///
/// Each budget and each preset is a single row holding the serialized
/// [`Budget`], so every write is one upsert scoped to the owning user.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    defaults: Arc<Defaults>,
}

impl Store {
    pub async fn connect(database_url: &str, defaults: Arc<Defaults>) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        let store = Self { pool, defaults };
        store.migrate().await?;
        Ok(store)
    }

    /// Single-connection in-memory database; the connection is never
    /// recycled so the data lives as long as the pool.
    #[cfg(test)]
    pub async fn in_memory(defaults: Arc<Defaults>) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self { pool, defaults };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn create_user(&self, username: &str, password_hash: &str) -> Result<(), AppError> {
        let res = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(username) DO NOTHING
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(AppError::AlreadyExists(format!("user '{username}'")));
        }
        tracing::info!(username, "account created");
        Ok(())
    }

    pub async fn password_hash(&self, username: &str) -> Result<Option<String>, AppError> {
        let hash = sqlx::query_scalar::<_, String>(
            r#"SELECT password_hash FROM users WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(hash)
    }

    pub async fn get_budget(&self, username: &str) -> Result<Budget, AppError> {
        let data = sqlx::query_scalar::<_, String>(r#"SELECT data FROM budgets WHERE username = ?"#)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("budget for user '{username}'")))?;
        Ok(serde_json::from_str(&data)?)
    }

    pub async fn put_budget(&self, username: &str, budget: &Budget) -> Result<(), AppError> {
        budget.validate()?;
        let data = serde_json::to_string(budget)?;

        let mut tx = self.pool.begin().await?;
        require_user(&mut tx, username).await?;
        upsert_budget(&mut tx, username, &data).await?;
        tx.commit().await?;

        tracing::info!(username, "budget updated");
        Ok(())
    }

    /// Seed the user's budget from the defaults if they have none yet.
    pub async fn ensure_budget(&self, username: &str) -> Result<Budget, AppError> {
        let seed = serde_json::to_string(self.defaults.as_budget())?;

        let mut tx = self.pool.begin().await?;
        require_user(&mut tx, username).await?;
        let res = sqlx::query(
            r#"
            INSERT INTO budgets (username, data, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(username) DO NOTHING
            "#,
        )
        .bind(username)
        .bind(&seed)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        let data = sqlx::query_scalar::<_, String>(r#"SELECT data FROM budgets WHERE username = ?"#)
            .bind(username)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        if res.rows_affected() > 0 {
            tracing::info!(username, "budget seeded from defaults");
        }
        Ok(serde_json::from_str(&data)?)
    }

    pub async fn reset_budget(&self, username: &str) -> Result<Budget, AppError> {
        let budget = self.defaults.budget();
        self.put_budget(username, &budget).await?;
        tracing::info!(username, "budget reset to defaults");
        Ok(budget)
    }

    pub async fn list_presets(&self, username: &str) -> Result<Vec<String>, AppError> {
        let mut conn = self.pool.acquire().await?;
        require_user(&mut conn, username).await?;
        let names = sqlx::query_scalar::<_, String>(
            r#"SELECT name FROM presets WHERE username = ? ORDER BY name"#,
        )
        .bind(username)
        .fetch_all(&mut *conn)
        .await?;
        Ok(names)
    }

    pub async fn get_preset(&self, username: &str, name: &str) -> Result<Budget, AppError> {
        let name = check_preset_name(name)?;
        let data = sqlx::query_scalar::<_, String>(
            r#"SELECT data FROM presets WHERE username = ? AND name = ?"#,
        )
        .bind(username)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("preset '{name}'")))?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Save `budget` as `name`, overwriting an existing preset of that name.
    pub async fn put_preset(&self, username: &str, name: &str, budget: &Budget) -> Result<(), AppError> {
        let name = check_preset_name(name)?;
        budget.validate()?;
        let data = serde_json::to_string(budget)?;

        let mut tx = self.pool.begin().await?;
        require_user(&mut tx, username).await?;
        sqlx::query(
            r#"
            INSERT INTO presets (username, name, data, saved_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(username, name) DO UPDATE
            SET data = excluded.data, saved_at = excluded.saved_at
            "#,
        )
        .bind(username)
        .bind(name)
        .bind(&data)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(username, preset = name, "preset saved");
        Ok(())
    }

    /// Replace the active budget with a saved preset.
    pub async fn load_preset(&self, username: &str, name: &str) -> Result<Budget, AppError> {
        let name = check_preset_name(name)?;

        let mut tx = self.pool.begin().await?;
        let data = sqlx::query_scalar::<_, String>(
            r#"SELECT data FROM presets WHERE username = ? AND name = ?"#,
        )
        .bind(username)
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("preset '{name}'")))?;
        upsert_budget(&mut tx, username, &data).await?;
        tx.commit().await?;

        tracing::info!(username, preset = name, "preset loaded");
        Ok(serde_json::from_str(&data)?)
    }
}

async fn require_user(conn: &mut SqliteConnection, username: &str) -> Result<(), AppError> {
    let found = sqlx::query_scalar::<_, i64>(r#"SELECT 1 FROM users WHERE username = ?"#)
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!("user '{username}'"))),
    }
}

async fn upsert_budget(conn: &mut SqliteConnection, username: &str, data: &str) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO budgets (username, data, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(username) DO UPDATE
        SET data = excluded.data, updated_at = excluded.updated_at
        "#,
    )
    .bind(username)
    .bind(data)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn check_preset_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("preset name must not be empty".into()));
    }
    if name.chars().count() > MAX_PRESET_NAME {
        return Err(AppError::InvalidInput(format!(
            "preset name longer than {MAX_PRESET_NAME} characters"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(AppError::InvalidInput(
            "preset name contains control characters".into(),
        ));
    }
    Ok(name)
}
