use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{Task, TaskFields, TaskId, TaskStore};
use crate::accounts::Credential;
use crate::error::TodoError;

// Legacy deployments created `todos` with nullable columns and a SERIAL id,
// so reads cast and coalesce instead of trusting the column types.
const SELECT_COLUMNS: &str = r#"
    id::BIGINT AS id,
    task,
    COALESCE(due, '') AS due,
    COALESCE(duration, 0) AS duration,
    COALESCE(cost, 0) AS cost,
    COALESCE(done, FALSE) AS done
"#;

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: i64,
    task: String,
    due: String,
    duration: i32,
    cost: i32,
    done: bool,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            description: row.task,
            due: row.due,
            duration_minutes: u32::try_from(row.duration).unwrap_or(0),
            cost: u32::try_from(row.cost).unwrap_or(0),
            done: row.done,
        }
    }
}

fn to_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Shared `todos` table, partitioned by the `owner` column.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, TodoError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the tables when missing and seeds the fixed user list.
    pub async fn init_schema(&self, users: &[Credential]) -> Result<(), TodoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id SERIAL PRIMARY KEY,
                task TEXT NOT NULL,
                due TEXT,
                duration INT,
                cost INT,
                done BOOLEAN DEFAULT FALSE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // rows from the single-tenant schema belong to the seeded admin
        sqlx::query("ALTER TABLE todos ADD COLUMN IF NOT EXISTS owner TEXT NOT NULL DEFAULT 'admin'")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS todos_owner_idx ON todos (owner)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id SERIAL PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        for user in users {
            sqlx::query(
                r#"
                INSERT INTO users (username, password)
                VALUES ($1, $2)
                ON CONFLICT (username) DO NOTHING
                "#,
            )
            .bind(&user.username)
            .bind(&user.password)
            .execute(&self.pool)
            .await?;
        }

        tracing::info!(seeded_users = users.len(), "database schema ready");
        Ok(())
    }
}

impl TaskStore for PgStore {
    async fn list_all(&self, owner: &str) -> Result<Vec<Task>, TodoError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM todos WHERE owner = $1 ORDER BY id DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn insert(&self, owner: &str, fields: TaskFields) -> Result<Task, TodoError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            INSERT INTO todos (owner, task, due, duration, cost)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(owner)
        .bind(&fields.description)
        .bind(&fields.due)
        .bind(to_column(fields.duration_minutes))
        .bind(to_column(fields.cost))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get(&self, owner: &str, id: TaskId) -> Result<Task, TodoError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM todos WHERE id = $1 AND owner = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::from).ok_or_else(|| TodoError::not_found(id))
    }

    async fn update(&self, owner: &str, id: TaskId, fields: TaskFields) -> Result<(), TodoError> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET task = $1, due = $2, duration = $3, cost = $4
            WHERE id = $5 AND owner = $6
            "#,
        )
        .bind(&fields.description)
        .bind(&fields.due)
        .bind(to_column(fields.duration_minutes))
        .bind(to_column(fields.cost))
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TodoError::not_found(id));
        }
        Ok(())
    }

    async fn toggle_done(&self, owner: &str, id: TaskId) -> Result<(), TodoError> {
        let result = sqlx::query(
            "UPDATE todos SET done = NOT COALESCE(done, FALSE) WHERE id = $1 AND owner = $2",
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TodoError::not_found(id));
        }
        Ok(())
    }

    async fn delete(&self, owner: &str, id: TaskId) -> Result<(), TodoError> {
        sqlx::query("DELETE FROM todos WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_columns_read_as_zero() {
        let row = TaskRow {
            id: 3,
            task: "legacy".to_string(),
            due: String::new(),
            duration: -5,
            cost: 1200,
            done: true,
        };

        let task = Task::from(row);
        assert_eq!(task.duration_minutes, 0);
        assert_eq!(task.cost, 1200);
        assert!(task.done);
    }

    #[test]
    fn test_large_values_are_clamped_on_write() {
        assert_eq!(to_column(15), 15);
        assert_eq!(to_column(u32::MAX), i32::MAX);
    }

    // Needs a live database: DATABASE_URL=... cargo test -- --ignored
    async fn live_store() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let store = PgStore::connect(&url).await.unwrap();
        store
            .init_schema(&[Credential::new("admin", "1234")])
            .await
            .unwrap();
        store
    }

    fn unique_owner(prefix: &str) -> String {
        use rand::Rng;
        format!("{prefix}-{}", rand::thread_rng().gen::<u64>())
    }

    fn fields(description: &str) -> TaskFields {
        TaskFields {
            description: description.to_string(),
            due: "2025-12-12".to_string(),
            duration_minutes: 15,
            cost: 1000,
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_queries_are_scoped_to_the_owner() {
        let store = live_store().await;
        let alice = unique_owner("alice");
        let bob = unique_owner("bob");

        let first = store.insert(&alice, fields("first")).await.unwrap();
        let second = store.insert(&alice, fields("second")).await.unwrap();

        // newest first
        let listed: Vec<TaskId> = store.list_all(&alice).await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(listed, vec![second.id, first.id]);
        assert!(store.list_all(&bob).await.unwrap().is_empty());

        assert!(matches!(store.get(&bob, first.id).await, Err(TodoError::NotFound(_))));
        assert!(matches!(
            store.update(&bob, first.id, fields("stolen")).await,
            Err(TodoError::NotFound(_))
        ));
        assert!(matches!(store.toggle_done(&bob, first.id).await, Err(TodoError::NotFound(_))));
        store.delete(&bob, first.id).await.unwrap();

        let untouched = store.get(&alice, first.id).await.unwrap();
        assert_eq!(untouched.description, "first");
        assert!(!untouched.done);

        store.toggle_done(&alice, first.id).await.unwrap();
        assert!(store.get(&alice, first.id).await.unwrap().done);
        store.toggle_done(&alice, first.id).await.unwrap();
        assert!(!store.get(&alice, first.id).await.unwrap().done);

        store.update(&alice, first.id, fields("renamed")).await.unwrap();
        assert_eq!(store.get(&alice, first.id).await.unwrap().description, "renamed");

        store.delete(&alice, first.id).await.unwrap();
        store.delete(&alice, second.id).await.unwrap();
        assert!(store.list_all(&alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore]
    async fn test_init_schema_is_repeatable() {
        let store = live_store().await;
        store
            .init_schema(&[Credential::new("admin", "1234")])
            .await
            .unwrap();
    }
}
