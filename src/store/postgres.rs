//! # PostgreSQL Store
//!
//! Production backend on sqlx. Queries are built at runtime so the crate
//! compiles without a live database; rows come back through private row
//! structs that hold `quadrant` and `role` as text and are decoded into
//! domain types afterwards.
//!
//! Visibility is pushed into SQL as `($1 OR owner_id = $2)` with the
//! caller's admin flag and id bound, so a non-owner never learns whether a
//! row exists.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::access::Caller;
use crate::config::DatabaseConfig;
use crate::error::TaskmatrixError;
use crate::models::{
    DeletedTask, Task, TaskDraft, TaskPatch, TaskStatus, User, UserSummary,
};
use crate::quadrant::{self, Quadrant};
use crate::store::{StoreError, TaskStore};

const TASK_COLUMNS: &str = "id, title, description, is_important, deadline_at, quadrant, \
     completed, created_at, completed_at, owner_id";

/// Connection pool wrapper implementing [`TaskStore`] against PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect a pool and make sure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> crate::error::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| {
                TaskmatrixError::DatabaseError(format!("failed to connect to database: {e}"))
            })?;

        sqlx::raw_sql(include_str!("../../migrations/0001_init.sql"))
            .execute(&pool)
            .await
            .map_err(|e| {
                TaskmatrixError::DatabaseError(format!("schema bootstrap failed: {e}"))
            })?;

        info!(
            max_connections = config.max_connections,
            "🗄️ PostgreSQL store ready"
        );
        Ok(Self { pool })
    }

    /// Build over an existing pool. Used when the embedding code manages
    /// pool lifecycle itself.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: Option<String>,
    is_important: bool,
    deadline_at: DateTime<Utc>,
    quadrant: String,
    completed: bool,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    owner_id: i64,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let quadrant = row
            .quadrant
            .parse::<Quadrant>()
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            is_important: row.is_important,
            deadline_at: row.deadline_at,
            quadrant,
            completed: row.completed,
            created_at: row.created_at,
            completed_at: row.completed_at,
            owner_id: row.owner_id,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    nickname: String,
    email: String,
    role: String,
    api_token: String,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|e: crate::models::user::InvalidRole| StoreError::Decode(e.to_string()))?;
        Ok(User {
            id: row.id,
            nickname: row.nickname,
            email: row.email,
            role,
            api_token: row.api_token,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserSummaryRow {
    id: i64,
    nickname: String,
    email: String,
    role: String,
    tasks_count: i64,
}

impl TryFrom<UserSummaryRow> for UserSummary {
    type Error = StoreError;

    fn try_from(row: UserSummaryRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|e: crate::models::user::InvalidRole| StoreError::Decode(e.to_string()))?;
        Ok(UserSummary {
            id: row.id,
            nickname: row.nickname,
            email: row.email,
            role,
            tasks_count: row.tasks_count,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DeletedRow {
    id: i64,
    title: String,
}

fn rows_into_tasks(rows: Vec<TaskRow>) -> Result<Vec<Task>, StoreError> {
    rows.into_iter().map(Task::try_from).collect()
}

/// Escape LIKE metacharacters so user input matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self, caller: &Caller) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM taskmatrix_tasks \
             WHERE ($1 OR owner_id = $2) ORDER BY id"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(caller.is_admin())
            .bind(caller.user_id)
            .fetch_all(&self.pool)
            .await?;
        rows_into_tasks(rows)
    }

    async fn get_task(&self, caller: &Caller, id: i64) -> Result<Task, StoreError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM taskmatrix_tasks \
             WHERE ($1 OR owner_id = $2) AND id = $3"
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(caller.is_admin())
            .bind(caller.user_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        Task::try_from(row)
    }

    async fn tasks_by_quadrant(
        &self,
        caller: &Caller,
        quadrant: Quadrant,
    ) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM taskmatrix_tasks \
             WHERE ($1 OR owner_id = $2) AND quadrant = $3 ORDER BY id"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(caller.is_admin())
            .bind(caller.user_id)
            .bind(quadrant.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows_into_tasks(rows)
    }

    async fn tasks_by_status(
        &self,
        caller: &Caller,
        status: TaskStatus,
    ) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM taskmatrix_tasks \
             WHERE ($1 OR owner_id = $2) AND completed = $3 ORDER BY id"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(caller.is_admin())
            .bind(caller.user_id)
            .bind(matches!(status, TaskStatus::Completed))
            .fetch_all(&self.pool)
            .await?;
        rows_into_tasks(rows)
    }

    async fn tasks_due_today(&self, caller: &Caller) -> Result<Vec<Task>, StoreError> {
        let day_start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM taskmatrix_tasks \
             WHERE ($1 OR owner_id = $2) AND deadline_at >= $3 AND deadline_at < $4 \
             ORDER BY id"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(caller.is_admin())
            .bind(caller.user_id)
            .bind(day_start)
            .bind(day_end)
            .fetch_all(&self.pool)
            .await?;
        rows_into_tasks(rows)
    }

    async fn search_tasks(&self, caller: &Caller, query: &str) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            r#"SELECT {TASK_COLUMNS} FROM taskmatrix_tasks
               WHERE ($1 OR owner_id = $2)
                 AND (title ILIKE $3 ESCAPE '\' OR description ILIKE $3 ESCAPE '\')
               ORDER BY id"#
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(caller.is_admin())
            .bind(caller.user_id)
            .bind(like_pattern(query))
            .fetch_all(&self.pool)
            .await?;
        rows_into_tasks(rows)
    }

    async fn create_task(&self, caller: &Caller, draft: TaskDraft) -> Result<Task, StoreError> {
        // Classification and trimming live in the domain constructor; the
        // database only assigns the id.
        let template = Task::from_draft(0, caller.user_id, draft, Utc::now());
        let sql = format!(
            "INSERT INTO taskmatrix_tasks \
             (title, description, is_important, deadline_at, quadrant, completed, \
              created_at, completed_at, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {TASK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(template.title.as_str())
            .bind(template.description.as_deref())
            .bind(template.is_important)
            .bind(template.deadline_at)
            .bind(template.quadrant.as_str())
            .bind(template.completed)
            .bind(template.created_at)
            .bind(template.completed_at)
            .bind(template.owner_id)
            .fetch_one(&self.pool)
            .await?;
        Task::try_from(row)
    }

    async fn update_task(
        &self,
        caller: &Caller,
        id: i64,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM taskmatrix_tasks \
             WHERE ($1 OR owner_id = $2) AND id = $3 FOR UPDATE"
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(caller.is_admin())
            .bind(caller.user_id)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;

        let mut task = Task::try_from(row)?;
        patch.apply(&mut task);
        if patch.touches_classification() {
            task.quadrant = Quadrant::classify(
                task.is_important,
                quadrant::is_urgent(task.deadline_at, Utc::now()),
            );
        }

        sqlx::query(
            "UPDATE taskmatrix_tasks \
             SET title = $1, description = $2, is_important = $3, deadline_at = $4, quadrant = $5 \
             WHERE id = $6",
        )
        .bind(task.title.as_str())
        .bind(task.description.as_deref())
        .bind(task.is_important)
        .bind(task.deadline_at)
        .bind(task.quadrant.as_str())
        .bind(task.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    async fn complete_task(&self, caller: &Caller, id: i64) -> Result<Task, StoreError> {
        // COALESCE keeps the first completion timestamp on repeat calls.
        let sql = format!(
            "UPDATE taskmatrix_tasks \
             SET completed = TRUE, completed_at = COALESCE(completed_at, $3) \
             WHERE ($1 OR owner_id = $2) AND id = $4 \
             RETURNING {TASK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(caller.is_admin())
            .bind(caller.user_id)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        Task::try_from(row)
    }

    async fn delete_task(&self, caller: &Caller, id: i64) -> Result<DeletedTask, StoreError> {
        let row = sqlx::query_as::<_, DeletedRow>(
            "DELETE FROM taskmatrix_tasks \
             WHERE ($1 OR owner_id = $2) AND id = $3 \
             RETURNING id, title",
        )
        .bind(caller.is_admin())
        .bind(caller.user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;
        Ok(DeletedTask {
            id: row.id,
            title: row.title,
        })
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, nickname, email, role, api_token \
             FROM taskmatrix_users WHERE api_token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn list_users_with_counts(&self) -> Result<Vec<UserSummary>, StoreError> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            "SELECT u.id, u.nickname, u.email, u.role, COUNT(t.id) AS tasks_count \
             FROM taskmatrix_users u \
             LEFT JOIN taskmatrix_tasks t ON t.owner_id = u.id \
             GROUP BY u.id, u.nickname, u.email, u.role \
             ORDER BY u.id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(UserSummary::try_from).collect()
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
