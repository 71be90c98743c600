//! SQLite-backed task store.
//!
//! Schema keeps one table per artifact kind (tasks, generated_code,
//! test_logs, deployment_logs, final_reports), all append-only. The
//! connection lives behind a `Mutex`; no await point ever holds the lock.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreError;
use crate::store_traits::*;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    task_id     TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS generated_code (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id TEXT NOT NULL REFERENCES tasks(task_id),
    code    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS test_logs (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id TEXT NOT NULL REFERENCES tasks(task_id),
    report  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS deployment_logs (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id TEXT NOT NULL REFERENCES tasks(task_id),
    status  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS final_reports (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id TEXT NOT NULL REFERENCES tasks(task_id),
    summary TEXT NOT NULL
);
";

/// Durable `TaskStore` backed by a local SQLite database.
pub struct SqliteTaskStore {
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    /// Open (and initialise) the database at `path`. Parent directories are
    /// created if missing.
    pub fn open(path: &Path) -> crate::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
            }
        }
        let conn = Connection::open(path).map_err(|e| StoreError::Connection(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database. Useful for tests and ephemeral runs.
    pub fn open_in_memory() -> crate::Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Connection(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> crate::Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| StoreError::SchemaSetup(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn insert_payload(&self, table: &str, column: &str, task_id: &TaskId, payload: &str) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let known: bool = conn
            .query_row(
                "SELECT 1 FROM tasks WHERE task_id = ?1",
                params![task_id.0],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if !known {
            return Err(StoreError::TaskNotFound(task_id.0.clone()));
        }
        let sql = format!("INSERT INTO {table} (task_id, {column}) VALUES (?1, ?2)");
        conn.execute(&sql, params![task_id.0, payload])?;
        Ok(())
    }

    fn latest_payload(&self, table: &str, column: &str, task_id: &TaskId) -> StoreResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {column} FROM {table} WHERE task_id = ?1 ORDER BY id DESC LIMIT 1");
        let row = conn
            .query_row(&sql, params![task_id.0], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(row)
    }
}

fn parse_created_at(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Serialization(format!("bad created_at '{raw}': {e}")))
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn create_task(&self, description: &str) -> StoreResult<TaskId> {
        let task_id = TaskId::new();
        let created_at = Utc::now();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO tasks (task_id, description, created_at) VALUES (?1, ?2, ?3)",
            params![task_id.0, description, created_at.to_rfc3339()],
        )?;
        Ok(task_id)
    }

    async fn record_artifact(&self, task_id: &TaskId, artifact: &str) -> StoreResult<()> {
        self.insert_payload("generated_code", "code", task_id, artifact)
    }

    async fn record_validation(
        &self,
        task_id: &TaskId,
        report: serde_json::Value,
    ) -> StoreResult<()> {
        self.insert_payload("test_logs", "report", task_id, &serde_json::to_string(&report)?)
    }

    async fn record_deployment(
        &self,
        task_id: &TaskId,
        status: serde_json::Value,
    ) -> StoreResult<()> {
        self.insert_payload(
            "deployment_logs",
            "status",
            task_id,
            &serde_json::to_string(&status)?,
        )
    }

    async fn record_summary(
        &self,
        task_id: &TaskId,
        summary: serde_json::Value,
    ) -> StoreResult<()> {
        self.insert_payload(
            "final_reports",
            "summary",
            task_id,
            &serde_json::to_string(&summary)?,
        )
    }

    async fn fetch_summary(&self, task_id: &TaskId) -> StoreResult<Option<serde_json::Value>> {
        match self.latest_payload("final_reports", "summary", task_id)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn fetch_artifact(&self, task_id: &TaskId) -> StoreResult<Option<String>> {
        self.latest_payload("generated_code", "code", task_id)
    }

    async fn fetch_validation(&self, task_id: &TaskId) -> StoreResult<Option<serde_json::Value>> {
        match self.latest_payload("test_logs", "report", task_id)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn fetch_deployment(&self, task_id: &TaskId) -> StoreResult<Option<serde_json::Value>> {
        match self.latest_payload("deployment_logs", "status", task_id)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn get_task(&self, task_id: &TaskId) -> StoreResult<Option<TaskRow>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT task_id, description, created_at FROM tasks WHERE task_id = ?1",
                params![task_id.0],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;
        match row {
            Some((id, description, created_at)) => Ok(Some(TaskRow {
                task_id: TaskId(id),
                description,
                created_at: parse_created_at(&created_at)?,
            })),
            None => Ok(None),
        }
    }

    async fn list_tasks(&self, limit: usize) -> StoreResult<Vec<TaskRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT task_id, description, created_at FROM tasks
             ORDER BY created_at DESC, task_id DESC LIMIT ?1",
        )?;
        let mapped = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut rows = Vec::new();
        for item in mapped {
            let (id, description, created_at) = item?;
            rows.push(TaskRow {
                task_id: TaskId(id),
                description,
                created_at: parse_created_at(&created_at)?,
            });
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_sqlite_full_task_lifecycle() {
        let store = SqliteTaskStore::open_in_memory().unwrap();

        let id = store.create_task("Create a login system").await.unwrap();
        store
            .record_artifact(&id, "def login(): pass")
            .await
            .unwrap();
        store
            .record_validation(&id, json!({"valid": true, "report": "Syntax Check: PASSED"}))
            .await
            .unwrap();
        store
            .record_deployment(&id, json!({"success": true, "log": "Deployed"}))
            .await
            .unwrap();
        store
            .record_summary(&id, json!({"summary_report": "all good"}))
            .await
            .unwrap();

        let row = store.get_task(&id).await.unwrap().expect("task row");
        assert_eq!(row.description, "Create a login system");

        let artifact = store.fetch_artifact(&id).await.unwrap().expect("artifact");
        assert_eq!(artifact, "def login(): pass");

        let summary = store.fetch_summary(&id).await.unwrap().expect("summary");
        assert_eq!(summary["summary_report"], "all good");

        let validation = store.fetch_validation(&id).await.unwrap().expect("validation");
        assert_eq!(validation["valid"], true);
        let deployment = store.fetch_deployment(&id).await.unwrap().expect("deployment");
        assert_eq!(deployment["log"], "Deployed");
    }

    #[tokio::test]
    async fn test_sqlite_rejects_unknown_task() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let phantom = TaskId::new();
        let err = store
            .record_artifact(&phantom, "code")
            .await
            .expect_err("should fail");
        assert!(matches!(err, StoreError::TaskNotFound(_)));
    }

    #[tokio::test]
    async fn test_sqlite_fetch_summary_missing_is_none() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let id = store.create_task("task").await.unwrap();
        assert!(store.fetch_summary(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/devcrew.db");
        let store = SqliteTaskStore::open(&path).unwrap();
        let id = store.create_task("task").await.unwrap();
        assert!(store.get_task(&id).await.unwrap().is_some());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_sqlite_list_tasks_respects_limit() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        for i in 0..5 {
            store.create_task(&format!("task {i}")).await.unwrap();
        }
        let rows = store.list_tasks(3).await.unwrap();
        assert_eq!(rows.len(), 3);
    }
}
