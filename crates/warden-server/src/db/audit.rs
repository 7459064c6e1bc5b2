//! Audit trail writer.
//!
//! Audit rows are best-effort: a failed insert is logged and swallowed so
//! bookkeeping can never fail the request that triggered it.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

/// One audit record.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Category id from `log_categories`, e.g. "USER_UPDATE".
    pub category: &'static str,
    /// Human-readable description of the action.
    pub description: String,
    /// Affected table, when applicable.
    pub table_name: Option<String>,
    /// Affected row id, when applicable.
    pub row_id: Option<String>,
    /// Snapshot before the change.
    pub old_data: Option<serde_json::Value>,
    /// Snapshot after the change.
    pub new_data: Option<serde_json::Value>,
    /// Acting user.
    pub user_id: Option<Uuid>,
}

impl AuditEntry {
    /// Create an entry with just a category, description and actor.
    pub fn new(category: &'static str, description: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            category,
            description: description.into(),
            table_name: None,
            row_id: None,
            old_data: None,
            new_data: None,
            user_id: Some(user_id),
        }
    }

    /// Attach the affected table and row.
    pub fn on_row(mut self, table: &str, row_id: impl ToString) -> Self {
        self.table_name = Some(table.to_string());
        self.row_id = Some(row_id.to_string());
        self
    }

    /// Attach a before-snapshot.
    pub fn with_old_data(mut self, data: serde_json::Value) -> Self {
        self.old_data = Some(data);
        self
    }

    /// Attach an after-snapshot.
    pub fn with_new_data(mut self, data: serde_json::Value) -> Self {
        self.new_data = Some(data);
        self
    }
}

/// Destination for audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record an entry. Never fails the caller.
    async fn record(&self, entry: AuditEntry);
}

/// Postgres-backed audit log.
#[derive(Clone)]
pub struct PgAuditLog {
    pool: PgPool,
}

impl PgAuditLog {
    /// Create an audit log over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditLog {
    async fn record(&self, entry: AuditEntry) {
        let result = sqlx::query(
            "INSERT INTO logs \
             (id, category_id, description, table_name, row_id, old_data, new_data, user_id, dt_created) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())",
        )
        .bind(Uuid::new_v4())
        .bind(entry.category)
        .bind(&entry.description)
        .bind(&entry.table_name)
        .bind(&entry.row_id)
        .bind(&entry.old_data)
        .bind(&entry.new_data)
        .bind(entry.user_id)
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            error!(error = %err, category = entry.category, "Failed to write audit log entry");
        }
    }
}
