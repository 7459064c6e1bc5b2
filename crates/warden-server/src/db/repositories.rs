//! Repository traits and their Postgres implementations.
//!
//! The traits are deliberately narrow so the access-control core and the
//! handlers can be exercised against in-memory implementations, and so
//! the storage engine can be swapped without touching resolution or
//! evaluation logic.

use super::models::{
    CredentialSummary, ResourceWithRules, User, UserDetail, UserProfile, UserRole,
    UserWithCredentials,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Lookup capability over the stored resource table.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Find the active resource matching the convention key, with its
    /// attached rules. At most one row is returned; when duplicates
    /// exist the choice between them is implementation-defined.
    async fn find_active_resource(
        &self,
        method: &str,
        module: &str,
        controller: &str,
        action: &str,
    ) -> Result<Option<ResourceWithRules>>;
}

/// Fields for a new account, credential hash included.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Role id of the new account.
    pub role_id: String,
    /// E-mail address.
    pub email: String,
    /// Mobile number.
    pub mobile_no: Option<String>,
    /// First name for the profile row.
    pub first_name: String,
    /// Last name for the profile row.
    pub last_name: String,
    /// Credential type, e.g. "password".
    pub credential_kind: String,
    /// Hashed credential value.
    pub credential_hash: String,
}

/// Optional field updates for an existing account.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// New role id.
    pub role_id: Option<String>,
    /// New e-mail address.
    pub email: Option<String>,
    /// New mobile number.
    pub mobile_no: Option<String>,
    /// New status value.
    pub status: Option<i16>,
}

/// Filters and paging for the user listing.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Filter by account id.
    pub id: Option<Uuid>,
    /// Filter by role id.
    pub role_id: Option<String>,
    /// Filter by e-mail.
    pub email: Option<String>,
    /// Filter by mobile number.
    pub mobile_no: Option<String>,
    /// Filter by status.
    pub status: Option<i16>,
    /// Sort column (whitelisted; unknown values fall back to creation
    /// time).
    pub order_by: Option<String>,
    /// Sort direction, "asc" or "desc".
    pub order_dir: Option<String>,
    /// Rows to skip.
    pub offset: i64,
    /// Page size.
    pub limit: i64,
}

/// Storage operations on user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user with its profile and first credential.
    async fn create_account(&self, new: NewAccount) -> Result<User>;

    /// Fetch one user with profile, role and credential metadata.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserDetail>>;

    /// Fetch a user by e-mail or mobile number, with credential hashes,
    /// for the login flow.
    async fn find_by_login(&self, username: &str) -> Result<Option<UserWithCredentials>>;

    /// List users matching the filter; returns the page and the total
    /// match count.
    async fn list(&self, filter: &UserFilter) -> Result<(Vec<User>, u64)>;

    /// Apply field updates; returns the updated row or `None` when the
    /// id is unknown.
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>>;

    /// Flip the status flag (soft delete / restore).
    async fn set_status(&self, id: Uuid, status: i16) -> Result<Option<User>>;
}

const USER_COLUMNS: &str = "id, role_id, email, mobile_no, status, dt_created, dt_last_modified";

/// Postgres-backed resource repository.
#[derive(Clone)]
pub struct PgResourceRepository {
    pool: PgPool,
}

impl PgResourceRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository for PgResourceRepository {
    async fn find_active_resource(
        &self,
        method: &str,
        module: &str,
        controller: &str,
        action: &str,
    ) -> Result<Option<ResourceWithRules>> {
        let resource: Option<super::models::Resource> = sqlx::query_as(
            "SELECT id, name, kind, api_method, module, controller, action, status, dt_created \
             FROM resources \
             WHERE api_method = $1 AND module = $2 AND controller = $3 AND action = $4 \
               AND status = 1 \
             LIMIT 1",
        )
        .bind(method)
        .bind(module)
        .bind(controller)
        .bind(action)
        .fetch_optional(&self.pool)
        .await
        .context("Resource lookup failed")?;

        let Some(resource) = resource else {
            return Ok(None);
        };

        let rules = sqlx::query_as(
            "SELECT id, resource_id, level, value, status \
             FROM resource_accesses \
             WHERE resource_id = $1",
        )
        .bind(resource.id)
        .fetch_all(&self.pool)
        .await
        .context("Access rule lookup failed")?;

        Ok(Some(ResourceWithRules { resource, rules }))
    }
}

/// Postgres-backed user repository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    let mut sep = " WHERE ";
    if let Some(id) = filter.id {
        qb.push(sep).push("id = ").push_bind(id);
        sep = " AND ";
    }
    if let Some(role_id) = &filter.role_id {
        qb.push(sep).push("role_id = ").push_bind(role_id.clone());
        sep = " AND ";
    }
    if let Some(email) = &filter.email {
        qb.push(sep).push("email = ").push_bind(email.clone());
        sep = " AND ";
    }
    if let Some(mobile_no) = &filter.mobile_no {
        qb.push(sep).push("mobile_no = ").push_bind(mobile_no.clone());
        sep = " AND ";
    }
    if let Some(status) = filter.status {
        qb.push(sep).push("status = ").push_bind(status);
    }
}

fn order_clause(filter: &UserFilter) -> (&'static str, &'static str) {
    // Sort column is interpolated into SQL, so it goes through a
    // whitelist rather than a bind.
    let column = match filter.order_by.as_deref() {
        Some("email") => "email",
        Some("role_id") => "role_id",
        Some("status") => "status",
        Some("dt_last_modified") => "dt_last_modified",
        _ => "dt_created",
    };
    let direction = match filter.order_dir.as_deref() {
        Some(dir) if dir.eq_ignore_ascii_case("asc") => "ASC",
        _ => "DESC",
    };
    (column, direction)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_account(&self, new: NewAccount) -> Result<User> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;

        let user: User = sqlx::query_as(&format!(
            "INSERT INTO users (id, role_id, email, mobile_no, status, dt_created) \
             VALUES ($1, $2, $3, $4, 1, now()) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.role_id)
        .bind(&new.email)
        .bind(&new.mobile_no)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert user")?;

        sqlx::query(
            "INSERT INTO user_profiles (id, user_id, first_name, last_name, status, dt_created) \
             VALUES ($1, $2, $3, $4, 1, now())",
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .execute(&mut *tx)
        .await
        .context("Failed to insert user profile")?;

        sqlx::query(
            "INSERT INTO user_credentials (id, user_id, kind, value, status, dt_created) \
             VALUES ($1, $2, $3, $4, 1, now())",
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&new.credential_kind)
        .bind(&new.credential_hash)
        .execute(&mut *tx)
        .await
        .context("Failed to insert user credential")?;

        tx.commit().await.context("Failed to commit account creation")?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserDetail>> {
        let user: Option<User> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("User lookup failed")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let profile: Option<UserProfile> = sqlx::query_as(
            "SELECT id, user_id, first_name, last_name, status \
             FROM user_profiles WHERE user_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Profile lookup failed")?;

        let role: Option<UserRole> = sqlx::query_as(
            "SELECT id, name, description, status FROM user_roles WHERE id = $1",
        )
        .bind(&user.role_id)
        .fetch_optional(&self.pool)
        .await
        .context("Role lookup failed")?;

        let credentials: Vec<CredentialSummary> = sqlx::query_as(
            "SELECT id, kind, dt_created FROM user_credentials WHERE user_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .context("Credential lookup failed")?;

        Ok(Some(UserDetail {
            user,
            profile,
            role,
            credentials,
        }))
    }

    async fn find_by_login(&self, username: &str) -> Result<Option<UserWithCredentials>> {
        let user: Option<User> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 OR mobile_no = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Login lookup failed")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let credentials = sqlx::query_as(
            "SELECT id, user_id, kind, value, status \
             FROM user_credentials WHERE user_id = $1",
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await
        .context("Credential lookup failed")?;

        Ok(Some(UserWithCredentials { user, credentials }))
    }

    async fn list(&self, filter: &UserFilter) -> Result<(Vec<User>, u64)> {
        let mut count_query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .context("User count failed")?;

        let (column, direction) = order_clause(filter);
        let mut list_query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_filters(&mut list_query, filter);
        list_query.push(format!(" ORDER BY {column} {direction}"));
        list_query.push(" LIMIT ").push_bind(filter.limit);
        list_query.push(" OFFSET ").push_bind(filter.offset);

        let users = list_query
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .context("User listing failed")?;

        Ok((users, total as u64))
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE users SET dt_last_modified = ");
        qb.push_bind(Utc::now());
        if let Some(role_id) = changes.role_id {
            qb.push(", role_id = ").push_bind(role_id);
        }
        if let Some(email) = changes.email {
            qb.push(", email = ").push_bind(email);
        }
        if let Some(mobile_no) = changes.mobile_no {
            qb.push(", mobile_no = ").push_bind(mobile_no);
        }
        if let Some(status) = changes.status {
            qb.push(", status = ").push_bind(status);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {USER_COLUMNS}"));

        let user = qb
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await
            .context("User update failed")?;

        Ok(user)
    }

    async fn set_status(&self, id: Uuid, status: i16) -> Result<Option<User>> {
        let user = sqlx::query_as(&format!(
            "UPDATE users SET status = $2, dt_last_modified = now() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .context("User status update failed")?;

        Ok(user)
    }
}
