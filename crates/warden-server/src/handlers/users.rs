//! User account handlers: login plus CRUD and soft-delete/restore.

use crate::{
    db::audit::AuditEntry,
    db::models::{User, STATUS_ACTIVE, STATUS_INACTIVE},
    db::repositories::{NewAccount, UserChanges, UserFilter},
    error::{ApiError, ApiResult},
    middleware::access::{encode_token, Auth, Claims},
    response::{PaginatedResponse, PaginationParams},
    services::account,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

/// Request body for account creation.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Role id of the new account.
    pub role_id: String,
    /// E-mail address; doubles as the login name.
    pub email: String,
    /// Mobile number.
    pub mobile_number: Option<String>,
    /// Credential type; defaults to "password".
    #[serde(default = "default_credential_type")]
    pub credential_type: String,
    /// First name for the profile.
    pub first_name: Option<String>,
    /// Last name for the profile.
    pub last_name: Option<String>,
}

fn default_credential_type() -> String {
    "password".to_string()
}

/// Create a new user account with a generated password.
pub async fn create(
    State(state): State<AppState>,
    Auth(actor): Auth,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<User>> {
    if !account::validate_email(&req.email) {
        return Err(ApiError::BadRequest(
            "Username must be a valid email!".into(),
        ));
    }

    let generated_password = account::generate_random_password(8);
    let hash = account::hash_password(&generated_password)?;

    let user = state
        .users
        .create_account(NewAccount {
            role_id: req.role_id,
            email: req.email,
            mobile_no: req.mobile_number,
            first_name: req.first_name.unwrap_or_else(|| "Admin".into()),
            last_name: req.last_name.unwrap_or_else(|| "User".into()),
            credential_kind: req.credential_type,
            credential_hash: hash,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "User account created");
    state
        .audit
        .record(
            AuditEntry::new("USER_CREATE", format!("Created user {}", user.email), actor.id)
                .on_row("users", user.id)
                .with_new_data(json!(user)),
        )
        .await;

    Ok(Json(user))
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// E-mail address or mobile number.
    pub username: String,
    /// Plain-text password.
    pub password: String,
    /// Credential type; defaults to "password".
    #[serde(default = "default_credential_type")]
    pub credential_type: String,
}

/// Authenticate a user and issue a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let found = state
        .users
        .find_by_login(&req.username)
        .await?
        .ok_or(ApiError::InvalidLogin)?;

    let credential = found
        .credentials
        .iter()
        .find(|c| c.kind.eq_ignore_ascii_case(&req.credential_type))
        .ok_or(ApiError::UnknownCredentialType)?;

    // Only password credentials can be presented over this endpoint.
    if !credential.kind.eq_ignore_ascii_case("password")
        || !account::verify_password(&req.password, &credential.value)
    {
        return Err(ApiError::InvalidLogin);
    }

    let user = found.user;
    let claims = Claims::new(
        user.id,
        &user.role_id,
        state.config.auth.token_expiry_secs as i64,
    );
    let token = encode_token(&claims, &state.config.auth.jwt_secret)
        .map_err(|e| ApiError::Internal(e.into()))?;

    info!(user_id = %user.id, "User logged in");
    state
        .audit
        .record(AuditEntry::new(
            "AUTH_LOGIN",
            format!("User {} logged in", user.email),
            user.id,
        ))
        .await;

    Ok(Json(json!({
        "message": "Login successful!",
        "token": token,
        "user": user,
    })))
}

/// Fetch a single user with profile, role and credential metadata.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let detail = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User".into()))?;

    Ok(Json(json!(detail)))
}

/// Query parameters for the user listing.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Filter by account id.
    pub id: Option<Uuid>,
    /// Filter by role id.
    pub role_id: Option<String>,
    /// Filter by e-mail.
    pub email: Option<String>,
    /// Filter by mobile number.
    pub mobile_number: Option<String>,
    /// Filter by status.
    pub status: Option<i16>,
    /// Sort column.
    pub order_by: Option<String>,
    /// Sort direction.
    pub order_dir: Option<String>,
    /// Page number, 1-indexed.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

/// List users with filtering, sorting and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<PaginatedResponse<User>>> {
    let params = PaginationParams {
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(10),
    };

    let filter = UserFilter {
        id: query.id,
        role_id: query.role_id,
        email: query.email,
        mobile_no: query.mobile_number,
        status: query.status,
        order_by: query.order_by,
        order_dir: query.order_dir,
        offset: params.offset(),
        limit: params.limit() as i64,
    };

    let (users, total) = state.users.list(&filter).await?;

    Ok(Json(PaginatedResponse::new(
        users,
        params.page,
        params.limit(),
        total,
    )))
}

/// Request body for account updates.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New role id.
    pub role_id: Option<String>,
    /// New e-mail address.
    pub email: Option<String>,
    /// New mobile number.
    pub mobile_number: Option<String>,
    /// New status value.
    pub status: Option<i16>,
}

/// Update an existing user.
pub async fn update(
    State(state): State<AppState>,
    Auth(actor): Auth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    if let Some(email) = &req.email {
        if !account::validate_email(email) {
            return Err(ApiError::BadRequest("Invalid e-mail format.".into()));
        }
    }

    let old = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User".into()))?;

    let updated = state
        .users
        .update(
            id,
            UserChanges {
                role_id: req.role_id,
                email: req.email,
                mobile_no: req.mobile_number,
                status: req.status,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("User".into()))?;

    state
        .audit
        .record(
            AuditEntry::new("USER_UPDATE", format!("Updated user {}", updated.email), actor.id)
                .on_row("users", id)
                .with_old_data(json!(old.user))
                .with_new_data(json!(updated)),
        )
        .await;

    Ok(Json(updated))
}

/// Soft delete a user by flipping its status to inactive.
pub async fn delete(
    State(state): State<AppState>,
    Auth(actor): Auth,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let existing = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User".into()))?;

    if existing.user.status == STATUS_INACTIVE {
        return Err(ApiError::BadRequest("User already deleted.".into()));
    }

    state.users.set_status(id, STATUS_INACTIVE).await?;

    state
        .audit
        .record(
            AuditEntry::new(
                "USER_DELETE",
                format!("Deactivated user {}", existing.user.email),
                actor.id,
            )
            .on_row("users", id),
        )
        .await;

    Ok(Json(json!({ "message": "User deleted successfully" })))
}

/// Restore a soft-deleted user.
pub async fn restore(
    State(state): State<AppState>,
    Auth(actor): Auth,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let existing = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User".into()))?;

    if existing.user.status == STATUS_ACTIVE {
        return Err(ApiError::BadRequest("User already active.".into()));
    }

    state.users.set_status(id, STATUS_ACTIVE).await?;

    state
        .audit
        .record(
            AuditEntry::new(
                "USER_RESTORE",
                format!("Restored user {}", existing.user.email),
                actor.id,
            )
            .on_row("users", id),
        )
        .await;

    Ok(Json(json!({ "message": "User restored successfully" })))
}
