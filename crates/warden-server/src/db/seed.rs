//! Default data seeding.
//!
//! Inserts the built-in roles, the bootstrap admin account, the default
//! resource table with its access rules, and the audit log categories.
//! Every insert is `ON CONFLICT DO NOTHING` so seeding can be re-run
//! safely.

use crate::services::account::{generate_random_password, hash_password};
use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;
use uuid::{uuid, Uuid};

/// Bootstrap admin account id.
pub const ADMIN_USER_ID: Uuid = uuid!("5b1c7a3e-90f2-4d18-8a6f-2e4c9b07d135");

const ADMIN_PROFILE_ID: Uuid = uuid!("7e2f9c41-3ab8-4f06-b1d2-86a05c3e9f74");
const ADMIN_CREDENTIAL_ID: Uuid = uuid!("912a4d6b-58e0-4c73-a9f5-04b7d12c86e3");

/// Seed all default data.
pub async fn seed_defaults(pool: &PgPool) -> Result<()> {
    info!("Seeding database defaults...");
    seed_roles(pool).await?;
    seed_admin_user(pool).await?;
    seed_resources(pool).await?;
    seed_log_categories(pool).await?;
    info!("Seeding finished");
    Ok(())
}

async fn seed_roles(pool: &PgPool) -> Result<()> {
    let roles = [
        ("ADMIN", "Admin", "Administrator with full access"),
        (
            "PROCESSOR",
            "Processor",
            "Processors can have multiple access that can be given by an Admin",
        ),
        ("CLIENT_ADMIN", "Client Admin", "Admin of a Client account"),
        ("CLIENT_STAFF", "Client Staff", "Staff of a Client account"),
        ("GUEST", "Guest", "Guest user with limited access"),
    ];

    for (id, name, description) in roles {
        sqlx::query(
            "INSERT INTO user_roles (id, name, description, status) VALUES ($1, $2, $3, 1) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .execute(pool)
        .await
        .context("Failed to seed user roles")?;
    }
    Ok(())
}

async fn seed_admin_user(pool: &PgPool) -> Result<()> {
    let inserted = sqlx::query(
        "INSERT INTO users (id, role_id, email, mobile_no, status, dt_created) \
         VALUES ($1, 'ADMIN', 'admin@warden.local', NULL, 1, now()) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(ADMIN_USER_ID)
    .execute(pool)
    .await
    .context("Failed to seed admin user")?;

    sqlx::query(
        "INSERT INTO user_profiles (id, user_id, first_name, last_name, status, dt_created) \
         VALUES ($1, $2, 'Admin', 'User', 1, now()) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(ADMIN_PROFILE_ID)
    .bind(ADMIN_USER_ID)
    .execute(pool)
    .await
    .context("Failed to seed admin profile")?;

    // Only mint a password when the account row was actually created,
    // so re-seeding never rotates existing credentials.
    if inserted.rows_affected() > 0 {
        let password = match std::env::var("WARDEN_ADMIN_PASSWORD") {
            Ok(p) if !p.is_empty() => p,
            _ => {
                let generated = generate_random_password(16);
                info!(password = %generated, "Generated bootstrap admin password");
                generated
            }
        };
        let hash = hash_password(&password)?;

        sqlx::query(
            "INSERT INTO user_credentials (id, user_id, kind, value, status, dt_created) \
             VALUES ($1, $2, 'password', $3, 1, now()) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(ADMIN_CREDENTIAL_ID)
        .bind(ADMIN_USER_ID)
        .bind(hash)
        .execute(pool)
        .await
        .context("Failed to seed admin credential")?;
    }

    Ok(())
}

async fn seed_resources(pool: &PgPool) -> Result<()> {
    struct SeedResource {
        id: Uuid,
        rule_id: Uuid,
        name: &'static str,
        kind: &'static str,
        method: &'static str,
        module: &'static str,
        controller: &'static str,
        action: &'static str,
    }

    let resources = [
        SeedResource {
            id: uuid!("c3e81f5a-2d94-4b07-9c26-7f10a8d5e342"),
            rule_id: uuid!("a4f60c2d-8b13-4e97-b8d5-31c7e04a92f6"),
            name: "User Creation",
            kind: "api",
            method: "POST",
            module: "default",
            controller: "user",
            action: "create",
        },
        SeedResource {
            id: uuid!("6a94d2c7-51e8-4f3b-8d09-b5c2e7a61f80"),
            rule_id: uuid!("d81b5f39-27c4-4a60-9e12-f6a03d8c45b7"),
            name: "User Management",
            kind: "nav",
            method: "GET",
            module: "default",
            controller: "user",
            action: "index",
        },
        SeedResource {
            id: uuid!("f17b3e92-c640-4a85-b3d1-29e8f0c4a756"),
            rule_id: uuid!("3c9e70a4-f1d8-4b26-85e3-b04c62d91f78"),
            name: "User Directory",
            kind: "api",
            method: "GET",
            module: "default",
            controller: "users",
            action: "index",
        },
        SeedResource {
            id: uuid!("2d50c8e1-7b39-4d6a-a4f8-e1906b3c57d2"),
            rule_id: uuid!("60d24b8f-93a5-4c17-ae80-5f1e7c3092d4"),
            name: "User Login",
            kind: "api",
            method: "POST",
            module: "default",
            controller: "user",
            action: "login",
        },
        SeedResource {
            id: uuid!("8fc42a60-9e17-4c5b-bd73-50a1d29e86f4"),
            rule_id: uuid!("e52c94d0-16b7-4f38-92a6-c8d1e50b73f9"),
            name: "User Update",
            kind: "api",
            method: "PUT",
            module: "default",
            controller: "user",
            action: "index",
        },
        SeedResource {
            id: uuid!("b06e59d3-48af-4e21-95c8-d73f0a2b14e6"),
            rule_id: uuid!("17f8a6c3-d92e-4b50-8c74-a3e60d15b928"),
            name: "User Deletion",
            kind: "api",
            method: "DELETE",
            module: "default",
            controller: "user",
            action: "index",
        },
        SeedResource {
            id: uuid!("49d7f1b8-e325-4098-a6d4-1c85b9e07f23"),
            rule_id: uuid!("c04d17e6-5a89-4f42-b3d0-97e28c6a1f53"),
            name: "User Restoration",
            kind: "api",
            method: "PATCH",
            module: "default",
            controller: "user",
            action: "index",
        },
    ];

    for r in resources {
        sqlx::query(
            "INSERT INTO resources \
             (id, name, kind, api_method, module, controller, action, status, dt_created) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 1, now()) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(r.id)
        .bind(r.name)
        .bind(r.kind)
        .bind(r.method)
        .bind(r.module)
        .bind(r.controller)
        .bind(r.action)
        .execute(pool)
        .await
        .context("Failed to seed resources")?;

        // Every seeded resource starts out open to processors; admins
        // bypass rules entirely.
        sqlx::query(
            "INSERT INTO resource_accesses (id, resource_id, level, value, status) \
             VALUES ($1, $2, 1, 'PROCESSOR', 1) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(r.rule_id)
        .bind(r.id)
        .execute(pool)
        .await
        .context("Failed to seed resource accesses")?;
    }

    Ok(())
}

async fn seed_log_categories(pool: &PgPool) -> Result<()> {
    let categories = [
        ("AUTH_LOGIN", "User Logged In", "A User logged on to the system"),
        ("AUTH_LOGOUT", "User Logged Out", "A User logged out from the system"),
        ("AUTH_FAILED", "User Logged In Failed", "Failed login attempt"),
        ("USER_CREATE", "Created a User", "A User created a new User account"),
        ("USER_GETBYID", "Retrieved a User", "A User retrieved a User account"),
        ("USER_GET", "Retrieved Users", "A User retrieved a list of User accounts"),
        ("USER_UPDATE", "Updated a User", "A User updated a User account"),
        (
            "USER_DELETE",
            "Deleted a User",
            "A User deleted/deactivated a User account",
        ),
        ("USER_RESTORE", "Restored a User", "A User restored a User account"),
        (
            "USER_PASSWORD_CHANGE",
            "Changed User Password",
            "A User changed the password of a User account",
        ),
    ];

    for (id, name, description) in categories {
        sqlx::query(
            "INSERT INTO log_categories (id, name, description) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .execute(pool)
        .await
        .context("Failed to seed log categories")?;
    }
    Ok(())
}
