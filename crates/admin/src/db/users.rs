//! User and admin-profile repository.
//!
//! Admins are ordinary `users` rows with an `admin_profiles` row marking
//! them as super admins.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use jagmart_core::{Email, RoleName, User, UserId};

use super::{RepositoryError, map_constraint, non_blank};
use crate::models::UserPatch;

const USER_COLUMNS: &str = "u.id, u.email, u.first_name, u.last_name, r.name AS role_name, \
     u.is_active, u.created_at, u.updated_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    role_name: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row
            .role_name
            .map(|name| name.parse::<RoleName>())
            .transpose()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            first_name: row.first_name,
            last_name: row.last_name,
            role,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
    is_super_admin: Option<bool>,
}

/// A user found by email, with what login needs to decide.
#[derive(Debug)]
pub struct Credentials {
    pub user: User,
    pub password_hash: String,
    /// `false` when the user has no admin profile.
    pub is_super_admin: bool,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All users with their role name, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r"
            SELECT {USER_COLUMNS}
            FROM users u
            LEFT JOIN roles r ON r.id = u.role_id
            ORDER BY u.created_at DESC, u.id DESC
            "
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update(&self, id: UserId, patch: &UserPatch) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            WITH updated AS (
                UPDATE users SET
                    first_name = CASE WHEN $2 THEN $3 ELSE first_name END,
                    last_name  = CASE WHEN $4 THEN $5 ELSE last_name END,
                    is_active  = COALESCE($6, is_active),
                    updated_at = now()
                WHERE id = $1
                RETURNING *
            )
            SELECT {USER_COLUMNS}
            FROM updated u
            LEFT JOIN roles r ON r.id = u.role_id
            "
        ))
        .bind(id)
        .bind(patch.first_name.is_some())
        .bind(non_blank(patch.first_name.as_deref()))
        .bind(patch.last_name.is_some())
        .bind(non_blank(patch.last_name.as_deref()))
        .bind(patch.is_active)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from)
            .transpose()?
            .ok_or(RepositoryError::NotFound)
    }

    /// Look up the login credentials and admin flag for an email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn credentials(&self, email: &Email) -> Result<Option<Credentials>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialsRow>(&format!(
            r"
            SELECT {USER_COLUMNS}, u.password_hash, ap.is_super_admin
            FROM users u
            LEFT JOIN roles r ON r.id = u.role_id
            LEFT JOIN admin_profiles ap ON ap.user_id = u.id
            WHERE u.email = $1
            "
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            Ok(Credentials {
                user: r.user.try_into()?,
                password_hash: r.password_hash,
                is_super_admin: r.is_super_admin.unwrap_or(false),
            })
        })
        .transpose()
    }

    /// Whether the user still holds super-admin rights.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_active_super_admin(&self, id: UserId) -> Result<bool, RepositoryError> {
        let allowed: Option<bool> = sqlx::query_scalar(
            r"
            SELECT ap.is_super_admin AND u.is_active
            FROM admin_profiles ap
            JOIN users u ON u.id = ap.user_id
            WHERE ap.user_id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(allowed.unwrap_or(false))
    }

    /// Create a user with the `admin` role and a super-admin profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create_admin(
        &self,
        email: &Email,
        password_hash: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id: UserId = sqlx::query_scalar(
            r"
            INSERT INTO users (email, password_hash, first_name, last_name, role_id)
            VALUES ($1, $2, $3, $4, (SELECT id FROM roles WHERE name = $5))
            RETURNING id
            ",
        )
        .bind(email)
        .bind(password_hash)
        .bind(non_blank(first_name))
        .bind(non_blank(last_name))
        .bind(RoleName::Admin.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_constraint(e, "A user with this email already exists", "Role"))?;

        sqlx::query("INSERT INTO admin_profiles (user_id, is_super_admin) VALUES ($1, TRUE)")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Give an existing user the `admin` role and super-admin rights.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this email.
    pub async fn grant_admin(&self, email: &Email) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id: Option<UserId> = sqlx::query_scalar(
            r"
            UPDATE users
               SET role_id = (SELECT id FROM roles WHERE name = $2), updated_at = now()
             WHERE email = $1
            RETURNING id
            ",
        )
        .bind(email)
        .bind(RoleName::Admin.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = id else {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        };

        sqlx::query(
            r"
            INSERT INTO admin_profiles (user_id, is_super_admin) VALUES ($1, TRUE)
            ON CONFLICT (user_id) DO UPDATE SET is_super_admin = TRUE
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Users holding super-admin rights, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_admins(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r"
            SELECT {USER_COLUMNS}
            FROM users u
            JOIN admin_profiles ap ON ap.user_id = u.id AND ap.is_super_admin
            LEFT JOIN roles r ON r.id = u.role_id
            ORDER BY ap.created_at, u.id
            "
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            SELECT {USER_COLUMNS}
            FROM users u
            LEFT JOIN roles r ON r.id = u.role_id
            WHERE u.id = $1
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}
