//! User repository for shopper accounts.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use jagmart_core::{Email, RoleName, User, UserId};

use super::{RepositoryError, conflict_on_unique};

/// Selects a user joined with the name of their role.
const USER_SELECT: &str = r"
    SELECT u.id, u.email, u.first_name, u.last_name, r.name AS role_name,
           u.is_active, u.created_at, u.updated_at
    FROM users u
    LEFT JOIN roles r ON r.id = u.role_id
";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
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
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Fields for a new shopper account.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
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

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{USER_SELECT} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user and their password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            r"
            SELECT u.id, u.email, u.first_name, u.last_name, r.name AS role_name,
                   u.is_active, u.created_at, u.updated_at, u.password_hash
            FROM users u
            LEFT JOIN roles r ON r.id = u.role_id
            WHERE u.email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((User::try_from(r.user)?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// Create a shopper account with the `customer` role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_customer(&self, new_user: &NewUser<'_>) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            WITH inserted AS (
                INSERT INTO users (email, password_hash, first_name, last_name, role_id)
                VALUES ($1, $2, $3, $4, (SELECT id FROM roles WHERE name = $5))
                RETURNING *
            )
            SELECT i.id, i.email, i.first_name, i.last_name, r.name AS role_name,
                   i.is_active, i.created_at, i.updated_at
            FROM inserted i
            LEFT JOIN roles r ON r.id = i.role_id
            ",
        )
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(RoleName::Customer.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        User::try_from(row)
    }
}
