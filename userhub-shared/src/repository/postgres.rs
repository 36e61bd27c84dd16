/// PostgreSQL user repository
///
/// # Example
///
/// ```no_run
/// use userhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use userhub_shared::models::user::UserStatus;
/// use userhub_shared::repository::{PgUserRepository, UserRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let repo = PgUserRepository::new(pool);
///
/// if let Some(user) = repo.find_by_email_and_status("user@example.com", UserStatus::Active).await? {
///     println!("Found user: {}", user.id);
/// }
/// # Ok(())
/// # }
/// ```

use super::{RepositoryError, UserRepository};
use crate::db::pool;
use crate::models::user::{NewUser, User, UserStatus, UserUpdate};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

const USER_COLUMNS: &str =
    "id, email, nickname, address, certification_code, status, last_login_at";

/// User repository backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a repository over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps unique violations on the email column to `DuplicateEmail`
fn map_insert_error(err: sqlx::Error, email: &str) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err
            .constraint()
            .map(|constraint| constraint.contains("email"))
            .unwrap_or(false)
        {
            return RepositoryError::DuplicateEmail(email.to_string());
        }
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id_and_status(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>, RepositoryError> {
        debug!(user_id = id, status = %status, "Looking up user by id");

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND status = $2",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email_and_status(
        &self,
        email: &str,
        status: UserStatus,
    ) -> Result<Option<User>, RepositoryError> {
        debug!(email = %email, status = %status, "Looking up user by email");

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1 AND status = $2",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let email = user.email.clone();

        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, nickname, address, certification_code, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.email)
        .bind(user.nickname)
        .bind(user.address)
        .bind(user.certification_code)
        .bind(user.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_insert_error(err, &email))
    }

    async fn save(&self, user: &User) -> Result<User, RepositoryError> {
        let saved = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = $2,
                nickname = $3,
                address = $4,
                certification_code = $5,
                status = $6,
                last_login_at = $7
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.nickname)
        .bind(&user.address)
        .bind(&user.certification_code)
        .bind(user.status)
        .bind(user.last_login_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_insert_error(err, &user.email))?;

        saved.ok_or(RepositoryError::NotFound(user.id))
    }

    async fn update_profile(
        &self,
        id: i64,
        update: &UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET nickname = COALESCE($2, nickname),
                address = COALESCE($3, address)
            WHERE id = $1 AND status = $4
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&update.nickname)
        .bind(&update.address)
        .bind(UserStatus::Active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn record_login(&self, id: i64, at_millis: i64) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET last_login_at = $2 WHERE id = $1 AND status = $3 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(at_millis)
        .bind(UserStatus::Active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }
}
