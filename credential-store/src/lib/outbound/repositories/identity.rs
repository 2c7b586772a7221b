use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::postgres::PgSslMode;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::identity::errors::StorageError;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::NewIdentity;
use crate::identity::ports::IdentityRepository;

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: i64,
    email: String,
    password_hash: String,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = StorageError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(&row.email).map_err(|e| {
            StorageError::DatabaseError(format!("Stored identity {} is invalid: {}", row.id, e))
        })?;

        Ok(Identity {
            id: IdentityId(row.id),
            email,
            password_hash: row.password_hash,
        })
    }
}

pub struct PostgresIdentityRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresIdentityRepository {
    /// Wrap an existing pool. Every statement is bounded by `timeout`.
    ///
    /// The schema is assumed to exist; call [`bootstrap`](Self::bootstrap)
    /// once if it may not.
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Open a pool from configuration and ensure the schema exists.
    ///
    /// # Errors
    /// * `DatabaseError` - Configuration cannot be turned into connect options
    /// * `Unavailable` / `Timeout` - The database cannot be reached
    /// * `Bootstrap` - Creating the identities table failed
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let ssl_mode = config
            .ssl_mode
            .parse::<PgSslMode>()
            .map_err(|e| StorageError::DatabaseError(format!("Invalid ssl_mode: {}", e)))?;

        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.name)
            .ssl_mode(ssl_mode);

        let timeout = config.timeout();
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(timeout)
            .connect_with(options)
            .await
            .map_err(|e| classify(e, timeout))?;
        tracing::info!(
            max_connections = config.max_connections,
            database = "postgresql",
            "Database connection pool created"
        );

        let repository = Self::new(pool, timeout);
        repository.bootstrap().await?;

        Ok(repository)
    }

    /// Create the identities table and its email index if absent.
    ///
    /// Idempotent; applied migrations are recorded and skipped on later runs.
    /// Bounded by the same timeout as every statement.
    pub async fn bootstrap(&self) -> Result<(), StorageError> {
        let migrator = sqlx::migrate!("./migrations");
        tokio::time::timeout(self.timeout, migrator.run(&self.pool))
            .await
            .map_err(|_| StorageError::Timeout(self.timeout))?
            .map_err(|e| StorageError::Bootstrap(e.to_string()))?;
        tracing::info!(database = "postgresql", "Database migrations completed");

        Ok(())
    }

    async fn bounded<T, F>(&self, query: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        tokio::time::timeout(self.timeout, query)
            .await
            .map_err(|_| StorageError::Timeout(self.timeout))?
            .map_err(|e| classify(e, self.timeout))
    }
}

fn classify(error: sqlx::Error, timeout: Duration) -> StorageError {
    match &error {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StorageError::EmailAlreadyExists
        }
        sqlx::Error::PoolTimedOut => StorageError::Timeout(timeout),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StorageError::Unavailable(error.to_string()),
        _ => StorageError::DatabaseError(error.to_string()),
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn exists(&self, email: &EmailAddress) -> Result<bool, StorageError> {
        self.bounded(
            sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS(SELECT 1 FROM identities WHERE email = $1)
                "#,
            )
            .bind(email.as_str())
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn create(&self, identity: NewIdentity) -> Result<Identity, StorageError> {
        let id = self
            .bounded(
                sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO identities (email, password_hash)
                    VALUES ($1, $2)
                    RETURNING id
                    "#,
                )
                .bind(identity.email.as_str())
                .bind(identity.password_hash.as_str())
                .fetch_one(&self.pool),
            )
            .await?;

        Ok(Identity {
            id: IdentityId(id),
            email: identity.email,
            password_hash: identity.password_hash,
        })
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, StorageError> {
        let row = self
            .bounded(
                sqlx::query_as::<_, IdentityRow>(
                    r#"
                    SELECT id, email, password_hash
                    FROM identities
                    WHERE email = $1
                    "#,
                )
                .bind(email.as_str())
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(Identity::try_from).transpose()
    }
}
