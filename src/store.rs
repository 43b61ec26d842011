use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::subscriber::email::Email;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("the subscriber already exists")]
    AlreadyExists,
    #[error("the subscriber store could not complete the operation")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                Self::AlreadyExists
            }
            e => Self::Database(e),
        }
    }
}

/// Persistence for subscriber addresses.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Fails with [`StoreError::AlreadyExists`] when the address is taken.
    async fn add_subscriber(&self, email: &Email) -> Result<(), StoreError>;

    async fn list_subscribers(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(Clone, Debug)]
pub struct PgSubscriberStore {
    pool: PgPool,
}

impl PgSubscriberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberStore for PgSubscriberStore {
    #[tracing::instrument(name = "Saving new subscriber in the database", skip(self, email), fields(email = %email))]
    async fn add_subscriber(&self, email: &Email) -> Result<(), StoreError> {
        sqlx::query(
            r#"insert into subscriptions (id, email, subscribed_at) values ($1, $2, $3)"#,
        )
        .bind(Uuid::new_v4())
        .bind(email.as_ref())
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(detail = e.to_string(), "failed to save new subscriber");
            StoreError::from(e)
        })?;

        Ok(())
    }

    #[tracing::instrument(name = "Get subscribers", skip(self))]
    async fn list_subscribers(&self) -> Result<Vec<String>, StoreError> {
        let emails = sqlx::query_scalar::<_, String>(
            r#"
            SELECT email
            FROM subscriptions
            ORDER BY subscribed_at, email
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(emails)
    }
}
