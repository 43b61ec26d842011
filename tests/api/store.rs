//! These tests need a running Postgres; run them with `cargo test -- --ignored`.
use rate_mailer::{
    config::{get_configuration, DatabaseSettings},
    domain::subscriber::email::Email,
    store::{PgSubscriberStore, StoreError, SubscriberStore},
};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

async fn configure_database(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("A postgres connection should be created.");

    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("The database should be created.");

    // Migrate database
    let connection_pool = PgPool::connect_with(config.with_db())
        .await
        .expect("A postgres connection pool should be created.");

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("The migrations should run without error.");

    connection_pool
}

async fn store() -> PgSubscriberStore {
    let mut config = get_configuration().expect("Failed to read configuration.");
    config.database.database_name = Uuid::new_v4().to_string();

    PgSubscriberStore::new(configure_database(&config.database).await)
}

fn email(s: &str) -> Email {
    Email::try_from(s.to_string()).unwrap()
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn an_empty_table_lists_no_subscribers() {
    let store = store().await;

    assert!(store.list_subscribers().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn added_subscribers_are_listed_in_subscription_order() {
    let store = store().await;

    store.add_subscriber(&email("test@example.com")).await.unwrap();
    store.add_subscriber(&email("another@example.com")).await.unwrap();

    assert_eq!(
        store.list_subscribers().await.unwrap(),
        vec![
            "test@example.com".to_string(),
            "another@example.com".to_string()
        ]
    );
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn a_duplicate_email_is_rejected_by_the_table() {
    let store = store().await;

    store.add_subscriber(&email("test@example.com")).await.unwrap();
    let outcome = store.add_subscriber(&email("test@example.com")).await;

    assert!(matches!(outcome, Err(StoreError::AlreadyExists)));
    assert_eq!(store.list_subscribers().await.unwrap().len(), 1);
}
