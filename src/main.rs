use std::sync::Arc;

use anyhow::Context;
use rate_mailer::{
    app::App,
    config::get_configuration,
    scheduler::{self, DailyJob},
    store::PgSubscriberStore,
    telemetry::get_subscriber,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_configuration().context("Failed to read configuration.")?;

    get_subscriber(&config.log_level, std::io::stderr).init();

    anyhow::ensure!(
        config.scheduler.interval_seconds > 0,
        "scheduler.interval_seconds must be > 0"
    );

    let db = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(config.database.with_db())
        .await
        .context("Could not connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("Could not apply database migrations")?;

    let store = Arc::new(PgSubscriberStore::new(db.clone()));

    let job = DailyJob::new(
        store.clone(),
        config.rate_api.client()?,
        config.email_client.client()?,
    );
    let scheduler = tokio::spawn(scheduler::run_until_stopped(
        job,
        config.scheduler.interval(),
    ));

    let app = App::with(&config, store).await?;
    tracing::info!(
        host = %app.host()?,
        port = app.port()?,
        "starting server"
    );
    let served = app.serve().await.context("The server stopped unexpectedly");

    scheduler.abort();
    db.close().await;
    tracing::info!("stopped");

    served
}
