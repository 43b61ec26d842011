use axum::{
    extract::{rejection::FormRejection, State},
    routing::post,
    Form, Json, Router,
};
use tracing::instrument;

use super::AppState;
use crate::{
    app::error::{AppError, AppResult},
    domain::subscriber::email::Email,
};

pub mod schema;

pub fn router() -> Router<AppState> {
    Router::new().route("/subscribe", post(subscribe))
}

/// A body that is not a decodable form counts as a missing `email` field.
#[instrument(name = "adding a new subscriber", skip(state, body), fields(email = tracing::field::Empty))]
pub async fn subscribe(
    State(state): State<AppState>,
    body: Result<Form<schema::SubscribeBody>, FormRejection>,
) -> AppResult<Json<schema::SubscribeResponse>> {
    let Form(body) = body.map_err(|rejection| {
        AppError::ValidationError(format!("email is missing: {}", rejection.body_text()))
    })?;
    tracing::Span::current().record("email", &tracing::field::display(&body.email));

    let email = Email::try_from(body.email).map_err(AppError::ValidationError)?;

    state.store.add_subscriber(&email).await?;

    Ok(Json(schema::SubscribeResponse {
        message: "Subscribed successfully".to_owned(),
    }))
}
