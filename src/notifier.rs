use crate::{
    domain::subscriber::email::Email,
    email::{EmailClient, SendError},
};

pub const SUBJECT: &str = "Daily Exchange Rate";

pub fn rate_message(rate: f64) -> String {
    format!("Current USD to UAH exchange rate: {:.2}", rate)
}

/// Sends the rate to one recipient. Not retried.
#[tracing::instrument(name = "Notify subscriber", skip(email_client, recipient), fields(recipient = %recipient))]
pub async fn notify(
    email_client: &EmailClient,
    rate: f64,
    recipient: &Email,
) -> Result<(), SendError> {
    email_client
        .send_email(recipient, SUBJECT, &rate_message(rate))
        .await
}
