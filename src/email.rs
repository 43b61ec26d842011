use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

use crate::domain::subscriber::email::Email;

#[derive(thiserror::Error, Debug)]
pub enum SendError {
    #[error("the sender address or the sender secret is not configured")]
    MissingCredentials,
    #[error("the mail relay rejected the message")]
    Relay(#[from] reqwest::Error),
}

/// Client for the mail relay, authenticated as the configured sender.
#[derive(Clone, Debug)]
pub struct EmailClient {
    http_client: Client,
    send_url: Url,
    sender: Option<Email>,
    sender_secret: Option<Secret<String>>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
}

impl EmailClient {
    pub fn new(
        base_url: Url,
        sender: Option<Email>,
        sender_secret: Option<Secret<String>>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let send_url = base_url
            .join("email")
            .context("Invalid email relay base url.")?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Could not build the email relay http client.")?;

        Ok(Self {
            http_client,
            send_url,
            sender,
            sender_secret,
        })
    }

    #[tracing::instrument(name = "Send email through the relay", skip(self, recipient, subject, text_content), fields(recipient = %recipient))]
    pub async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        text_content: &str,
    ) -> Result<(), SendError> {
        let (Some(sender), Some(sender_secret)) = (&self.sender, &self.sender_secret) else {
            return Err(SendError::MissingCredentials);
        };

        let request_body = SendEmailRequest {
            from: sender.as_ref(),
            to: recipient.as_ref(),
            subject,
            text_body: text_content,
        };

        self.http_client
            .post(self.send_url.clone())
            .basic_auth(sender.as_ref(), Some(sender_secret.expose_secret()))
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
