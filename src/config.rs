use std::time::Duration;

use anyhow::Context;
use reqwest::Url;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::{domain::subscriber::email::Email, email::EmailClient, rate::RateClient};

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub rate_api: RateApiSettings,
    pub email_client: EmailClientSettings,
    pub scheduler: SchedulerSettings,
    pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    pub host: String,
    pub port: u16,
    pub database_name: String,
    pub require_ssl: bool,
    pub max_connections: u32,
}

impl DatabaseSettings {
    /// Connection options for the server itself, used to create throwaway databases.
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RateApiSettings {
    pub base_url: String,
    pub timeout_milliseconds: u64,
}

impl RateApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(&self) -> anyhow::Result<RateClient> {
        let base_url = Url::parse(&self.base_url).context("Invalid rate API base url.")?;
        RateClient::new(base_url, self.timeout())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: Option<String>,
    pub sender_secret: Option<Secret<String>>,
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    /// The configured sender, if any. Blank values count as absent.
    pub fn sender(&self) -> Result<Option<Email>, String> {
        match self.sender_email.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(sender) => Email::try_from(sender.to_owned()).map(Some),
        }
    }

    pub fn sender_secret(&self) -> Option<Secret<String>> {
        self.sender_secret
            .as_ref()
            .filter(|secret| !secret.expose_secret().trim().is_empty())
            .cloned()
    }

    /// An unusable sender is treated as absent, so sends fail with
    /// [`SendError::MissingCredentials`](crate::email::SendError::MissingCredentials).
    pub fn client(&self) -> anyhow::Result<EmailClient> {
        let base_url = Url::parse(&self.base_url).context("Invalid email relay base url.")?;
        let sender = self.sender().unwrap_or_else(|e| {
            tracing::warn!(detail = %e, "ignoring invalid sender email address");
            None
        });

        EmailClient::new(base_url, sender, self.sender_secret(), self.timeout())
            .context("Could not build the email client.")
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SchedulerSettings {
    pub interval_seconds: u64,
}

impl SchedulerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

/// The possible runtime environment for our application.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

/// Layers `base.yaml`, the environment specific file and `APP_*` variables.
///
/// `APP_EMAIL_CLIENT__SENDER_SECRET=...` sets `email_client.sender_secret`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
