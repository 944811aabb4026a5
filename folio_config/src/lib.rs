use std::{collections::HashMap, net::IpAddr, path::Path};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use folio_models::email_address::EmailAddressWithName;
use serde::Deserialize;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Environment variable holding a colon separated list of config files
pub const CONFIG_PATH_VAR: &str = "FOLIO_CONFIG";

/// Load the config files listed in `FOLIO_CONFIG` (or the default config),
/// apply `FOLIO_*` overrides and read the smtp settings from the process
/// environment.
pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var(CONFIG_PATH_VAR)
        .ok()
        .filter(|paths| !paths.is_empty())
        .map(|paths| paths.split(':').map(Into::into).collect::<Vec<String>>())
        .unwrap_or_else(|| vec![DEFAULT_CONFIG_PATH.into()]);

    let mut config = load_paths(&paths, None)?;
    config.smtp = SmtpConfig::load(None)?;
    Ok(config)
}

/// Load the given config files. `env` replaces the process environment as the
/// source of `FOLIO_*` overrides if set.
pub fn load_paths(
    paths: &[impl AsRef<Path>],
    env: Option<HashMap<String, String>>,
) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .add_source(
            Environment::with_prefix("FOLIO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub environment: RuntimeEnvironment,
    pub http: HttpConfig,
    pub contact: ContactConfig,
    pub email: EmailConfig,
    #[serde(skip)]
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    Development,
    Production,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    /// Recipient of contact form submissions
    pub email: EmailAddressWithName,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub timeout: Duration,
    /// Log emails instead of sending them while the smtp settings are
    /// incomplete. Defaults to `true` outside of production.
    pub simulate: Option<bool>,
}

impl Config {
    pub fn simulate_email(&self) -> bool {
        self.email
            .simulate
            .unwrap_or(self.environment != RuntimeEnvironment::Production)
    }
}

/// Smtp settings, read from the unprefixed environment variables `SMTP_HOST`,
/// `SMTP_PORT`, `SMTP_USER`, `SMTP_PASS`, `NODEMAILER_SENDER_EMAIL` and
/// `NODEMAILER_SENDER_NAME`.
#[derive(Clone, Default, Deserialize)]
pub struct SmtpConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<String>,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub nodemailer_sender_email: Option<String>,
    pub nodemailer_sender_name: Option<String>,
}

impl SmtpConfig {
    pub const VARS: [&'static str; 6] = [
        "SMTP_HOST",
        "SMTP_PORT",
        "SMTP_USER",
        "SMTP_PASS",
        "NODEMAILER_SENDER_EMAIL",
        "NODEMAILER_SENDER_NAME",
    ];

    /// `env` replaces the process environment if set.
    pub fn load(env: Option<HashMap<String, String>>) -> anyhow::Result<Self> {
        let env = env
            .unwrap_or_else(|| std::env::vars().collect())
            .into_iter()
            .filter(|(key, _)| Self::VARS.contains(&key.as_str()))
            .collect();

        let config = config::Config::builder()
            .add_source(Environment::default().source(Some(env)))
            .build()?
            .try_deserialize::<Self>()
            .context("Failed to read smtp settings from environment")?;

        Ok(Self {
            smtp_host: non_empty(config.smtp_host),
            smtp_port: non_empty(config.smtp_port),
            smtp_user: non_empty(config.smtp_user),
            smtp_pass: non_empty(config.smtp_pass),
            nodemailer_sender_email: non_empty(config.nodemailer_sender_email),
            nodemailer_sender_name: non_empty(config.nodemailer_sender_name),
        })
    }

    /// Names of the required variables which are not set.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("SMTP_HOST", self.smtp_host.is_none()),
            ("SMTP_USER", self.smtp_user.is_none()),
            ("SMTP_PASS", self.smtp_pass.is_none()),
            (
                "NODEMAILER_SENDER_EMAIL",
                self.nodemailer_sender_email.is_none(),
            ),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_pass", &self.smtp_pass.as_ref().map(|_| "[redacted]"))
            .field("nodemailer_sender_email", &self.nodemailer_sender_email)
            .field("nodemailer_sender_name", &self.nodemailer_sender_name)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
