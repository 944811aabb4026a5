use anyhow::Context;
use folio_config::Config;
use folio_email_impl::{EmailServiceImpl, SmtpTransportConfig, TransportConfig, DEFAULT_PORT};
use folio_models::email_address::EmailAddress;
use tracing::{info, warn};

/// Decide how emails are delivered, based on the smtp environment variables.
pub fn transport_config(config: &Config) -> anyhow::Result<TransportConfig> {
    let smtp = &config.smtp;

    let (Some(host), Some(username), Some(password), Some(sender_email)) = (
        &smtp.smtp_host,
        &smtp.smtp_user,
        &smtp.smtp_pass,
        &smtp.nodemailer_sender_email,
    ) else {
        let simulate = config.simulate_email();
        warn!(missing = ?smtp.missing(), simulate, "smtp transport is not configured");
        return Ok(TransportConfig::Unconfigured { simulate });
    };

    let port = smtp
        .smtp_port
        .as_deref()
        .map(|port| {
            port.parse::<u16>()
                .with_context(|| format!("Invalid SMTP_PORT {port:?}"))
        })
        .transpose()?
        .unwrap_or(DEFAULT_PORT);

    let sender = sender_email
        .parse::<EmailAddress>()
        .with_context(|| format!("Invalid NODEMAILER_SENDER_EMAIL {sender_email:?}"))?
        .with_name(smtp.nodemailer_sender_name.clone());

    Ok(TransportConfig::Configured(SmtpTransportConfig {
        host: host.clone(),
        port,
        username: username.clone(),
        password: password.clone(),
        sender,
        timeout: config.email.timeout.into(),
    }))
}

/// Create the email service. No connection is opened before the first email is
/// sent.
pub fn connect(config: &Config) -> anyhow::Result<EmailServiceImpl> {
    let transport = transport_config(config)?;
    if let TransportConfig::Configured(smtp) = &transport {
        info!(host = %smtp.host, port = smtp.port, sender = %smtp.sender, "using smtp transport");
    }
    EmailServiceImpl::new(transport).context("Failed to create smtp transport")
}
