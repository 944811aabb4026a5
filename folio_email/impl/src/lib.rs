use std::time::Duration;

use anyhow::anyhow;
use folio_email_contracts::{Email, EmailBody, EmailDelivery, EmailSendError, EmailService};
use folio_models::email_address::EmailAddressWithName;
use folio_utils::Apply;
use lettre::{
    message::{header::ContentType, MessageBuilder, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, error, info};
use uuid::Uuid;

/// Port on which the smtp server expects an implicit tls connection.
pub const IMPLICIT_TLS_PORT: u16 = 465;
pub const DEFAULT_PORT: u16 = 587;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How outgoing emails are delivered, decided once at startup.
#[derive(Debug, Clone)]
pub enum TransportConfig {
    Configured(SmtpTransportConfig),
    /// Some required smtp setting is missing. With `simulate` set, emails are
    /// only written to the log, otherwise every delivery fails.
    Unconfigured { simulate: bool },
}

#[derive(Debug, Clone)]
pub struct SmtpTransportConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: EmailAddressWithName,
    /// Applies to connecting, the server greeting and every socket operation.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    transport: Transport,
}

#[derive(Debug, Clone)]
enum Transport {
    Smtp {
        sender: EmailAddressWithName,
        smtp: AsyncSmtpTransport<Tokio1Executor>,
    },
    Simulated,
    Disabled,
}

impl EmailServiceImpl {
    pub fn new(config: TransportConfig) -> anyhow::Result<Self> {
        let transport = match config {
            TransportConfig::Configured(config) => Transport::Smtp {
                smtp: smtp_transport(&config)?,
                sender: config.sender,
            },
            TransportConfig::Unconfigured { simulate: true } => Transport::Simulated,
            TransportConfig::Unconfigured { simulate: false } => Transport::Disabled,
        };

        Ok(Self { transport })
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.transport, Transport::Simulated)
    }
}

fn smtp_transport(
    config: &SmtpTransportConfig,
) -> anyhow::Result<AsyncSmtpTransport<Tokio1Executor>> {
    let builder = if config.port == IMPLICIT_TLS_PORT {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
    } else {
        let parameters = TlsParameters::new(config.host.clone())?;
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .tls(Tls::Opportunistic(parameters))
    };

    Ok(builder
        .port(config.port)
        .credentials(Credentials::new(
            config.username.clone(),
            config.password.clone(),
        ))
        .timeout(Some(config.timeout))
        .build())
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> Result<EmailDelivery, EmailSendError> {
        match &self.transport {
            Transport::Smtp { sender, smtp } => {
                let message_id = format!("<{}@{}>", Uuid::new_v4(), sender.email().domain());
                let recipient = email.recipient.to_string();
                let message = build_message(sender, email, message_id.clone())?;

                match smtp.send(message).await {
                    Ok(response) if response.is_positive() => {
                        debug!(%recipient, %message_id, "delivered email");
                        Ok(EmailDelivery {
                            message_id,
                            simulated: false,
                        })
                    }
                    Ok(response) => {
                        let reply = response.message().collect::<Vec<_>>().join(" ");
                        error!(%recipient, code = %response.code(), "smtp server rejected email: {reply}");
                        Err(EmailSendError::Delivery)
                    }
                    Err(err) => {
                        error!(%recipient, "Failed to deliver email: {err:?}");
                        Err(EmailSendError::Delivery)
                    }
                }
            }
            Transport::Simulated => {
                let message_id = format!("<{}@localhost>", Uuid::new_v4());
                let body = match &email.body {
                    EmailBody::Text(text) | EmailBody::Alternative { text, .. } => text,
                    EmailBody::Html(html) => html,
                };
                info!(
                    recipient = %email.recipient,
                    reply_to = ?email.reply_to.as_ref().map(ToString::to_string),
                    subject = %email.subject,
                    %message_id,
                    "smtp transport is not configured, simulating delivery:\n{body}"
                );
                Ok(EmailDelivery {
                    message_id,
                    simulated: true,
                })
            }
            Transport::Disabled => {
                error!(
                    recipient = %email.recipient,
                    "Cannot deliver email: smtp transport is not configured"
                );
                Err(EmailSendError::NotConfigured)
            }
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        match &self.transport {
            Transport::Smtp { smtp, .. } => smtp
                .test_connection()
                .await?
                .then_some(())
                .ok_or_else(|| anyhow!("Failed to ping smtp server")),
            Transport::Simulated => Ok(()),
            Transport::Disabled => Err(anyhow!("smtp transport is not configured")),
        }
    }
}

fn build_message(
    sender: &EmailAddressWithName,
    email: Email,
    message_id: String,
) -> anyhow::Result<Message> {
    let builder = Message::builder()
        .message_id(Some(message_id))
        .from(sender.0.clone())
        .to(email.recipient.0)
        .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
        .subject(email.subject);

    let message = match email.body {
        EmailBody::Text(text) => builder.header(ContentType::TEXT_PLAIN).body(text),
        EmailBody::Html(html) => builder.header(ContentType::TEXT_HTML).body(html),
        EmailBody::Alternative { text, html } => {
            builder.multipart(MultiPart::alternative_plain_html(text, html))
        }
    }?;

    Ok(message)
}

#[cfg(test)]
mod tests {
    use folio_utils::assert_matches;

    use super::*;

    fn email() -> Email {
        Email {
            recipient: "Portfolio Owner <owner@example.com>".parse().unwrap(),
            subject: "New contact form submission from Jane Doe".into(),
            body: EmailBody::Alternative {
                text: "Hello!".into(),
                html: "<p>Hello!</p>".into(),
            },
            reply_to: Some("jane@example.com".parse().unwrap()),
        }
    }

    fn smtp_config(host: &str, port: u16) -> SmtpTransportConfig {
        SmtpTransportConfig {
            host: host.into(),
            port,
            username: "user".into(),
            password: "secret-password".into(),
            sender: "Portfolio <noreply@example.com>".parse().unwrap(),
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn simulated() {
        // Arrange
        let sut = EmailServiceImpl::new(TransportConfig::Unconfigured { simulate: true }).unwrap();

        // Act
        let result = sut.send(email()).await;

        // Assert
        let delivery = result.unwrap();
        assert!(delivery.simulated);
        assert!(delivery.message_id.starts_with('<'));
        sut.ping().await.unwrap();
    }

    #[tokio::test]
    async fn disabled() {
        // Arrange
        let sut = EmailServiceImpl::new(TransportConfig::Unconfigured { simulate: false }).unwrap();

        // Act
        let result = sut.send(email()).await;

        // Assert
        assert_matches!(result, Err(EmailSendError::NotConfigured));
        assert!(sut.ping().await.is_err());
    }

    #[tokio::test]
    async fn unreachable_server() {
        // Arrange
        let sut =
            EmailServiceImpl::new(TransportConfig::Configured(smtp_config("localhost", 1)))
                .unwrap();

        // Act
        let result = sut.send(email()).await;

        // Assert
        assert_matches!(result, Err(EmailSendError::Delivery));
    }

    #[tokio::test]
    async fn implicit_tls() {
        EmailServiceImpl::new(TransportConfig::Configured(smtp_config(
            "smtp.example.com",
            IMPLICIT_TLS_PORT,
        )))
        .unwrap();
    }

    #[test]
    fn alternative_message() {
        // Arrange
        let sender = "Portfolio <noreply@example.com>".parse().unwrap();

        // Act
        let message = build_message(&sender, email(), "<id@example.com>".into()).unwrap();

        // Assert
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Message-ID: <id@example.com>"));
        assert!(formatted
            .lines()
            .any(|line| line.starts_with("Reply-To:") && line.contains("jane@example.com")));
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("text/plain"));
        assert!(formatted.contains("text/html"));
    }

    #[test]
    fn line_break_in_subject() {
        // Arrange
        let sender = "Portfolio <noreply@example.com>".parse().unwrap();
        let email = Email {
            subject: "New contact form submission from Jane\r\nBcc: evil@attacker.com".into(),
            ..email()
        };

        // Act
        let message = build_message(&sender, email, "<id@example.com>".into()).unwrap();

        // Assert
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(!formatted.lines().any(|line| line.starts_with("Bcc:")));
    }
}
