use std::future::Future;

use folio_models::email_address::EmailAddressWithName;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Attempt to deliver the email exactly once.
    fn send(
        &self,
        email: Email,
    ) -> impl Future<Output = Result<EmailDelivery, EmailSendError>> + Send;

    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddressWithName,
    pub subject: String,
    pub body: EmailBody,
    pub reply_to: Option<EmailAddressWithName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    Text(String),
    Html(String),
    /// A `multipart/alternative` body with a plain text and an html version.
    Alternative { text: String, html: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDelivery {
    pub message_id: String,
    /// `true` if the email was only written to the log.
    pub simulated: bool,
}

/// Errors returned by [`EmailService::send`].
///
/// Transport details are logged by the email service and never carried by
/// this type.
#[derive(Debug, Error)]
pub enum EmailSendError {
    #[error("Email transport is not configured.")]
    NotConfigured,
    #[error("Failed to deliver email.")]
    Delivery,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(
        mut self,
        email: Email,
        result: Result<EmailDelivery, EmailSendError>,
    ) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_ping(mut self, ok: bool) -> Self {
        self.expect_ping().once().return_once(move || {
            Box::pin(std::future::ready(if ok {
                Ok(())
            } else {
                Err(anyhow::anyhow!("ping failed"))
            }))
        });
        self
    }
}
