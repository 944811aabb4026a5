use std::sync::Arc;

use folio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use folio_email_contracts::{Email, EmailBody, EmailSendError, EmailService};
use folio_models::{contact::ContactSubmission, email_address::EmailAddressWithName};
use folio_templates_contracts::{
    ContactMessageHtmlTemplate, ContactMessageTextTemplate, TemplateService,
};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<EmailS, Template> {
    email: EmailS,
    template: Template,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Where contact messages are delivered to
    pub recipient: Arc<EmailAddressWithName>,
}

impl<EmailS, Template> ContactFeatureServiceImpl<EmailS, Template> {
    pub fn new(email: EmailS, template: Template, config: ContactFeatureConfig) -> Self {
        Self {
            email,
            template,
            config,
        }
    }
}

impl<EmailS, Template> ContactFeatureService for ContactFeatureServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<(), ContactSendMessageError> {
        let ContactSubmission {
            name,
            email,
            message,
        } = submission;

        let text = self.template.render(&ContactMessageTextTemplate {
            name: (*name).clone(),
            email: email.to_string(),
            message: (*message).clone(),
        })?;
        let html = self.template.render(&ContactMessageHtmlTemplate {
            name: (*name).clone(),
            email: email.to_string(),
            message: (*message).clone(),
        })?;

        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("New contact form submission from {}", *name),
            body: EmailBody::Alternative { text, html },
            reply_to: Some(email.into()),
        };

        match self.email.send(email).await {
            Ok(delivery) => {
                info!(
                    message_id = %delivery.message_id,
                    simulated = delivery.simulated,
                    "forwarded contact message"
                );
                Ok(())
            }
            Err(EmailSendError::NotConfigured | EmailSendError::Delivery) => {
                Err(ContactSendMessageError::Send)
            }
            Err(EmailSendError::Other(err)) => Err(err.into()),
        }
    }
}
