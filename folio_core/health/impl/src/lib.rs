use folio_core_health_contracts::{HealthFeatureService, HealthStatus};
use folio_email_contracts::EmailService;
use tracing::error;

#[derive(Debug, Clone)]
pub struct HealthFeatureServiceImpl<Email> {
    email: Email,
}

impl<Email> HealthFeatureServiceImpl<Email> {
    pub fn new(email: Email) -> Self {
        Self { email }
    }
}

impl<Email> HealthFeatureService for HealthFeatureServiceImpl<Email>
where
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let email = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping smtp server: {err}"))
            .is_ok();

        HealthStatus { email }
    }
}

#[cfg(test)]
mod tests {
    use folio_email_contracts::MockEmailService;

    use super::*;

    #[tokio::test]
    async fn healthy() {
        let sut = HealthFeatureServiceImpl::new(MockEmailService::new().with_ping(true));

        let result = sut.get_status().await;

        assert_eq!(result, HealthStatus { email: true });
    }

    #[tokio::test]
    async fn email_unreachable() {
        let sut = HealthFeatureServiceImpl::new(MockEmailService::new().with_ping(false));

        let result = sut.get_status().await;

        assert!(!result.is_healthy());
    }
}
