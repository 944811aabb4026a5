use std::{net::IpAddr, sync::Arc};

use axum::Router;
use folio_core_contact_contracts::ContactFeatureService;
use folio_core_health_contracts::HealthFeatureService;
use tokio::net::TcpListener;
use tracing::info;

mod middlewares;
mod models;
mod routes;

#[derive(Debug)]
pub struct RestServer<Health, Contact> {
    health: Arc<Health>,
    contact: Arc<Contact>,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
{
    pub fn new(health: Health, contact: Contact, config: RestServerConfig) -> Self {
        Self {
            health: health.into(),
            contact: contact.into(),
            config,
        }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let RestServerConfig { host, port } = self.config.clone();
        let router = self.into_router();
        let listener = TcpListener::bind((host, port)).await?;
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, router).await.map_err(Into::into)
    }

    pub fn into_router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::health::router(self.health))
            .merge(routes::contact::router(self.contact));

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use folio_core_contact_contracts::MockContactFeatureService;
    use folio_core_health_contracts::{HealthStatus, MockHealthFeatureService};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn request_id_header() {
        // Arrange
        let sut = RestServer::new(
            MockHealthFeatureService::new().with_get_status(HealthStatus { email: true }),
            MockContactFeatureService::new(),
            RestServerConfig {
                host: [127, 0, 0, 1].into(),
                port: 0,
            },
        );

        // Act
        let response = sut
            .into_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // Assert
        assert!(response.status().is_success());
        assert!(response.headers().contains_key("X-Request-Id"));
    }
}
