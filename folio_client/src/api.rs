use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ContactApi: Send + Sync + 'static {
    /// Submit the request once. Returns the confirmation message of the server,
    /// if it sent one.
    fn send(
        &self,
        request: ContactRequest,
    ) -> impl Future<Output = Result<Option<String>, ContactApiError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactApiError {
    #[error("The server rejected the request with status {status}.")]
    Rejected {
        status: u16,
        /// The `error` field of the response body
        message: Option<String>,
    },
    #[error("Failed to reach the server.")]
    Network(#[source] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct HttpContactApi {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpContactApi {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    message: Option<String>,
    error: Option<String>,
}

impl ContactApi for HttpContactApi {
    async fn send(&self, request: ContactRequest) -> Result<Option<String>, ContactApiError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| ContactApiError::Network(err.into()))?;

        let status = response.status();
        let body = response.json::<ResponseBody>().await.unwrap_or_default();

        if status.is_success() {
            Ok(body.message)
        } else {
            Err(ContactApiError::Rejected {
                status: status.as_u16(),
                message: body.error,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing, Json, Router};
    use folio_utils::assert_matches;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    async fn serve(router: Router) -> Url {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });
        format!("http://{addr}/api/contact").parse().unwrap()
    }

    fn request() -> ContactRequest {
        ContactRequest {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            message: "Hello, I would like to get in touch.".into(),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let endpoint = serve(Router::new().route(
            "/api/contact",
            routing::post(|Json(body): Json<Value>| async move {
                assert_eq!(body["name"], "Jane Doe");
                Json(json!({"message": "Thanks!"}))
            }),
        ))
        .await;
        let sut = HttpContactApi::new(endpoint);

        // Act
        let result = sut.send(request()).await;

        // Assert
        assert_eq!(result.unwrap().as_deref(), Some("Thanks!"));
    }

    #[tokio::test]
    async fn rejected() {
        // Arrange
        let endpoint = serve(Router::new().route(
            "/api/contact",
            routing::post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Failed to send message."})),
                )
            }),
        ))
        .await;
        let sut = HttpContactApi::new(endpoint);

        // Act
        let result = sut.send(request()).await;

        // Assert
        assert_matches!(
            result,
            Err(ContactApiError::Rejected { status: 500, message: Some(message) })
                if message == "Failed to send message."
        );
    }

    #[tokio::test]
    async fn rejected_without_body() {
        // Arrange
        let endpoint = serve(Router::new().route(
            "/api/contact",
            routing::post(|| async { StatusCode::BAD_GATEWAY }),
        ))
        .await;
        let sut = HttpContactApi::new(endpoint);

        // Act
        let result = sut.send(request()).await;

        // Assert
        assert_matches!(
            result,
            Err(ContactApiError::Rejected {
                status: 502,
                message: None
            })
        );
    }

    #[tokio::test]
    async fn unreachable() {
        // Arrange
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let sut = HttpContactApi::new(format!("http://{addr}/api/contact").parse().unwrap());

        // Act
        let result = sut.send(request()).await;

        // Assert
        assert_matches!(result, Err(ContactApiError::Network(_)));
    }
}
