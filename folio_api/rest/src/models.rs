use folio_models::validation::Violation;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApiValidationError {
    pub error: &'static str,
    pub issues: Vec<Violation>,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: &'static str,
}
