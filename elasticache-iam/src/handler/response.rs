//! Handler result shape.

use serde::Serialize;

use super::countries::Country;

/// Result of one handler invocation.
///
/// Serialises as `{"statusCode":200,"body":[...]}` on success and
/// `{"statusCode":500}` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<Country>>,
}

impl HandlerResponse {
    /// A 200 response carrying `countries`.
    pub fn ok(countries: Vec<Country>) -> Self {
        Self {
            status_code: 200,
            body: Some(countries),
        }
    }

    /// A bodiless 500 response.
    pub fn internal_error() -> Self {
        Self {
            status_code: 500,
            body: None,
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
