use serde::Serialize;
use ts_rs::TS;

/// Error body returned by every JSON endpoint.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/error-response.ts")]
pub struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    pub(super) fn new(error: String) -> Self {
        Self { error }
    }
}
