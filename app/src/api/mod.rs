use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use domain_storage::exception::{ExceptionKind, UploadException};
use tracing::{error, warn};

pub mod dtos;
pub mod file_storage;

use dtos::ResponseBase;

/// Error returned by handlers, rendered as a [`ResponseBase`] body.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub UploadException);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self.0.kind() {
            ExceptionKind::Input => warn!("Rejected request: {}", self.0),
            ExceptionKind::Persistence | ExceptionKind::Reassembly => {
                error!(error = ?self.0, "Request failed: {}", self.0)
            }
        }
        HttpResponse::build(status)
            .json(ResponseBase::<()>::err(status.as_u16() as i32, &self.0.to_string()))
    }
}
