use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::accounts::AccountError;
use crate::search::SearchError;
use crate::store::StoreError;
use crate::task::WorkflowError;

/// Boundary error: a status code plus a human-readable detail, rendered as
/// `{"detail": "..."}`. Validation problems map to 400, missing records to
/// 404, everything else to 500.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::UnsupportedRetailer(_) => Self::bad_request(err.to_string()),
            SearchError::UpstreamUnavailable(_) | SearchError::RateLimited => {
                Self::internal(err.to_string())
            }
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match &err {
            WorkflowError::BotNotFound | WorkflowError::TaskNotFound => {
                Self::not_found(err.to_string())
            }
            WorkflowError::InvalidTaskId(_)
            | WorkflowError::InvalidIndex(_)
            | WorkflowError::AlreadyResolved => Self::bad_request(err.to_string()),
            WorkflowError::Search(search_err) => match search_err {
                SearchError::UnsupportedRetailer(_) => Self::bad_request(err.to_string()),
                _ => Self::internal(err.to_string()),
            },
            WorkflowError::Store(_) | WorkflowError::Decode(_) => Self::internal(err.to_string()),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match &err {
            AccountError::BotNotFound => Self::not_found(err.to_string()),
            AccountError::InvalidBotId(_) => Self::bad_request(err.to_string()),
            AccountError::Store(_) | AccountError::Decode(_) => Self::internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::internal(err.to_string())
    }
}
