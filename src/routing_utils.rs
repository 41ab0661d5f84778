use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::{FromRequest, FromRequestParts};

use serde::Serialize;
use utoipa::ToSchema;

use validator::ValidationErrors;

use crate::domain;

/// Body of every failed API call. The message is the only detail a caller gets.
#[derive(Serialize, Debug, ToSchema)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct BasicErrorResponse {
    #[schema(example = "Submitted data was invalid: text: Validation error: length")]
    pub message: String,
}

impl BasicErrorResponse {
    fn respond(status: StatusCode, message: impl Into<String>) -> Response {
        (
            status,
            axum::Json(BasicErrorResponse {
                message: message.into(),
            }),
        )
            .into_response()
    }
}

/// Response type that wraps validation errors and turns them into [BasicErrorResponse]s
pub struct ValidationErrorResponse {
    errors: ValidationErrors,
    item_index: Option<usize>,
}

impl ValidationErrorResponse {
    /// Validation failure for one entry of a batch request
    pub fn for_batch_item(item_index: usize, errors: ValidationErrors) -> Self {
        ValidationErrorResponse {
            errors,
            item_index: Some(item_index),
        }
    }
}

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        let message = match self.item_index {
            Some(idx) => format!("Todo at index {idx} was invalid: {}", self.errors),
            None => format!("Submitted data was invalid: {}", self.errors),
        };

        BasicErrorResponse::respond(StatusCode::BAD_REQUEST, message)
    }
}

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        ValidationErrorResponse {
            errors: value,
            item_index: None,
        }
    }
}

/// Response type for any other request the caller needs to fix before retrying
pub struct ClientErrorResponse(pub String);

impl IntoResponse for ClientErrorResponse {
    fn into_response(self) -> Response {
        BasicErrorResponse::respond(StatusCode::BAD_REQUEST, self.0)
    }
}

/// Response type that turns domain errors into [BasicErrorResponse]s. Communication failures
/// get a generic message so store internals stay out of responses.
pub struct DomainErrorResponse(pub domain::Error);

impl IntoResponse for DomainErrorResponse {
    fn into_response(self) -> Response {
        match self.0 {
            domain::Error::DoesNotExist(_) => {
                BasicErrorResponse::respond(StatusCode::NOT_FOUND, self.0.to_string())
            }
            domain::Error::MalformedId(_) => {
                BasicErrorResponse::respond(StatusCode::BAD_REQUEST, self.0.to_string())
            }
            domain::Error::PortFailure { .. } => BasicErrorResponse::respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not access data to complete your request",
            ),
        }
    }
}

impl From<domain::Error> for DomainErrorResponse {
    fn from(value: domain::Error) -> Self {
        Self(value)
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        BasicErrorResponse::respond(
            StatusCode::BAD_REQUEST,
            format!(
                "The passed request body contained malformed or unreadable JSON. {}",
                self.parse_problem
            ),
        )
    }
}

/// Wrapper for [axum::extract::Query] which reports unreadable query strings with our
/// data structure for API errors
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(QueryErrorResponse))]
pub struct Query<T>(pub T);

/// Response type representing query string parse errors
pub struct QueryErrorResponse {
    parse_problem: String,
}

impl From<QueryRejection> for QueryErrorResponse {
    fn from(value: QueryRejection) -> Self {
        QueryErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for QueryErrorResponse {
    fn into_response(self) -> Response {
        BasicErrorResponse::respond(
            StatusCode::BAD_REQUEST,
            format!("The query string could not be read. {}", self.parse_problem),
        )
    }
}
