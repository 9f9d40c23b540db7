//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use santa_csv::ValidationError;
use serde_json::json;
use thiserror::Error;

/// An error returned by the exchange or one of its handlers.
#[derive(Debug, Error)]
pub enum Error {
  /// The uploaded file has row-level problems; nothing was imported.
  #[error(
    "CSV validation errors: {}",
    .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
  )]
  Validation(Vec<ValidationError>),

  /// The generator ran out of attempts. Recoverable: the caller may retry or
  /// change the group.
  #[error("error creating assignments: {0}")]
  Generation(#[from] santa_core::Error),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// A write clashed with stored data: a taken email, or a giver already
  /// paired for the year.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("csv error: {0}")]
  Csv(#[source] santa_csv::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

impl From<santa_csv::Error> for Error {
  fn from(e: santa_csv::Error) -> Self {
    match e {
      santa_csv::Error::Invalid(errors) => Error::Validation(errors),
      other => Error::Csv(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    if let Error::Validation(errors) = &self {
      let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
      return (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": "CSV validation errors", "details": details })),
      )
        .into_response();
    }

    let status = match &self {
      Error::Generation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::Conflict(_) => StatusCode::CONFLICT,
      Error::Validation(_) | Error::Csv(_) | Error::Store(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
