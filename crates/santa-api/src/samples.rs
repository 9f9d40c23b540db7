//! Downloadable template files.

use axum::{http::header, response::IntoResponse};
use santa_csv::{CONTENT_TYPE, SAMPLE_PAIRINGS_CSV, SAMPLE_PEOPLE_CSV};

/// `GET /samples/people.csv`
pub async fn people() -> impl IntoResponse {
  (
    [
      (header::CONTENT_TYPE, CONTENT_TYPE),
      (header::CONTENT_DISPOSITION, "attachment; filename=\"sample_employees.csv\""),
    ],
    SAMPLE_PEOPLE_CSV,
  )
}

/// `GET /samples/pairings.csv`
pub async fn pairings() -> impl IntoResponse {
  (
    [
      (header::CONTENT_TYPE, CONTENT_TYPE),
      (
        header::CONTENT_DISPOSITION,
        "attachment; filename=\"sample_previous_assignments.csv\"",
      ),
    ],
    SAMPLE_PAIRINGS_CSV,
  )
}
