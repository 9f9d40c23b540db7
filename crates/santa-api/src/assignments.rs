//! Handlers for `/assignments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/assignments` | Optional `?year=`; defaults to the current year |
//! | `POST` | `/assignments` | Regenerate the current year; 422 if impossible |
//! | `GET`  | `/assignments/export` | Current year as a CSV download |

use axum::{
  Json,
  extract::{Query, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use santa_core::{
  assignment::{ResolvedAssignment, Year},
  store::SantaStore,
};
use serde::Deserialize;

use crate::{error::Error, exchange::Exchange};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub year: Option<Year>,
}

/// `GET /assignments[?year=<year>]`
pub async fn list<S>(
  State(exchange): State<Exchange<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ResolvedAssignment>>, Error>
where
  S: SantaStore,
{
  let year = params.year.unwrap_or(exchange.year());
  Ok(Json(exchange.assignments(year).await?))
}

/// `POST /assignments`
pub async fn generate<S>(
  State(exchange): State<Exchange<S>>,
) -> Result<impl IntoResponse, Error>
where
  S: SantaStore,
{
  exchange.generate().await?;
  let resolved = exchange.assignments(exchange.year()).await?;
  Ok((StatusCode::CREATED, Json(resolved)))
}

/// `GET /assignments/export`
pub async fn export<S>(
  State(exchange): State<Exchange<S>>,
) -> Result<impl IntoResponse, Error>
where
  S: SantaStore,
{
  let body = exchange.export_csv().await?;
  let disposition = format!("attachment; filename=\"{}\"", exchange.export_filename());
  Ok((
    [
      (header::CONTENT_TYPE, santa_csv::CONTENT_TYPE.to_owned()),
      (header::CONTENT_DISPOSITION, disposition),
    ],
    body,
  ))
}
