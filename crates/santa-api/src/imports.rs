//! Handlers for `/import/*`. Both take the raw CSV file as the request body.

use axum::{Json, body::Bytes, extract::State};
use santa_core::{assignment::Assignment, person::Person, store::SantaStore};

use crate::{error::Error, exchange::Exchange};

/// `POST /import/people`
pub async fn people<S>(
  State(exchange): State<Exchange<S>>,
  body: Bytes,
) -> Result<Json<Vec<Person>>, Error>
where
  S: SantaStore,
{
  Ok(Json(exchange.import_people(&body).await?))
}

/// `POST /import/pairings` — stored under the year before the current one.
pub async fn pairings<S>(
  State(exchange): State<Exchange<S>>,
  body: Bytes,
) -> Result<Json<Vec<Assignment>>, Error>
where
  S: SantaStore,
{
  Ok(Json(exchange.import_pairings(&body).await?))
}
