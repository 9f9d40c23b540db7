//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | creation order |
//! | `POST`   | `/people` | Body: `{"name":"…","email":"…"}` |
//! | `GET`    | `/people/{slug}` | person plus this year's recipient and giver |
//! | `DELETE` | `/people/{slug}` | also removes their assignments |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use santa_core::{
  assignment::Year,
  person::{NewPerson, Person},
  store::SantaStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::Error, exchange::Exchange};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /people`
pub async fn list<S>(
  State(exchange): State<Exchange<S>>,
) -> Result<Json<Vec<Person>>, Error>
where
  S: SantaStore,
{
  Ok(Json(exchange.people().await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:  String,
  pub email: String,
}

/// `POST /people`
pub async fn create<S>(
  State(exchange): State<Exchange<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, Error>
where
  S: SantaStore,
{
  let person = exchange
    .add_person(NewPerson::new(body.name.trim(), body.email.trim()))
    .await?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PersonDetail {
  pub person:    Person,
  pub year:      Year,
  /// Who this person gives to.
  pub recipient: Option<Person>,
  /// Who gives to this person.
  pub giver:     Option<Person>,
}

/// `GET /people/{slug}`
pub async fn get_one<S>(
  State(exchange): State<Exchange<S>>,
  Path(slug): Path<String>,
) -> Result<Json<PersonDetail>, Error>
where
  S: SantaStore,
{
  let person = exchange.person_by_slug(&slug).await?;
  let recipient = exchange.recipient_of(&person).await?;
  let giver = exchange.giver_of(&person).await?;
  Ok(Json(PersonDetail { person, year: exchange.year(), recipient, giver }))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /people/{slug}`
pub async fn delete_one<S>(
  State(exchange): State<Exchange<S>>,
  Path(slug): Path<String>,
) -> Result<StatusCode, Error>
where
  S: SantaStore,
{
  exchange.delete_person(&slug).await?;
  Ok(StatusCode::NO_CONTENT)
}
