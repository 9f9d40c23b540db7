//! Secret Santa exchange service and its JSON/CSV HTTP API.
//!
//! [`Exchange`] holds the operations (imports, generation, export, people);
//! [`router`] exposes them over axum, backed by any
//! [`santa_core::store::SantaStore`]. TLS and auth are the caller's concern.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let exchange = Exchange::new(Arc::new(store), 2025);
//! axum::serve(listener, santa_api::router(exchange)).await?;
//! ```

pub mod assignments;
pub mod error;
pub mod exchange;
pub mod imports;
pub mod people;
pub mod samples;

use axum::{
  Router,
  routing::{get, post},
};
use santa_core::store::SantaStore;
use tower_http::trace::TraceLayer;

pub use error::{Error, Result};
pub use exchange::Exchange;

/// Build the API router for `exchange`.
pub fn router<S>(exchange: Exchange<S>) -> Router<()>
where
  S: SantaStore + 'static,
{
  Router::new()
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/people/{slug}",
      get(people::get_one::<S>).delete(people::delete_one::<S>),
    )
    // Imports
    .route("/import/people", post(imports::people::<S>))
    .route("/import/pairings", post(imports::pairings::<S>))
    // Assignments
    .route(
      "/assignments",
      get(assignments::list::<S>).post(assignments::generate::<S>),
    )
    .route("/assignments/export", get(assignments::export::<S>))
    // Templates
    .route("/samples/people.csv", get(samples::people))
    .route("/samples/pairings.csv", get(samples::pairings))
    .layer(TraceLayer::new_for_http())
    .with_state(exchange)
}
