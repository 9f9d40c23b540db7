//! Secret Santa server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and either serves the HTTP API or runs one exchange operation from
//! the command line.
//!
//! ```text
//! santa import-people staff.csv
//! santa import-pairings last_year.csv
//! santa generate
//! santa export --output assignments.csv
//! santa serve
//! ```

mod settings;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use chrono::{Datelike as _, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use santa_api::Exchange;
use santa_core::{assignment::Year, generator::Generator};
use santa_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Secret Santa assignment server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Exchange year; overrides the config file and the current year.
  #[arg(short, long)]
  year: Option<Year>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Import a person file.
  ImportPeople { file: PathBuf },
  /// Import last year's pairing file.
  ImportPairings { file: PathBuf },
  /// Generate this year's assignments, replacing any already stored.
  Generate,
  /// Write this year's assignments as CSV.
  Export {
    /// Write here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
  /// Print a template file.
  Sample { kind: SampleKind },
}

#[derive(Clone, Copy, ValueEnum)]
enum SampleKind {
  People,
  Pairings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let command = cli.command.unwrap_or(Command::Serve);

  // Templates need no store.
  if let Command::Sample { kind } = command {
    print!("{}", match kind {
      SampleKind::People => santa_csv::SAMPLE_PEOPLE_CSV,
      SampleKind::Pairings => santa_csv::SAMPLE_PAIRINGS_CSV,
    });
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config)?;
  let year = server_cfg.resolve_year(cli.year, Utc::now().year())?;

  let store_path = server_cfg.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let exchange = Exchange::new(Arc::new(store), year)
    .with_generator(Generator::new(server_cfg.max_attempts))
    .with_export_prefix(server_cfg.export_prefix.clone());

  match command {
    Command::Serve => serve(&server_cfg, exchange).await,
    Command::ImportPeople { file } => {
      let input = read_input(&file)?;
      let people = exchange.import_people(&input).await.map_err(report)?;
      println!("{} people in file", people.len());
      Ok(())
    }
    Command::ImportPairings { file } => {
      let input = read_input(&file)?;
      let created = exchange.import_pairings(&input).await.map_err(report)?;
      match created.first() {
        Some(a) => println!("{} pairings recorded for {}", created.len(), a.year),
        None => println!("no pairings recorded"),
      }
      Ok(())
    }
    Command::Generate => {
      exchange.generate().await.map_err(report)?;
      for r in exchange.assignments(year).await? {
        println!("{} -> {}", r.giver.email, r.recipient.email);
      }
      Ok(())
    }
    Command::Export { output } => {
      let csv = exchange.export_csv().await?;
      match output {
        Some(path) => {
          std::fs::write(&path, csv)
            .with_context(|| format!("failed to write {path:?}"))?;
          tracing::info!(path = ?path, "export written");
        }
        None => print!("{csv}"),
      }
      Ok(())
    }
    Command::Sample { .. } => Ok(()),
  }
}

async fn serve(
  server_cfg: &ServerConfig,
  exchange: Exchange<SqliteStore>,
) -> anyhow::Result<()> {
  let year = exchange.year();
  let app = santa_api::router(exchange);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(year, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
  std::fs::read(path).with_context(|| format!("failed to read {path:?}"))
}

/// Print each row problem on its own line before giving up.
fn report(e: santa_api::Error) -> anyhow::Error {
  if let santa_api::Error::Validation(errors) = &e {
    for error in errors {
      eprintln!("{error}");
    }
  }
  anyhow::Error::new(e)
}
