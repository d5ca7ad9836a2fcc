#![allow(clippy::result_large_err)]
#![deny(
  clippy::cast_lossless,
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

use {
  self::{
    arguments::Arguments,
    config::Config,
    options::Options,
    subcommand::{Subcommand, SubcommandResult},
  },
  anyhow::{anyhow, bail, Context, Error},
  chrono::{DateTime, TimeZone, Utc},
  clap::Parser,
  serde::{Deserialize, Serialize},
  std::{
    env,
    fmt::{self, Display, Formatter},
    fs, io,
    net::ToSocketAddrs,
    path::{Path, PathBuf},
    process,
    str::FromStr,
    sync::{
      atomic::{self, AtomicBool},
      Arc, Mutex,
    },
    time::Duration,
  },
  tokio::{runtime::Runtime, task},
};

pub use crate::{
  classifier::{classify, NULL_DATA_SCRIPT_TYPE},
  dashboard::{Dashboard, DashboardError, DashboardSnapshot},
  explorer::{EsploraClient, Explorer, FetchError, RawOutput, RawStatus, RawTransaction},
  holding::HoldingRecord,
  ledger::{Ledger, StakeError},
};

mod arguments;
pub mod classifier;
mod config;
pub mod dashboard;
pub mod explorer;
pub mod holding;
pub mod ledger;
mod logger;
mod options;
pub mod subcommand;

type Result<T = (), E = Error> = std::result::Result<T, E>;

static SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);
static LISTENERS: Mutex<Vec<axum_server::Handle>> = Mutex::new(Vec::new());

fn integration_test() -> bool {
  env::var_os("ORD_STAKE_INTEGRATION_TEST")
    .map(|value| !value.is_empty())
    .unwrap_or(false)
}

fn timestamp(seconds: u64) -> Option<DateTime<Utc>> {
  Utc
    .timestamp_opt(i64::try_from(seconds).ok()?, 0)
    .single()
}

pub fn main() {
  let args = Arguments::parse();

  let log_dir = match args.options.log_dir() {
    Ok(dir) => dir,
    Err(err) => {
      eprintln!("error: {err}");
      process::exit(1);
    }
  };

  if let Err(err) = logger::init(args.options.log_level, &log_dir) {
    eprintln!("error: failed to initialize logger: {err}");
    process::exit(1);
  }

  if let Err(err) = ctrlc::set_handler(move || {
    if SHUTTING_DOWN.fetch_or(true, atomic::Ordering::Relaxed) {
      process::exit(1);
    }

    println!("Shutting down gracefully. Press <CTRL-C> again to shutdown immediately.");

    LISTENERS
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .iter()
      .for_each(|handle| handle.graceful_shutdown(Some(Duration::from_millis(100))));
  }) {
    log::warn!("failed to set <CTRL-C> handler: {err}");
  }

  match args.run() {
    Err(err) => {
      log::error!("{err:#}");
      eprintln!("error: {err}");
      err
        .chain()
        .skip(1)
        .for_each(|cause| eprintln!("because: {cause}"));
      if env::var_os("RUST_BACKTRACE")
        .map(|val| val == "1")
        .unwrap_or_default()
      {
        eprintln!("{}", err.backtrace());
      }

      process::exit(1);
    }
    Ok(output) => {
      if let Some(output) = output {
        output.print_json();
      }
    }
  }
}
