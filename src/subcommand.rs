use super::*;

pub mod dashboard;
pub mod fetch;
pub mod server;

#[derive(Debug, Parser)]
pub(crate) enum Subcommand {
  #[command(about = "Fetch and classify the holdings of an address")]
  Fetch(fetch::Fetch),
  #[command(about = "Run an interactive staking dashboard")]
  Dashboard(dashboard::DashboardCommand),
  #[command(about = "Serve the staking dashboard over HTTP")]
  Server(server::Server),
}

impl Subcommand {
  pub(crate) fn run(self, options: Options) -> SubcommandResult {
    match self {
      Self::Fetch(fetch) => fetch.run(options),
      Self::Dashboard(dashboard) => dashboard.run(options),
      Self::Server(server) => {
        let handle = axum_server::Handle::new();
        LISTENERS
          .lock()
          .unwrap_or_else(|poisoned| poisoned.into_inner())
          .push(handle.clone());
        server.run(options, handle)
      }
    }
  }
}

pub(crate) type SubcommandResult = Result<Option<Box<dyn Output>>>;

pub(crate) trait Output: Send {
  fn print_json(&self);
}

impl<T> Output for T
where
  T: Serialize + Send,
{
  fn print_json(&self) {
    if let Err(err) = serde_json::to_writer_pretty(io::stdout(), self) {
      log::error!("failed to write output: {err}");
      return;
    }
    println!();
  }
}

pub(crate) fn open_dashboard(options: &Options) -> Result<Dashboard<EsploraClient>> {
  let url = options.explorer_url()?;
  log::info!("using explorer at {url}");
  Ok(Dashboard::new(EsploraClient::new(&url)?))
}
