use {super::*, log::LevelFilter};

pub(crate) const DEFAULT_EXPLORER_URL: &str = "https://blockstream.info/api";

#[derive(Clone, Debug, Parser)]
pub(crate) struct Options {
  #[arg(
    long,
    help = "Query the Esplora API at <EXPLORER_URL>. [default: https://blockstream.info/api]"
  )]
  pub(crate) explorer_url: Option<String>,
  #[arg(long, help = "Load configuration from <CONFIG>.")]
  pub(crate) config: Option<PathBuf>,
  #[arg(long, default_value = "info", help = "Log at <LOG_LEVEL> and above.")]
  pub(crate) log_level: LevelFilter,
  #[arg(long, help = "Write logs to <LOG_DIR>. [default: <DATA_DIR>/ord-stake/logs]")]
  pub(crate) log_dir: Option<PathBuf>,
}

impl Options {
  pub(crate) fn load_config(&self) -> Result<Config> {
    match &self.config {
      Some(path) => Config::load(path),
      None => Ok(Default::default()),
    }
  }

  pub(crate) fn explorer_url(&self) -> Result<String> {
    if let Some(url) = &self.explorer_url {
      return Ok(url.clone());
    }

    Ok(
      self
        .load_config()?
        .explorer_url
        .unwrap_or_else(|| DEFAULT_EXPLORER_URL.into()),
    )
  }

  pub(crate) fn log_dir(&self) -> Result<PathBuf> {
    if let Some(log_dir) = &self.log_dir {
      return Ok(log_dir.clone());
    }

    Ok(
      dirs::data_dir()
        .ok_or_else(|| anyhow!("failed to retrieve data dir"))?
        .join("ord-stake")
        .join("logs"),
    )
  }
}
