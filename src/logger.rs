use {
  super::*,
  log::LevelFilter,
  log4rs::{
    append::rolling_file::{
      policy::compound::{
        roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy,
      },
      RollingFileAppender,
    },
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
  },
};

const LOG_FILE: &str = "ord-stake.log";
const LOG_FILE_LIMIT: u64 = 64 * 1024 * 1024;
const LOG_FILE_WINDOW: u32 = 10;
const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l})} [{M}] {m}{n}";

pub(crate) fn init(level: LevelFilter, log_dir: &Path) -> Result {
  fs::create_dir_all(log_dir)
    .with_context(|| format!("failed to create log dir `{}`", log_dir.display()))?;

  let roller = FixedWindowRoller::builder()
    .base(1)
    .build(
      &log_dir.join("ord-stake.{}.log.gz").to_string_lossy(),
      LOG_FILE_WINDOW,
    )
    .map_err(|err| anyhow!("failed to build log roller: {err}"))?;

  let policy = CompoundPolicy::new(
    Box::new(SizeTrigger::new(LOG_FILE_LIMIT)),
    Box::new(roller),
  );

  let file = RollingFileAppender::builder()
    .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
    .build(log_dir.join(LOG_FILE), Box::new(policy))?;

  let config = log4rs::Config::builder()
    .appender(Appender::builder().build("file", Box::new(file)))
    // hyper and reqwest are chatty at debug
    .logger(Logger::builder().build("hyper", LevelFilter::Info))
    .logger(Logger::builder().build("reqwest", LevelFilter::Info))
    .build(Root::builder().appender("file").build(level))?;

  log4rs::init_config(config)?;

  Ok(())
}
