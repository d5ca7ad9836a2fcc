use {
  super::*,
  std::fmt::Write as _,
  tokio::io::{AsyncBufReadExt, BufReader},
};

const HELP: &str = "\
commands:
  fetch <ADDRESS>    fetch holdings of <ADDRESS>
  stake <ID>         stake every available holding with output index <ID>
  stake <TXID>:<ID>  stake output <ID> of transaction <TXID>
  list               show available and staked holdings
  help               show this message
  quit               leave the dashboard";

#[derive(Debug, Parser)]
pub(crate) struct DashboardCommand {}

#[derive(Debug, PartialEq)]
enum Command {
  Fetch(String),
  Stake { txid: Option<String>, id: u32 },
  List,
  Help,
  Quit,
}

impl FromStr for Command {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut words = s.split_whitespace();

    let Some(name) = words.next() else {
      bail!("empty command");
    };

    let argument = words.next();

    let command = match (name, argument) {
      ("fetch", Some(address)) => Self::Fetch(address.into()),
      ("fetch", None) => bail!("usage: fetch <ADDRESS>"),
      ("stake", Some(target)) => match target.rsplit_once(':') {
        Some((txid, id)) => Self::Stake {
          txid: Some(txid.into()),
          id: id.parse().with_context(|| format!("invalid output index `{id}`"))?,
        },
        None => Self::Stake {
          txid: None,
          id: target
            .parse()
            .with_context(|| format!("invalid output index `{target}`"))?,
        },
      },
      ("stake", None) => bail!("usage: stake <ID> | stake <TXID>:<ID>"),
      ("list", None) => Self::List,
      ("help", None) => Self::Help,
      ("quit" | "exit", None) => Self::Quit,
      ("list" | "help" | "quit" | "exit", Some(_)) => bail!("too many arguments, try `help`"),
      (other, _) => bail!("unknown command `{other}`, try `help`"),
    };

    if words.next().is_some() {
      bail!("too many arguments, try `help`");
    }

    Ok(command)
  }
}

impl DashboardCommand {
  pub(crate) fn run(self, options: Options) -> SubcommandResult {
    let dashboard = open_dashboard(&options)?;

    Runtime::new()?.block_on(async {
      let mut lines = BufReader::new(tokio::io::stdin()).lines();

      while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
          continue;
        }

        let command = match line.parse::<Command>() {
          Ok(command) => command,
          Err(err) => {
            println!("error: {err:#}");
            continue;
          }
        };

        if command == Command::Quit {
          break;
        }

        print!("{}", execute(&dashboard, command).await);
      }

      Ok::<(), Error>(())
    })?;

    Ok(None)
  }
}

async fn execute<E: Explorer>(dashboard: &Dashboard<E>, command: Command) -> String {
  match command {
    Command::Fetch(address) => match dashboard.refresh(&address).await {
      Ok(count) => format!(
        "Found {count} inscription{} for {address}\n{}",
        if count == 1 { "" } else { "s" },
        render(&dashboard.snapshot())
      ),
      Err(err) => format!("error: {err}\n"),
    },
    Command::Stake { txid, id } => {
      let staked = match &txid {
        Some(txid) => dashboard.stake_output(txid, id).map(|holding| vec![holding]),
        None => dashboard.stake(id),
      };
      match staked {
        Ok(holdings) => holdings
          .iter()
          .map(|holding| format!("Staked inscription {holding}\n"))
          .collect(),
        Err(err) => format!("error: {err}\n"),
      }
    }
    Command::List => render(&dashboard.snapshot()),
    Command::Help => format!("{HELP}\n"),
    Command::Quit => String::new(),
  }
}

fn render(snapshot: &DashboardSnapshot) -> String {
  let mut out = String::new();

  if let Some(error) = &snapshot.error {
    writeln!(out, "error: {error}").ok();
  }

  writeln!(out, "Available inscriptions").ok();
  if snapshot.available.is_empty() && !snapshot.loading {
    writeln!(out, "  No inscriptions found. Please search.").ok();
  }
  for holding in &snapshot.available {
    render_holding(&mut out, holding);
  }

  writeln!(out, "Staked inscriptions").ok();
  if snapshot.staked.is_empty() {
    writeln!(out, "  No inscriptions staked yet.").ok();
  }
  for holding in &snapshot.staked {
    render_holding(&mut out, holding);
  }

  out
}

fn render_holding(out: &mut String, holding: &HoldingRecord) {
  writeln!(out, "  - Inscription ID: {}", holding.id()).ok();
  writeln!(out, "    Content: {}", holding.content_preview()).ok();
  match holding.datetime() {
    Some(datetime) => writeln!(out, "    Timestamp: {datetime}").ok(),
    None => writeln!(out, "    Timestamp: unconfirmed").ok(),
  };
  writeln!(
    out,
    "    Transaction ID: {}",
    holding.transaction_id().unwrap_or("unknown")
  )
  .ok();
}
