use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Fetch {
  #[arg(help = "Fetch holdings of <ADDRESS>.")]
  address: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Output {
  pub address: String,
  pub holdings: Vec<HoldingRecord>,
}

impl Fetch {
  pub(crate) fn run(self, options: Options) -> SubcommandResult {
    let explorer = EsploraClient::new(&options.explorer_url()?)?;

    let transactions =
      Runtime::new()?.block_on(explorer.address_transactions(&self.address))?;

    Ok(Some(Box::new(Output {
      holdings: classify(&transactions),
      address: self.address,
    })))
  }
}
