use {super::*, std::mem};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StakeError {
  #[error("holding {0} not found")]
  NotFound(u32),

  #[error("holding {txid}:{id} not found")]
  OutputNotFound { txid: String, id: u32 },
}

/// Two disjoint lists of holdings. A record only ever moves from `available`
/// to `staked`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
  available: Vec<HoldingRecord>,
  staked: Vec<HoldingRecord>,
}

impl Ledger {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn available(&self) -> &[HoldingRecord] {
    &self.available
  }

  pub fn staked(&self) -> &[HoldingRecord] {
    &self.staked
  }

  pub fn len(&self) -> usize {
    self.available.len() + self.staked.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Replace the available list with one classification result. Staked
  /// records are kept, including those from a previously fetched address.
  pub fn reset(&mut self, available: Vec<HoldingRecord>) {
    log::debug!(
      "ledger: reset with {} available, {} staked retained",
      available.len(),
      self.staked.len()
    );
    self.available = available;
  }

  /// Move every available record with `id` to the end of the staked list,
  /// keeping their relative order. Returns the moved records.
  pub fn stake(&mut self, id: u32) -> Result<&[HoldingRecord], StakeError> {
    if !self.available.iter().any(|holding| holding.id() == id) {
      return Err(StakeError::NotFound(id));
    }

    let start = self.staked.len();

    let (moved, kept) = mem::take(&mut self.available)
      .into_iter()
      .partition(|holding| holding.id() == id);

    self.available = kept;

    for holding in moved {
      log::info!("ledger: staked holding {holding}");
      self.staked.push(holding);
    }

    Ok(&self.staked[start..])
  }

  /// Like [`Ledger::stake`], keyed by both transaction id and output index so
  /// that colliding ids can be told apart.
  pub fn stake_output(&mut self, txid: &str, id: u32) -> Result<&HoldingRecord, StakeError> {
    let position = self
      .available
      .iter()
      .position(|holding| holding.matches(txid, id))
      .ok_or_else(|| StakeError::OutputNotFound {
        txid: txid.into(),
        id,
      })?;

    Ok(self.move_to_staked(position))
  }

  fn move_to_staked(&mut self, position: usize) -> &HoldingRecord {
    let holding = self.available.remove(position);
    log::info!("ledger: staked holding {holding}");
    self.staked.push(holding);
    &self.staked[self.staked.len() - 1]
  }
}
