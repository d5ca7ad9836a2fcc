use {
  super::*,
  std::sync::{atomic::Ordering, MutexGuard},
};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
  #[error("a fetch is already in progress")]
  Busy,

  #[error(transparent)]
  Fetch(#[from] FetchError),
}

#[derive(Debug, Default)]
struct DashboardState {
  address: String,
  ledger: Ledger,
  error: Option<String>,
}

/// Point in time copy of the dashboard, as shown to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
  pub address: String,
  pub available: Vec<HoldingRecord>,
  pub staked: Vec<HoldingRecord>,
  pub loading: bool,
  pub error: Option<String>,
}

/// Owns the ledger for the address being viewed and serializes fetches
/// against the explorer.
///
/// Only one refresh may be outstanding at a time; a second call is rejected
/// with [`DashboardError::Busy`] rather than queued.
pub struct Dashboard<E> {
  explorer: E,
  state: Mutex<DashboardState>,
  busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
  fn acquire(busy: &'a AtomicBool) -> Option<Self> {
    busy
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .ok()
      .map(|_| Self(busy))
  }
}

impl Drop for BusyGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

impl<E: Explorer> Dashboard<E> {
  pub fn new(explorer: E) -> Self {
    Self {
      explorer,
      state: Mutex::new(DashboardState::default()),
      busy: AtomicBool::new(false),
    }
  }

  pub fn explorer(&self) -> &E {
    &self.explorer
  }

  fn state(&self) -> MutexGuard<DashboardState> {
    self
      .state
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  pub fn is_loading(&self) -> bool {
    self.busy.load(Ordering::Acquire)
  }

  /// Fetch and classify `address`, replacing the available list.
  ///
  /// On failure the lists are left as they were and the error message is
  /// recorded in the dashboard state. Returns the number of available
  /// holdings on success.
  pub async fn refresh(&self, address: &str) -> Result<usize, DashboardError> {
    let _busy = BusyGuard::acquire(&self.busy).ok_or(DashboardError::Busy)?;

    {
      let mut state = self.state();
      state.address = address.into();
      state.error = None;
    }

    log::info!("dashboard: fetching holdings for {address}");

    match self.explorer.address_transactions(address).await {
      Ok(transactions) => {
        let holdings = classify(&transactions);
        let count = holdings.len();
        log::info!(
          "dashboard: {count} holdings in {} transactions for {address}",
          transactions.len()
        );
        self.state().ledger.reset(holdings);
        Ok(count)
      }
      Err(err) => {
        log::warn!("dashboard: fetch for {address} failed: {}", err.reason());
        self.state().error = Some(err.to_string());
        Err(err.into())
      }
    }
  }

  pub fn stake(&self, id: u32) -> Result<Vec<HoldingRecord>, StakeError> {
    self.state().ledger.stake(id).map(<[HoldingRecord]>::to_vec)
  }

  pub fn stake_output(&self, txid: &str, id: u32) -> Result<HoldingRecord, StakeError> {
    self.state().ledger.stake_output(txid, id).cloned()
  }

  pub fn snapshot(&self) -> DashboardSnapshot {
    let state = self.state();
    DashboardSnapshot {
      address: state.address.clone(),
      available: state.ledger.available().to_vec(),
      staked: state.ledger.staked().to_vec(),
      loading: self.is_loading(),
      error: state.error.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    async_trait::async_trait,
    serde_json::{json, Value},
    std::collections::HashMap,
    tokio::sync::Notify,
  };

  #[derive(Default)]
  struct MockExplorer {
    addresses: HashMap<String, Value>,
    gate: Option<Arc<Notify>>,
  }

  impl MockExplorer {
    fn with(mut self, address: &str, transactions: Value) -> Self {
      self.addresses.insert(address.into(), transactions);
      self
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
      self.gate = Some(gate);
      self
    }
  }

  #[async_trait]
  impl Explorer for MockExplorer {
    async fn address_transactions(
      &self,
      address: &str,
    ) -> Result<Vec<RawTransaction>, FetchError> {
      if let Some(gate) = &self.gate {
        gate.notified().await;
      }

      match self.addresses.get(address) {
        Some(transactions) => Ok(serde_json::from_value(transactions.clone())?),
        None => Err(FetchError::new("explorer responded with 500 Internal Server Error")),
      }
    }
  }

  fn op_return_tx(txid: &str, scriptpubkey: &str, block_time: u64) -> Value {
    json!({
      "txid": txid,
      "vout": [{ "scriptpubkey_type": "op_return", "scriptpubkey": scriptpubkey }],
      "status": { "confirmed": true, "block_time": block_time },
    })
  }

  #[tokio::test]
  async fn refresh_classifies_transactions() {
    let dashboard = Dashboard::new(MockExplorer::default().with(
      "bc1qalice",
      json!([
        op_return_tx("t1", "abc", 1000),
        { "txid": "t2", "vout": [{ "scriptpubkey_type": "p2tr", "scriptpubkey": "51" }] },
      ]),
    ));

    assert_eq!(dashboard.refresh("bc1qalice").await.unwrap(), 1);

    pretty_assertions::assert_eq!(
      dashboard.snapshot(),
      DashboardSnapshot {
        address: "bc1qalice".into(),
        available: vec![HoldingRecord::new(
          0,
          Some("abc".into()),
          Some(1000),
          Some("t1".into())
        )],
        staked: Vec::new(),
        loading: false,
        error: None,
      }
    );
  }

  #[tokio::test]
  async fn failed_refresh_keeps_lists_and_records_error() {
    let dashboard = Dashboard::new(
      MockExplorer::default().with("bc1qalice", json!([op_return_tx("t1", "abc", 1000)])),
    );

    dashboard.refresh("bc1qalice").await.unwrap();
    dashboard.stake(0).unwrap();
    dashboard.refresh("bc1qalice").await.unwrap();
    let before = dashboard.snapshot();

    assert!(matches!(
      dashboard.refresh("bc1qmissing").await,
      Err(DashboardError::Fetch(_))
    ));

    let after = dashboard.snapshot();
    assert_eq!(after.available, before.available);
    assert_eq!(after.staked, before.staked);
    assert!(!after.loading);
    assert_eq!(
      after.error.as_deref(),
      Some("failed to retrieve data; check the address or retry later")
    );
  }

  #[tokio::test]
  async fn successful_refresh_clears_previous_error() {
    let dashboard = Dashboard::new(MockExplorer::default().with("bc1qalice", json!([])));

    dashboard.refresh("bc1qbob").await.unwrap_err();
    assert!(dashboard.snapshot().error.is_some());

    dashboard.refresh("bc1qalice").await.unwrap();
    assert_eq!(dashboard.snapshot().error, None);
  }

  #[tokio::test]
  async fn staked_holdings_survive_refresh_of_another_address() {
    let dashboard = Dashboard::new(
      MockExplorer::default()
        .with("bc1qalice", json!([op_return_tx("a1", "6a01", 1000)]))
        .with("bc1qbob", json!([op_return_tx("b1", "6a02", 2000)])),
    );

    dashboard.refresh("bc1qalice").await.unwrap();
    dashboard.stake(0).unwrap();
    dashboard.refresh("bc1qbob").await.unwrap();

    let snapshot = dashboard.snapshot();
    assert_eq!(snapshot.address, "bc1qbob");
    assert_eq!(snapshot.available[0].transaction_id(), Some("b1"));
    assert_eq!(snapshot.staked[0].transaction_id(), Some("a1"));
  }

  #[tokio::test]
  async fn stake_through_dashboard() {
    let dashboard = Dashboard::new(MockExplorer::default().with(
      "bc1qalice",
      json!([
        op_return_tx("t1", "6a01", 1000),
        op_return_tx("t2", "6a02", 2000),
        op_return_tx("t3", "6a03", 3000),
      ]),
    ));
    dashboard.refresh("bc1qalice").await.unwrap();

    assert_eq!(
      dashboard.stake_output("t2", 0).unwrap().transaction_id(),
      Some("t2")
    );

    let staked = dashboard.stake(0).unwrap();
    assert_eq!(
      staked
        .iter()
        .map(|holding| holding.transaction_id())
        .collect::<Vec<_>>(),
      [Some("t1"), Some("t3")]
    );

    assert_eq!(dashboard.stake(0).unwrap_err(), StakeError::NotFound(0));

    let snapshot = dashboard.snapshot();
    assert!(snapshot.available.is_empty());
    assert_eq!(snapshot.staked.len(), 3);
  }

  #[tokio::test]
  async fn concurrent_refresh_is_rejected_while_busy() {
    let gate = Arc::new(Notify::new());
    let dashboard = Arc::new(Dashboard::new(
      MockExplorer::default()
        .with("bc1qalice", json!([op_return_tx("t1", "abc", 1000)]))
        .gated(gate.clone()),
    ));

    let first = tokio::spawn({
      let dashboard = dashboard.clone();
      async move { dashboard.refresh("bc1qalice").await }
    });

    while !dashboard.is_loading() {
      tokio::task::yield_now().await;
    }
    assert!(dashboard.snapshot().loading);

    assert!(matches!(
      dashboard.refresh("bc1qalice").await,
      Err(DashboardError::Busy)
    ));

    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), 1);
    assert!(!dashboard.is_loading());
  }

  #[tokio::test]
  async fn busy_flag_cleared_after_failure() {
    let dashboard = Dashboard::new(MockExplorer::default());

    dashboard.refresh("bc1qalice").await.unwrap_err();
    assert!(!dashboard.is_loading());
    assert!(matches!(
      dashboard.refresh("bc1qalice").await,
      Err(DashboardError::Fetch(_))
    ));
  }

  #[test]
  fn snapshot_serializes() {
    let dashboard = Dashboard::new(MockExplorer::default());
    assert_eq!(
      serde_json::to_value(dashboard.snapshot()).unwrap(),
      json!({
        "address": "",
        "available": [],
        "staked": [],
        "loading": false,
        "error": null,
      })
    );
  }
}
