use {
  axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
  },
  serde_json::Value,
  std::{
    collections::BTreeMap,
    net::TcpListener,
    sync::{Arc, Mutex, MutexGuard},
    thread,
    time::Duration,
  },
};

#[derive(Default)]
struct MockState {
  transactions: BTreeMap<String, Vec<Value>>,
  bodies: BTreeMap<String, String>,
  failure: Option<StatusCode>,
  delay: Option<Duration>,
  requests: Vec<String>,
}

type SharedState = Arc<Mutex<MockState>>;

pub fn spawn() -> Handle {
  let state = SharedState::default();

  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let port = listener.local_addr().unwrap().port();

  let router = Router::new()
    .route("/address/:address/txs", get(address_txs))
    .with_state(state.clone());

  thread::spawn(move || {
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .unwrap()
      .block_on(async {
        axum::Server::from_tcp(listener)
          .unwrap()
          .serve(router.into_make_service())
          .await
          .unwrap()
      })
  });

  Handle { state, port }
}

async fn address_txs(State(state): State<SharedState>, Path(address): Path<String>) -> Response {
  let delay = {
    let mut state = lock(&state);
    state.requests.push(address.clone());
    state.delay
  };

  if let Some(delay) = delay {
    tokio::time::sleep(delay).await;
  }

  let state = lock(&state);

  if let Some(status) = state.failure {
    return (status, status.canonical_reason().unwrap_or_default()).into_response();
  }

  if let Some(body) = state.bodies.get(&address) {
    return (StatusCode::OK, body.clone()).into_response();
  }

  match state.transactions.get(&address) {
    Some(transactions) => Json(Value::Array(transactions.clone())).into_response(),
    None => (StatusCode::BAD_REQUEST, "Invalid Bitcoin address").into_response(),
  }
}

fn lock(state: &SharedState) -> MutexGuard<MockState> {
  state.lock().unwrap()
}

pub struct Handle {
  state: SharedState,
  port: u16,
}

impl Handle {
  pub fn url(&self) -> String {
    format!("http://127.0.0.1:{}", self.port)
  }

  /// Known addresses answer with their transactions, newest first like
  /// Esplora. Unknown addresses get a 400.
  pub fn add_transaction(&self, address: &str, transaction: Value) {
    lock(&self.state)
      .transactions
      .entry(address.into())
      .or_default()
      .insert(0, transaction);
  }

  pub fn add_address(&self, address: &str) {
    lock(&self.state)
      .transactions
      .entry(address.into())
      .or_default();
  }

  pub fn respond_with(&self, address: &str, body: &str) {
    lock(&self.state)
      .bodies
      .insert(address.into(), body.into());
  }

  pub fn fail_with(&self, status: u16) {
    lock(&self.state).failure = Some(StatusCode::from_u16(status).unwrap());
  }

  pub fn recover(&self) {
    lock(&self.state).failure = None;
  }

  pub fn delay(&self, delay: Duration) {
    lock(&self.state).delay = Some(delay);
  }

  pub fn requests(&self) -> Vec<String> {
    lock(&self.state).requests.clone()
  }
}
