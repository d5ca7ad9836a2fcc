use {
  super::*,
  async_trait::async_trait,
  http::header,
  reqwest::{Client, Url},
};

pub use self::transaction::{RawOutput, RawStatus, RawTransaction};

mod transaction;

/// Failure to obtain an address's transactions.
///
/// Callers only ever see one generic message; the underlying reason is kept
/// for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to retrieve data; check the address or retry later")]
pub struct FetchError {
  reason: String,
}

impl FetchError {
  pub(crate) fn new(reason: impl Into<String>) -> Self {
    Self {
      reason: reason.into(),
    }
  }

  pub fn reason(&self) -> &str {
    &self.reason
  }
}

impl From<reqwest::Error> for FetchError {
  fn from(error: reqwest::Error) -> Self {
    Self::new(format!("request failed: {error}"))
  }
}

impl From<serde_json::Error> for FetchError {
  fn from(error: serde_json::Error) -> Self {
    Self::new(format!("malformed payload: {error}"))
  }
}

#[async_trait]
pub trait Explorer: Send + Sync {
  /// Transactions touching `address`, in the order the explorer returns them.
  async fn address_transactions(&self, address: &str) -> Result<Vec<RawTransaction>, FetchError>;
}

pub struct EsploraClient {
  client: Client,
  url: Url,
}

impl EsploraClient {
  pub fn new(url: &str) -> Result<Self> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
      header::ACCEPT,
      header::HeaderValue::from_static("application/json"),
    );

    let client = Client::builder()
      .default_headers(headers)
      .build()
      .context("failed to build explorer client")?;

    let url = Url::parse(url).with_context(|| format!("invalid explorer url `{url}`"))?;
    if url.cannot_be_a_base() {
      bail!("invalid explorer url `{url}`");
    }

    Ok(Self { client, url })
  }

  pub fn url(&self) -> &Url {
    &self.url
  }

  // the address is pushed as a single percent-encoded path segment
  fn address_txs_url(&self, address: &str) -> Url {
    let mut url = self.url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().extend(["address", address, "txs"]);
    }
    url
  }
}

#[async_trait]
impl Explorer for EsploraClient {
  async fn address_transactions(
    &self,
    address: &str,
  ) -> Result<Vec<RawTransaction>, FetchError> {
    if address.is_empty() {
      return Err(FetchError::new("empty address"));
    }

    let url = self.address_txs_url(address);
    log::debug!("explorer: GET {url}");

    let response = self.client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::new(format!("explorer responded with {status}")));
    }

    let body = response.bytes().await?;
    let transactions: Vec<RawTransaction> = serde_json::from_slice(&body)?;

    log::debug!(
      "explorer: {} transactions for address {address}",
      transactions.len()
    );

    Ok(transactions)
  }
}
