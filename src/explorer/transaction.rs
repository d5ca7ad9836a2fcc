use {
  super::*,
  serde::{de::DeserializeOwned, Deserializer},
  serde_json::Value,
};

/// A transaction as returned by the Esplora `/address/:address/txs` endpoint.
///
/// Only the fields read by the classifier are kept. Missing or wrongly typed
/// fields decode to `None` instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
  #[serde(default, deserialize_with = "lenient")]
  pub txid: Option<String>,
  #[serde(default, deserialize_with = "lenient_outputs")]
  pub vout: Vec<RawOutput>,
  #[serde(default, deserialize_with = "lenient")]
  pub status: Option<RawStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOutput {
  #[serde(default, deserialize_with = "lenient")]
  pub scriptpubkey: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub scriptpubkey_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatus {
  #[serde(default, deserialize_with = "lenient")]
  pub confirmed: Option<bool>,
  #[serde(default, deserialize_with = "lenient")]
  pub block_time: Option<u64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  Ok(T::deserialize(Value::deserialize(deserializer)?).ok())
}

// malformed entries keep their slot so output indexes stay aligned with the chain
fn lenient_outputs<'de, D>(deserializer: D) -> Result<Vec<RawOutput>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Value::deserialize(deserializer)? {
    Value::Array(outputs) => outputs
      .into_iter()
      .map(|output| RawOutput::deserialize(output).unwrap_or_default())
      .collect(),
    _ => Vec::new(),
  })
}
