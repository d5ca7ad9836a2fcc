use super::*;

const CONTENT_PREVIEW_CHARS: usize = 20;

/// An inscription-like item found in a null-data output of an address's
/// transaction.
///
/// Records are never modified after classification; the ledger only moves
/// them between its available and staked lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingRecord {
  id: u32,
  content: Option<String>,
  timestamp: Option<u64>,
  transaction_id: Option<String>,
}

impl HoldingRecord {
  pub fn new(
    id: u32,
    content: Option<String>,
    timestamp: Option<u64>,
    transaction_id: Option<String>,
  ) -> Self {
    Self {
      id,
      content,
      timestamp,
      transaction_id,
    }
  }

  /// Index of the matched output within its transaction. Not unique across
  /// transactions.
  pub fn id(&self) -> u32 {
    self.id
  }

  /// Hex encoded script of the matched output.
  pub fn content(&self) -> Option<&str> {
    self.content.as_deref()
  }

  /// Block time in unix seconds, absent while unconfirmed.
  pub fn timestamp(&self) -> Option<u64> {
    self.timestamp
  }

  pub fn transaction_id(&self) -> Option<&str> {
    self.transaction_id.as_deref()
  }

  pub fn datetime(&self) -> Option<DateTime<Utc>> {
    self.timestamp.and_then(timestamp)
  }

  pub fn content_preview(&self) -> String {
    match self.content() {
      Some(content) if !content.is_empty() => {
        content.chars().take(CONTENT_PREVIEW_CHARS).collect()
      }
      _ => "No content available".into(),
    }
  }

  pub(crate) fn matches(&self, txid: &str, id: u32) -> bool {
    self.id == id && self.transaction_id() == Some(txid)
  }
}

impl Display for HoldingRecord {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self.transaction_id() {
      Some(txid) => write!(f, "{txid}:{}", self.id),
      None => write!(f, "?:{}", self.id),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn serializes_camel_case() {
    let record = HoldingRecord::new(0, Some("abc".into()), Some(1000), Some("t1".into()));
    assert_eq!(
      serde_json::to_string(&record).unwrap(),
      r#"{"id":0,"content":"abc","timestamp":1000,"transactionId":"t1"}"#
    );
  }

  #[test]
  fn unconfirmed_serializes_null_timestamp() {
    let record = HoldingRecord::new(2, Some("6a".into()), None, Some("t2".into()));
    assert_eq!(
      serde_json::to_string(&record).unwrap(),
      r#"{"id":2,"content":"6a","timestamp":null,"transactionId":"t2"}"#
    );
    assert_eq!(record.datetime(), None);
  }

  #[test]
  fn content_preview_truncates() {
    let record = HoldingRecord::new(
      0,
      Some("6a0b68656c6c6f20776f726c64".into()),
      None,
      None,
    );
    assert_eq!(record.content_preview(), "6a0b68656c6c6f20776f");
  }

  #[test]
  fn content_preview_without_content() {
    assert_eq!(
      HoldingRecord::new(0, None, None, None).content_preview(),
      "No content available"
    );
    assert_eq!(
      HoldingRecord::new(0, Some(String::new()), None, None).content_preview(),
      "No content available"
    );
  }

  #[test]
  fn datetime_from_block_time() {
    let record = HoldingRecord::new(0, None, Some(1_231_006_505), None);
    assert_eq!(
      record.datetime().unwrap().to_rfc3339(),
      "2009-01-03T18:15:05+00:00"
    );
  }

  #[test]
  fn display() {
    assert_eq!(
      HoldingRecord::new(3, None, None, Some("t1".into())).to_string(),
      "t1:3"
    );
    assert_eq!(HoldingRecord::new(3, None, None, None).to_string(), "?:3");
  }
}
