#![no_main]

use {
  libfuzzer_sys::fuzz_target,
  ord_stake::{classify, RawTransaction},
};

fuzz_target!(|data: &[u8]| {
  let Ok(transactions) = serde_json::from_slice::<Vec<RawTransaction>>(data) else {
    return;
  };

  let holdings = classify(&transactions);

  assert!(holdings.len() <= transactions.len());

  for holding in &holdings {
    assert!(transactions
      .iter()
      .any(|tx| tx.txid.as_deref() == holding.transaction_id()));
  }
});
