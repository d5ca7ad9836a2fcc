use super::*;

/// Esplora's `scriptpubkey_type` for OP_RETURN outputs.
pub const NULL_DATA_SCRIPT_TYPE: &str = "op_return";

/// Turn an address's transactions into holding records.
///
/// Each transaction contributes at most one record, built from its first
/// null-data output. Transactions without one are skipped. Input order is
/// kept and nothing is deduplicated.
pub fn classify(transactions: &[RawTransaction]) -> Vec<HoldingRecord> {
  transactions.iter().filter_map(classify_transaction).collect()
}

fn classify_transaction(transaction: &RawTransaction) -> Option<HoldingRecord> {
  let (index, output) = transaction
    .vout
    .iter()
    .enumerate()
    .find(|(_, output)| output.scriptpubkey_type.as_deref() == Some(NULL_DATA_SCRIPT_TYPE))?;

  Some(HoldingRecord::new(
    u32::try_from(index).ok()?,
    output.scriptpubkey.clone(),
    transaction
      .status
      .as_ref()
      .and_then(|status| status.block_time),
    transaction.txid.clone(),
  ))
}
