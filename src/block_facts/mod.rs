mod decode;
mod store;

use chrono::{DateTime, Utc};

use crate::units::Hastings;

pub use decode::{decode_block_fact, DecodeError};
pub use store::{ExplorerDb, StoreError, BLOCK_FACTS_TREE};

/// One fact record per block height, produced by the explorer's ingestion
/// process. Read-only here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockFact {
    pub height: u64,
    pub timestamp: DateTime<Utc>,
    pub active_contract_cost: Hastings,
    pub active_contract_count: u64,
    pub active_contract_size: u64,
    pub total_contract_cost: Hastings,
    pub total_contract_count: u64,
    pub total_contract_size: u64,
}
