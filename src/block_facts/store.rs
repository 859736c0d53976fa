use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::{decode_block_fact, BlockFact, DecodeError};

/// Bucket the ingester writes fact records into, keyed by height.
pub const BLOCK_FACTS_TREE: &str = "block_facts";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no explorer store at {0}")]
    Missing(PathBuf),
    #[error("store does not contain a {BLOCK_FACTS_TREE} bucket")]
    MissingBucket,
    #[error("store backend error: {0}")]
    Backend(#[from] sled::Error),
    #[error("failed to decode block fact record: {0}")]
    Decode(#[from] DecodeError),
}

/// Read handle on the explorer's persisted store, backed by the `sled`
/// embedded database. Nothing in this crate writes through it.
pub struct ExplorerDb {
    db: sled::Db,
}

impl ExplorerDb {
    /// Open the store at `path`. The store must already exist and contain
    /// the fact bucket; sled would silently create an empty store otherwise.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::Missing(path.to_path_buf()));
        }
        let db = sled::open(path)?;
        let has_facts = db
            .tree_names()
            .iter()
            .any(|name| name.as_ref() == BLOCK_FACTS_TREE.as_bytes());
        if !has_facts {
            return Err(StoreError::MissingBucket);
        }
        Ok(Self { db })
    }

    /// Every stored fact, ascending by height.
    ///
    /// Keys are height-ordered in a well-formed store, but the cursor order
    /// is never trusted: the decoded height field is the ordering authority
    /// and the result is always re-sorted.
    pub fn read_block_facts(&self) -> Result<Vec<BlockFact>, StoreError> {
        let tree = self.db.open_tree(BLOCK_FACTS_TREE)?;
        let mut facts = Vec::with_capacity(tree.len());
        for entry in tree.iter() {
            let (key, value) = entry?;
            let fact = decode_block_fact(&value)?;
            debug!(height = fact.height, key_len = key.len(), "decoded block fact");
            facts.push(fact);
        }
        facts.sort_by_key(|fact| fact.height);

        if let (Some(first), Some(last)) = (facts.first(), facts.last()) {
            info!(
                count = facts.len(),
                first_height = first.height,
                last_height = last.height,
                "read block facts spanning {} to {}",
                first.timestamp,
                last.timestamp
            );
        } else {
            info!("store contains no block facts");
        }

        Ok(facts)
    }
}
