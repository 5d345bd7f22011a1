//! Idempotent transaction store.
//!
//! The store maps transaction ids to their recorded outcome. The first
//! submission for an id is recorded with `SUCCESS` status and every later
//! submission with the same id gets that original record back, untouched.
//!
//! Records are partitioned into independently locked shards. The shard for
//! an id is picked by hashing it with a hasher state fixed at construction,
//! so all operations for one id always land on the same shard and the
//! check-then-insert runs under that shard's single lock.

use std::collections::HashMap;
use std::collections::hash_map::{Entry, RandomState};
use std::hash::BuildHasher;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::model::{Transaction, TransactionStatus, TxId};

mod outcome;
pub use outcome::Outcome;

type Shard = HashMap<TxId, Transaction>;

/// Thread-safe store of recorded transactions, shared by reference
/// (wrap it in an `Arc` to hand it to tasks).
#[derive(Debug)]
pub struct TransactionStore {
    shards: Box<[Mutex<Shard>]>,
    hasher: RandomState,
}

/// Public API
impl TransactionStore {
    pub const DEFAULT_SHARDS: usize = 16;

    pub fn new() -> Self {
        Self::with_shards(Self::DEFAULT_SHARDS)
    }

    /// Create a store with `shards` partitions (at least one).
    pub fn with_shards(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| Mutex::new(HashMap::new()))
            .collect();
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Record `candidate` unless its id is already known.
    ///
    /// The lookup and the insert happen under one lock acquisition, so of
    /// any number of concurrent calls sharing an id exactly one returns
    /// [`Outcome::Created`]. Never fails; an empty id is a key like any other.
    pub fn process(&self, mut candidate: Transaction) -> Outcome {
        let mut shard = self.lock(&candidate.transaction_id);

        match shard.entry(candidate.transaction_id.clone()) {
            Entry::Occupied(entry) => {
                debug!(
                    transaction_id = %candidate.transaction_id,
                    "transaction already processed"
                );
                Outcome::Duplicate(entry.get().clone())
            }
            Entry::Vacant(entry) => {
                candidate.status = TransactionStatus::Success;
                debug!(
                    transaction_id = %candidate.transaction_id,
                    user_id = %candidate.user_id,
                    amount = candidate.amount,
                    "transaction recorded"
                );
                Outcome::Created(entry.insert(candidate).clone())
            }
        }
    }

    /// Return a copy of the record stored for `id`, if any.
    pub fn get(&self, id: &str) -> Option<Transaction> {
        self.lock(id).get(id).cloned()
    }

    /// Number of recorded transactions.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Private API
impl TransactionStore {
    fn shard_index(&self, id: &str) -> usize {
        (self.hasher.hash_one(id) % self.shards.len() as u64) as usize
    }

    /// Lock the shard owning `id`.
    ///
    /// A poisoned lock is taken over: the only mutation is a single map
    /// insert, so a panicking holder cannot leave a half-written record.
    fn lock(&self, id: &str) -> MutexGuard<'_, Shard> {
        self.shards[self.shard_index(id)]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}
