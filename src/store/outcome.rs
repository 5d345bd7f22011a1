use crate::Transaction;

/// Result of [`TransactionStore::process`](super::TransactionStore::process).
///
/// A duplicate submission is not an error: it carries the record stored by
/// the first submission for the same id.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// First submission for this id; the transaction was recorded.
    Created(Transaction),
    /// The id was already recorded; holds the original record.
    Duplicate(Transaction),
}

impl Outcome {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Outcome::Duplicate(_))
    }

    /// The recorded transaction, whichever way it was obtained.
    pub fn transaction(&self) -> &Transaction {
        match self {
            Outcome::Created(tx) | Outcome::Duplicate(tx) => tx,
        }
    }

    pub fn into_transaction(self) -> Transaction {
        match self {
            Outcome::Created(tx) | Outcome::Duplicate(tx) => tx,
        }
    }

    /// Split into the `(recorded transaction, duplicate)` pair.
    pub fn into_parts(self) -> (Transaction, bool) {
        let duplicate = self.is_duplicate();
        (self.into_transaction(), duplicate)
    }
}
