//! Core domain types for the payment processor.

use serde::{Deserialize, Serialize};

/// Caller-supplied transaction identifier, the sole deduplication key.
pub type TxId = String;

/// Paying party identifier. Opaque to the processor.
pub type UserId = String;

/// Lifecycle status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Not yet recorded. Every decoded request starts here.
    #[default]
    Pending,
    /// Recorded by the store.
    Success,
    /// Never produced by the store.
    Failed,
}

/// A payment request, and once recorded, the stored outcome.
///
/// Absent fields decode to their zero value, so a request without a
/// `transaction_id` is keyed by the empty string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub user_id: UserId,
    pub amount: f64,
    pub transaction_id: TxId,
    pub status: TransactionStatus,
}

impl Transaction {
    /// Create a new pending transaction.
    pub fn new(user_id: impl Into<UserId>, amount: f64, transaction_id: impl Into<TxId>) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            transaction_id: transaction_id.into(),
            status: TransactionStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transaction_is_pending() {
        let tx = Transaction::new("u1", 100.0, "tx1");
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.transaction_id, "tx1");
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&TransactionStatus::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");
        let status: TransactionStatus = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(status, TransactionStatus::Failed);
    }

    #[test]
    fn status_is_optional_on_input() {
        let tx: Transaction =
            serde_json::from_str(r#"{"user_id":"u1","amount":12.5,"transaction_id":"tx9"}"#)
                .unwrap();
        assert_eq!(tx, Transaction::new("u1", 12.5, "tx9"));
    }

    #[test]
    fn missing_transaction_id_decodes_to_empty_key() {
        let tx: Transaction = serde_json::from_str(r#"{"user_id":"u1","amount":1}"#).unwrap();
        assert_eq!(tx.transaction_id, "");
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        let result = serde_json::from_str::<Transaction>(
            r#"{"user_id":"u1","amount":"ten","transaction_id":"tx1"}"#,
        );
        assert!(result.is_err());
    }
}
