pub mod config;
pub mod csv;
pub mod error;
pub mod http;
pub mod model;
pub mod replay;
pub mod server;
pub mod store;
pub mod workerpool;

pub use model::{Transaction, TransactionStatus, TxId, UserId};
pub use store::{Outcome, TransactionStore};
pub use workerpool::WorkerPool;
