use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{Outcome, Transaction, TransactionStatus, TxId, UserId};

/// Errors that can occur when reading payment rows or writing outcomes
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("failed to write outcome: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush output: {0}")]
    Flush(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct InputRow {
    user_id: UserId,
    amount: f64,
    transaction_id: TxId,
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    transaction_id: &'a str,
    user_id: &'a str,
    amount: f64,
    status: TransactionStatus,
    duplicate: bool,
}

/// Read payment requests from a csv file with a
/// `user_id,amount,transaction_id` header.
///
/// Rows that fail to parse are yielded as errors; the iterator keeps going.
pub fn read_payments(
    path: &Path,
) -> Result<impl Iterator<Item = Result<Transaction, CsvError>> + use<>, CsvError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            Ok(Transaction::new(row.user_id, row.amount, row.transaction_id))
        }))
}

/// Writes processing outcomes as csv rows
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl OutcomeWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, outcome: &Outcome) -> Result<(), CsvError> {
        let tx = outcome.transaction();
        self.writer.serialize(OutputRow {
            transaction_id: &tx.transaction_id,
            user_id: &tx.user_id,
            amount: tx.amount,
            status: tx.status,
            duplicate: outcome.is_duplicate(),
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), CsvError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, CsvError> {
        self.writer
            .into_inner()
            .map_err(|e| CsvError::Flush(e.into_error()))
    }
}
