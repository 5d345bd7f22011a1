//! Batch replay: submit every payment row of a csv file to one shared store
//! through the worker pool and write the outcomes as they complete.

use std::io::Write;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::{info, warn};

use crate::config::ReplayConfig;
use crate::csv::{OutcomeWriter, read_payments};
use crate::error::AppError;
use crate::workerpool::WorkerPool;

/// Counts of what a replay did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub created: usize,
    pub duplicates: usize,
}

/// Replay the payments in `config.input`, writing one outcome row per
/// successfully parsed input row. Unparsable rows are logged and skipped.
pub async fn replay<W: Write>(
    config: &ReplayConfig,
    writer: &mut OutcomeWriter<W>,
) -> Result<ReplaySummary, AppError> {
    let payments = read_payments(&config.input)?.filter_map(|result| match result {
        Ok(tx) => Some(tx),
        Err(e) => {
            warn!("{e}");
            None
        }
    });

    let store = Arc::new(config.store.build());
    let pool = WorkerPool::new(config.workers);
    let mut outcomes = {
        let store = Arc::clone(&store);
        pool.run(payments, move |_, tx| {
            let store = Arc::clone(&store);
            async move { store.process(tx) }
        })
    };

    let mut summary = ReplaySummary::default();
    while let Some(outcome) = outcomes.next().await {
        if outcome.is_duplicate() {
            summary.duplicates += 1;
        } else {
            summary.created += 1;
        }
        writer.write(&outcome)?;
    }
    writer.flush()?;

    info!(
        created = summary.created,
        duplicates = summary.duplicates,
        recorded = store.len(),
        workers = pool.workers(),
        "replay finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use tempfile::NamedTempFile;

    fn replay_config(content: &str) -> (NamedTempFile, ReplayConfig) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let config = ReplayConfig {
            input: file.path().to_path_buf(),
            workers: 4,
            store: StoreConfig { shards: 2 },
        };
        (file, config)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn duplicates_are_recorded_once() {
        let (_file, config) = replay_config(
            "user_id,amount,transaction_id\n\
             u1,100,tx1\n\
             u2,50,tx1\n\
             u3,10,tx2\n\
             u1,100,tx1\n",
        );

        let mut writer = OutcomeWriter::new(Vec::new());
        let summary = replay(&config, &mut writer).await.unwrap();
        assert_eq!(
            summary,
            ReplaySummary {
                created: 2,
                duplicates: 2
            }
        );

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let rows: Vec<&str> = out.lines().skip(1).collect();
        assert_eq!(rows.len(), 4);

        let tx1_rows: Vec<&str> = rows
            .iter()
            .copied()
            .filter(|r| r.starts_with("tx1,"))
            .collect();
        assert_eq!(tx1_rows.len(), 3);
        assert_eq!(tx1_rows.iter().filter(|r| r.ends_with(",false")).count(), 1);

        // every tx1 row carries the winner's payload
        let payload = |row: &str| row.rsplit_once(',').unwrap().0.to_string();
        assert!(tx1_rows.iter().all(|r| payload(*r) == payload(tx1_rows[0])));
    }

    #[tokio::test]
    async fn unparsable_rows_are_skipped() {
        let (_file, config) = replay_config(
            "user_id,amount,transaction_id\n\
             u1,abc,tx1\n\
             u1,5,tx2\n",
        );

        let mut writer = OutcomeWriter::new(Vec::new());
        let summary = replay(&config, &mut writer).await.unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.duplicates, 0);
    }

    #[tokio::test]
    async fn missing_input_fails() {
        let config = ReplayConfig {
            input: "/definitely/not/here.csv".into(),
            workers: 1,
            store: StoreConfig { shards: 1 },
        };
        let mut writer = OutcomeWriter::new(Vec::new());
        assert!(matches!(
            replay(&config, &mut writer).await,
            Err(AppError::Csv(_))
        ));
    }
}
