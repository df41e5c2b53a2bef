//! Background writer that batches diary edits.
//!
//! Edits are accumulated (last write wins per key) and only sent once updates
//! pause for the configured quiet period, so typing into a field does not turn
//! into a stream of requests. Each update restarts the quiet period.
//!
//! Senders get no feedback. A failed write is logged and its batch kept; it is
//! sent again, merged with newer edits, only after the next update arrives.
//! Closing the writer (or dropping every handle) flushes whatever is pending.

use log::{debug, error};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::api::SectorClient;
use crate::config::WriterConfig;
use crate::error::Result;

/// Accumulated diary edits, keyed by statistic name.
pub type Statistics = BTreeMap<String, serde_json::Value>;

/// Destination for flushed batches.
pub trait StatisticsSink: Send + Sync + 'static {
    /// Write the whole batch in one request.
    fn write(&self, batch: &Statistics) -> impl Future<Output = Result<()>> + Send;
}

impl StatisticsSink for SectorClient {
    fn write(&self, batch: &Statistics) -> impl Future<Output = Result<()>> + Send {
        self.put_statistics(batch)
    }
}

#[derive(Debug)]
enum Message {
    Update(Statistics),
    Close,
}

/// Cloneable fire-and-forget handle onto a running writer.
#[derive(Debug, Clone)]
pub struct WriterHandle {
    tx: UnboundedSender<Message>,
}

impl WriterHandle {
    /// Queue a set of edits.
    pub fn send(&self, updates: Statistics) {
        if updates.is_empty() {
            return;
        }
        if self.tx.send(Message::Update(updates)).is_err() {
            debug!("[StatisticsWriter] update after close dropped");
        }
    }

    /// Queue a single edit.
    pub fn set(&self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        let mut updates = Statistics::new();
        updates.insert(key.into(), value.into());
        self.send(updates);
    }
}

/// Owner of the background writer task.
#[derive(Debug)]
pub struct StatisticsWriter {
    handle: WriterHandle,
    task: JoinHandle<()>,
}

impl StatisticsWriter {
    /// Spawn the writer on the current tokio runtime.
    pub fn spawn<S: StatisticsSink>(sink: S, config: WriterConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(sink, config.pause(), rx));
        Self {
            handle: WriterHandle { tx },
            task,
        }
    }

    pub fn handle(&self) -> WriterHandle {
        self.handle.clone()
    }

    pub fn send(&self, updates: Statistics) {
        self.handle.send(updates);
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.handle.set(key, value);
    }

    /// Flush pending edits and stop the task.
    ///
    /// Other handles still alive can no longer deliver updates.
    pub async fn close(self) {
        let _ = self.handle.tx.send(Message::Close);
        if let Err(e) = self.task.await {
            error!("[StatisticsWriter] task failed: {}", e);
        }
    }
}

async fn run<S: StatisticsSink>(sink: S, pause: Duration, mut rx: UnboundedReceiver<Message>) {
    let mut pending = Statistics::new();
    let mut deadline: Option<Instant> = None;

    loop {
        let message = match deadline {
            Some(at) => tokio::select! {
                message = rx.recv() => message,
                _ = tokio::time::sleep_until(at) => {
                    deadline = None;
                    flush(&sink, &mut pending).await;
                    continue;
                }
            },
            None => rx.recv().await,
        };

        match message {
            Some(Message::Update(updates)) => {
                pending.extend(updates);
                deadline = Some(Instant::now() + pause);
            }
            Some(Message::Close) | None => {
                flush(&sink, &mut pending).await;
                break;
            }
        }
    }
    debug!("[StatisticsWriter] stopped");
}

async fn flush<S: StatisticsSink>(sink: &S, pending: &mut Statistics) {
    if pending.is_empty() {
        return;
    }
    for (key, value) in pending.iter() {
        debug!("[StatisticsWriter] write {}:{}", key, value);
    }
    match sink.write(pending).await {
        Ok(()) => {
            pending.clear();
            debug!("[StatisticsWriter] written");
        }
        Err(e) => error!("[StatisticsWriter] {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SectorError;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingSink {
        attempts: Arc<Mutex<Vec<Statistics>>>,
        fail: Arc<AtomicBool>,
    }

    impl RecordingSink {
        fn attempts(&self) -> Vec<Statistics> {
            self.attempts.lock().unwrap().clone()
        }
    }

    impl StatisticsSink for RecordingSink {
        fn write(&self, batch: &Statistics) -> impl Future<Output = Result<()>> + Send {
            self.attempts.lock().unwrap().push(batch.clone());
            let result = if self.fail.load(Ordering::SeqCst) {
                Err(SectorError::HttpError {
                    message: "unavailable".to_string(),
                    status_code: Some(503),
                })
            } else {
                Ok(())
            };
            std::future::ready(result)
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_flushes_once_with_last_write() {
        let sink = RecordingSink::default();
        let writer = StatisticsWriter::spawn(sink.clone(), WriterConfig::default());

        for i in 0..5 {
            writer.set("Weight", i);
            writer.set(format!("Note {}", i % 2), "ok");
            tokio::time::sleep(ms(200)).await;
        }
        // 200ms since the last update
        tokio::time::sleep(ms(700)).await;
        assert!(sink.attempts().is_empty());

        tokio::time::sleep(ms(200)).await;
        let attempts = sink.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].len(), 3);
        assert_eq!(attempts[0]["Weight"], json!(4));

        tokio::time::sleep(ms(5000)).await;
        assert_eq!(sink.attempts().len(), 1);
        writer.close().await;
        assert_eq!(sink.attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_clears_batch() {
        let sink = RecordingSink::default();
        let writer = StatisticsWriter::spawn(sink.clone(), WriterConfig::default());

        writer.set("Rest HR", 48);
        tokio::time::sleep(ms(1100)).await;
        writer.set("Weight", 71.5);
        tokio::time::sleep(ms(1100)).await;

        let attempts = sink.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[1].keys().collect::<Vec<_>>(), vec!["Weight"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_batch_without_retry() {
        let sink = RecordingSink::default();
        sink.fail.store(true, Ordering::SeqCst);
        let writer = StatisticsWriter::spawn(sink.clone(), WriterConfig::default());

        writer.set("Rest HR", 48);
        tokio::time::sleep(ms(1100)).await;
        assert_eq!(sink.attempts().len(), 1);

        // no timer re-arms after a failure
        tokio::time::sleep(ms(10_000)).await;
        assert_eq!(sink.attempts().len(), 1);

        sink.fail.store(false, Ordering::SeqCst);
        writer.set("Weight", 71.5);
        tokio::time::sleep(ms(1100)).await;

        let attempts = sink.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[1]["Rest HR"], json!(48));
        assert_eq!(attempts[1]["Weight"], json!(71.5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_pending() {
        let sink = RecordingSink::default();
        let writer = StatisticsWriter::spawn(sink.clone(), WriterConfig { pause_ms: 60_000 });

        writer.set("Mood", "good");
        writer.close().await;

        let attempts = sink.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0]["Mood"], json!("good"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handles_flushes() {
        let sink = RecordingSink::default();
        let writer = StatisticsWriter::spawn(sink.clone(), WriterConfig::default());
        let StatisticsWriter { handle, task } = writer;
        let other = handle.clone();

        other.set("Sleep", 7.5);
        drop(handle);
        drop(other);
        task.await.unwrap();

        assert_eq!(sink.attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_update_ignored() {
        let sink = RecordingSink::default();
        let writer = StatisticsWriter::spawn(sink.clone(), WriterConfig::default());
        writer.send(Statistics::new());
        tokio::time::sleep(ms(2000)).await;
        writer.close().await;
        assert!(sink.attempts().is_empty());
    }
}
