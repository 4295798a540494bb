//! Integration tests for [`tgkit_core::ActivityLog`].
//!
//! Covers: every enqueued record appears exactly once regardless of how many
//! concurrent drain triggers fired, the record format, sink failure handling
//! (batch discarded, later records unaffected), and the file sink.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tgkit_core::{ActivityLog, FileLogSink, LogSink};

/// Sink that keeps every appended batch in memory.
struct MemorySink {
    batches: Mutex<Vec<String>>,
}

impl MemorySink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(Vec::new()),
        })
    }

    fn lines(&self) -> Vec<String> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .flat_map(|batch| batch.lines().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

}

#[async_trait]
impl LogSink for MemorySink {
    async fn append(&self, batch: &str) -> std::io::Result<()> {
        self.batches.lock().unwrap().push(batch.to_string());
        Ok(())
    }
}

/// Sink whose first `fail_first` appends return an error.
struct FlakySink {
    remaining_failures: AtomicUsize,
    delegate: Arc<MemorySink>,
}

#[async_trait]
impl LogSink for FlakySink {
    async fn append(&self, batch: &str) -> std::io::Result<()> {
        if self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(std::io::Error::other("disk full"));
        }
        self.delegate.append(batch).await
    }
}

/// **Test: enqueueing N records and draining appends exactly N lines, each once.**
///
/// **Setup:** 100 records enqueued from 10 concurrent tasks, each enqueue
/// firing its own drain trigger.
/// **Action:** await the tasks, then `flush()`.
/// **Expected:** the sink holds all 100 distinct lines exactly once, however
/// the concurrent drain triggers interleaved.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_enqueues_append_each_record_once() {
    let sink = MemorySink::new();
    let log = ActivityLog::new(sink.clone());

    let mut tasks = Vec::new();
    for task in 0..10 {
        let log = log.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..10 {
                log.info(&format!("record {}-{}", task, i));
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
    log.flush().await;

    let lines = sink.lines();
    assert_eq!(lines.len(), 100);
    for task in 0..10 {
        for i in 0..10 {
            let needle = format!("record {}-{}", task, i);
            let hits = lines.iter().filter(|l| l.contains(&needle)).count();
            assert_eq!(hits, 1, "expected exactly one line for {}", needle);
        }
    }
}

/// **Test: records are formatted as `timestamp [level] message`.**
#[tokio::test]
async fn test_record_format() {
    let sink = MemorySink::new();
    let log = ActivityLog::new(sink.clone());

    log.info("Registered command: /start");
    log.error("Handler failed");
    log.flush().await;

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().any(|l| l.contains("[Info] Registered command: /start")));
    assert!(lines.iter().any(|l| l.contains("[Error] Handler failed")));
}

/// **Test: a failing sink discards the batch without reaching the caller.**
///
/// **Setup:** sink fails its first append, then recovers.
/// **Action:** log one record, flush (batch lost), log another, flush.
/// **Expected:** no panic or error anywhere; only the second record is stored.
#[tokio::test]
async fn test_sink_failure_discards_batch_and_recovers() {
    let memory = MemorySink::new();
    let flaky = Arc::new(FlakySink {
        remaining_failures: AtomicUsize::new(1),
        delegate: memory.clone(),
    });
    let log = ActivityLog::new(flaky);

    log.info("lost to the failing write");
    log.flush().await;
    log.info("stored after recovery");
    log.flush().await;

    let lines = memory.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("stored after recovery"));
}

/// **Test: flush drains records even when every background trigger already ran.**
#[tokio::test]
async fn test_flush_is_idempotent() {
    let sink = MemorySink::new();
    let log = ActivityLog::new(sink.clone());

    log.info("only record");
    log.flush().await;
    log.flush().await;

    assert_eq!(sink.lines().len(), 1);
}

/// **Test: the file sink creates the parent directory and appends across batches.**
#[tokio::test]
async fn test_file_sink_creates_directory_and_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("activity.log");
    let sink = FileLogSink::new(&path);

    sink.append("first batch\n").await.unwrap();
    sink.append("second batch\n").await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "first batch\nsecond batch\n");
}

/// **Test: the activity log writes to a file end to end.**
#[tokio::test]
async fn test_activity_log_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("activity.log");
    let log = ActivityLog::to_file(&path);

    log.info("Bot started: test_bot");
    log.flush().await;

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("[Info] Bot started: test_bot"));
}
