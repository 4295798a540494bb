//! Batched activity log: the bot's own record of what it did (registrations,
//! sends, handler failures), written to an append-only sink.
//!
//! Enqueueing never blocks on storage. Each enqueue spawns a drain trigger;
//! concurrent triggers coalesce behind a single drain lock so bursts become
//! few bulk appends instead of one write per record. Best effort: a failed
//! storage write discards the in-flight batch, and records enqueued after
//! [`ActivityLog::flush`] returns may be lost on abrupt shutdown.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Local;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex as DrainLock;

/// Severity of an activity-log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Debug,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// Append-only storage for drained batches.
///
/// The only requirement: append the batch atomically, creating the parent
/// location if absent. One call per drained batch.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn append(&self, batch: &str) -> std::io::Result<()>;
}

/// [`LogSink`] over a plain text file, created on first append.
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LogSink for FileLogSink {
    async fn append(&self, batch: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(batch.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Formats one record as `timestamp [level] message`.
fn format_record(level: LogLevel, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("{} [{}] {}", timestamp, level, message)
}

struct Inner {
    queue: Mutex<Vec<String>>,
    drain_lock: DrainLock<()>,
    sink: Arc<dyn LogSink>,
}

/// Cheaply cloneable handle to the process-wide activity log.
///
/// Must be used from within a Tokio runtime: enqueueing spawns the background
/// drain task.
#[derive(Clone)]
pub struct ActivityLog {
    inner: Arc<Inner>,
}

impl ActivityLog {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(Vec::new()),
                drain_lock: DrainLock::new(()),
                sink,
            }),
        }
    }

    /// Convenience constructor over a [`FileLogSink`].
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileLogSink::new(path)))
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Formats and enqueues one record, then triggers a background drain.
    pub fn log(&self, level: LogLevel, message: &str) {
        let record = format_record(level, message);
        if let Ok(mut queue) = self.inner.queue.lock() {
            queue.push(record);
        }
        let inner = self.inner.clone();
        tokio::spawn(drain(inner));
    }

    /// Drains everything queued so far, waiting for any drain in flight.
    ///
    /// Call once during graceful shutdown. Records enqueued after this
    /// returns are only flushed by later triggers.
    pub async fn flush(&self) {
        let _guard = self.inner.drain_lock.lock().await;
        while write_next_batch(&self.inner).await {}
    }
}

/// Background drain: one pass over the queue under the exclusive drain lock.
///
/// If the lock is held, another drain is in flight and will observe our
/// records; returning immediately is what coalesces bursts. After releasing
/// the lock we re-check the queue once, so a record enqueued between the
/// holder's last look and its release is not stranded until the next trigger.
async fn drain(inner: Arc<Inner>) {
    loop {
        {
            let Ok(_guard) = inner.drain_lock.try_lock() else {
                return;
            };
            while write_next_batch(&inner).await {}
        }
        let pending = inner.queue.lock().map(|q| !q.is_empty()).unwrap_or(false);
        if !pending {
            return;
        }
    }
}

/// Swaps out the whole queue and appends it as one batch.
///
/// Returns false when the queue was empty. A sink failure discards the batch:
/// the logger cannot log its own failure, and callers must never see it.
async fn write_next_batch(inner: &Inner) -> bool {
    let batch = inner
        .queue
        .lock()
        .map(|mut queue| std::mem::take(&mut *queue))
        .unwrap_or_default();
    if batch.is_empty() {
        return false;
    }

    let mut buffer = String::new();
    for record in &batch {
        buffer.push_str(record);
        buffer.push('\n');
    }
    let _ = inner.sink.append(&buffer).await;
    true
}
