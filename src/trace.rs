//! JSONL capture of scoring events.
//!
//! [`JsonlTraceSink`] is a [`ScoringObserver`] that hands each event to a
//! writer thread. Drop the sink, then [`TraceWorker::join`] to flush.

use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::hooks::{ObserverError, ScoringEvent, ScoringObserver};

#[derive(Debug, Clone, Serialize)]
pub struct ScoringTrace {
    pub timestamp_ms: i64,
    /// Position of the event within its scoring run.
    pub sequence: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub event: ScoringEvent,
}

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(String),
    #[error("trace channel closed")]
    Closed,
    #[error("trace worker failed: {0}")]
    Join(String),
}

pub struct JsonlTraceSink {
    sender: mpsc::Sender<ScoringTrace>,
    run_id: Option<String>,
    sequence: std::sync::atomic::AtomicUsize,
}

pub struct TraceWorker {
    handle: Option<std::thread::JoinHandle<Result<(), TraceError>>>,
}

impl TraceWorker {
    pub fn join(mut self) -> Result<(), TraceError> {
        let handle = self.handle.take();
        match handle {
            Some(handle) => match handle.join() {
                Ok(result) => result,
                Err(_) => Err(TraceError::Join("trace worker panicked".to_string())),
            },
            None => Ok(()),
        }
    }
}

impl JsonlTraceSink {
    pub fn new(path: impl AsRef<Path>) -> Result<(Self, TraceWorker), TraceError> {
        let file = std::fs::File::create(path)?;
        let (sender, receiver) = mpsc::channel::<ScoringTrace>();
        let handle = std::thread::spawn(move || write_trace_loop(file, receiver));
        Ok((
            Self {
                sender,
                run_id: None,
                sequence: std::sync::atomic::AtomicUsize::new(0),
            },
            TraceWorker {
                handle: Some(handle),
            },
        ))
    }

    /// Tag every subsequent row with `run_id`.
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn record(&self, row: ScoringTrace) -> Result<(), TraceError> {
        self.sender.send(row).map_err(|_| TraceError::Closed)
    }
}

impl ScoringObserver for JsonlTraceSink {
    fn on_event(&self, event: &ScoringEvent) -> Result<(), ObserverError> {
        let sequence = self
            .sequence
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.record(ScoringTrace {
            timestamp_ms: now_epoch_ms(),
            sequence,
            run_id: self.run_id.clone(),
            event: event.clone(),
        })
        .map_err(|e| ObserverError::Message(e.to_string()))
    }
}

fn write_trace_loop(
    file: std::fs::File,
    receiver: mpsc::Receiver<ScoringTrace>,
) -> Result<(), TraceError> {
    let mut writer = BufWriter::new(file);
    for row in receiver {
        let line = serde_json::to_string(&row).map_err(|e| TraceError::Serde(e.to_string()))?;
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
