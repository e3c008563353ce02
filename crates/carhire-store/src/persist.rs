//! # Persistence Writer
//!
//! A single background task applies session writes to the key-value backend
//! in the order they were queued.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Persistence Writer                                 │
//! │                                                                         │
//! │  AppStore mutator                                                       │
//! │    (holds state lock)                                                   │
//! │        │ PersistCommand::Set / Remove / SetMany / RemoveMany            │
//! │        ▼                                                                │
//! │  ┌─────────────┐   FIFO   ┌──────────────────┐      ┌───────────────┐  │
//! │  │ PersistHandle├────────►│  PersistWriter   ├─────►│ KeyValueStore │  │
//! │  └─────────────┘          │  (tokio task)    │      └───────────────┘  │
//! │        │                  └────────┬─────────┘                          │
//! │        ▼                           │ outcome                            │
//! │  PersistTicket ◄───────────────────┘ (oneshot)                          │
//! │                                                                         │
//! │  logout() queued after set_user() is always applied after it, so a     │
//! │  stale user can never be written back once the session is cleared.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;

type Reply<T> = oneshot::Sender<StoreResult<T>>;

/// Entries read back from the backend, in request order.
pub type LoadedEntries = Vec<(String, Option<String>)>;

#[derive(Debug)]
enum PersistCommand {
    Set {
        key: String,
        value: String,
        done: Reply<()>,
    },
    SetMany {
        entries: Vec<(String, String)>,
        done: Reply<()>,
    },
    Remove {
        key: String,
        done: Reply<()>,
    },
    RemoveMany {
        keys: Vec<String>,
        done: Reply<()>,
    },
    /// Reads go through the queue so they observe every earlier write.
    Load {
        keys: Vec<String>,
        done: Reply<LoadedEntries>,
    },
    Flush {
        done: oneshot::Sender<()>,
    },
    Shutdown {
        done: oneshot::Sender<()>,
    },
}

// =============================================================================
// Ticket
// =============================================================================

/// Completion handle for one queued write.
///
/// Dropping it is fine: the write still happens, its outcome is only logged.
#[derive(Debug)]
pub struct PersistTicket {
    rx: oneshot::Receiver<StoreResult<()>>,
}

impl PersistTicket {
    /// Waits until the write has been applied (or has failed).
    pub async fn wait(self) -> StoreResult<()> {
        self.rx.await.unwrap_or(Err(StoreError::WriterClosed))
    }

    /// A ticket that is already settled with `result`.
    pub(crate) fn settled(result: StoreResult<()>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        PersistTicket { rx }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Sending side of the writer. Enqueueing never blocks or awaits, so it is
/// safe to call while holding the store's state lock.
#[derive(Debug, Clone)]
pub struct PersistHandle {
    cmd_tx: mpsc::UnboundedSender<PersistCommand>,
    backlog: Arc<AtomicUsize>,
    warn_depth: usize,
}

impl PersistHandle {
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> PersistTicket {
        let (done, rx) = oneshot::channel();
        self.enqueue(PersistCommand::Set {
            key: key.into(),
            value: value.into(),
            done,
        });
        PersistTicket { rx }
    }

    /// Writes all `entries` as one queued unit, stopping at the first error.
    pub fn set_many(&self, entries: Vec<(String, String)>) -> PersistTicket {
        let (done, rx) = oneshot::channel();
        self.enqueue(PersistCommand::SetMany { entries, done });
        PersistTicket { rx }
    }

    pub fn remove(&self, key: impl Into<String>) -> PersistTicket {
        let (done, rx) = oneshot::channel();
        self.enqueue(PersistCommand::Remove {
            key: key.into(),
            done,
        });
        PersistTicket { rx }
    }

    pub fn remove_many(&self, keys: Vec<String>) -> PersistTicket {
        let (done, rx) = oneshot::channel();
        self.enqueue(PersistCommand::RemoveMany { keys, done });
        PersistTicket { rx }
    }

    /// Reads `keys` after every write queued so far.
    pub async fn load(&self, keys: &[&str]) -> StoreResult<LoadedEntries> {
        let (done, rx) = oneshot::channel();
        self.enqueue(PersistCommand::Load {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            done,
        });
        rx.await.unwrap_or(Err(StoreError::WriterClosed))
    }

    /// Resolves once every write queued before this call has been applied.
    pub async fn flush(&self) -> StoreResult<()> {
        let (done, rx) = oneshot::channel();
        self.enqueue(PersistCommand::Flush { done });
        rx.await.map_err(|_| StoreError::WriterClosed)
    }

    /// Drains queued writes, then stops the writer. Later writes resolve
    /// with [`StoreError::WriterClosed`].
    pub async fn shutdown(&self) -> StoreResult<()> {
        let (done, rx) = oneshot::channel();
        self.enqueue(PersistCommand::Shutdown { done });
        rx.await.map_err(|_| StoreError::WriterClosed)
    }

    fn enqueue(&self, cmd: PersistCommand) {
        let queued = self.backlog.fetch_add(1, Ordering::SeqCst) + 1;
        if queued > self.warn_depth {
            warn!(queued, threshold = self.warn_depth, "Persistence backlog growing");
        }

        // A closed channel drops the command and its reply sender, which
        // settles the caller's ticket with WriterClosed.
        if self.cmd_tx.send(cmd).is_err() {
            self.backlog.fetch_sub(1, Ordering::SeqCst);
            debug!("Persistence writer closed, command dropped");
        }
    }
}

// =============================================================================
// Writer
// =============================================================================

pub struct PersistWriter {
    kv: Arc<dyn KeyValueStore>,
    backlog: Arc<AtomicUsize>,
}

impl PersistWriter {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        PersistWriter {
            kv,
            backlog: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Spawns the writer task. Must be called inside a Tokio runtime.
    pub fn start(self, config: &StoreConfig) -> PersistHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = PersistHandle {
            cmd_tx,
            backlog: Arc::clone(&self.backlog),
            warn_depth: config.persist_queue_depth,
        };

        tokio::spawn(async move {
            self.run(cmd_rx).await;
        });

        handle
    }

    async fn run(self, mut cmd_rx: mpsc::UnboundedReceiver<PersistCommand>) {
        info!("Persistence writer started");

        while let Some(cmd) = cmd_rx.recv().await {
            self.backlog.fetch_sub(1, Ordering::SeqCst);

            match cmd {
                PersistCommand::Set { key, value, done } => {
                    let result = self.kv.set(&key, &value).await;
                    report("set", &key, &result);
                    let _ = done.send(result);
                }
                PersistCommand::SetMany { entries, done } => {
                    let mut result = Ok(());
                    for (key, value) in &entries {
                        result = self.kv.set(key, value).await;
                        report("set", key, &result);
                        if result.is_err() {
                            break;
                        }
                    }
                    let _ = done.send(result);
                }
                PersistCommand::Remove { key, done } => {
                    let result = self.kv.remove(&key).await;
                    report("remove", &key, &result);
                    let _ = done.send(result);
                }
                PersistCommand::RemoveMany { keys, done } => {
                    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
                    let result = self.kv.remove_many(&refs).await;
                    report("remove_many", &keys.join(","), &result);
                    let _ = done.send(result);
                }
                PersistCommand::Load { keys, done } => {
                    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
                    let result = self.kv.get_many(&refs).await;
                    let _ = done.send(result);
                }
                PersistCommand::Flush { done } => {
                    let _ = done.send(());
                }
                PersistCommand::Shutdown { done } => {
                    info!("Persistence writer shutting down");
                    cmd_rx.close();
                    // Anything queued after the shutdown request is rejected.
                    while let Ok(cmd) = cmd_rx.try_recv() {
                        self.backlog.fetch_sub(1, Ordering::SeqCst);
                        drop(cmd);
                    }
                    let _ = done.send(());
                    break;
                }
            }
        }

        info!("Persistence writer stopped");
    }
}

fn report(op: &str, key: &str, result: &StoreResult<()>) {
    match result {
        Ok(()) => debug!(op, key, "Persisted"),
        Err(e) => warn!(op, key, error = %e, "Persistence failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FailingKv, MemoryKv};

    fn start(kv: Arc<dyn KeyValueStore>) -> PersistHandle {
        PersistWriter::new(kv).start(&StoreConfig::default())
    }

    #[tokio::test]
    async fn test_writes_apply_in_queue_order() {
        let kv = Arc::new(MemoryKv::new());
        let handle = start(kv.clone());

        let _ = handle.set("user", "a");
        let _ = handle.set("user", "b");
        let _ = handle.remove("user");
        let last = handle.set("user", "c");

        last.wait().await.unwrap();
        assert_eq!(kv.peek("user").as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_flush_waits_for_dropped_tickets() {
        let kv = Arc::new(MemoryKv::new());
        let handle = start(kv.clone());

        drop(handle.set_many(vec![
            ("user".to_string(), "{}".to_string()),
            ("userType".to_string(), "owner".to_string()),
        ]));
        handle.flush().await.unwrap();

        assert_eq!(kv.peek("userType").as_deref(), Some("owner"));
    }

    #[tokio::test]
    async fn test_failures_reach_the_ticket() {
        let handle = start(Arc::new(FailingKv));

        let err = handle.set("user", "{}").wait().await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));

        let err = handle.load(&["user"]).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
    }

    #[tokio::test]
    async fn test_load_sees_earlier_writes() {
        let kv = Arc::new(MemoryKv::new());
        let handle = start(kv);

        let _ = handle.set("userType", "renter");
        let entries = handle.load(&["userType", "user"]).await.unwrap();

        assert_eq!(
            entries,
            vec![
                ("userType".to_string(), Some("renter".to_string())),
                ("user".to_string(), None),
            ]
        );
    }

    #[tokio::test]
    async fn test_shutdown_then_write_is_rejected() {
        let kv = Arc::new(MemoryKv::new());
        let handle = start(kv.clone());

        let before = handle.set("userType", "owner");
        handle.shutdown().await.unwrap();
        before.wait().await.unwrap();

        let err = handle.set("userType", "renter").wait().await.unwrap_err();
        assert!(matches!(err, StoreError::WriterClosed));
        assert!(matches!(handle.flush().await, Err(StoreError::WriterClosed)));
        assert_eq!(kv.peek("userType").as_deref(), Some("owner"));
    }

    #[tokio::test]
    async fn test_settled_ticket() {
        assert!(PersistTicket::settled(Ok(())).wait().await.is_ok());
        let err = PersistTicket::settled(Err(StoreError::WriterClosed))
            .wait()
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::WriterClosed));
    }
}
