//! Realtime row subscriptions backed by Postgres `LISTEN`/`NOTIFY`.
//!
//! The `notify_row_change()` trigger (see migrations) publishes a JSON
//! payload on the `row_change` channel whenever a watched table row is
//! inserted, updated, or deleted. [`RowWatcher`] consumes that stream on
//! a dedicated connection and fans each change out to the subscribers of
//! the affected `(table, id)` pair via `tokio::sync::broadcast`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgListener;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use curby_core::types::DbId;

use crate::DbPool;

/// Postgres notification channel the triggers publish on.
const NOTIFY_CHANNEL: &str = "row_change";

/// Buffer capacity per watched row. Subscribers that fall further behind
/// than this observe `RecvError::Lagged` and should refetch the row.
const ROW_CHANNEL_CAPACITY: usize = 16;

// ---------------------------------------------------------------------------
// RowChange
// ---------------------------------------------------------------------------

/// A single change to a watched row, as published by the database trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowChange {
    /// Table the change occurred on, e.g. `"item_reviews"`.
    pub table: String,

    /// Primary key of the affected row.
    pub id: DbId,

    /// One of `"insert"`, `"update"`, or `"delete"`.
    pub action: String,

    /// The row after the change, as JSON. `None` for deletes.
    #[serde(default)]
    pub row: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// RowWatcher
// ---------------------------------------------------------------------------

type SubscriberMap = HashMap<(String, DbId), broadcast::Sender<RowChange>>;

/// Fan-out hub for row-level change notifications.
///
/// Shared via `Arc<RowWatcher>`. Call [`RowWatcher::spawn`] once at startup
/// to start the listener task, then [`subscribe_row`](RowWatcher::subscribe_row)
/// per watched row. Senders for rows with no remaining receivers are pruned
/// on the next change for that row.
pub struct RowWatcher {
    subscribers: Mutex<SubscriberMap>,
    shutdown: CancellationToken,
}

impl RowWatcher {
    /// Create a watcher and spawn its background listener task.
    ///
    /// The task holds a dedicated `LISTEN` connection and reconnects by
    /// virtue of `PgListener`'s built-in recovery. It runs until
    /// [`shutdown`](RowWatcher::shutdown) is called.
    pub async fn spawn(pool: &DbPool) -> Result<Arc<Self>, sqlx::Error> {
        let mut listener = PgListener::connect_with(pool).await?;
        listener.listen(NOTIFY_CHANNEL).await?;

        let watcher = Arc::new(Self {
            subscribers: Mutex::new(HashMap::new()),
            shutdown: CancellationToken::new(),
        });

        let task_watcher = Arc::clone(&watcher);
        tokio::spawn(async move {
            task_watcher.run(listener).await;
        });

        Ok(watcher)
    }

    /// Subscribe to changes on a single row.
    ///
    /// Every change on `(table, id)` published after this call is delivered
    /// to the returned receiver. Dropping the receiver unsubscribes.
    pub fn subscribe_row(&self, table: &str, id: DbId) -> broadcast::Receiver<RowChange> {
        let mut map = self.subscribers.lock().expect("subscriber map poisoned");
        map.entry((table.to_owned(), id))
            .or_insert_with(|| broadcast::channel(ROW_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Number of rows currently being watched.
    pub fn watched_rows(&self) -> usize {
        self.subscribers
            .lock()
            .expect("subscriber map poisoned")
            .len()
    }

    /// Stop the background listener task.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Deliver a change to the row's subscribers, pruning the entry when
    /// nobody is listening anymore.
    fn dispatch(&self, change: RowChange) {
        let key = (change.table.clone(), change.id);
        let mut map = self.subscribers.lock().expect("subscriber map poisoned");
        if let Some(sender) = map.get(&key) {
            if sender.send(change).is_err() {
                map.remove(&key);
            }
        }
    }

    async fn run(self: Arc<Self>, mut listener: PgListener) {
        tracing::info!(channel = NOTIFY_CHANNEL, "row watcher started");
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("row watcher shutting down");
                    break;
                }
                notification = listener.recv() => {
                    match notification {
                        Ok(notification) => {
                            match serde_json::from_str::<RowChange>(notification.payload()) {
                                Ok(change) => self.dispatch(change),
                                Err(error) => {
                                    tracing::warn!(%error, "ignoring malformed row_change payload");
                                }
                            }
                        }
                        Err(error) => {
                            tracing::error!(%error, "row watcher connection lost");
                            break;
                        }
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn watcher() -> RowWatcher {
        RowWatcher {
            subscribers: Mutex::new(HashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }

    fn change(table: &str, id: DbId, action: &str) -> RowChange {
        RowChange {
            table: table.to_owned(),
            id,
            action: action.to_owned(),
            row: Some(serde_json::json!({"id": id})),
        }
    }

    #[tokio::test]
    async fn subscriber_receives_change_for_its_row() {
        let watcher = watcher();
        let id = DbId::new_v4();
        let mut rx = watcher.subscribe_row("item_reviews", id);

        watcher.dispatch(change("item_reviews", id, "update"));

        let received = rx.recv().await.expect("should receive the change");
        assert_eq!(received.table, "item_reviews");
        assert_eq!(received.id, id);
        assert_eq!(received.action, "update");
    }

    #[tokio::test]
    async fn change_on_other_row_is_not_delivered() {
        let watcher = watcher();
        let watched = DbId::new_v4();
        let other = DbId::new_v4();
        let mut rx = watcher.subscribe_row("broadcasts", watched);

        watcher.dispatch(change("broadcasts", other, "update"));
        watcher.dispatch(change("broadcasts", watched, "update"));

        let received = rx.recv().await.expect("should receive the change");
        assert_eq!(received.id, watched);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn same_row_on_different_table_is_distinct() {
        let watcher = watcher();
        let id = DbId::new_v4();
        let mut rx = watcher.subscribe_row("item_reviews", id);

        watcher.dispatch(change("user_reviews", id, "update"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_is_pruned_on_next_change() {
        let watcher = watcher();
        let id = DbId::new_v4();
        let rx = watcher.subscribe_row("devices", id);
        assert_eq!(watcher.watched_rows(), 1);

        drop(rx);
        watcher.dispatch(change("devices", id, "delete"));
        assert_eq!(watcher.watched_rows(), 0);
    }

    #[test]
    fn delete_payload_without_row_deserializes() {
        let payload = format!(
            r#"{{"table":"profiles","id":"{}","action":"delete"}}"#,
            DbId::new_v4()
        );
        let change: RowChange = serde_json::from_str(&payload).expect("valid payload");
        assert_eq!(change.action, "delete");
        assert!(change.row.is_none());
    }
}
