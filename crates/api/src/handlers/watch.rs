//! Server-sent event streams over the row watcher.
//!
//! Entities expose `GET /{id}/watch`; the handler verifies the row exists,
//! subscribes to its change feed, and relays each change as one SSE event
//! named after the action (`insert`, `update`, `delete`).

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use futures::StreamExt;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use curby_core::types::DbId;
use curby_db::watch::RowWatcher;

/// Build an SSE response relaying changes for one row.
///
/// A subscriber that falls behind the channel capacity receives a `lagged`
/// event instead of the missed changes and should refetch the row.
pub fn row_event_stream(
    watcher: &RowWatcher,
    table: &'static str,
    id: DbId,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = watcher.subscribe_row(table, id);

    let stream = BroadcastStream::new(rx).filter_map(|item| async move {
        match item {
            Ok(change) => {
                let event = Event::default()
                    .event(change.action.clone())
                    .json_data(&change)
                    .ok()?;
                Some(Ok(event))
            }
            Err(BroadcastStreamRecvError::Lagged(missed)) => Some(Ok(Event::default()
                .event("lagged")
                .data(missed.to_string()))),
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
