//! Live query subscriptions.

use std::future::Future;
use std::sync::Arc;

use futures::Stream;
use rusqlite::Connection;
use tokio::sync::broadcast::{self, error::RecvError};

use super::{DbError, DbResult, TableSet, handler::DatabaseHandler};

pub(crate) type LiveQuery<T> = Arc<dyn Fn(&Connection) -> DbResult<T> + Send + Sync>;

/// Push-based live query.
///
/// The first [`QuerySubscription::next`] delivers the current result. Every
/// later call waits for a committed write to one of the watched tables and
/// delivers the full, re-queried result. Returns `None` once the handler is
/// closed.
pub struct QuerySubscription<T> {
    handler: DatabaseHandler,
    tables: TableSet,
    changes: broadcast::Receiver<TableSet>,
    query: LiveQuery<T>,
    primed: bool,
}

impl<T: Send + 'static> QuerySubscription<T> {
    pub(crate) fn new(
        handler: DatabaseHandler,
        tables: TableSet,
        changes: broadcast::Receiver<TableSet>,
        query: LiveQuery<T>,
    ) -> Self {
        Self {
            handler,
            tables,
            changes,
            query,
            primed: false,
        }
    }

    /// Waits for the next result.
    pub async fn next(&mut self) -> Option<DbResult<T>> {
        if !self.primed {
            self.primed = true;
            return self.run().await;
        }

        loop {
            let changed = tokio::select! {
                changed = self.changes.recv() => changed,
                _ = self.handler.closed() => return None,
            };
            match changed {
                Ok(changed) if changed.intersects(self.tables) => return self.run().await,
                Ok(_) => continue,
                // Missed notifications may have touched our tables; re-query.
                Err(RecvError::Lagged(_)) => return self.run().await,
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Adapts the subscription into a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = DbResult<T>> + Send {
        futures::stream::unfold(self, |mut sub| async move {
            let item = sub.next().await?;
            Some((item, sub))
        })
    }

    fn run(&self) -> impl Future<Output = Option<DbResult<T>>> + Send + use<T> {
        let handler = self.handler.clone();
        let query = Arc::clone(&self.query);
        async move {
            match handler.execute(move |conn| query(conn)).await {
                Err(DbError::ChannelClosed) => None,
                other => Some(other),
            }
        }
    }
}
