//! Single-writer SQLite handler.
//!
//! One worker thread owns the [`Connection`] and runs jobs in arrival order.
//! Async callers enqueue boxed jobs and await the reply on a oneshot channel.
//! Writes name the tables they touch; once committed, the change is broadcast
//! to every live [`QuerySubscription`].

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rusqlite::Connection;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, trace};

use super::{
    DbError, DbResult, Table, TableSet,
    subscription::{LiveQuery, QuerySubscription},
};

type Job = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum Command {
    Run(Job),
    Shutdown { resp: oneshot::Sender<()> },
}

/// Tuning knobs for [`DatabaseHandler`].
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Bound of the job queue feeding the worker.
    pub command_queue_bound: usize,
    /// Capacity of the change broadcast; slower subscribers lag and re-query.
    pub change_buffer: usize,
    /// How long SQLite waits on a locked database.
    pub busy_timeout_ms: u64,
    /// Switch file-backed databases to write-ahead logging.
    pub wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            change_buffer: 1024,
            busy_timeout_ms: 5_000,
            wal: true,
        }
    }
}

/// Cloneable handle to the database worker.
#[derive(Clone)]
pub struct DatabaseHandler {
    cmd_tx: mpsc::Sender<Command>,
    changes_tx: broadcast::Sender<TableSet>,
}

impl DatabaseHandler {
    /// Opens or creates a database at `path` and starts its worker.
    pub fn open(path: impl AsRef<Path>, config: DatabaseConfig) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        if config.wal {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
        }
        Self::start(conn, config)
    }

    /// Opens a private in-memory database and starts its worker.
    pub fn open_in_memory(config: DatabaseConfig) -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::start(conn, config)
    }

    fn start(conn: Connection, config: DatabaseConfig) -> DbResult<Self> {
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        conn.execute_batch(include_str!("schema.sql"))?;

        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
        let (changes_tx, _) = broadcast::channel::<TableSet>(config.change_buffer.max(1));

        thread::Builder::new()
            .name("mangashelf-db".to_string())
            .spawn(move || worker_loop(conn, cmd_rx))?;
        debug!(queue = config.command_queue_bound, "database worker started");

        Ok(Self { cmd_tx, changes_tx })
    }

    /// Runs `f` on the worker and returns its result.
    pub async fn execute<T, F>(&self, f: F) -> DbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> DbResult<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move |conn| {
            let _ = tx.send(f(conn));
        });
        self.cmd_tx
            .send(Command::Run(job))
            .await
            .map_err(|_| DbError::ChannelClosed)?;
        rx.await.map_err(|_| DbError::ChannelClosed)?
    }

    /// Strict single-row read; `None` becomes [`DbError::NotFound`].
    pub async fn await_one<T, F>(&self, query: F) -> DbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> DbResult<Option<T>> + Send + 'static,
    {
        self.await_one_or_null(query).await?.ok_or(DbError::NotFound)
    }

    /// Single-row read that tolerates absence.
    pub async fn await_one_or_null<T, F>(&self, query: F) -> DbResult<Option<T>>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> DbResult<Option<T>> + Send + 'static,
    {
        self.execute(move |conn| query(conn)).await
    }

    /// Multi-row read.
    pub async fn await_list<T, F>(&self, query: F) -> DbResult<Vec<T>>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> DbResult<Vec<T>> + Send + 'static,
    {
        self.execute(move |conn| query(conn)).await
    }

    /// Runs a write, optionally inside a transaction, then notifies live
    /// queries watching any of `tables`.
    ///
    /// With `in_transaction`, an error returned by `f` rolls back every
    /// statement it executed.
    pub async fn await_write<T, F>(
        &self,
        tables: &[Table],
        in_transaction: bool,
        f: F,
    ) -> DbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> DbResult<T> + Send + 'static,
    {
        let changed = TableSet::of(tables);
        let changes_tx = self.changes_tx.clone();
        self.execute(move |conn| {
            let out = if in_transaction {
                let tx = conn.transaction()?;
                let out = f(&tx)?;
                tx.commit()?;
                out
            } else {
                f(conn)?
            };
            if !changed.is_empty() {
                trace!(?changed, "tables changed");
                let _ = changes_tx.send(changed);
            }
            Ok(out)
        })
        .await
    }

    /// Live query that re-runs `query` whenever one of `tables` changes.
    pub fn subscribe<T, F>(&self, tables: &[Table], query: F) -> QuerySubscription<T>
    where
        T: Send + 'static,
        F: Fn(&Connection) -> DbResult<T> + Send + Sync + 'static,
    {
        let query: LiveQuery<T> = Arc::new(query);
        QuerySubscription::new(
            self.clone(),
            TableSet::of(tables),
            self.changes_tx.subscribe(),
            query,
        )
    }

    /// Live strict single-row query; absence is delivered as [`DbError::NotFound`].
    pub fn subscribe_to_one<T, F>(&self, tables: &[Table], query: F) -> QuerySubscription<T>
    where
        T: Send + 'static,
        F: Fn(&Connection) -> DbResult<Option<T>> + Send + Sync + 'static,
    {
        self.subscribe(tables, move |conn| query(conn)?.ok_or(DbError::NotFound))
    }

    /// Live single-row query that tolerates absence.
    pub fn subscribe_to_one_or_null<T, F>(
        &self,
        tables: &[Table],
        query: F,
    ) -> QuerySubscription<Option<T>>
    where
        T: Send + 'static,
        F: Fn(&Connection) -> DbResult<Option<T>> + Send + Sync + 'static,
    {
        self.subscribe(tables, query)
    }

    /// Live multi-row query.
    pub fn subscribe_to_list<T, F>(&self, tables: &[Table], query: F) -> QuerySubscription<Vec<T>>
    where
        T: Send + 'static,
        F: Fn(&Connection) -> DbResult<Vec<T>> + Send + Sync + 'static,
    {
        self.subscribe(tables, query)
    }

    /// Stops the worker once queued jobs have run. Later calls on any clone
    /// fail with [`DbError::ChannelClosed`] and live queries end.
    pub async fn close(&self) -> DbResult<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| DbError::ChannelClosed)?;
        rx.await.map_err(|_| DbError::ChannelClosed)
    }

    /// Resolves once the worker has stopped accepting jobs.
    pub(crate) async fn closed(&self) {
        self.cmd_tx.closed().await
    }
}

fn worker_loop(mut conn: Connection, mut cmd_rx: mpsc::Receiver<Command>) {
    while let Some(cmd) = cmd_rx.blocking_recv() {
        match cmd {
            Command::Run(job) => job(&mut conn),
            Command::Shutdown { resp } => {
                let _ = resp.send(());
                break;
            }
        }
    }
    debug!("database worker stopped");
}
