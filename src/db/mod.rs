//! Asynchronous, transactional SQLite query executor with live queries.

/// Single-writer handler and its configuration.
pub mod handler;
/// Live query subscriptions.
pub mod subscription;

use thiserror::Error;

/// Errors surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite rejected a statement or transaction.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A JSON-encoded column failed to encode or decode.
    #[error("json column error: {0}")]
    Json(#[from] serde_json::Error),
    /// The worker thread could not be started.
    #[error("failed to start database worker: {0}")]
    Io(#[from] std::io::Error),
    /// A strict single-row read found nothing.
    #[error("record not found")]
    NotFound,
    /// The handler was closed.
    #[error("database handler is closed")]
    ChannelClosed,
}

/// Result alias for storage operations.
pub type DbResult<T> = Result<T, DbError>;

/// Tables whose changes are broadcast to live queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `mangas`
    Mangas,
    /// `chapters`
    Chapters,
    /// `categories`
    Categories,
    /// `mangas_categories`
    MangasCategories,
}

impl Table {
    const fn bit(self) -> u8 {
        match self {
            Self::Mangas => 1 << 0,
            Self::Chapters => 1 << 1,
            Self::Categories => 1 << 2,
            Self::MangasCategories => 1 << 3,
        }
    }
}

/// Small set of [`Table`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TableSet(u8);

impl TableSet {
    /// Set holding `tables`.
    pub fn of(tables: &[Table]) -> Self {
        Self(tables.iter().fold(0, |acc, t| acc | t.bit()))
    }

    /// True when `table` is in the set.
    pub fn contains(self, table: Table) -> bool {
        self.0 & table.bit() != 0
    }

    /// True when the sets share at least one table.
    pub fn intersects(self, other: TableSet) -> bool {
        self.0 & other.0 != 0
    }

    /// True when no table is in the set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_set_membership() {
        let library = TableSet::of(&[Table::Mangas, Table::Chapters, Table::MangasCategories]);
        assert!(library.contains(Table::Chapters));
        assert!(!library.contains(Table::Categories));
        assert!(library.intersects(TableSet::of(&[Table::MangasCategories])));
        assert!(!library.intersects(TableSet::of(&[Table::Categories])));
        assert!(TableSet::of(&[]).is_empty());
    }
}
