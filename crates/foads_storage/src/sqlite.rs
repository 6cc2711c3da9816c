//! SQLite-backed asset store.

use crate::{AssetMirror, AssetStore, spawn_mirror};
use async_trait::async_trait;
use foads_core::{Asset, AssetId, AssetKind, NewAsset};
use foads_error::{StorageError, StorageErrorKind};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS assets (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        kind        TEXT NOT NULL,
        content     TEXT NOT NULL,
        prompt      TEXT NOT NULL,
        created_at  INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_assets_created_at ON assets(created_at);
";

/// Durable asset store kept in a single SQLite file.
///
/// One connection sits behind a mutex, so every statement runs as its own
/// serialised transaction. Statements run on the blocking thread pool.
#[derive(Clone)]
pub struct SqliteAssetStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
    mirror: Option<Arc<dyn AssetMirror>>,
}

impl SqliteAssetStore {
    /// Open (or create) the store at `path`, creating parent directories.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::new(StorageErrorKind::Open(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            StorageError::new(StorageErrorKind::Open(format!("{}: {}", path.display(), e)))
        })?;
        let store = Self::init(conn, Some(path.to_path_buf()))?;

        info!("Asset store opened");
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::new(StorageErrorKind::Open(e.to_string())))?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StorageError::new(StorageErrorKind::Open(e.to_string())))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
            mirror: None,
        })
    }

    /// Attach a remote mirror that receives every new record.
    pub fn with_mirror(mut self, mirror: Arc<dyn AssetMirror>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Location of the database file, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `op` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|e| {
                StorageError::new(StorageErrorKind::Task(format!("connection lock poisoned: {}", e)))
            })?;
            op(&guard)
        })
        .await
        .map_err(|e| StorageError::new(StorageErrorKind::Task(e.to_string())))?
    }
}

impl std::fmt::Debug for SqliteAssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteAssetStore")
            .field("path", &self.path)
            .field("mirrored", &self.mirror.is_some())
            .finish_non_exhaustive()
    }
}

type AssetRow = (i64, String, String, String, i64);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AssetRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn row_to_asset(row: AssetRow) -> Result<Asset, StorageError> {
    let (id, kind, content, prompt, created_at) = row;
    let kind: AssetKind = kind.parse().map_err(|_| {
        StorageError::new(StorageErrorKind::Corrupt(format!(
            "asset {} has unknown kind '{}'",
            id, kind
        )))
    })?;
    Ok(Asset::from_parts(AssetId(id), kind, content, prompt, created_at))
}

fn transaction_error(e: rusqlite::Error) -> StorageError {
    StorageError::new(StorageErrorKind::Transaction(e.to_string()))
}

#[async_trait]
impl AssetStore for SqliteAssetStore {
    #[instrument(skip(self, asset), fields(kind = %asset.kind()))]
    async fn add_asset(&self, asset: NewAsset) -> Result<AssetId, StorageError> {
        let record = asset.clone();
        let id = self
            .with_conn(move |conn| {
                conn.execute(
                    "INSERT INTO assets (kind, content, prompt, created_at) VALUES (?1, ?2, ?3, ?4)",
                    params![
                        record.kind().to_string(),
                        record.content(),
                        record.prompt(),
                        record.created_at()
                    ],
                )
                .map_err(transaction_error)?;
                Ok(AssetId(conn.last_insert_rowid()))
            })
            .await?;

        debug!(asset_id = %id, "Asset stored");
        spawn_mirror(self.mirror.as_ref(), asset.with_id(id));
        Ok(id)
    }

    async fn get_all_assets(&self) -> Result<Vec<Asset>, StorageError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, kind, content, prompt, created_at FROM assets
                     ORDER BY created_at DESC, id DESC",
                )
                .map_err(transaction_error)?;

            let rows = stmt
                .query_map([], read_row)
                .map_err(transaction_error)?;

            rows.map(|row| row.map_err(transaction_error).and_then(row_to_asset))
                .collect()
        })
        .await
    }

    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>, StorageError> {
        self.with_conn(move |conn| {
            let row: Option<AssetRow> = conn
                .query_row(
                    "SELECT id, kind, content, prompt, created_at FROM assets WHERE id = ?1",
                    params![id.0],
                    read_row,
                )
                .optional()
                .map_err(transaction_error)?;
            row.map(row_to_asset).transpose()
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_asset(&self, id: AssetId) -> Result<(), StorageError> {
        let removed = self
            .with_conn(move |conn| {
                conn.execute("DELETE FROM assets WHERE id = ?1", params![id.0])
                    .map_err(transaction_error)
            })
            .await?;

        debug!(asset_id = %id, removed, "Asset delete");
        Ok(())
    }
}
