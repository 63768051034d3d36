use crate::model::{PriceRecord, StorageError};
use crate::storage::{DbHealth, PriceSink, SinkLease};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Hands out SQLite connections to the configured database file.
pub struct SqliteSink {
    db_path: PathBuf,
}

impl SqliteSink {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

impl PriceSink for SqliteSink {
    fn acquire(&self) -> Result<Box<dyn SinkLease>, StorageError> {
        Ok(Box::new(SqliteStorage::open(&self.db_path)?))
    }
}

/// One open connection to the price table.
pub struct SqliteStorage {
    conn: Connection,
    db_path: PathBuf,
}

impl SqliteStorage {
    /// Opens the database and creates the `Productos` table when missing.
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("{}: {}", db_path.display(), e)))?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS Productos (
                IdProducto TEXT NOT NULL,
                Descripcion TEXT NOT NULL,
                ConOferta INTEGER NOT NULL,
                Precio TEXT,
                PrecioOriginal TEXT,
                Moneda TEXT NOT NULL,
                IdCategoria INTEGER NOT NULL,
                DescripcionCategoria TEXT NOT NULL,
                IdSubCategoria INTEGER NOT NULL DEFAULT 0,
                FechaRegistro TEXT NOT NULL
            );
            "
        )?;

        info!("🔌 Connected to SQLite database {}", db_path.display());
        Ok(Self {
            conn,
            db_path: db_path.to_path_buf(),
        })
    }
}

impl SinkLease for SqliteStorage {
    fn insert_batch(&mut self, batch: &[PriceRecord]) -> Result<usize, StorageError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO Productos (
                    IdProducto, Descripcion, ConOferta, Precio, PrecioOriginal,
                    Moneda, IdCategoria, DescripcionCategoria, IdSubCategoria, FechaRegistro
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;

            for record in batch {
                stmt.execute(params![
                    &record.product_id,
                    &record.description,
                    record.on_offer,
                    record.price.map(|p| p.to_string()),
                    record.original_price.map(|p| p.to_string()),
                    &record.currency,
                    record.category_id,
                    &record.category_name,
                    record.sub_category_id,
                    &record.recorded_at,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Inserted {} rows into Productos", batch.len());
        Ok(batch.len())
    }

    fn ping(&self) -> Result<DbHealth, StorageError> {
        let current_time: String =
            self.conn
                .query_row("SELECT datetime('now')", [], |row| row.get(0))?;

        Ok(DbHealth {
            database: self.db_path.display().to_string(),
            server: format!("SQLite {}", rusqlite::version()),
            current_time,
        })
    }

    fn release(self: Box<Self>) -> Result<(), StorageError> {
        let SqliteStorage { conn, db_path } = *self;
        conn.close()
            .map_err(|(_, e)| StorageError::DatabaseError(e))?;
        info!("🔌 Database connection closed ({})", db_path.display());
        Ok(())
    }
}
