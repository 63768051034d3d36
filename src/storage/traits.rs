use crate::model::{PriceRecord, StorageError};

/// What a database round trip reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct DbHealth {
    pub database: String,
    pub server: String,
    pub current_time: String,
}

/// Destination for collected price batches.
pub trait PriceSink: Send + Sync {
    /// Opens a connection for the caller's exclusive use.
    fn acquire(&self) -> Result<Box<dyn SinkLease>, StorageError>;
}

/// A connection held between `acquire` and `release`.
pub trait SinkLease: Send {
    /// Inserts the whole batch in one transaction and returns the row count.
    fn insert_batch(&mut self, batch: &[PriceRecord]) -> Result<usize, StorageError>;

    fn ping(&self) -> Result<DbHealth, StorageError>;

    fn release(self: Box<Self>) -> Result<(), StorageError>;
}
