pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteSink;
pub use traits::{DbHealth, PriceSink, SinkLease};
