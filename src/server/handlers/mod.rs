//! HTTP handlers.

mod categories;
mod health;
mod prices;

pub use categories::{branch_categories_handler, category_tree_handler, resolved_categories_handler};
pub use health::{db_health_handler, health_handler};
pub use prices::collect_prices_handler;
