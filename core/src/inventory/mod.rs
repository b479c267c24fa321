pub mod item;
pub mod persist;
pub mod store;

pub use item::{default_inventory, InventoryItem, StockChange};
pub use persist::{persist_change, spawn_persist};
pub use store::{rewrite_quantity, CsvInventoryStore, InventoryStore, Rewrite};
