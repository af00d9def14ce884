pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::InventoryConfig;

pub use adapters::file_repository::FileInventoryRepository;
pub use crate::core::factory::{format_record, parse_record, RecordParseError};
pub use crate::core::{inventory::Inventory, manager::InventoryManager};
pub use domain::model::{InventoryRecord, ItemDetails, ItemInfo, ItemKind};
pub use domain::ports::{ConfigProvider, InventoryRepository};
pub use utils::error::{InventoryError, Result};
