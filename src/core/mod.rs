pub mod factory;
pub mod inventory;
pub mod manager;

pub use crate::domain::model::{InventoryRecord, ItemDetails, ItemInfo, ItemKind};
pub use crate::domain::ports::{ConfigProvider, InventoryRepository};
pub use crate::utils::error::Result;
