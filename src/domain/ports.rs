use crate::domain::model::InventoryRecord;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Loads and saves a whole inventory at a location.
pub trait InventoryRepository: Send + Sync {
    /// Returns every readable record in file order. Unparseable lines are
    /// dropped; a missing file is an error.
    fn load_inventory(&self, path: &Path) -> Result<Vec<InventoryRecord>>;

    /// Replaces the content at `path` with `records`.
    fn save_inventory(&self, path: &Path, records: &[InventoryRecord]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn inventory_path(&self) -> &Path;
    fn scratch_dir(&self) -> Option<&Path>;

    fn resolved_scratch_dir(&self) -> PathBuf {
        self.scratch_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir)
    }
}
