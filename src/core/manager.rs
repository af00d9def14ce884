use crate::core::inventory::{Inventory, ItemKey};
use crate::domain::model::{InventoryRecord, ItemKind};
use crate::domain::ports::InventoryRepository;
use crate::utils::error::{InventoryError, Result};
use crate::utils::validation::Validate;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Marks the manager busy for as long as it lives.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| InventoryError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the working set for one inventory file and moves it to and from a
/// repository.
///
/// Loads and saves run on a blocking background task, one at a time. While
/// one is running, every other call fails with [`InventoryError::Busy`].
pub struct InventoryManager<R: InventoryRepository + 'static> {
    repository: Arc<R>,
    path: PathBuf,
    inventory: RwLock<Inventory>,
    busy: AtomicBool,
}

impl<R: InventoryRepository + 'static> InventoryManager<R> {
    pub fn new(repository: Arc<R>, path: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            path: path.into(),
            inventory: RwLock::new(Inventory::default()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_busy() {
            return Err(InventoryError::Busy);
        }
        Ok(())
    }

    /// Replaces the working set with the file's content. Returns how many
    /// records were loaded.
    pub async fn load(&self) -> Result<usize> {
        let _guard = BusyGuard::acquire(&self.busy)?;

        let repository = Arc::clone(&self.repository);
        let path = self.path.clone();
        let outcome = match tokio::task::spawn_blocking(move || repository.load_inventory(&path)).await {
            Ok(result) => result,
            Err(join_error) => Err(join_error.into()),
        };

        match outcome {
            Ok(records) => {
                let count = records.len();
                *self.inventory.write().await = Inventory::from_records(records);
                tracing::info!(path = %self.path.display(), records = count, "Inventory loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load the inventory.");
                Err(e)
            }
        }
    }

    /// Writes the current working set over the file.
    pub async fn save(&self) -> Result<()> {
        let _guard = BusyGuard::acquire(&self.busy)?;

        let records = self.inventory.read().await.to_records();
        let count = records.len();
        let repository = Arc::clone(&self.repository);
        let path = self.path.clone();
        let outcome =
            match tokio::task::spawn_blocking(move || repository.save_inventory(&path, &records)).await {
                Ok(result) => result,
                Err(join_error) => Err(join_error.into()),
            };

        match outcome {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), records = count, "Inventory saved");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save the inventory.");
                Err(e)
            }
        }
    }

    pub async fn add(&self, record: InventoryRecord) -> Result<ItemKey> {
        self.ensure_idle()?;
        record.validate()?;
        let key = self.inventory.write().await.add(record);
        tracing::debug!(kind = %key.kind, index = key.index, "Item added");
        Ok(key)
    }

    pub async fn find(
        &self,
        kind: ItemKind,
        title: &str,
        platform: &str,
    ) -> Result<Option<(ItemKey, InventoryRecord)>> {
        self.ensure_idle()?;
        let inventory = self.inventory.read().await;
        Ok(inventory
            .find(kind, title, platform)
            .and_then(|key| inventory.get(key).map(|record| (key, record.clone()))))
    }

    pub async fn modify(&self, key: ItemKey, record: InventoryRecord) -> Result<InventoryRecord> {
        self.ensure_idle()?;
        record.validate()?;
        self.inventory.write().await.replace(key, record)
    }

    pub async fn delete(&self, key: ItemKey) -> Result<InventoryRecord> {
        self.ensure_idle()?;
        let removed = self.inventory.write().await.remove(key)?;
        tracing::debug!(kind = %key.kind, index = key.index, "Item deleted");
        Ok(removed)
    }

    /// Copy of the working set.
    pub async fn snapshot(&self) -> Inventory {
        self.inventory.read().await.clone()
    }
}
