use crate::domain::model::{InventoryRecord, ItemKind};
use crate::utils::error::{InventoryError, Result};

/// Position of a record inside the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub kind: ItemKind,
    pub index: usize,
}

/// In-memory inventory, kept as one list per item kind.
///
/// Changes stay in memory until the records are handed back to a
/// repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    books: Vec<InventoryRecord>,
    movies: Vec<InventoryRecord>,
    games: Vec<InventoryRecord>,
}

impl Inventory {
    /// Splits loaded records by kind, keeping their relative order.
    pub fn from_records(records: Vec<InventoryRecord>) -> Self {
        let mut inventory = Self::default();
        for record in records {
            inventory.list_mut(record.kind()).push(record);
        }
        inventory
    }

    /// All records as they are written on save: books, then movies, then
    /// games.
    pub fn to_records(&self) -> Vec<InventoryRecord> {
        self.books
            .iter()
            .chain(&self.movies)
            .chain(&self.games)
            .cloned()
            .collect()
    }

    pub fn records(&self, kind: ItemKind) -> &[InventoryRecord] {
        match kind {
            ItemKind::Book => &self.books,
            ItemKind::Movie => &self.movies,
            ItemKind::VideoGame => &self.games,
        }
    }

    fn list_mut(&mut self, kind: ItemKind) -> &mut Vec<InventoryRecord> {
        match kind {
            ItemKind::Book => &mut self.books,
            ItemKind::Movie => &mut self.movies,
            ItemKind::VideoGame => &mut self.games,
        }
    }

    pub fn len(&self) -> usize {
        self.books.len() + self.movies.len() + self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add(&mut self, record: InventoryRecord) -> ItemKey {
        let kind = record.kind();
        let list = self.list_mut(kind);
        list.push(record);
        ItemKey {
            kind,
            index: list.len() - 1,
        }
    }

    /// First record of `kind` whose title and platform match, ignoring case.
    pub fn find(&self, kind: ItemKind, title: &str, platform: &str) -> Option<ItemKey> {
        let title = title.to_lowercase();
        let platform = platform.to_lowercase();

        self.records(kind)
            .iter()
            .position(|record| {
                record.title().to_lowercase() == title
                    && record.platform().to_lowercase() == platform
            })
            .map(|index| ItemKey { kind, index })
    }

    pub fn get(&self, key: ItemKey) -> Option<&InventoryRecord> {
        self.records(key.kind).get(key.index)
    }

    /// Swaps in a new version of the record at `key`, returning the old one.
    pub fn replace(&mut self, key: ItemKey, record: InventoryRecord) -> Result<InventoryRecord> {
        if record.kind() != key.kind {
            return Err(InventoryError::invalid_argument(
                "record",
                format!("cannot replace a {} with a {}", key.kind, record.kind()),
            ));
        }

        let slot = self
            .list_mut(key.kind)
            .get_mut(key.index)
            .ok_or(InventoryError::ItemNotFound {
                kind: key.kind,
                index: key.index,
            })?;
        Ok(std::mem::replace(slot, record))
    }

    /// Removes the record at `key`. Keys of later records of the same kind
    /// shift down by one.
    pub fn remove(&mut self, key: ItemKey) -> Result<InventoryRecord> {
        let list = self.list_mut(key.kind);
        if key.index >= list.len() {
            return Err(InventoryError::ItemNotFound {
                kind: key.kind,
                index: key.index,
            });
        }
        Ok(list.remove(key.index))
    }
}
