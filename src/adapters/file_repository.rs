use crate::core::factory::parse_record;
use crate::domain::model::InventoryRecord;
use crate::domain::ports::InventoryRepository;
use crate::utils::error::{InventoryError, Result};
use crate::utils::validation::validate_path;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, PersistError};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Reads and writes the comma-separated inventory text file.
#[derive(Debug, Clone, Default)]
pub struct FileInventoryRepository {
    scratch_dir: Option<PathBuf>,
}

impl FileInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory that receives the temporary file during a save. Defaults to
    /// the system temp directory.
    pub fn with_scratch_dir(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: Some(scratch_dir.into()),
        }
    }

    fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

impl InventoryRepository for FileInventoryRepository {
    fn load_inventory(&self, path: &Path) -> Result<Vec<InventoryRecord>> {
        if !path.is_file() {
            return Err(InventoryError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        let content = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&text);

        // Lines end in `\n`, `\r\n` or a lone `\r`. The empty pieces between
        // `\r` and `\n` are blank and parse to nothing.
        // Bad rows are expected in a hand-edited file; skip them quietly.
        let records: Vec<InventoryRecord> = content
            .split(['\r', '\n'])
            .filter_map(|line| parse_record(line).ok().flatten())
            .collect();

        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            "Loaded inventory"
        );
        Ok(records)
    }

    fn save_inventory(&self, path: &Path, records: &[InventoryRecord]) -> Result<()> {
        validate_path("path", path)
            .map_err(|e| InventoryError::invalid_argument("path", e.to_string()))?;

        let scratch_dir = self.scratch_dir();
        let mut temp = NamedTempFile::new_in(&scratch_dir)?;
        tracing::debug!(temp = %temp.path().display(), "Writing inventory to temporary file");

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            for record in records {
                writeln!(writer, "{}", record)?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        // Not crash-atomic: the old file is gone until the move completes.
        if path.is_file() {
            fs::remove_file(path)?;
        }

        // Dropping the temp file handle removes it from the scratch
        // directory on every path below.
        if let Err(err) = temp.persist(path) {
            copy_into_place(err, path)?;
        }

        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            "Saved inventory"
        );
        Ok(())
    }
}

/// Fallback for a rename that cannot cross devices. The temporary file is
/// removed when `err` drops, whether or not the copy succeeds.
fn copy_into_place(err: PersistError, path: &Path) -> Result<()> {
    tracing::debug!(
        error = %err.error,
        "Rename into place failed, copying temporary file instead"
    );
    fs::copy(err.file.path(), path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch_is_empty(dir: &Path) -> bool {
        fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");

        let result = FileInventoryRepository::new().load_inventory(&path);
        assert!(matches!(result, Err(InventoryError::NotFound { .. })));
    }

    #[test]
    fn test_load_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = FileInventoryRepository::new().load_inventory(dir.path());
        assert!(matches!(result, Err(InventoryError::NotFound { .. })));
    }

    #[test]
    fn test_load_handles_crlf_line_endings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.txt");
        fs::write(
            &path,
            "Book,Dune,9.99,Sci-Fi,Paperback,1965,Herbert,Chilton\r\nGame,Doom,19.99,Action,PC,1993,id,9.5\r\n",
        )
        .unwrap();

        let records = FileInventoryRepository::new().load_inventory(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title(), "Dune");
        assert_eq!(
            records[1].to_string(),
            "Game,Doom,19.99,Action,PC,1993,id,9.5"
        );
    }

    #[test]
    fn test_load_strips_byte_order_mark() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.txt");
        fs::write(
            &path,
            "\u{FEFF}Book,Dune,9.99,Sci-Fi,Paperback,1965,Herbert,Chilton\nGame,Doom,19.99,Action,PC,1993,id,9.5\n",
        )
        .unwrap();

        let records = FileInventoryRepository::new().load_inventory(&path).unwrap();
        let titles: Vec<_> = records.iter().map(|r| r.title()).collect();
        assert_eq!(titles, ["Dune", "Doom"]);
        assert_eq!(records[0].to_string(), "Book,Dune,9.99,Sci-Fi,Paperback,1965,Herbert,Chilton");
    }

    #[test]
    fn test_load_handles_carriage_return_line_endings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.txt");
        fs::write(
            &path,
            "Book,Dune,9.99,Sci-Fi,Paperback,1965,Herbert,Chilton\rMovie,Heat,9.99,Crime,DVD,1995,Mann,170\r",
        )
        .unwrap();

        let records = FileInventoryRepository::new().load_inventory(&path).unwrap();
        let titles: Vec<_> = records.iter().map(|r| r.title()).collect();
        assert_eq!(titles, ["Dune", "Heat"]);
    }

    #[test]
    fn test_copy_fallback_writes_target_and_removes_temp_file() {
        let scratch = TempDir::new().unwrap();
        let target_dir = TempDir::new().unwrap();
        let target = target_dir.path().join("inventory.txt");
        fs::write(&target, "stale\n").unwrap();

        let mut temp = NamedTempFile::new_in(scratch.path()).unwrap();
        writeln!(temp, "Movie,Heat,9.99,Crime,DVD,1995,Mann,170").unwrap();
        temp.flush().unwrap();
        let err = PersistError {
            error: std::io::Error::other("cross-device link"),
            file: temp,
        };

        copy_into_place(err, &target).unwrap();

        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "Movie,Heat,9.99,Crime,DVD,1995,Mann,170\n"
        );
        assert!(scratch_is_empty(scratch.path()));
    }

    #[test]
    fn test_copy_fallback_failure_still_removes_temp_file() {
        let scratch = TempDir::new().unwrap();
        let target_root = TempDir::new().unwrap();
        let target = target_root.path().join("no-such-dir").join("inventory.txt");

        let temp = NamedTempFile::new_in(scratch.path()).unwrap();
        let err = PersistError {
            error: std::io::Error::other("cross-device link"),
            file: temp,
        };

        let result = copy_into_place(err, &target);
        assert!(matches!(result, Err(InventoryError::IoError(_))));
        assert!(scratch_is_empty(scratch.path()));
    }

    #[test]
    fn test_save_rejects_empty_path_before_io() {
        let scratch = TempDir::new().unwrap();
        let repo = FileInventoryRepository::with_scratch_dir(scratch.path());

        let result = repo.save_inventory(Path::new(""), &[]);
        assert!(matches!(result, Err(InventoryError::InvalidArgument { .. })));
        assert!(scratch_is_empty(scratch.path()));
    }

    #[test]
    fn test_save_failure_cleans_up_temp_file() {
        let scratch = TempDir::new().unwrap();
        let target_root = TempDir::new().unwrap();
        let target = target_root.path().join("no-such-dir").join("inventory.txt");
        let repo = FileInventoryRepository::with_scratch_dir(scratch.path());

        let record = crate::core::factory::parse_record(
            "Movie,Heat,9.99,Crime,DVD,1995,Mann,170",
        )
        .unwrap()
        .unwrap();

        let result = repo.save_inventory(&target, &[record]);
        assert!(matches!(result, Err(InventoryError::IoError(_))));
        assert!(scratch_is_empty(scratch.path()));
        assert!(!target.exists());
    }
}
