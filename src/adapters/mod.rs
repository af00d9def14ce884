// Adapters layer: concrete implementations for the file system and export formats.

pub mod export;
pub mod file_repository;
