pub mod base;
pub mod csv;
pub mod disk;
pub mod factory;

pub use base::{StorageBackend, StorageItem};
pub use self::csv::CsvStorage;
pub use disk::JsonStorage;
pub use factory::{create_storage, Storage, StorageType};
